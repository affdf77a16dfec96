use rand::Rng;

use super::{CanvasSize, Color, Rect, Shape};

pub const BUILDING_COUNT: usize = 10;
/// Spacing of the window grid inside a building.
pub const WINDOW_PITCH: f64 = 10.0;
pub const WINDOW_SIZE: f64 = 6.0;
pub const LIT_WINDOW_PROBABILITY: f64 = 0.3;

const SKY: Color = Color::rgb(30, 30, 60);
const GRASS: Color = Color::rgb(20, 120, 20);
const ROAD: Color = Color::rgb(50, 50, 50);
const BUILDING: Color = Color::rgb(30, 30, 40);

const GRASS_TOP: f64 = 0.9;
const GRASS_HEIGHT: f64 = 0.1;
const ROAD_TOP: f64 = 0.85;
const ROAD_HEIGHT: f64 = 0.05;

/// One building standing on the road, with its window grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub rows: usize,
    pub cols: usize,
    /// Row-major, `rows * cols` cells.
    pub lit: Vec<bool>,
}

impl Building {
    fn generate<R: Rng>(index: usize, size: CanvasSize, rng: &mut R) -> Self {
        let width = size.width * 0.08 + rng.gen_range(0.0..30.0);
        let height = size.height * 0.2 + rng.gen_range(0.0..80.0);
        let rows = (height / WINDOW_PITCH) as usize;
        let cols = (width / WINDOW_PITCH) as usize;
        let lit = (0..rows * cols)
            .map(|_| rng.gen_bool(LIT_WINDOW_PROBABILITY))
            .collect();

        Self {
            left: index as f64 * (size.width / BUILDING_COUNT as f64),
            top: size.height * ROAD_TOP - height,
            width,
            height,
            rows,
            cols,
            lit,
        }
    }

    pub fn is_lit(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.lit[row * self.cols + col]
    }

    /// Squares for the lit cells only.
    pub fn window_shapes(&self) -> impl Iterator<Item = Shape> + '_ {
        (0..self.rows)
            .flat_map(move |row| (0..self.cols).map(move |col| (row, col)))
            .filter(|&(row, col)| self.is_lit(row, col))
            .map(|(row, col)| {
                Shape::rectangle(
                    Rect::new(
                        self.left + col as f64 * WINDOW_PITCH,
                        self.top + row as f64 * WINDOW_PITCH,
                        WINDOW_SIZE,
                        WINDOW_SIZE,
                    ),
                    Color::YELLOW,
                )
            })
    }

    pub fn shape(&self) -> Shape {
        Shape::rectangle(Rect::new(self.left, self.top, self.width, self.height), BUILDING)
    }
}

/// The background scene: sky, grass, road and a row of buildings.
#[derive(Debug, Clone, PartialEq)]
pub struct Cityscape {
    pub sky: Shape,
    pub grass: Shape,
    pub road: Shape,
    pub buildings: Vec<Building>,
}

impl Cityscape {
    /// Lays out a fresh scene. Returns `None` for a zero-sized canvas.
    pub fn generate<R: Rng>(size: CanvasSize, rng: &mut R) -> Option<Self> {
        if size.is_empty() {
            return None;
        }

        let CanvasSize { width, height } = size;

        let buildings = (0..BUILDING_COUNT)
            .map(|i| Building::generate(i, size, rng))
            .collect();

        Some(Self {
            sky: Shape::rectangle(Rect::new(0.0, 0.0, width, height), SKY),
            grass: Shape::rectangle(
                Rect::new(0.0, height * GRASS_TOP, width, height * GRASS_HEIGHT),
                GRASS,
            ),
            road: Shape::rectangle(
                Rect::new(0.0, height * ROAD_TOP, width, height * ROAD_HEIGHT),
                ROAD,
            ),
            buildings,
        })
    }

    pub fn sky_shapes(&self) -> Vec<Shape> {
        vec![self.sky]
    }

    /// Grass, road, then each building followed by its lit windows, back to front.
    pub fn ground_shapes(&self) -> Vec<Shape> {
        let mut shapes = vec![self.grass, self.road];
        for building in &self.buildings {
            shapes.push(building.shape());
            shapes.extend(building.window_shapes());
        }
        shapes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn zero_sized_canvas_draws_nothing() {
        let mut rng = rng();
        assert!(Cityscape::generate(CanvasSize::new(0.0, 0.0), &mut rng).is_none());
        assert!(Cityscape::generate(CanvasSize::new(0.0, 500.0), &mut rng).is_none());
        assert!(Cityscape::generate(CanvasSize::new(1000.0, 0.0), &mut rng).is_none());
    }

    #[test]
    fn ten_buildings_evenly_spaced() {
        let scene = Cityscape::generate(CanvasSize::new(1000.0, 500.0), &mut rng()).unwrap();
        let lefts: Vec<f64> = scene.buildings.iter().map(|b| b.left).collect();
        let expected: Vec<f64> = (0..10).map(|i| i as f64 * 100.0).collect();
        assert_eq!(lefts, expected);
    }

    #[test]
    fn layers_cover_canvas() {
        let scene = Cityscape::generate(CanvasSize::new(1000.0, 500.0), &mut rng()).unwrap();
        assert_eq!(scene.sky.bounds, Rect::new(0.0, 0.0, 1000.0, 500.0));
        assert_eq!(scene.grass.bounds, Rect::new(0.0, 450.0, 1000.0, 50.0));
        assert_eq!(scene.road.bounds.y, 425.0);
        assert_eq!(scene.road.bounds.height, 25.0);
        assert_eq!(scene.sky_shapes().len(), 1);
    }

    #[test]
    fn buildings_stand_on_the_road() {
        let size = CanvasSize::new(1000.0, 500.0);
        let scene = Cityscape::generate(size, &mut rng()).unwrap();
        for b in &scene.buildings {
            assert!(b.width >= 80.0 && b.width < 110.0, "width {}", b.width);
            assert!(b.height >= 100.0 && b.height < 180.0, "height {}", b.height);
            assert!((b.top + b.height - 425.0).abs() < 1e-9);
        }
    }

    #[test]
    fn window_grid_follows_building_size() {
        let scene = Cityscape::generate(CanvasSize::new(800.0, 600.0), &mut rng()).unwrap();
        for b in &scene.buildings {
            assert_eq!(b.rows, (b.height / 10.0) as usize);
            assert_eq!(b.cols, (b.width / 10.0) as usize);
            assert_eq!(b.lit.len(), b.rows * b.cols);
        }
    }

    #[test]
    fn only_lit_windows_are_drawn() {
        let scene = Cityscape::generate(CanvasSize::new(1000.0, 500.0), &mut rng()).unwrap();
        let lit: usize = scene
            .buildings
            .iter()
            .map(|b| b.lit.iter().filter(|l| **l).count())
            .sum();
        let windows = scene.ground_shapes().len() - 2 - BUILDING_COUNT;
        assert_eq!(windows, lit);
        assert!(lit > 0);
    }

    #[test]
    fn windows_sit_on_the_grid() {
        let scene = Cityscape::generate(CanvasSize::new(1000.0, 500.0), &mut rng()).unwrap();
        let b = &scene.buildings[3];
        for w in b.window_shapes() {
            let col = (w.bounds.x - b.left) / WINDOW_PITCH;
            let row = (w.bounds.y - b.top) / WINDOW_PITCH;
            assert_eq!(col.fract(), 0.0);
            assert!((row - row.round()).abs() < 1e-9);
            assert_eq!(w.bounds.width, WINDOW_SIZE);
        }
    }

    #[test]
    fn each_redraw_is_fresh() {
        let mut rng = rng();
        let size = CanvasSize::new(1000.0, 500.0);
        let first = Cityscape::generate(size, &mut rng).unwrap();
        let second = Cityscape::generate(size, &mut rng).unwrap();
        assert_ne!(first.buildings, second.buildings);
    }
}
