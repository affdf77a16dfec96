use rand::Rng;
use std::time::Duration;

use super::{CanvasSize, Color, Rect, Shape, ShapeKind};

pub const RAIN_DROP_COUNT: usize = 50;
pub const CLOUD_COUNT: usize = 3;

const DROP_LENGTH: f64 = 10.0;
const DROP_THICKNESS: f64 = 2.0;
const CLOUD_WIDTH: f64 = 150.0;
const CLOUD_HEIGHT: f64 = 60.0;
const CLOUD_OPACITY: f32 = 0.6;

/// A value moving linearly from `from` to `to` over `period`, then jumping back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopingMotion {
    pub from: f64,
    pub to: f64,
    pub period: Duration,
}

impl LoopingMotion {
    pub fn value_at(&self, elapsed: Duration) -> f64 {
        let period = self.period.as_secs_f64();
        if period <= 0.0 {
            return self.from;
        }
        let progress = (elapsed.as_secs_f64() % period) / period;
        self.from + (self.to - self.from) * progress
    }
}

/// A short vertical stroke falling from its start to below the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainDrop {
    pub x: f64,
    pub fall: LoopingMotion,
}

impl RainDrop {
    fn generate<R: Rng>(size: CanvasSize, rng: &mut R) -> Self {
        let x = random_below(rng, size.width);
        let start = random_below(rng, size.height);

        Self {
            x,
            fall: LoopingMotion {
                from: start,
                to: size.height + DROP_LENGTH,
                period: Duration::from_secs_f64(rng.gen_range(1.0..2.0)),
            },
        }
    }

    pub fn shape_at(&self, elapsed: Duration) -> Shape {
        Shape {
            kind: ShapeKind::Line,
            bounds: Rect::new(self.x, self.fall.value_at(elapsed), DROP_THICKNESS, DROP_LENGTH),
            fill: Color::LIGHT_BLUE,
            opacity: 1.0,
        }
    }
}

/// An ellipse drifting across the canvas at a fixed height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cloud {
    pub top: f64,
    pub drift: LoopingMotion,
}

impl Cloud {
    fn generate<R: Rng>(index: usize, size: CanvasSize, rng: &mut R) -> Self {
        Self {
            top: 30.0 + index as f64 * 50.0,
            drift: LoopingMotion {
                from: -CLOUD_WIDTH * index as f64,
                to: size.width + 50.0,
                period: Duration::from_secs_f64(30.0 + rng.gen_range(0.0..15.0)),
            },
        }
    }

    pub fn shape_at(&self, elapsed: Duration) -> Shape {
        Shape {
            kind: ShapeKind::Ellipse,
            bounds: Rect::new(self.drift.value_at(elapsed), self.top, CLOUD_WIDTH, CLOUD_HEIGHT),
            fill: Color::LIGHT_GRAY,
            opacity: CLOUD_OPACITY,
        }
    }
}

/// The looping overlay for one weather description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherAnimation {
    pub drops: Vec<RainDrop>,
    pub clouds: Vec<Cloud>,
}

impl WeatherAnimation {
    /// Rain only when `rainy`; clouds for any non-empty description.
    pub fn generate<R: Rng>(description: &str, rainy: bool, size: CanvasSize, rng: &mut R) -> Self {
        if description.is_empty() {
            return Self::default();
        }

        let drops = if rainy {
            (0..RAIN_DROP_COUNT)
                .map(|_| RainDrop::generate(size, rng))
                .collect()
        } else {
            Vec::new()
        };

        let clouds = (0..CLOUD_COUNT)
            .map(|i| Cloud::generate(i, size, rng))
            .collect();

        Self { drops, clouds }
    }

    pub fn is_empty(&self) -> bool {
        self.drops.is_empty() && self.clouds.is_empty()
    }

    /// Shapes of the frame at `elapsed` since the animation started, drops first.
    pub fn frame(&self, elapsed: Duration) -> Vec<Shape> {
        self.drops
            .iter()
            .map(|d| d.shape_at(elapsed))
            .chain(self.clouds.iter().map(|c| c.shape_at(elapsed)))
            .collect()
    }
}

fn random_below<R: Rng>(rng: &mut R, limit: f64) -> f64 {
    if limit > 0.0 { rng.gen_range(0.0..limit) } else { 0.0 }
}
