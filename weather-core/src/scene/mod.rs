//! Toolkit-independent drawing primitives for the weather canvas.
//!
//! The generators in this module only produce [`Shape`] lists; the window
//! maps them onto whatever the GUI toolkit draws.

pub mod animation;
pub mod cityscape;

pub use animation::{Cloud, LoopingMotion, RainDrop, WeatherAnimation};
pub use cityscape::{Building, Cityscape};

/// Size of the drawing area in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when nothing can be drawn (zero, negative or NaN extent).
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const LIGHT_BLUE: Color = Color::rgb(173, 216, 230);
    pub const LIGHT_GRAY: Color = Color::rgb(211, 211, 211);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    /// A vertical stroke; `bounds.width` is the stroke thickness.
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub bounds: Rect,
    pub fill: Color,
    pub opacity: f32,
}

impl Shape {
    pub fn rectangle(bounds: Rect, fill: Color) -> Self {
        Self {
            kind: ShapeKind::Rectangle,
            bounds,
            fill,
            opacity: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_canvas_is_empty() {
        assert!(CanvasSize::new(0.0, 500.0).is_empty());
        assert!(CanvasSize::new(1000.0, 0.0).is_empty());
        assert!(CanvasSize::new(f64::NAN, 10.0).is_empty());
        assert!(!CanvasSize::new(1.0, 1.0).is_empty());
    }
}
