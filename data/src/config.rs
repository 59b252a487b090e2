use iced_core::Size;
use serde::{Deserialize, Serialize};

/// Output pixel density of exported charts.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct ScaleFactor(f32);

impl Default for ScaleFactor {
    fn default() -> Self {
        Self(1.0)
    }
}

impl From<f32> for ScaleFactor {
    fn from(value: f32) -> Self {
        if value.is_finite() {
            ScaleFactor(value.clamp(0.5, 4.0))
        } else {
            ScaleFactor::default()
        }
    }
}

impl From<ScaleFactor> for f32 {
    fn from(value: ScaleFactor) -> Self {
        value.0
    }
}

/// Logical canvas size in pixels.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct ChartSize {
    pub width: f32,
    pub height: f32,
}

impl Default for ChartSize {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
        }
    }
}

impl ChartSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A canvas with no area or a non-finite side cannot be drawn on.
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl From<ChartSize> for Size {
    fn from(size: ChartSize) -> Self {
        Size::new(size.width, size.height)
    }
}

impl From<Size> for ChartSize {
    fn from(size: Size) -> Self {
        ChartSize::new(size.width, size.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_factor_is_clamped() {
        assert_eq!(f32::from(ScaleFactor::from(10.0)), 4.0);
        assert_eq!(f32::from(ScaleFactor::from(0.1)), 0.5);
        assert_eq!(ScaleFactor::from(f32::NAN), ScaleFactor::default());
    }

    #[test]
    fn drawable_sizes() {
        assert!(ChartSize::default().is_drawable());
        assert!(!ChartSize::new(0.0, 100.0).is_drawable());
        assert!(!ChartSize::new(f32::INFINITY, 100.0).is_drawable());
    }
}
