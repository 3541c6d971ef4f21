//! Geometric helpers for text placement
//!
//! World-space points and grid snapping used by layout and sprite drawing.

/// 2D position in world units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Same point moved horizontally
    #[inline]
    pub fn offset_x(self, dx: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y,
        }
    }
}

/// Snap a coordinate down to the nearest multiple of `quantum`.
/// A non-positive quantum leaves the value unchanged.
#[inline]
pub fn snap_down(value: f64, quantum: f64) -> f64 {
    if quantum > 0.0 {
        (value / quantum).floor() * quantum
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_down() {
        assert!((snap_down(1.3, 0.25) - 1.25).abs() < 1e-12);
        assert!((snap_down(-0.1, 0.25) + 0.25).abs() < 1e-12);
        assert!((snap_down(0.75, 0.25) - 0.75).abs() < 1e-12);
        assert_eq!(snap_down(1.3, 0.0), 1.3);
    }

    #[test]
    fn test_offset_x() {
        let p = Point::new(1.0, 2.0).offset_x(-0.5);
        assert_eq!(p, Point::new(0.5, 2.0));
    }
}
