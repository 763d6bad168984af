use crate::cursor::Cursor;
use serde::{Deserialize, Serialize};

/// A goal region the cursor has to dwell inside.
pub trait Target: Clone + Send + Sync + std::fmt::Debug + Serialize {
    /// Containment test. `tolerance` widens the region by the cursor's extent.
    fn contains(&self, cursor: &Cursor, tolerance: f32) -> bool;
}

/// Circular target of the multidirectional ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingTarget {
    pub center_x: f32,
    pub center_y: f32,
    pub radius: f32,
}

impl Target for RingTarget {
    fn contains(&self, cursor: &Cursor, tolerance: f32) -> bool {
        let dx = cursor.x - self.center_x;
        let dy = cursor.y - self.center_y;
        dx.hypot(dy) <= self.radius + tolerance
    }
}

/// Vertical bar of the single-axis task. Only the horizontal interval counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarTarget {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Target for BarTarget {
    fn contains(&self, cursor: &Cursor, tolerance: f32) -> bool {
        cursor.x >= self.x - tolerance && cursor.x <= self.x + self.width + tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_target_includes_cursor_radius() {
        let target = RingTarget {
            center_x: 100.0,
            center_y: 100.0,
            radius: 40.0,
        };
        assert!(target.contains(&Cursor::new(100.0, 100.0), 0.0));
        assert!(target.contains(&Cursor::new(140.0, 100.0), 0.0));
        assert!(!target.contains(&Cursor::new(146.0, 100.0), 0.0));
        assert!(target.contains(&Cursor::new(146.0, 100.0), 7.0));
        assert!(!target.contains(&Cursor::new(135.0, 135.0), 0.0));
    }

    #[test]
    fn bar_target_ignores_vertical_position() {
        let target = BarTarget {
            x: 200.0,
            y: 125.0,
            width: 30.0,
            height: 150.0,
        };
        assert!(target.contains(&Cursor::new(215.0, 0.0), 0.0));
        assert!(target.contains(&Cursor::new(230.0, 390.0), 0.0));
        assert!(!target.contains(&Cursor::new(231.0, 200.0), 0.0));
        assert!(target.contains(&Cursor::new(196.0, 200.0), 4.0));
        assert!(!target.contains(&Cursor::new(195.0, 200.0), 4.0));
    }
}
