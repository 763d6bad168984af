use crate::command::Command;
use serde::{Deserialize, Serialize};

/// Cursor centre in canvas coordinates (origin top-left, +y down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    pub x: f32,
    pub y: f32,
}

impl Cursor {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn centered(bounds: &Bounds) -> Self {
        Self {
            x: bounds.width / 2.0,
            y: bounds.height / 2.0,
        }
    }
}

/// Canvas extent. Cursor centres live in `[size/2, extent - size/2]` on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }

    pub fn contains(&self, cursor: &Cursor, cursor_size: f32) -> bool {
        let half = cursor_size / 2.0;
        (half..=self.width - half).contains(&cursor.x)
            && (half..=self.height - half).contains(&cursor.y)
    }
}

/// Signed unit direction a class drives the cursor in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    #[serde(rename = "-x")]
    NegX,
    #[serde(rename = "+x")]
    PosX,
    #[serde(rename = "-y")]
    NegY,
    #[serde(rename = "+y")]
    PosY,
}

impl Axis {
    pub fn unit(self) -> (f32, f32) {
        match self {
            Axis::NegX => (-1.0, 0.0),
            Axis::PosX => (1.0, 0.0),
            Axis::NegY => (0.0, -1.0),
            Axis::PosY => (0.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisBinding {
    pub class: u8,
    pub axis: Axis,
}

/// Class id to axis table. Classes without a binding (and class 0) do not move the cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AxisMap(Vec<AxisBinding>);

impl AxisMap {
    pub fn new(bindings: Vec<AxisBinding>) -> Self {
        Self(bindings)
    }

    pub fn lookup(&self, class: u8) -> Option<Axis> {
        self.0.iter().find(|b| b.class == class).map(|b| b.axis)
    }

    pub fn bindings(&self) -> &[AxisBinding] {
        &self.0
    }
}

impl FromIterator<(u8, Axis)> for AxisMap {
    fn from_iter<I: IntoIterator<Item = (u8, Axis)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(class, axis)| AxisBinding { class, axis })
                .collect(),
        )
    }
}

/// Integrates commands into cursor positions.
#[derive(Debug, Clone)]
pub struct CursorModel {
    pub axis_map: AxisMap,
    pub base_velocity: f32,
    pub bounds: Bounds,
    pub cursor_size: f32,
}

impl CursorModel {
    /// Raw displacement for `command`, before bounds are applied.
    ///
    /// `scale` is 1.0 for per-tick motion, or the seconds elapsed since the
    /// previous tick when velocity is expressed per second.
    pub fn displacement(&self, command: &Command, scale: f32) -> (f32, f32) {
        let Some((class, intensity)) = command.motion() else {
            return (0.0, 0.0);
        };
        let Some(axis) = self.axis_map.lookup(class) else {
            return (0.0, 0.0);
        };
        let (ux, uy) = axis.unit();
        let magnitude = self.base_velocity * intensity * scale;
        (ux * magnitude, uy * magnitude)
    }

    /// Moves `cursor` by the command's displacement. An axis whose step would
    /// leave the canvas keeps its previous coordinate; the other axis still moves.
    pub fn update(&self, cursor: Cursor, command: &Command, scale: f32) -> Cursor {
        let (dx, dy) = self.displacement(command, scale);
        let half = self.cursor_size / 2.0;
        let next = Cursor {
            x: step_within(cursor.x, dx, half, self.bounds.width - half),
            y: step_within(cursor.y, dy, half, self.bounds.height - half),
        };
        debug_assert!(
            !self.bounds.contains(&cursor, self.cursor_size)
                || self.bounds.contains(&next, self.cursor_size)
        );
        next
    }
}

fn step_within(position: f32, delta: f32, low: f32, high: f32) -> f32 {
    let next = position + delta;
    if (low..=high).contains(&next) {
        next
    } else {
        position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ring_model() -> CursorModel {
        CursorModel {
            axis_map: [(1, Axis::NegX), (2, Axis::PosX), (3, Axis::PosY), (4, Axis::NegY)]
                .into_iter()
                .collect(),
            base_velocity: 4.0,
            bounds: Bounds::new(100.0, 80.0),
            cursor_size: 10.0,
        }
    }

    #[test]
    fn displacement_scales_with_velocity_and_intensity() {
        let model = ring_model();
        let command = Command::decode(Some(b"1 2.5".as_slice()));
        assert_eq!(model.displacement(&command, 1.0), (-10.0, 0.0));
    }

    #[test]
    fn rest_unknown_and_bad_input_do_not_move() {
        let model = ring_model();
        for command in [
            Command::decode(Some(b"0 1.0".as_slice())),
            Command::decode(Some(b"9 1.0".as_slice())),
            Command::decode(Some(b"abc 1.0".as_slice())),
            Command::decode(Some(b"".as_slice())),
            Command::Absent,
        ] {
            assert_eq!(model.displacement(&command, 1.0), (0.0, 0.0));
        }
    }

    #[test]
    fn y_classes_follow_the_table() {
        let model = ring_model();
        let start = Cursor::new(50.0, 40.0);
        let down = model.update(start, &Command::decode(Some(b"3 1".as_slice())), 1.0);
        let up = model.update(start, &Command::decode(Some(b"4 1".as_slice())), 1.0);
        assert_eq!(down, Cursor::new(50.0, 44.0));
        assert_eq!(up, Cursor::new(50.0, 36.0));
    }

    #[test]
    fn overshoot_is_discarded_on_that_axis_only() {
        let mut model = ring_model();
        model.axis_map = [(1, Axis::NegX)].into_iter().collect();
        let start = Cursor::new(8.0, 40.0);
        let moved = model.update(start, &Command::decode(Some(b"1 1".as_slice())), 1.0);
        assert_eq!(moved, start);

        let near_edge = Cursor::new(12.0, 40.0);
        let moved = model.update(near_edge, &Command::decode(Some(b"1 1".as_slice())), 1.0);
        assert_eq!(moved, Cursor::new(8.0, 40.0));
    }

    #[test]
    fn per_second_scale_shrinks_the_step() {
        let model = ring_model();
        let command = Command::decode(Some(b"2 1".as_slice()));
        assert_eq!(model.displacement(&command, 0.5), (2.0, 0.0));
    }

    proptest! {
        #[test]
        fn cursor_never_leaves_bounds(
            steps in prop::collection::vec((0u8..6, 0.0f32..500.0), 0..200),
            velocity in 0.1f32..1000.0,
        ) {
            let mut model = ring_model();
            model.base_velocity = velocity;
            let mut cursor = Cursor::centered(&model.bounds);
            for (class_id, intensity) in steps {
                cursor = model.update(cursor, &Command::Move { class_id, intensity }, 1.0);
                prop_assert!(model.bounds.contains(&cursor, model.cursor_size));
            }
        }
    }
}
