pub mod command;
pub mod cursor;
pub mod snapshot;
pub mod target;

pub use command::{Command, DecodeCounters};
pub use cursor::{Axis, AxisBinding, AxisMap, Bounds, Cursor, CursorModel};
pub use snapshot::SessionSnapshot;
pub use target::{BarTarget, RingTarget, Target};
