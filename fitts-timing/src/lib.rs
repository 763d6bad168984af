pub mod pacer;
pub mod timer;

pub use pacer::{TickHistory, TickPacer, TickStats};
pub use timer::{Clock, HighPrecisionTimer, ManualClock};
