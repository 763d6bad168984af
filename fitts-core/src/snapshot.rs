use crate::command::DecodeCounters;
use crate::cursor::Cursor;
use crate::target::Target;
use serde::Serialize;

/// Read-only view of one control-loop tick, handed to renderers and loggers.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot<T: Target> {
    pub tick: u64,
    pub session_ns: u64,
    pub cursor: Cursor,
    pub target: T,
    /// Position of the active target in the ring; `None` for generated targets.
    pub target_index: Option<usize>,
    pub contained: bool,
    pub dwell_elapsed_ns: u64,
    pub dwell_remaining_ns: u64,
    pub completed: u32,
    pub remaining: u32,
    pub done: bool,
    pub counters: DecodeCounters,
}

impl<T: Target> SessionSnapshot<T> {
    /// Dwell progress in `[0, 1]`.
    pub fn dwell_fraction(&self) -> f64 {
        let total = self.dwell_elapsed_ns + self.dwell_remaining_ns;
        if total == 0 {
            return 0.0;
        }
        self.dwell_elapsed_ns as f64 / total as f64
    }
}
