use fitts_core::DecodeCounters;
use fitts_timing::TickStats;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Every trial was acquired.
    Completed,
    /// Stopped by an external quit signal.
    Quit,
}

/// One confirmed target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Acquisition {
    /// 1-based position in the session.
    pub ordinal: u32,
    pub target_index: Option<usize>,
    pub presented_at_ns: u64,
    pub confirmed_at_ns: u64,
    /// From presentation to confirmation, dwell included.
    pub movement_time_ns: u64,
}

/// What a session produced. Returned to the caller; never written anywhere by the loop.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub outcome: Outcome,
    pub ticks: u64,
    pub duration_ns: u64,
    pub completed: u32,
    pub acquisitions: Vec<Acquisition>,
    pub counters: DecodeCounters,
    pub tick_stats: TickStats,
}

impl SessionReport {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
