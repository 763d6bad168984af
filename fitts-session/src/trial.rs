use serde::Serialize;

/// Progress counter of a session.
///
/// The ring task counts confirmations up to a maximum; the single-axis task
/// counts presented targets down to zero. Either way the session is done
/// exactly once, and an external quit ends it without crediting a dwell in
/// progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrialState {
    pub completed: u32,
    pub max: u32,
    pub is_done: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialMode {
    CountUp,
    CountDown,
}

#[derive(Debug, Clone)]
pub struct TrialController {
    mode: TrialMode,
    state: TrialState,
}

impl TrialController {
    pub fn counting(max: u32) -> Self {
        Self::with_mode(TrialMode::CountUp, max)
    }

    pub fn countdown(initial: u32) -> Self {
        Self::with_mode(TrialMode::CountDown, initial)
    }

    fn with_mode(mode: TrialMode, max: u32) -> Self {
        Self {
            mode,
            state: TrialState {
                completed: 0,
                max,
                is_done: max == 0,
            },
        }
    }

    /// Credits one acquisition. Returns true when this confirmation ended the session.
    pub fn on_confirmation(&mut self) -> bool {
        if self.state.is_done {
            return false;
        }
        self.state.completed += 1;
        if self.state.completed >= self.state.max {
            self.state.is_done = true;
        }
        self.state.is_done
    }

    pub fn quit(&mut self) {
        self.state.is_done = true;
    }

    pub fn is_done(&self) -> bool {
        self.state.is_done
    }

    pub fn completed(&self) -> u32 {
        self.state.completed
    }

    /// Targets still to acquire; the countdown value of the single-axis task.
    pub fn remaining(&self) -> u32 {
        self.state.max.saturating_sub(self.state.completed)
    }

    pub fn mode(&self) -> TrialMode {
        self.mode
    }

    pub fn state(&self) -> TrialState {
        self.state
    }
}
