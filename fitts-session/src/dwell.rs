use fitts_core::{Cursor, Target};
use std::time::Duration;

/// Continuous-containment bookkeeping for the active target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DwellState {
    pub timer_start: Option<Duration>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DwellOutcome {
    Outside,
    Dwelling,
    /// The threshold was reached this tick. The timer is already cleared.
    Confirmed,
}

/// Reset-on-exit dwell timer.
///
/// The entry tick records the start time with zero elapsed; later ticks measure
/// `now - start`. Leaving the target discards all progress.
#[derive(Debug, Clone)]
pub struct DwellTimer {
    threshold: Duration,
    state: DwellState,
}

impl DwellTimer {
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            state: DwellState::default(),
        }
    }

    pub fn evaluate<T: Target>(
        &mut self,
        cursor: &Cursor,
        target: &T,
        tolerance: f32,
        now: Duration,
    ) -> DwellOutcome {
        self.update(target.contains(cursor, tolerance), now)
    }

    pub fn update(&mut self, contained: bool, now: Duration) -> DwellOutcome {
        if !contained {
            self.state = DwellState::default();
            return DwellOutcome::Outside;
        }

        match self.state.timer_start {
            None => self.state.timer_start = Some(now),
            Some(start) => self.state.elapsed = now.saturating_sub(start),
        }

        if self.state.elapsed >= self.threshold {
            self.state = DwellState::default();
            DwellOutcome::Confirmed
        } else {
            DwellOutcome::Dwelling
        }
    }

    /// Abandons any progress, e.g. when a new target is presented.
    pub fn clear(&mut self) {
        self.state = DwellState::default();
    }

    pub fn state(&self) -> DwellState {
        self.state
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    pub fn remaining(&self) -> Duration {
        self.threshold.saturating_sub(self.state.elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitts_core::RingTarget;
    use proptest::prelude::*;

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    #[test]
    fn entry_tick_starts_at_zero() {
        let mut timer = DwellTimer::new(secs(3.0));
        assert_eq!(timer.update(true, secs(1.0)), DwellOutcome::Dwelling);
        assert_eq!(timer.state().timer_start, Some(secs(1.0)));
        assert_eq!(timer.state().elapsed, Duration::ZERO);

        timer.update(true, secs(2.5));
        assert_eq!(timer.state().elapsed, secs(1.5));
        assert_eq!(timer.remaining(), secs(1.5));
    }

    #[test]
    fn exit_before_threshold_restarts_from_zero() {
        let mut timer = DwellTimer::new(secs(3.0));
        timer.update(true, secs(0.0));
        timer.update(true, secs(2.9));
        assert_eq!(timer.update(false, secs(2.95)), DwellOutcome::Outside);
        assert_eq!(timer.state(), DwellState::default());

        assert_eq!(timer.update(true, secs(3.0)), DwellOutcome::Dwelling);
        assert_eq!(timer.update(true, secs(5.9)), DwellOutcome::Dwelling);
        assert_eq!(timer.update(true, secs(6.0)), DwellOutcome::Confirmed);
        assert_eq!(timer.state(), DwellState::default());
    }

    #[test]
    fn zero_threshold_confirms_on_entry() {
        let mut timer = DwellTimer::new(Duration::ZERO);
        assert_eq!(timer.update(true, secs(4.0)), DwellOutcome::Confirmed);
    }

    #[test]
    fn evaluate_uses_target_geometry() {
        let target = RingTarget {
            center_x: 0.0,
            center_y: 0.0,
            radius: 10.0,
        };
        let mut timer = DwellTimer::new(secs(1.0));
        let inside = Cursor::new(3.0, 4.0);
        let outside = Cursor::new(30.0, 0.0);
        assert_eq!(timer.evaluate(&outside, &target, 0.0, secs(0.0)), DwellOutcome::Outside);
        assert_eq!(timer.evaluate(&inside, &target, 0.0, secs(0.5)), DwellOutcome::Dwelling);
        assert_eq!(timer.evaluate(&inside, &target, 0.0, secs(1.5)), DwellOutcome::Confirmed);
    }

    proptest! {
        #[test]
        fn progress_never_carries_over_an_exit(
            threshold_ms in 1u64..10_000,
            exit_fraction in 0.0f64..1.0,
            reentry_gap_ms in 1u64..5_000,
        ) {
            let threshold = Duration::from_millis(threshold_ms);
            let exit_at = threshold.mul_f64(exit_fraction).min(threshold - Duration::from_nanos(1));
            let mut timer = DwellTimer::new(threshold);

            timer.update(true, Duration::ZERO);
            prop_assert_eq!(timer.update(true, exit_at), DwellOutcome::Dwelling);
            prop_assert_eq!(timer.update(false, exit_at), DwellOutcome::Outside);

            let reentry = exit_at + Duration::from_millis(reentry_gap_ms);
            prop_assert_eq!(timer.update(true, reentry), DwellOutcome::Dwelling);
            prop_assert_eq!(timer.state().elapsed, Duration::ZERO);

            let just_short = reentry + threshold - Duration::from_nanos(1);
            prop_assert_eq!(timer.update(true, just_short), DwellOutcome::Dwelling);
            prop_assert_eq!(timer.update(true, reentry + threshold), DwellOutcome::Confirmed);
        }
    }
}
