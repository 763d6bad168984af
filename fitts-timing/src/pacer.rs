use crate::timer::Clock;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;
use tracing::debug;

const DEFAULT_HISTORY: usize = 1000;

/// Summary of recorded tick-to-tick intervals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickStats {
    pub samples: usize,
    pub average_tick_ns: f64,
    pub jitter_ns: f64,
    pub min_tick_ns: f64,
    pub max_tick_ns: f64,
    pub effective_hz: f64,
}

/// Fixed-capacity interval history. The oldest sample is evicted when full.
#[derive(Debug, Clone)]
pub struct TickHistory {
    samples: VecDeque<Duration>,
    capacity: usize,
}

impl TickHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, d: Duration) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(d);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn stats(&self) -> TickStats {
        if self.is_empty() {
            return TickStats::default();
        }
        let times: Vec<f64> = self.samples.iter().map(|d| d.as_nanos() as f64).collect();
        let n = times.len() as f64;
        let avg = times.iter().sum::<f64>() / n;
        let var = times.iter().map(|x| (x - avg).powi(2)).sum::<f64>() / n;
        let min = times.iter().copied().fold(f64::INFINITY, f64::min);
        let max = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        TickStats {
            samples: times.len(),
            average_tick_ns: avg,
            jitter_ns: var.sqrt(),
            min_tick_ns: min,
            max_tick_ns: max,
            effective_hz: if avg > 0.0 { 1e9 / avg } else { 0.0 },
        }
    }
}

impl Default for TickHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY)
    }
}

/// Holds a loop to a fixed rate against an absolute deadline.
///
/// An overrunning tick re-anchors the deadline at the current time instead of
/// scheduling a burst of catch-up ticks.
#[derive(Debug, Clone)]
pub struct TickPacer {
    period: Duration,
    deadline: Option<Duration>,
    last_tick: Option<Duration>,
    history: TickHistory,
}

impl TickPacer {
    pub fn new(rate_hz: u32) -> Self {
        Self::with_period(Duration::from_secs_f64(1.0 / f64::from(rate_hz.max(1))))
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            deadline: None,
            last_tick: None,
            history: TickHistory::default(),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Marks the start of a tick at `now`; returns the interval since the previous mark.
    pub fn mark(&mut self, now: Duration) -> Option<Duration> {
        let interval = self.last_tick.map(|prev| now.saturating_sub(prev));
        if let Some(interval) = interval {
            self.history.record(interval);
        }
        self.last_tick = Some(now);
        interval
    }

    /// Sleeps until the next tick boundary.
    pub fn wait<C: Clock>(&mut self, clock: &C) {
        let now = clock.now();
        let deadline = self.deadline.unwrap_or(now + self.period);
        if now < deadline {
            clock.sleep(deadline - now);
            self.deadline = Some(deadline + self.period);
        } else {
            debug!(
                overrun_us = (now - deadline).as_micros() as u64,
                "tick overran its deadline"
            );
            self.deadline = Some(now + self.period);
        }
    }

    pub fn stats(&self) -> TickStats {
        self.history.stats()
    }
}
