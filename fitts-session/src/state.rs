use crate::config::{MotionMode, SessionConfig, Variant};
use crate::dwell::{DwellOutcome, DwellTimer};
use crate::error::ConfigError;
use crate::report::{Acquisition, Outcome, SessionReport};
use crate::sequencer::{LinearSequencer, RingSequencer, Sequencer};
use crate::sink::SnapshotSink;
use crate::transport::CommandSource;
use crate::trial::TrialController;
use fitts_core::{Command, Cursor, CursorModel, DecodeCounters, SessionSnapshot, Target};
use fitts_timing::{Clock, TickPacer};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{info, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoopState {
    Running,
    Done,
}

/// Fixed-tick orchestrator: decode, move, test containment, confirm, repeat.
///
/// All transitions of one tick happen inside [`ControlLoop::step`]; the only
/// wait is the pacer sleeping until the next tick boundary in [`ControlLoop::run`].
pub struct ControlLoop<S, I, C>
where
    S: Sequencer,
    I: CommandSource,
    C: Clock,
{
    sequencer: S,
    source: I,
    clock: C,
    cursor_model: CursorModel,
    cursor: Cursor,
    dwell: DwellTimer,
    trials: TrialController,
    pacer: TickPacer,
    tolerance: f32,
    motion: MotionMode,
    state: LoopState,
    outcome: Option<Outcome>,
    tick: u64,
    counters: DecodeCounters,
    started_at: Duration,
    last_now: Duration,
    presented_at: Duration,
    acquisitions: Vec<Acquisition>,
}

impl<I: CommandSource, C: Clock> ControlLoop<RingSequencer, I, C> {
    /// Ring session: `trials` confirmations over `ring.target_count` targets.
    pub fn ring(config: &SessionConfig, source: I, clock: C) -> Result<Self, ConfigError> {
        config.validate_for(Variant::Ring)?;
        let sequencer = RingSequencer::from_layout(
            config.ring.target_count,
            &config.canvas,
            config.ring.ring_radius,
            config.ring.target_radius,
        );
        Ok(Self::new(
            config,
            sequencer,
            TrialController::counting(config.trials),
            source,
            clock,
        ))
    }
}

impl<I: CommandSource, C: Clock> ControlLoop<LinearSequencer, I, C> {
    /// Single-axis session: `trials` seeded bars counted down to zero.
    pub fn linear(config: &SessionConfig, source: I, clock: C) -> Result<Self, ConfigError> {
        config.validate_for(Variant::Linear)?;
        let sequencer = LinearSequencer::new(config.canvas, config.linear.clone());
        Ok(Self::new(
            config,
            sequencer,
            TrialController::countdown(config.trials),
            source,
            clock,
        ))
    }
}

impl<S, I, C> ControlLoop<S, I, C>
where
    S: Sequencer,
    I: CommandSource,
    C: Clock,
{
    pub fn new(
        config: &SessionConfig,
        sequencer: S,
        trials: TrialController,
        source: I,
        clock: C,
    ) -> Self {
        let started_at = clock.now();
        Self {
            sequencer,
            source,
            cursor_model: CursorModel {
                axis_map: config.axis_map.clone(),
                base_velocity: config.base_velocity,
                bounds: config.canvas,
                cursor_size: config.cursor_size,
            },
            cursor: Cursor::centered(&config.canvas),
            dwell: DwellTimer::new(config.dwell()),
            trials,
            pacer: TickPacer::new(config.tick_rate_hz),
            tolerance: config.tolerance,
            motion: config.motion,
            state: LoopState::Running,
            outcome: None,
            tick: 0,
            counters: DecodeCounters::default(),
            started_at,
            last_now: started_at,
            presented_at: started_at,
            acquisitions: Vec::new(),
            clock,
        }
    }

    /// Runs ticks until the trials are done or `quit` is raised, emitting a
    /// snapshot after every tick and a final `done` snapshot on quit. Consumes
    /// the loop so the command source is released on return.
    pub fn run<K>(mut self, quit: &AtomicBool, mut sink: K) -> SessionReport
    where
        K: SnapshotSink<S::Target>,
    {
        info!(
            trials = self.trials.state().max,
            tick_hz = 1.0 / self.pacer.period().as_secs_f64(),
            dwell_ms = self.dwell.threshold().as_millis() as u64,
            "session started"
        );
        loop {
            if quit.load(Ordering::SeqCst) {
                self.quit();
                sink.emit(&self.snapshot());
                break;
            }
            let state = self.step();
            sink.emit(&self.snapshot());
            if state == LoopState::Done {
                break;
            }
            self.pacer.wait(&self.clock);
        }
        let report = self.report();
        info!(
            outcome = ?report.outcome,
            completed = report.completed,
            ticks = report.ticks,
            malformed = report.counters.malformed,
            "session finished"
        );
        report
    }

    /// Polls the command source once and advances the session by one tick.
    pub fn step(&mut self) -> LoopState {
        if self.state == LoopState::Done {
            return LoopState::Done;
        }
        if self.trials.is_done() {
            self.finish(Outcome::Completed);
            return self.state;
        }
        let command = self.source.poll();
        self.apply(command)
    }

    /// One tick with an already decoded command.
    pub fn apply(&mut self, command: Command) -> LoopState {
        if self.state == LoopState::Done {
            return LoopState::Done;
        }

        let now = self.clock.now();
        let interval = self.pacer.mark(now);
        self.last_now = now;
        self.tick += 1;
        self.counters.record(&command);

        let scale = match self.motion {
            MotionMode::PerTick => 1.0,
            MotionMode::PerSecond => interval.unwrap_or(self.pacer.period()).as_secs_f32(),
        };
        self.cursor = self.cursor_model.update(self.cursor, &command, scale);

        let target = self.sequencer.active();
        if self.dwell.evaluate(&self.cursor, target, self.tolerance, now) == DwellOutcome::Confirmed {
            self.confirm(now);
        }
        trace!(tick = self.tick, x = self.cursor.x, y = self.cursor.y, "tick");
        self.state
    }

    fn confirm(&mut self, now: Duration) {
        let acquisition = Acquisition {
            ordinal: self.trials.completed() + 1,
            target_index: self.sequencer.active_index(),
            presented_at_ns: self.since_start(self.presented_at),
            confirmed_at_ns: self.since_start(now),
            movement_time_ns: now.saturating_sub(self.presented_at).as_nanos() as u64,
        };
        info!(
            ordinal = acquisition.ordinal,
            target = ?acquisition.target_index,
            movement_ms = acquisition.movement_time_ns / 1_000_000,
            "target acquired"
        );
        self.acquisitions.push(acquisition);

        self.sequencer.advance();
        self.presented_at = now;
        if self.trials.on_confirmation() {
            self.finish(Outcome::Completed);
        }
    }

    /// External cancel: ends the session, abandoning any dwell in progress.
    pub fn quit(&mut self) {
        if self.state == LoopState::Done {
            return;
        }
        self.dwell.clear();
        self.trials.quit();
        self.finish(Outcome::Quit);
    }

    fn finish(&mut self, outcome: Outcome) {
        self.state = LoopState::Done;
        self.outcome = Some(outcome);
    }

    fn since_start(&self, t: Duration) -> u64 {
        t.saturating_sub(self.started_at).as_nanos() as u64
    }

    pub fn snapshot(&self) -> SessionSnapshot<S::Target> {
        let target = self.sequencer.active();
        let dwell = self.dwell.state();
        SessionSnapshot {
            tick: self.tick,
            session_ns: self.since_start(self.last_now),
            cursor: self.cursor,
            target: target.clone(),
            target_index: self.sequencer.active_index(),
            contained: target.contains(&self.cursor, self.tolerance),
            dwell_elapsed_ns: dwell.elapsed.as_nanos() as u64,
            dwell_remaining_ns: self.dwell.remaining().as_nanos() as u64,
            completed: self.trials.completed(),
            remaining: self.trials.remaining(),
            done: self.state == LoopState::Done,
            counters: self.counters,
        }
    }

    pub fn report(&self) -> SessionReport {
        SessionReport {
            outcome: self.outcome.unwrap_or(Outcome::Quit),
            ticks: self.tick,
            duration_ns: self.since_start(self.last_now),
            completed: self.trials.completed(),
            acquisitions: self.acquisitions.clone(),
            counters: self.counters,
            tick_stats: self.pacer.stats(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn sequencer(&self) -> &S {
        &self.sequencer
    }

    pub fn dwell(&self) -> &DwellTimer {
        &self.dwell
    }

    pub fn trials(&self) -> &TrialController {
        &self.trials
    }

    pub fn counters(&self) -> DecodeCounters {
        self.counters
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn source_mut(&mut self) -> &mut I {
        &mut self.source
    }
}
