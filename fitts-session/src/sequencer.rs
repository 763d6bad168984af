use crate::config::LinearConfig;
use crate::layout::ring_layout;
use fitts_core::{BarTarget, Bounds, RingTarget, Target};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Chooses which target the operator is steering toward.
pub trait Sequencer {
    type Target: Target;

    /// The current goal. There is always one; a sequencer without a target is a bug.
    fn active(&self) -> &Self::Target;

    /// Index of the active target within a fixed layout, when there is one.
    fn active_index(&self) -> Option<usize> {
        None
    }

    /// Presents the next target after a confirmation.
    fn advance(&mut self);
}

/// Walk state of the ring sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingSequencerState {
    pub active_index: usize,
    pub next_stride: usize,
    pub stride_parity: u8,
    /// Targets presented in the current pass over the ring.
    pub presented: usize,
}

impl RingSequencerState {
    fn start(count: usize) -> Self {
        Self {
            active_index: 0,
            next_stride: count / 2,
            stride_parity: 0,
            presented: 1,
        }
    }

    /// Alternates strides of `N/2` and `N/2 + 1`, so consecutive goals sit
    /// roughly across the ring from each other. After `N` presentations the
    /// walk starts over at index 0. When the pass already ended on index 0
    /// (odd `N`) the next pass opens with its first stride instead, so the
    /// same target is never presented twice in a row.
    fn advance(&mut self, count: usize) {
        if self.presented >= count {
            let at_start = self.active_index == 0;
            *self = Self::start(count);
            if !at_start {
                return;
            }
        }
        self.active_index = (self.active_index + self.next_stride) % count;
        if self.stride_parity == 0 {
            self.next_stride = count / 2 + 1;
            self.stride_parity = 1;
        } else {
            self.next_stride = count / 2;
            self.stride_parity = 0;
        }
        self.presented += 1;
    }
}

/// Multidirectional sequence over a fixed ring of targets.
#[derive(Debug, Clone)]
pub struct RingSequencer {
    targets: Vec<RingTarget>,
    state: RingSequencerState,
}

impl RingSequencer {
    /// # Panics
    /// If `targets` is empty.
    pub fn new(targets: Vec<RingTarget>) -> Self {
        assert!(!targets.is_empty(), "ring sequencer needs at least one target");
        let state = RingSequencerState::start(targets.len());
        Self { targets, state }
    }

    pub fn from_layout(count: usize, bounds: &Bounds, ring_radius: f32, target_radius: f32) -> Self {
        Self::new(ring_layout(count, bounds.center(), ring_radius, target_radius))
    }

    pub fn targets(&self) -> &[RingTarget] {
        &self.targets
    }

    pub fn state(&self) -> RingSequencerState {
        self.state
    }
}

impl Sequencer for RingSequencer {
    type Target = RingTarget;

    fn active(&self) -> &RingTarget {
        &self.targets[self.state.active_index]
    }

    fn active_index(&self) -> Option<usize> {
        Some(self.state.active_index)
    }

    fn advance(&mut self) {
        self.state.advance(self.targets.len());
        debug!(index = self.state.active_index, "presenting ring target");
    }
}

/// Seeded random bars for the single-axis task.
///
/// Each target draws, in order, a width in `[min_width, max_width)` and then a
/// horizontal position from a ChaCha8 stream seeded with `seed_from_u64`, so a
/// given seed always yields the same sequence.
#[derive(Debug, Clone)]
pub struct LinearSequencer {
    rng: ChaCha8Rng,
    canvas: Bounds,
    params: LinearConfig,
    current: BarTarget,
}

impl LinearSequencer {
    pub fn new(canvas: Bounds, params: LinearConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
        let current = Self::generate(&mut rng, &canvas, &params);
        Self {
            rng,
            canvas,
            params,
            current,
        }
    }

    fn generate(rng: &mut ChaCha8Rng, canvas: &Bounds, params: &LinearConfig) -> BarTarget {
        let min_width = f64::from(params.min_width);
        let max_width = f64::from(params.max_width);
        let width = min_width + (max_width - min_width) * rng.random::<f64>();

        // Shifted left by the widest bar so every bar ends inside the canvas;
        // bars hugging the left edge are pushed clear of it.
        let mut x = rng.random::<f64>() * f64::from(canvas.width) - max_width;
        if x < max_width {
            x = max_width + 10.0;
        }

        let height = params.target_height;
        BarTarget {
            x: x as f32,
            y: canvas.height / 2.0 - height / 2.0,
            width: width as f32,
            height,
        }
    }
}

impl Sequencer for LinearSequencer {
    type Target = BarTarget;

    fn active(&self) -> &BarTarget {
        &self.current
    }

    fn advance(&mut self) {
        self.current = Self::generate(&mut self.rng, &self.canvas, &self.params);
        debug!(x = self.current.x, width = self.current.width, "presenting bar target");
    }
}
