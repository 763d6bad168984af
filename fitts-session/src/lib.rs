pub mod config;
pub mod dwell;
pub mod error;
pub mod layout;
pub mod report;
pub mod sequencer;
pub mod sink;
pub mod state;
pub mod transport;
pub mod trial;

pub use config::{LinearConfig, MotionMode, RingConfig, SessionConfig, Variant};
pub use dwell::{DwellOutcome, DwellState, DwellTimer};
pub use error::{ConfigError, SessionError};
pub use report::{Acquisition, Outcome, SessionReport};
pub use sequencer::{LinearSequencer, RingSequencer, RingSequencerState, Sequencer};
pub use sink::SnapshotSink;
pub use state::{ControlLoop, LoopState};
pub use transport::{CommandSource, ScriptedSource, UdpCommandSource};
pub use trial::{TrialController, TrialMode, TrialState};
