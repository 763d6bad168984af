use serde::{Deserialize, Serialize};

/// One unit of classifier output, consumed once per control-loop tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// A parsed `"<classId> <intensity>"` datagram.
    Move { class_id: u8, intensity: f32 },
    /// Nothing was received this tick.
    Absent,
    /// A datagram arrived but did not hold two numeric tokens.
    Malformed,
}

impl Command {
    /// Decodes the payload of at most one datagram.
    ///
    /// `None` means the non-blocking read found nothing pending. The payload is
    /// ASCII text with exactly two whitespace-separated tokens: an unsigned
    /// class id and a finite, non-negative intensity.
    pub fn decode(payload: Option<&[u8]>) -> Self {
        let Some(bytes) = payload else {
            return Command::Absent;
        };
        let Ok(text) = std::str::from_utf8(bytes) else {
            return Command::Malformed;
        };

        let mut tokens = text.split_whitespace();
        let (Some(class), Some(intensity), None) = (tokens.next(), tokens.next(), tokens.next())
        else {
            return Command::Malformed;
        };

        match (class.parse::<u8>(), intensity.parse::<f32>()) {
            (Ok(class_id), Ok(intensity)) if intensity.is_finite() && intensity >= 0.0 => {
                Command::Move {
                    class_id,
                    intensity,
                }
            }
            _ => Command::Malformed,
        }
    }

    /// Class and intensity when the command carries motion. Class 0 is "rest".
    pub fn motion(&self) -> Option<(u8, f32)> {
        match *self {
            Command::Move {
                class_id,
                intensity,
            } if class_id != 0 => Some((class_id, intensity)),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Command::Absent)
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Command::Malformed)
    }
}

/// Diagnostic tally of what the decoder saw over a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeCounters {
    pub decoded: u64,
    pub absent: u64,
    pub malformed: u64,
}

impl DecodeCounters {
    pub fn record(&mut self, command: &Command) {
        match command {
            Command::Move { .. } => self.decoded += 1,
            Command::Absent => self.absent += 1,
            Command::Malformed => self.malformed += 1,
        }
    }
}
