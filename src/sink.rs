use fitts_core::{SessionSnapshot, Target};
use fitts_session::SnapshotSink;
use std::io::Write;
use tracing::{debug, trace, warn};

/// Logs every tick at trace level and target entry/exit at debug level.
#[derive(Debug, Default)]
pub struct TracingSink {
    contained: bool,
}

impl<T: Target> SnapshotSink<T> for TracingSink {
    fn emit(&mut self, snapshot: &SessionSnapshot<T>) {
        if snapshot.contained != self.contained {
            self.contained = snapshot.contained;
            if self.contained {
                debug!(tick = snapshot.tick, target = ?snapshot.target_index, "cursor entered target");
            } else {
                debug!(tick = snapshot.tick, "cursor left target");
            }
        }
        trace!(
            tick = snapshot.tick,
            x = snapshot.cursor.x,
            y = snapshot.cursor.y,
            dwell_ms = snapshot.dwell_elapsed_ns / 1_000_000,
            completed = snapshot.completed,
            "snapshot"
        );
    }
}

/// One JSON object per snapshot, newline separated. Stops after the first write error.
pub struct JsonLinesSink<W: Write> {
    out: Option<W>,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out: Some(out) }
    }

    #[cfg(test)]
    fn into_inner(self) -> Option<W> {
        self.out
    }
}

impl<T: Target, W: Write> SnapshotSink<T> for JsonLinesSink<W> {
    fn emit(&mut self, snapshot: &SessionSnapshot<T>) {
        let Some(out) = self.out.as_mut() else {
            return;
        };
        let written = serde_json::to_writer(&mut *out, snapshot)
            .map_err(std::io::Error::from)
            .and_then(|()| out.write_all(b"\n"));
        if let Err(e) = written {
            warn!(error = %e, "snapshot stream closed");
            self.out = None;
        }
    }
}
