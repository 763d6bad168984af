use fitts_core::{SessionSnapshot, Target};

/// Consumer of per-tick snapshots (renderer, logger, recorder).
pub trait SnapshotSink<T: Target> {
    fn emit(&mut self, snapshot: &SessionSnapshot<T>);
}

/// Discards every snapshot.
impl<T: Target> SnapshotSink<T> for () {
    fn emit(&mut self, _snapshot: &SessionSnapshot<T>) {}
}

/// Keeps every snapshot in order.
impl<T: Target> SnapshotSink<T> for Vec<SessionSnapshot<T>> {
    fn emit(&mut self, snapshot: &SessionSnapshot<T>) {
        self.push(snapshot.clone());
    }
}

impl<T: Target, K: SnapshotSink<T> + ?Sized> SnapshotSink<T> for &mut K {
    fn emit(&mut self, snapshot: &SessionSnapshot<T>) {
        (**self).emit(snapshot)
    }
}

/// Skipped when `None`.
impl<T: Target, K: SnapshotSink<T>> SnapshotSink<T> for Option<K> {
    fn emit(&mut self, snapshot: &SessionSnapshot<T>) {
        if let Some(sink) = self {
            sink.emit(snapshot);
        }
    }
}

/// Fans out to both sinks, first then second.
impl<T: Target, A: SnapshotSink<T>, B: SnapshotSink<T>> SnapshotSink<T> for (A, B) {
    fn emit(&mut self, snapshot: &SessionSnapshot<T>) {
        self.0.emit(snapshot);
        self.1.emit(snapshot);
    }
}
