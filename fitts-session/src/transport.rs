use crate::error::SessionError;
use fitts_core::Command;
use std::collections::VecDeque;
use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};
use tracing::{info, warn};

/// Largest datagram read per tick; longer payloads are truncated and fail to decode.
pub const MAX_DATAGRAM: usize = 1024;

/// Where the control loop gets its commands from.
pub trait CommandSource {
    /// Reads at most one pending command without blocking.
    fn poll(&mut self) -> Command;
}

/// Loopback datagram channel from the classifier.
///
/// One datagram is consumed per tick. If the classifier sends faster than the
/// tick rate the kernel queue grows and the loop acts on stale commands; that
/// backlog is not drained.
#[derive(Debug)]
pub struct UdpCommandSource {
    socket: UdpSocket,
    buf: [u8; MAX_DATAGRAM],
}

impl UdpCommandSource {
    pub fn bind(addr: &str) -> Result<Self, SessionError> {
        let socket = UdpSocket::bind(addr).map_err(|source| SessionError::Bind {
            addr: addr.to_string(),
            source,
        })?;
        socket.set_nonblocking(true).map_err(SessionError::Socket)?;
        let local = socket.local_addr().map_err(SessionError::Socket)?;
        info!(%local, "command socket bound");
        Ok(Self {
            socket,
            buf: [0; MAX_DATAGRAM],
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}

impl CommandSource for UdpCommandSource {
    fn poll(&mut self) -> Command {
        match self.socket.recv_from(&mut self.buf) {
            Ok((len, _peer)) => Command::decode(Some(&self.buf[..len])),
            Err(e) if e.kind() == ErrorKind::WouldBlock => Command::Absent,
            Err(e) => {
                warn!(error = %e, "command socket receive failed");
                Command::Absent
            }
        }
    }
}

/// Replays a fixed list of payloads, one per poll, then reports nothing.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    queue: VecDeque<Option<Vec<u8>>>,
}

impl ScriptedSource {
    pub fn new<I, P>(payloads: I) -> Self
    where
        I: IntoIterator<Item = Option<P>>,
        P: AsRef<[u8]>,
    {
        Self {
            queue: payloads
                .into_iter()
                .map(|p| p.map(|p| p.as_ref().to_vec()))
                .collect(),
        }
    }

    /// The same payload for `ticks` polls in a row.
    pub fn repeat(payload: &str, ticks: usize) -> Self {
        Self::new(std::iter::repeat_n(Some(payload), ticks))
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl CommandSource for ScriptedSource {
    fn poll(&mut self) -> Command {
        match self.queue.pop_front() {
            Some(payload) => Command::decode(payload.as_deref()),
            None => Command::Absent,
        }
    }
}
