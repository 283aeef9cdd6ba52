//! Scripted session double for handler tests

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::error::{RelayError, Result};
use crate::packet::{Packet, StreamDescriptor};

use super::{Session, SessionInfo, SessionRole};

/// Observation handles that outlive the session after a handler consumes it
#[derive(Clone, Default)]
pub(crate) struct Observed {
    header: Arc<Mutex<Option<Vec<StreamDescriptor>>>>,
    written: Arc<Mutex<Vec<Packet>>>,
    closed: Arc<AtomicBool>,
}

impl Observed {
    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub(crate) fn header(&self) -> Option<Vec<StreamDescriptor>> {
        self.header.lock().unwrap().clone()
    }

    pub(crate) fn written_timestamps(&self) -> Vec<i64> {
        self.written.lock().unwrap().iter().map(|p| p.timestamp).collect()
    }
}

pub(crate) struct MockSession {
    peer: SocketAddr,
    info: SessionInfo,
    incoming: Option<mpsc::UnboundedReceiver<Result<Packet>>>,
    fail_writes: bool,
    observed: Observed,
}

impl MockSession {
    /// A publishing session fed through the returned sender; dropping the
    /// sender is the clean end-of-stream
    pub(crate) fn publisher(
        path: &str,
        token: Option<&str>,
        streams: Vec<StreamDescriptor>,
    ) -> (Self, Observed, mpsc::UnboundedSender<Result<Packet>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let observed = Observed::default();

        let session = Self {
            peer: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 1935),
            info: SessionInfo {
                path: path.to_string(),
                token: token.map(str::to_string),
                streams,
            },
            incoming: Some(rx),
            fail_writes: false,
            observed: observed.clone(),
        };

        (session, observed, tx)
    }

    /// A playing session recording everything written to it
    pub(crate) fn player(path: &str, token: Option<&str>) -> (Self, Observed) {
        let observed = Observed::default();

        let session = Self {
            peer: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 1936),
            info: SessionInfo {
                path: path.to_string(),
                token: token.map(str::to_string),
                streams: Vec::new(),
            },
            incoming: None,
            fail_writes: false,
            observed: observed.clone(),
        };

        (session, observed)
    }

    /// Make every `write_packet` fail with a transport error
    pub(crate) fn fail_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }
}

impl Session for MockSession {
    fn remote_address(&self) -> SocketAddr {
        self.peer
    }

    async fn handshake(&mut self, _role: SessionRole) -> Result<SessionInfo> {
        Ok(self.info.clone())
    }

    async fn read_packet(&mut self) -> Result<Option<Packet>> {
        match self.incoming.as_mut() {
            Some(rx) => match rx.recv().await {
                Some(Ok(packet)) => Ok(Some(packet)),
                Some(Err(e)) => Err(e),
                None => Ok(None),
            },
            None => Ok(None),
        }
    }

    async fn write_header(&mut self, streams: &[StreamDescriptor]) -> Result<()> {
        *self.observed.header.lock().unwrap() = Some(streams.to_vec());
        Ok(())
    }

    async fn write_packet(&mut self, packet: Packet) -> Result<()> {
        if self.fail_writes {
            return Err(RelayError::Transport(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "scripted write failure",
            )));
        }

        self.observed.written.lock().unwrap().push(packet);
        Ok(())
    }

    async fn close(&mut self) {
        self.observed.closed.store(true, Ordering::SeqCst);
    }
}
