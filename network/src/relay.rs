//! The relay server.

use std::net::SocketAddr;
use std::sync::Arc;

use arbiter_protocol::{
    read_frame, write_frame, Frame, ProtocolError, SessionId, MAX_PAYLOAD_LEN,
};
use arbiter_utils::StatsCounter;
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio::sync::{broadcast, mpsc};

use crate::{NetworkError, SessionRegistry};

/// Frames queued per session before the relay starts dropping.
pub const SESSION_QUEUE: usize = 1024;

pub const STAT_NAMES: &[&str] = &[
    "sessions_opened",
    "sessions_closed",
    "frames_in",
    "frames_forwarded",
    "frames_dropped",
    "protocol_errors",
];

/// Accepts voter and client connections and forwards their frames.
pub struct RelayServer {
    listener: TcpListener,
    registry: Arc<SessionRegistry>,
    stats: Arc<StatsCounter>,
}

impl RelayServer {
    pub async fn bind(addr: impl ToSocketAddrs) -> Result<Self, NetworkError> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            registry: Arc::new(SessionRegistry::new()),
            stats: Arc::new(StatsCounter::new(STAT_NAMES)),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, NetworkError> {
        Ok(self.listener.local_addr()?)
    }

    pub fn registry(&self) -> Arc<SessionRegistry> {
        self.registry.clone()
    }

    pub fn stats(&self) -> Arc<StatsCounter> {
        self.stats.clone()
    }

    /// Accept connections until `shutdown` fires.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) -> Result<(), NetworkError> {
        tracing::info!(addr = %self.local_addr()?, "relay listening");
        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    let (stream, addr) = accepted?;
                    let registry = self.registry.clone();
                    let stats = self.stats.clone();
                    tokio::spawn(async move {
                        handle_session(stream, addr, registry, stats).await;
                    });
                }
                _ = shutdown.recv() => {
                    tracing::info!(stats = %self.stats.summary(), "relay stopping");
                    return Ok(());
                }
            }
        }
    }
}

/// Serve one connection until it closes or breaks the protocol.
async fn handle_session(
    stream: TcpStream,
    addr: SocketAddr,
    registry: Arc<SessionRegistry>,
    stats: Arc<StatsCounter>,
) {
    let (mut reader, mut writer) = stream.into_split();
    let (queue, mut outbound) = mpsc::channel::<Frame>(SESSION_QUEUE);
    let session = registry.register(queue.clone()).await;
    stats.increment("sessions_opened");
    if queue.try_send(Frame::Welcome { session }).is_err() {
        registry.remove(session).await;
        return;
    }
    drop(queue);
    let online = registry.len().await;
    tracing::info!(%addr, %session, online, "session opened");

    let writer_task = tokio::spawn(async move {
        while let Some(frame) = outbound.recv().await {
            match write_frame(&mut writer, &frame).await {
                Ok(()) => {}
                Err(ProtocolError::Io(e)) => {
                    tracing::debug!(%session, error = %e, "session write failed");
                    break;
                }
                Err(e) => tracing::warn!(%session, error = %e, "unwritable frame skipped"),
            }
        }
    });

    loop {
        let frame = match read_frame(&mut reader).await {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(e) => {
                stats.increment("protocol_errors");
                tracing::warn!(%session, error = %e, "session read failed");
                break;
            }
        };
        stats.increment("frames_in");
        if let Some(size) = frame.payload().map(<[u8]>::len).filter(|&n| n > MAX_PAYLOAD_LEN) {
            stats.increment("protocol_errors");
            tracing::warn!(%session, size, max = MAX_PAYLOAD_LEN, "oversized payload dropped");
            continue;
        }
        let forwarded = match frame {
            Frame::Broadcast(payload) => registry.broadcast(session, &payload).await,
            Frame::Direct { target, payload } => registry.direct(session, target, payload).await,
            Frame::Deliver { .. } | Frame::Welcome { .. } => {
                stats.increment("protocol_errors");
                tracing::warn!(%session, "relay-only frame sent by a session, closing");
                break;
            }
        };
        stats.add("frames_forwarded", forwarded.queued as u64);
        stats.add("frames_dropped", forwarded.dropped as u64);
    }

    close_session(session, &registry, &stats).await;
    writer_task.abort();
}

async fn close_session(session: SessionId, registry: &SessionRegistry, stats: &StatsCounter) {
    if registry.remove(session).await {
        stats.increment("sessions_closed");
    }
    let online = registry.len().await;
    tracing::info!(%session, online, "session closed");
}
