//! Node-side relay connection.

use arbiter_protocol::{
    read_frame, write_frame, Frame, ProtocolError, SessionId, MAX_PAYLOAD_LEN,
};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::{Inbound, NetworkError, Transport};

/// Frames this node may queue toward the relay.
pub const OUTBOUND_QUEUE: usize = 1024;

/// Payloads delivered to this node and not yet consumed.
pub const INBOUND_QUEUE: usize = 1024;

/// A connection to the relay. Dropping it closes the connection once the
/// queued frames are written.
pub struct RelayClient {
    session: SessionId,
    outbound: mpsc::Sender<Frame>,
}

impl RelayClient {
    /// Connect, wait for the relay to assign a session, and start the
    /// reader and writer tasks. The receiver yields every delivered payload
    /// and closes when the relay goes away.
    pub async fn connect(
        addr: impl ToSocketAddrs,
    ) -> Result<(Self, mpsc::Receiver<Inbound>), NetworkError> {
        let stream = TcpStream::connect(addr).await?;
        let (mut reader, mut writer) = stream.into_split();

        let session = match read_frame(&mut reader).await? {
            Some(Frame::Welcome { session }) => session,
            Some(_) => return Err(NetworkError::UnexpectedFrame("expected welcome")),
            None => return Err(NetworkError::Disconnected),
        };
        tracing::info!(%session, "connected to relay");

        let (outbound, mut queued) = mpsc::channel::<Frame>(OUTBOUND_QUEUE);
        tokio::spawn(async move {
            while let Some(frame) = queued.recv().await {
                match write_frame(&mut writer, &frame).await {
                    Ok(()) => {}
                    Err(ProtocolError::Io(e)) => {
                        tracing::warn!(error = %e, "relay write failed");
                        break;
                    }
                    Err(e) => tracing::warn!(error = %e, "unwritable frame skipped"),
                }
            }
        });

        let (inbound_tx, inbound) = mpsc::channel(INBOUND_QUEUE);
        tokio::spawn(async move {
            loop {
                match read_frame(&mut reader).await {
                    Ok(Some(Frame::Deliver { origin, payload })) => {
                        if inbound_tx.send(Inbound { origin, payload }).await.is_err() {
                            break;
                        }
                    }
                    Ok(Some(other)) => {
                        tracing::warn!(kind = ?other.kind(), "ignoring unexpected frame from relay");
                    }
                    Ok(None) => {
                        tracing::info!("relay closed the connection");
                        break;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "relay read failed");
                        break;
                    }
                }
            }
        });

        Ok((Self { session, outbound }, inbound))
    }

    /// Oversized payloads are refused here so they never reach the writer.
    fn queue(&self, frame: Frame) -> Result<(), NetworkError> {
        check_payload(&frame)?;
        self.outbound.try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => NetworkError::QueueFull,
            TrySendError::Closed(_) => NetworkError::Disconnected,
        })
    }
}

fn check_payload(frame: &Frame) -> Result<(), NetworkError> {
    match frame.payload() {
        Some(payload) if payload.len() > MAX_PAYLOAD_LEN => Err(NetworkError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD_LEN,
        }),
        _ => Ok(()),
    }
}

impl Transport for RelayClient {
    fn session(&self) -> SessionId {
        self.session
    }

    fn broadcast(&self, payload: Vec<u8>) -> Result<(), NetworkError> {
        self.queue(Frame::Broadcast(payload))
    }

    fn send_to(&self, target: SessionId, payload: Vec<u8>) -> Result<(), NetworkError> {
        self.queue(Frame::Direct { target, payload })
    }
}
