//! Nullable transport: records outbound payloads instead of sending them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use arbiter_network::{NetworkError, SessionId, Transport, MAX_PAYLOAD_LEN};

/// One recorded send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Sent {
    Broadcast(Vec<u8>),
    Direct { target: SessionId, payload: Vec<u8> },
}

/// A [`Transport`] that keeps everything it is asked to send.
///
/// Clones share the same record, so a test can hand one clone to a node
/// and keep another for assertions.
#[derive(Clone)]
pub struct NullTransport {
    session: SessionId,
    sent: Arc<Mutex<Vec<Sent>>>,
    disconnected: Arc<AtomicBool>,
}

impl NullTransport {
    pub fn new(session: SessionId) -> Self {
        Self {
            session,
            sent: Arc::new(Mutex::new(Vec::new())),
            disconnected: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Everything sent so far, oldest first.
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    /// Drain the record.
    pub fn take_sent(&self) -> Vec<Sent> {
        std::mem::take(&mut *self.sent.lock().unwrap())
    }

    pub fn broadcasts(&self) -> Vec<Vec<u8>> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Broadcast(payload) => Some(payload),
                Sent::Direct { .. } => None,
            })
            .collect()
    }

    pub fn directs(&self) -> Vec<(SessionId, Vec<u8>)> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Direct { target, payload } => Some((target, payload)),
                Sent::Broadcast(_) => None,
            })
            .collect()
    }

    /// Make every later send fail with [`NetworkError::Disconnected`].
    pub fn disconnect(&self) {
        self.disconnected.store(true, Ordering::SeqCst);
    }

    fn record(&self, sent: Sent) -> Result<(), NetworkError> {
        if self.disconnected.load(Ordering::SeqCst) {
            return Err(NetworkError::Disconnected);
        }
        let size = match &sent {
            Sent::Broadcast(payload) | Sent::Direct { payload, .. } => payload.len(),
        };
        if size > MAX_PAYLOAD_LEN {
            return Err(NetworkError::PayloadTooLarge {
                size,
                max: MAX_PAYLOAD_LEN,
            });
        }
        self.sent.lock().unwrap().push(sent);
        Ok(())
    }
}

impl Transport for NullTransport {
    fn session(&self) -> SessionId {
        self.session
    }

    fn broadcast(&self, payload: Vec<u8>) -> Result<(), NetworkError> {
        self.record(Sent::Broadcast(payload))
    }

    fn send_to(&self, target: SessionId, payload: Vec<u8>) -> Result<(), NetworkError> {
        self.record(Sent::Direct { target, payload })
    }
}
