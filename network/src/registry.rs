//! Relay session registry.
//!
//! Maps each live session to the queue feeding its writer task. Frames
//! are queued with `try_send`, so a slow session loses frames instead of
//! stalling the sender's read loop.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use arbiter_protocol::{Frame, SessionId};
use tokio::sync::{mpsc, RwLock};

pub struct SessionRegistry {
    next_id: AtomicU32,
    sessions: RwLock<HashMap<SessionId, mpsc::Sender<Frame>>>,
}

/// How many sessions a forwarded frame was queued for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Forwarded {
    pub queued: usize,
    pub dropped: usize,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU32::new(1),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Assign a fresh session id to `queue`.
    pub async fn register(&self, queue: mpsc::Sender<Frame>) -> SessionId {
        let id = SessionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.sessions.write().await.insert(id, queue);
        id
    }

    pub async fn remove(&self, id: SessionId) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Queue `payload` for every session except `origin`.
    pub async fn broadcast(&self, origin: SessionId, payload: &[u8]) -> Forwarded {
        let sessions = self.sessions.read().await;
        let mut result = Forwarded::default();
        for (id, queue) in sessions.iter().filter(|(id, _)| **id != origin) {
            let frame = Frame::Deliver {
                origin,
                payload: payload.to_vec(),
            };
            match queue.try_send(frame) {
                Ok(()) => result.queued += 1,
                Err(_) => {
                    tracing::warn!(session = %id, "session queue full or closed, frame dropped");
                    result.dropped += 1;
                }
            }
        }
        result
    }

    /// Queue `payload` for `target` alone.
    pub async fn direct(&self, origin: SessionId, target: SessionId, payload: Vec<u8>) -> Forwarded {
        let sessions = self.sessions.read().await;
        let Some(queue) = sessions.get(&target) else {
            tracing::debug!(%origin, %target, "direct frame for unknown session dropped");
            return Forwarded { queued: 0, dropped: 1 };
        };
        match queue.try_send(Frame::Deliver { origin, payload }) {
            Ok(()) => Forwarded { queued: 1, dropped: 0 },
            Err(_) => Forwarded { queued: 0, dropped: 1 },
        }
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn broadcast_skips_the_origin() {
        let registry = SessionRegistry::new();
        let (tx_a, mut rx_a) = mpsc::channel(4);
        let (tx_b, mut rx_b) = mpsc::channel(4);
        let a = registry.register(tx_a).await;
        let b = registry.register(tx_b).await;
        assert_ne!(a, b);

        let sent = registry.broadcast(a, b"vote").await;
        assert_eq!(sent, Forwarded { queued: 1, dropped: 0 });
        assert_eq!(
            rx_b.recv().await,
            Some(Frame::Deliver {
                origin: a,
                payload: b"vote".to_vec()
            })
        );
        assert!(rx_a.try_recv().is_err());
    }

    #[tokio::test]
    async fn direct_to_a_removed_session_is_dropped() {
        let registry = SessionRegistry::new();
        let (tx, _rx) = mpsc::channel(4);
        let a = registry.register(tx).await;
        assert!(registry.remove(a).await);
        assert!(registry.is_empty().await);
        let sent = registry.direct(SessionId(99), a, b"x".to_vec()).await;
        assert_eq!(sent.dropped, 1);
    }

    #[tokio::test]
    async fn full_queues_drop_instead_of_blocking() {
        let registry = SessionRegistry::new();
        let (tx, _rx) = mpsc::channel(1);
        let target = registry.register(tx).await;
        let origin = SessionId(1000);
        assert_eq!(registry.direct(origin, target, vec![1]).await.queued, 1);
        assert_eq!(registry.direct(origin, target, vec![2]).await.dropped, 1);
    }
}
