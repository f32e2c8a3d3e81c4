//! Event-stream session registry
//!
//! Each open SSE connection owns one session: a fresh server instance, an
//! inbound request queue, and an outbound event channel feeding the stream.
//! The registry maps the generated session id to the inbound queue so the
//! message-post endpoint can relay follow-up requests; the entry is removed
//! the moment the connection closes, after which the id never resolves
//! again.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, RwLock};
use std::task::{Context, Poll};

use futures::stream::Stream;
use tokio::sync::mpsc;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::protocol::McpRequest;
use crate::server::McpServer;

/// Queue depth per session for inbound requests and outbound frames
const SESSION_CHANNEL_CAPACITY: usize = 32;

/// Relay endpoint for one open session
#[derive(Clone)]
pub struct SessionHandle {
    inbound: mpsc::Sender<McpRequest>,
}

impl SessionHandle {
    /// Queue a request for the session. Requests are handled in the order
    /// they are relayed; `Err` means the session closed underneath us.
    pub async fn relay(&self, request: McpRequest) -> Result<(), McpRequest> {
        self.inbound.send(request).await.map_err(|e| e.0)
    }
}

/// Registry of open event-stream sessions
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a newly opened session.
    pub fn open(&self, id: String, handle: SessionHandle) {
        let mut sessions = self.sessions.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        sessions.insert(id, handle);
    }

    /// Resolve an open session id. Closed or never-opened ids return `None`.
    pub fn resolve(&self, id: &str) -> Option<SessionHandle> {
        let sessions = self.sessions.read().unwrap_or_else(std::sync::PoisonError::into_inner);
        sessions.get(id).cloned()
    }

    /// Remove a session; returns whether it was present.
    pub fn close(&self, id: &str) -> bool {
        let mut sessions = self.sessions.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        sessions.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(std::sync::PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Removes the registry entry when the connection's stream is dropped
pub struct SessionGuard {
    id: String,
    registry: Arc<SessionRegistry>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.registry.close(&self.id);
        info!(session_id = %self.id, "SSE connection closed");
    }
}

/// Wire up one session: register it and start its pump task.
///
/// The pump drains the inbound queue one request at a time, so frames on
/// the outbound channel appear in relay order. It exits when the stream
/// side hangs up; an in-flight tool call still runs to completion first.
pub fn spawn_session(
    server: McpServer,
    registry: &Arc<SessionRegistry>,
) -> (String, mpsc::Receiver<String>, SessionGuard) {
    let session_id = Uuid::new_v4().to_string();
    let (inbound_tx, mut inbound_rx) = mpsc::channel::<McpRequest>(SESSION_CHANNEL_CAPACITY);
    let (outbound_tx, outbound_rx) = mpsc::channel::<String>(SESSION_CHANNEL_CAPACITY);

    registry.open(session_id.clone(), SessionHandle { inbound: inbound_tx });

    let pump_id = session_id.clone();
    tokio::spawn(async move {
        while let Some(request) = inbound_rx.recv().await {
            let Some(response) = server.handle_request(request).await else {
                continue;
            };
            match serde_json::to_string(&response) {
                Ok(frame) => {
                    if outbound_tx.send(frame).await.is_err() {
                        debug!(session_id = %pump_id, "Stream gone, dropping response");
                        break;
                    }
                }
                Err(e) => {
                    error!(session_id = %pump_id, error = %e, "Failed to encode response");
                }
            }
        }
        debug!(session_id = %pump_id, "Session pump finished");
    });

    let guard = SessionGuard {
        id: session_id.clone(),
        registry: registry.clone(),
    };

    (session_id, outbound_rx, guard)
}

/// An event stream that closes its session when dropped
pub struct SessionStream<S> {
    inner: S,
    _guard: SessionGuard,
}

impl<S> SessionStream<S> {
    pub fn new(inner: S, guard: SessionGuard) -> Self {
        Self {
            inner,
            _guard: guard,
        }
    }
}

impl<S: Stream + Unpin> Stream for SessionStream<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.get_mut().inner).poll_next(cx)
    }
}
