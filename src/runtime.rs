//! Runtime for chat widget sessions
//!
//! Each session is a tokio task that exclusively owns one dialogue state.
//! Handlers talk to it through a command channel; clients watching the chat
//! receive paced updates through a broadcast channel.

mod executor;
mod pacer;

pub use executor::SessionRuntime;

use crate::config::Pacing;
use crate::dialogue::{
    ConversationState, Event, Message, Prompt, ReportDraft, Step, TransitionError,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot, RwLock};

/// How often the idle sweep looks for abandoned sessions
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Errors surfaced to callers of a session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),
    #[error("Session runtime has stopped")]
    Closed,
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// A confirmed report, as acknowledged to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmittedReport {
    pub reference: String,
    pub submitted_at: DateTime<Utc>,
    pub report: ReportDraft,
}

/// Snapshot of a session for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub id: String,
    pub step: Step,
    pub transcript: Vec<Message>,
    pub draft: ReportDraft,
    pub prompt: Prompt,
    pub text_input_visible: bool,
    pub pending_input: String,
    pub is_open: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission: Option<SubmittedReport>,
}

impl SessionView {
    pub fn new(
        id: &str,
        state: &ConversationState,
        submission: Option<&SubmittedReport>,
    ) -> Self {
        Self {
            id: id.to_string(),
            step: state.step,
            transcript: state.transcript.clone(),
            draft: state.draft.clone(),
            prompt: state.prompt(),
            text_input_visible: state.text_input_visible,
            pending_input: state.pending_input.clone(),
            is_open: state.is_open,
            submission: submission.cloned(),
        }
    }
}

/// Events sent to stream subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    Init { view: SessionView },
    /// `index` is the message's position in the transcript
    Message { index: usize, message: Message },
    Reset,
    Step { step: Step, prompt: Prompt },
    Submitted { submission: SubmittedReport },
}

/// Requests a session runtime understands
#[derive(Debug)]
pub enum SessionCommand {
    Apply {
        event: Event,
        reply: oneshot::Sender<Result<SessionView, TransitionError>>,
    },
    Snapshot {
        reply: oneshot::Sender<SessionView>,
    },
}

/// Handle to interact with a running session
#[derive(Clone)]
pub struct SessionHandle {
    pub id: String,
    command_tx: mpsc::Sender<SessionCommand>,
    broadcast_tx: broadcast::Sender<SseEvent>,
    last_seen: Arc<StdMutex<Instant>>,
}

impl SessionHandle {
    /// Feed one event through the dialogue and return the resulting view
    pub async fn apply(&self, event: Event) -> Result<SessionView, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.command_tx
            .send(SessionCommand::Apply { event, reply })
            .await
            .map_err(|_| SessionError::Closed)?;
        Ok(rx.await.map_err(|_| SessionError::Closed)??)
    }

    pub async fn snapshot(&self) -> Result<SessionView, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.command_tx
            .send(SessionCommand::Snapshot { reply })
            .await
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SseEvent> {
        self.broadcast_tx.subscribe()
    }

    fn touch(&self) {
        *self.last_seen.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    /// No stream attached and no request within `ttl`
    fn is_idle(&self, now: Instant, ttl: Duration) -> bool {
        if self.broadcast_tx.receiver_count() > 0 {
            return false;
        }
        let last_seen = *self.last_seen.lock().unwrap_or_else(PoisonError::into_inner);
        now.duration_since(last_seen) >= ttl
    }
}

/// Manager for all live sessions
pub struct SessionManager {
    pacing: Pacing,
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl SessionManager {
    pub fn new(pacing: Pacing) -> Self {
        Self {
            pacing,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a session runtime with a fresh dialogue
    pub async fn create(&self) -> SessionHandle {
        let id = uuid::Uuid::new_v4().to_string();
        let (command_tx, command_rx) = mpsc::channel(32);
        let (broadcast_tx, _) = broadcast::channel(128);

        let runtime =
            SessionRuntime::new(id.clone(), self.pacing, command_rx, broadcast_tx.clone());
        tokio::spawn(runtime.run());

        let handle = SessionHandle {
            id: id.clone(),
            command_tx,
            broadcast_tx,
            last_seen: Arc::new(StdMutex::new(Instant::now())),
        };
        let mut sessions = self.sessions.write().await;
        sessions.insert(id, handle.clone());
        tracing::info!(session_id = %handle.id, active = sessions.len(), "Session created");
        drop(sessions);
        handle
    }

    pub async fn get(&self, id: &str) -> Result<SessionHandle, SessionError> {
        let handle = self
            .sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        handle.touch();
        Ok(handle)
    }

    /// Drop a session; its runtime stops once in-flight handles are gone
    pub async fn remove(&self, id: &str) -> Result<(), SessionError> {
        if self.sessions.write().await.remove(id).is_none() {
            return Err(SessionError::NotFound(id.to_string()));
        }
        tracing::info!(session_id = %id, "Session removed");
        Ok(())
    }

    /// Drop sessions untouched for longer than `ttl`, returning how many went
    ///
    /// A removed session's runtime and pacer stop once the last handle to it
    /// is dropped.
    pub async fn remove_idle(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, handle| {
            let idle = handle.is_idle(now, ttl);
            if idle {
                tracing::info!(session_id = %id, "Removing idle session");
            }
            !idle
        });
        before - sessions.len()
    }

    /// Start the periodic idle sweep; it exits when the manager is dropped
    pub fn spawn_idle_sweep(manager: &Arc<Self>, ttl: Duration) {
        let manager = Arc::downgrade(manager);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                interval.tick().await;
                let Some(manager) = manager.upgrade() else {
                    tracing::debug!("Session manager dropped, idle sweep exiting");
                    break;
                };
                manager.remove_idle(ttl).await;
            }
        });
    }
}
