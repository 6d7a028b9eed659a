//! Paced delivery of session updates
//!
//! Reproduces the chat widget's short pause before assistant replies. The
//! dialogue state is already final by the time anything is queued here.

use super::SseEvent;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

/// An update waiting to be broadcast
#[derive(Debug)]
pub struct Outgoing {
    pub delay: Duration,
    pub event: SseEvent,
}

impl Outgoing {
    pub fn now(event: SseEvent) -> Self {
        Self::after(Duration::ZERO, event)
    }

    pub fn after(delay: Duration, event: SseEvent) -> Self {
        Self { delay, event }
    }
}

/// Spawn the delivery task; it stops when the returned sender is dropped
pub fn spawn(broadcast_tx: broadcast::Sender<SseEvent>) -> mpsc::UnboundedSender<Outgoing> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Outgoing>();
    tokio::spawn(async move {
        while let Some(Outgoing { delay, event }) = rx.recv().await {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            // No subscribers is fine; the view endpoint has the same data
            let _ = broadcast_tx.send(event);
        }
    });
    tx
}
