//! Session runtime executor

use super::pacer::{self, Outgoing};
use super::{SessionCommand, SessionView, SseEvent, SubmittedReport};
use crate::config::Pacing;
use crate::dialogue::{
    transition, ConversationState, Cue, Effect, Event, ReportDraft, TransitionError,
};
use chrono::Utc;
use tokio::sync::{broadcast, mpsc};

/// Owns one dialogue and applies events to it one at a time
pub struct SessionRuntime {
    id: String,
    state: ConversationState,
    /// Acknowledgment for the current cycle, cleared on restart
    submission: Option<SubmittedReport>,
    pacing: Pacing,
    command_rx: mpsc::Receiver<SessionCommand>,
    broadcast_tx: broadcast::Sender<SseEvent>,
    outbox: Option<mpsc::UnboundedSender<Outgoing>>,
}

impl SessionRuntime {
    pub fn new(
        id: String,
        pacing: Pacing,
        command_rx: mpsc::Receiver<SessionCommand>,
        broadcast_tx: broadcast::Sender<SseEvent>,
    ) -> Self {
        Self {
            id,
            state: ConversationState::new(),
            submission: None,
            pacing,
            command_rx,
            broadcast_tx,
            outbox: None,
        }
    }

    pub async fn run(mut self) {
        tracing::debug!(session_id = %self.id, "Starting session runtime");
        self.outbox = Some(pacer::spawn(self.broadcast_tx.clone()));

        while let Some(command) = self.command_rx.recv().await {
            match command {
                SessionCommand::Apply { event, reply } => {
                    let outcome = self.process_event(event);
                    let _ = reply.send(outcome);
                }
                SessionCommand::Snapshot { reply } => {
                    let _ = reply.send(self.view());
                }
            }
        }

        tracing::debug!(session_id = %self.id, "Session runtime stopped");
    }

    fn process_event(&mut self, event: Event) -> Result<SessionView, TransitionError> {
        // Pure state transition
        let result = match transition(&self.state, event) {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(
                    session_id = %self.id,
                    step = %self.state.step,
                    error = %e,
                    "Rejected input"
                );
                return Err(e);
            }
        };

        if result.is_noop() {
            tracing::trace!(
                session_id = %self.id,
                step = %self.state.step,
                "Event absorbed without effects"
            );
        }

        let old_step = self.state.step;
        let mut next_index = self.state.transcript.len();
        self.state = result.new_state;
        if old_step != self.state.step {
            tracing::debug!(
                session_id = %self.id,
                from = %old_step,
                to = %self.state.step,
                "Step changed"
            );
        }

        for effect in result.effects {
            match &effect {
                Effect::ClearTranscript => next_index = 0,
                Effect::Notify { .. } => next_index += 1,
                _ => {}
            }
            self.execute_effect(effect, next_index.saturating_sub(1));
        }

        Ok(self.view())
    }

    /// `index` is the transcript position of a notified message
    fn execute_effect(&mut self, effect: Effect, index: usize) {
        match effect {
            Effect::Notify { message, cue } => {
                let delay = match cue {
                    Cue::Immediate => std::time::Duration::ZERO,
                    Cue::Reply => self.pacing.reply_delay,
                    Cue::Greeting => self.pacing.greeting_delay,
                };
                self.send(Outgoing::after(delay, SseEvent::Message { index, message }));
            }
            Effect::ClearTranscript => {
                self.submission = None;
                self.send(Outgoing::now(SseEvent::Reset));
            }
            Effect::StepChanged { step } => {
                // Queued behind the messages, so the affordance appears after them
                self.send(Outgoing::now(SseEvent::Step {
                    step,
                    prompt: self.state.prompt(),
                }));
            }
            Effect::ReportSubmitted { report } => {
                let submission = self.acknowledge(report);
                self.submission = Some(submission.clone());
                self.send(Outgoing::now(SseEvent::Submitted { submission }));
            }
        }
    }

    /// Stamp a confirmed draft; the log line is the only record it leaves
    fn acknowledge(&self, report: ReportDraft) -> SubmittedReport {
        let submission = SubmittedReport {
            reference: uuid::Uuid::new_v4().to_string(),
            submitted_at: Utc::now(),
            report,
        };
        tracing::info!(
            session_id = %self.id,
            reference = %submission.reference,
            location_category = %submission.report.location_category,
            specific_location = %submission.report.specific_location,
            issue_type = %submission.report.issue_type,
            description = %submission.report.description,
            room_number = %submission.report.room_number,
            "Issue report submitted"
        );
        submission
    }

    fn send(&self, outgoing: Outgoing) {
        if let Some(outbox) = &self.outbox {
            let _ = outbox.send(outgoing);
        }
    }

    fn view(&self) -> SessionView {
        SessionView::new(&self.id, &self.state, self.submission.as_ref())
    }
}
