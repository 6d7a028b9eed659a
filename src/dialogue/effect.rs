//! Effects produced by state transitions

use super::state::{Message, ReportDraft, Step};

/// Presentation pacing for a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Echo of the user's own input
    Immediate,
    /// Assistant answer to the user's input
    Reply,
    /// Assistant greeting at the start of a report cycle
    Greeting,
}

/// Effects to be executed after a state transition
///
/// The transcript in the new state is already complete; effects only tell
/// connected clients what changed and in which order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// A message was appended to the transcript
    Notify { message: Message, cue: Cue },

    /// The transcript was wiped for a new report cycle
    ClearTranscript,

    /// The dialogue moved to another step
    StepChanged { step: Step },

    /// The user confirmed the summary card
    ReportSubmitted { report: ReportDraft },
}

impl Effect {
    pub fn user_message(text: impl Into<String>) -> Self {
        Effect::Notify {
            message: Message::user(text),
            cue: Cue::Immediate,
        }
    }

    pub fn assistant_reply(text: impl Into<String>) -> Self {
        Effect::Notify {
            message: Message::assistant(text),
            cue: Cue::Reply,
        }
    }

    pub fn greeting(text: impl Into<String>) -> Self {
        Effect::Notify {
            message: Message::assistant(text),
            cue: Cue::Greeting,
        }
    }
}
