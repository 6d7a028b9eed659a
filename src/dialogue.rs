//! Campus issue report dialogue
//!
//! Implements the Elm Architecture pattern with pure state transitions over
//! a single, explicitly owned conversation state.

pub mod catalog;
mod effect;
mod event;
mod state;
mod transition;

#[cfg(test)]
mod proptests;

pub use effect::{Cue, Effect};
pub use event::Event;
pub use state::{ConversationState, Message, Prompt, ReportDraft, Step};
pub use transition::{transition, TransitionError, GREETING};
