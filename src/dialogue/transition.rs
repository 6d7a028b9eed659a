//! Pure state transition function
//!
//! Given the same state and event this always produces the same new state
//! and effects, with no I/O and no timing.

use super::catalog::{self, LocationCategory};
use super::{ConversationState, Effect, Event, Message, Step};
use thiserror::Error;

pub const GREETING: &str = "Hello! I'm the Campus Service Assistant. I'm here to help you report issues on campus. Where is the issue located?";
const NILGIRI_QUESTION: &str = "Which location in Nilgiri? Please choose or type the location.";
const ISSUE_QUESTION: &str = "What kind of issue is this?";
const DETAILS_QUESTION: &str =
    "Please provide a brief description of the issue and your room number or specific location.";
const MESS_DETAILS_QUESTION: &str = "Please provide additional details about the issue.";
const SUMMARY_INTRO: &str = "Here's a summary of your request. Please review and confirm:";

/// Stored when the details text has no second line
pub const ROOM_NOT_SPECIFIED: &str = "Not specified";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConversationState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConversationState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    /// True when the event was absorbed without any visible change
    pub fn is_noop(&self) -> bool {
        self.effects.is_empty()
    }
}

/// Inputs the current step has no affordance for
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("\"{input}\" is not one of the options offered at {step}")]
    NotAnOption { step: Step, input: String },
    #[error("{step} does not take input")]
    UnexpectedInput { step: Step },
    #[error("Nothing to confirm at {step}")]
    NothingToConfirm { step: Step },
}

/// Pure transition function
pub fn transition(
    state: &ConversationState,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match event {
        Event::Open => Ok(open(state)),

        Event::Close => {
            let mut next = state.clone();
            next.is_open = false;
            Ok(TransitionResult::new(next))
        }

        Event::EditInput { text } => {
            let mut next = state.clone();
            next.pending_input = text;
            Ok(TransitionResult::new(next))
        }

        // Empty submissions are ignored at every step
        Event::Input { text } if text.trim().is_empty() => {
            Ok(TransitionResult::new(state.clone()))
        }

        Event::Input { text } => input(state, &text),

        Event::Confirm if state.step == Step::Confirmation => {
            let mut turn = Turn::from(state);
            turn.effects.push(Effect::ReportSubmitted {
                report: state.draft.clone(),
            });
            turn.goto(Step::Success);
            Ok(turn.finish())
        }

        Event::Confirm => Err(TransitionError::NothingToConfirm { step: state.step }),

        Event::Restart => Ok(restart(state)),
    }
}

// ============================================================
// Lifecycle
// ============================================================

/// Opening greets only when nothing has been said yet
fn open(state: &ConversationState) -> TransitionResult {
    let mut turn = Turn::from(state);
    turn.state.is_open = true;
    if state.transcript.is_empty() {
        turn.greet();
    }
    turn.finish()
}

/// Start a new report cycle; only visibility survives
fn restart(state: &ConversationState) -> TransitionResult {
    let mut turn = Turn {
        state: ConversationState {
            is_open: state.is_open,
            ..ConversationState::default()
        },
        effects: vec![Effect::ClearTranscript],
    };
    turn.greet();
    turn.finish()
}

// ============================================================
// Input Handling
// ============================================================

fn input(state: &ConversationState, text: &str) -> Result<TransitionResult, TransitionError> {
    let step = state.step;
    match step {
        Step::Greeting | Step::Confirmation | Step::Success => {
            Err(TransitionError::UnexpectedInput { step })
        }
        Step::DetailsInput => Ok(submit_details(state, text)),
        _ => {
            let answer = resolve_answer(state, text)?;
            let mut turn = Turn::from(state);
            turn.hear(&answer);
            if step.accepts_text() {
                turn.state.pending_input.clear();
            }
            match step {
                Step::LocationCategory => choose_category(&mut turn, &answer),
                Step::IssueCategory | Step::MessIssueCategory => choose_issue(&mut turn, &answer),
                _ => choose_place(&mut turn, &answer),
            }
            Ok(turn.finish())
        }
    }
}

/// Map raw input to the label that gets stored
///
/// Menu options match case-insensitively and are stored with their canonical
/// spelling. Text-accepting steps keep anything else as typed, trimmed.
fn resolve_answer(state: &ConversationState, text: &str) -> Result<String, TransitionError> {
    let options = catalog::menu(state).unwrap_or_default();
    if let Some(option) = catalog::find_option(&options, text) {
        return Ok(option.to_string());
    }
    if state.step.accepts_text() {
        return Ok(text.trim().to_string());
    }
    Err(TransitionError::NotAnOption {
        step: state.step,
        input: text.to_string(),
    })
}

fn choose_category(turn: &mut Turn, label: &str) {
    // Labels come from the category menu, so this always resolves
    let Some(category) = LocationCategory::from_label(label) else {
        return;
    };
    turn.state.draft.location_category = label.to_string();
    turn.state.in_nilgiri = false;
    turn.say(category.question());
    turn.goto(category.selection_step());
}

fn choose_place(turn: &mut Turn, place: &str) {
    let step = turn.state.step;
    turn.state.draft.specific_location = place.to_string();

    if step == Step::AcademicSelection && catalog::is_nilgiri(place) {
        turn.state.in_nilgiri = true;
        turn.say(NILGIRI_QUESTION);
        turn.goto(Step::NilgiriSelection);
        return;
    }

    turn.state.in_nilgiri = turn.state.in_nilgiri
        || step == Step::NilgiriSelection
        || catalog::is_nilgiri_sub_location(place);

    turn.say(ISSUE_QUESTION);
    if step == Step::MessSelection {
        turn.goto(Step::MessIssueCategory);
    } else {
        turn.goto(Step::IssueCategory);
    }
}

fn choose_issue(turn: &mut Turn, issue: &str) {
    turn.state.draft.issue_type = issue.to_string();
    if turn.state.step == Step::MessIssueCategory {
        turn.say(MESS_DETAILS_QUESTION);
    } else {
        turn.say(DETAILS_QUESTION);
    }
    turn.goto(Step::DetailsInput);
}

/// First line is the description, the rest is the room or spot
fn submit_details(state: &ConversationState, text: &str) -> TransitionResult {
    let mut lines = text.lines();
    let description = lines.next().unwrap_or_default().trim().to_string();
    let room = lines.collect::<Vec<_>>().join(" ").trim().to_string();

    let mut turn = Turn::from(state);
    turn.hear(text);
    turn.state.draft.description = description;
    turn.state.draft.room_number = if room.is_empty() {
        ROOM_NOT_SPECIFIED.to_string()
    } else {
        room
    };
    turn.state.pending_input.clear();
    turn.say(SUMMARY_INTRO);
    turn.goto(Step::Confirmation);
    turn.finish()
}

// ============================================================
// Turn Builder
// ============================================================

/// Accumulates one transition's state changes and matching effects
struct Turn {
    state: ConversationState,
    effects: Vec<Effect>,
}

impl From<&ConversationState> for Turn {
    fn from(state: &ConversationState) -> Self {
        Self {
            state: state.clone(),
            effects: vec![],
        }
    }
}

impl Turn {
    fn hear(&mut self, text: &str) {
        self.state.transcript.push(Message::user(text));
        self.effects.push(Effect::user_message(text));
    }

    fn say(&mut self, text: &str) {
        self.state.transcript.push(Message::assistant(text));
        self.effects.push(Effect::assistant_reply(text));
    }

    fn greet(&mut self) {
        self.state.transcript.push(Message::assistant(GREETING));
        self.effects.push(Effect::greeting(GREETING));
        self.goto(Step::LocationCategory);
    }

    fn goto(&mut self, step: Step) {
        self.state.step = step;
        self.state.text_input_visible = step.accepts_text();
        self.effects.push(Effect::StepChanged { step });
    }

    fn finish(self) -> TransitionResult {
        TransitionResult {
            new_state: self.state,
            effects: self.effects,
        }
    }
}
