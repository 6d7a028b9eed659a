//! Conversation state types

use super::catalog;
use serde::Serialize;
use std::fmt;

// ============================================================================
// Steps
// ============================================================================

/// Position in the report dialogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    /// Widget not yet opened
    #[default]
    Greeting,
    LocationCategory,
    HostelSelection,
    NilgiriSelection,
    AcademicSelection,
    CanteenSelection,
    CommonAreaSelection,
    MessSelection,
    IssueCategory,
    MessIssueCategory,
    DetailsInput,
    Confirmation,
    /// Report acknowledged; only a restart leaves this step
    Success,
}

impl Step {
    pub fn as_str(self) -> &'static str {
        match self {
            Step::Greeting => "greeting",
            Step::LocationCategory => "location-category",
            Step::HostelSelection => "hostel-selection",
            Step::NilgiriSelection => "nilgiri-selection",
            Step::AcademicSelection => "academic-selection",
            Step::CanteenSelection => "canteen-selection",
            Step::CommonAreaSelection => "common-area-selection",
            Step::MessSelection => "mess-selection",
            Step::IssueCategory => "issue-category",
            Step::MessIssueCategory => "mess-issue-category",
            Step::DetailsInput => "details-input",
            Step::Confirmation => "confirmation",
            Step::Success => "success",
        }
    }

    /// Steps where typed text is accepted in addition to (or instead of) buttons
    pub fn accepts_text(self) -> bool {
        matches!(
            self,
            Step::AcademicSelection | Step::NilgiriSelection | Step::DetailsInput
        )
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Transcript
// ============================================================================

/// One line of the chat transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub text: String,
    pub from_assistant: bool,
}

impl Message {
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            from_assistant: true,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            from_assistant: false,
        }
    }
}

// ============================================================================
// Report Draft
// ============================================================================

/// Answers collected so far, shown on the summary card
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportDraft {
    pub location_category: String,
    pub specific_location: String,
    pub issue_type: String,
    pub description: String,
    pub room_number: String,
}

// ============================================================================
// Conversation State
// ============================================================================

/// Everything one chat widget knows about the report in progress
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversationState {
    /// Append-only until the next restart
    pub transcript: Vec<Message>,
    pub step: Step,
    pub draft: ReportDraft,
    /// Set once the user is inside the Nilgiri building; trims the issue menu
    pub in_nilgiri: bool,
    /// Text typed but not yet sent
    pub pending_input: String,
    pub text_input_visible: bool,
    pub is_open: bool,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// What the presentation should render for the current step
    pub fn prompt(&self) -> Prompt {
        match self.step {
            Step::Greeting => Prompt::None,
            Step::DetailsInput => Prompt::Text,
            Step::Confirmation => Prompt::Summary {
                draft: self.draft.clone(),
            },
            Step::Success => Prompt::Acknowledgment,
            step => {
                let options = catalog::menu(self).unwrap_or_default();
                if step.accepts_text() {
                    Prompt::MenuOrText { options }
                } else {
                    Prompt::Menu { options }
                }
            }
        }
    }
}

/// Affordance for the current step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Prompt {
    None,
    Menu { options: Vec<&'static str> },
    MenuOrText { options: Vec<&'static str> },
    Text,
    Summary { draft: ReportDraft },
    Acknowledgment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_serializes_kebab_case() {
        let json = serde_json::to_value(Step::CommonAreaSelection).unwrap();
        assert_eq!(json, "common-area-selection");
        assert_eq!(Step::CommonAreaSelection.to_string(), "common-area-selection");
    }

    #[test]
    fn test_initial_state() {
        let state = ConversationState::new();
        assert_eq!(state.step, Step::Greeting);
        assert!(state.transcript.is_empty());
        assert_eq!(state.draft, ReportDraft::default());
        assert!(!state.in_nilgiri);
        assert_eq!(state.prompt(), Prompt::None);
    }

    #[test]
    fn test_prompt_kinds() {
        let mut state = ConversationState {
            step: Step::AcademicSelection,
            ..ConversationState::default()
        };
        assert!(matches!(
            state.prompt(),
            Prompt::MenuOrText { options } if options[0] == "Nilgiri"
        ));

        state.step = Step::HostelSelection;
        assert!(matches!(state.prompt(), Prompt::Menu { options } if options.len() == 4));

        state.step = Step::DetailsInput;
        assert_eq!(state.prompt(), Prompt::Text);

        state.step = Step::Success;
        assert_eq!(state.prompt(), Prompt::Acknowledgment);
    }

    #[test]
    fn test_prompt_serialization() {
        let state = ConversationState {
            step: Step::LocationCategory,
            ..ConversationState::default()
        };
        let json = serde_json::to_value(state.prompt()).unwrap();
        assert_eq!(json["type"], "menu");
        assert_eq!(json["options"][0], "Hostel");
        assert_eq!(json["options"][4], "Common Areas");
    }
}
