//! Events that can occur in a report dialogue

/// Everything the presentation can tell the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Widget shown; greets once while the transcript is empty
    Open,
    /// Widget hidden; dialogue position is kept
    Close,
    /// A button label or typed text for the current step
    Input { text: String },
    /// Keystrokes in the text field, not yet sent
    EditInput { text: String },
    /// "Submit Request" on the summary card
    Confirm,
    /// "Report Another Issue"
    Restart,
}

impl Event {
    pub fn input(text: impl Into<String>) -> Self {
        Event::Input { text: text.into() }
    }
}
