//! Property-based tests for the report dialogue
//!
//! These walk the dialogue with random menu picks and random text and check
//! that the invariants hold at every reachable step.

use super::catalog::LocationCategory;
use super::*;
use proptest::prelude::*;
use proptest::sample::Index;

// ============================================================================
// Test Helpers
// ============================================================================

const ISSUES_WITHOUT_PLUMBER: &[&str] =
    &["Electrician", "Carpenter", "Internet / IT", "Cleaning", "Other"];

/// One user action, resolved against whatever the current step offers
#[derive(Debug, Clone)]
enum Action {
    Pick(Index),
    Type(String),
    Confirm,
    Restart,
    Close,
    Open,
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ]{1,30}",
        "[a-zA-Z ]{1,20}\n[a-zA-Z0-9 ]{0,20}",
        Just(String::new()),
        Just("   ".to_string()),
    ]
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        6 => any::<Index>().prop_map(Action::Pick),
        2 => arb_text().prop_map(Action::Type),
        1 => Just(Action::Confirm),
        1 => Just(Action::Restart),
        1 => Just(Action::Close),
        1 => Just(Action::Open),
    ]
}

/// Turn an action into the event the presentation would send
fn to_event(state: &ConversationState, action: &Action) -> Event {
    match action {
        Action::Pick(index) => match catalog::menu(state) {
            Some(options) if !options.is_empty() => Event::input(*index.get(&options)),
            _ => Event::input("free text"),
        },
        Action::Type(text) => Event::input(text.clone()),
        Action::Confirm => Event::Confirm,
        Action::Restart => Event::Restart,
        Action::Close => Event::Close,
        Action::Open => Event::Open,
    }
}

/// Follow a happy path to the end, picking options by index
///
/// Panics if any step absorbs its input without moving on.
fn complete_report(picks: &[usize], details: &str) -> ConversationState {
    let mut state = transition(&ConversationState::new(), Event::Open)
        .unwrap()
        .new_state;
    let mut picks = picks.iter().cycle();
    while state.step != Step::Success {
        let event = match state.step {
            Step::DetailsInput => Event::input(details),
            Step::Confirmation => Event::Confirm,
            _ => {
                let options = catalog::menu(&state).unwrap();
                let pick = picks.next().copied().unwrap_or_default();
                Event::input(options[pick % options.len()])
            }
        };
        let result = transition(&state, event).unwrap();
        assert!(!result.is_noop(), "stalled at {}", state.step);
        state = result.new_state;
    }
    state
}

// ============================================================================
// State Validity Checkers
// ============================================================================

fn is_valid_state(state: &ConversationState) -> bool {
    // Nothing is said before the widget greets
    if state.step == Step::Greeting {
        return state.transcript.is_empty();
    }

    // Every report cycle opens with exactly one greeting
    let greetings = state
        .transcript
        .iter()
        .filter(|m| m.from_assistant && m.text == GREETING)
        .count();
    if greetings != 1 || state.transcript.first() != Some(&Message::assistant(GREETING)) {
        return false;
    }

    if state.text_input_visible != state.step.accepts_text() {
        return false;
    }

    // Menu steps always offer something to click
    if let Some(options) = catalog::menu(state) {
        if options.is_empty() {
            return false;
        }
    }

    // Past the place question the draft has its category and place
    if matches!(
        state.step,
        Step::IssueCategory | Step::MessIssueCategory | Step::DetailsInput | Step::Confirmation
    ) && (state.draft.location_category.is_empty() || state.draft.specific_location.is_empty())
    {
        return false;
    }

    !(state.step == Step::Confirmation && state.draft.room_number.is_empty())
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Invariant 1: Valid state after any sequence of actions
    #[test]
    fn prop_transitions_preserve_validity(
        actions in proptest::collection::vec(arb_action(), 0..40)
    ) {
        let mut state = ConversationState::new();

        for action in actions {
            let event = to_event(&state, &action);
            // Input without an affordance is rejected and leaves state alone
            if let Ok(result) = transition(&state, event) {
                state = result.new_state;
                prop_assert!(is_valid_state(&state), "Invalid state: {:?}", state);
            }
        }
    }

    // Invariant 2: Every offered option leads to exactly one next step
    #[test]
    fn prop_offered_options_always_advance(
        picks in proptest::collection::vec(any::<Index>(), 1..8)
    ) {
        let mut state = transition(&ConversationState::new(), Event::Open).unwrap().new_state;
        for pick in &picks {
            let Some(options) = catalog::menu(&state) else { break };
            let choice = *pick.get(&options);
            let before = state.transcript.len();

            let result = transition(&state, Event::input(choice));
            prop_assert!(result.is_ok(), "{} rejected at {}", choice, state.step);
            let result = result.unwrap();

            let steps: Vec<_> = result
                .effects
                .iter()
                .filter_map(|e| match e {
                    Effect::StepChanged { step } => Some(*step),
                    _ => None,
                })
                .collect();
            prop_assert_eq!(steps.len(), 1);
            prop_assert_eq!(steps[0], result.new_state.step);
            prop_assert_ne!(result.new_state.step, state.step);
            prop_assert_eq!(result.new_state.transcript.len(), before + 2);

            state = result.new_state;
        }
    }

    // Invariant 3: Whitespace-only input never changes anything
    #[test]
    fn prop_blank_input_is_noop(
        picks in proptest::collection::vec(any::<Index>(), 0..4),
        blank in "[ \t\n]{0,6}"
    ) {
        let mut state = transition(&ConversationState::new(), Event::Open).unwrap().new_state;
        for pick in &picks {
            let Some(options) = catalog::menu(&state) else { break };
            state = transition(&state, Event::input(*pick.get(&options))).unwrap().new_state;
        }

        let result = transition(&state, Event::input(blank)).unwrap();
        prop_assert!(result.is_noop());
        prop_assert_eq!(result.new_state, state);
    }

    // Invariant 4: Restart from anywhere yields a fresh cycle
    #[test]
    fn prop_restart_always_fresh(actions in proptest::collection::vec(arb_action(), 0..30)) {
        let mut state = ConversationState::new();
        for action in actions {
            let event = to_event(&state, &action);
            if let Ok(result) = transition(&state, event) {
                state = result.new_state;
            }
        }

        let restarted = transition(&state, Event::Restart).unwrap().new_state;
        prop_assert_eq!(restarted.step, Step::LocationCategory);
        prop_assert_eq!(restarted.transcript, vec![Message::assistant(GREETING)]);
        prop_assert_eq!(restarted.draft, ReportDraft::default());
        prop_assert!(!restarted.in_nilgiri);
        prop_assert_eq!(restarted.is_open, state.is_open);
    }

    // Invariant 5: Transitions are deterministic
    #[test]
    fn prop_same_picks_same_report(
        picks in proptest::collection::vec(any::<usize>(), 1..6),
        details in "[a-zA-Z][a-zA-Z ]{0,19}(\n[a-zA-Z0-9 ]{1,10})?"
    ) {
        let first = complete_report(&picks, &details);
        let second = complete_report(&picks, &details);
        prop_assert_eq!(first.step, Step::Success);
        prop_assert_eq!(first, second);
    }

    // Invariant 6: Each path offers its own issue menu; Nilgiri drops "Plumber"
    #[test]
    fn prop_issue_menu_per_path(
        category in 0..LocationCategory::ALL.len(),
        place in any::<Index>(),
        room in any::<Index>()
    ) {
        let category = LocationCategory::ALL[category];
        let mut state = transition(&ConversationState::new(), Event::Open).unwrap().new_state;
        state = transition(&state, Event::input(category.label())).unwrap().new_state;

        let places = catalog::menu(&state).unwrap();
        let place = *place.get(&places);
        state = transition(&state, Event::input(place)).unwrap().new_state;

        let via_nilgiri = state.step == Step::NilgiriSelection;
        if via_nilgiri {
            let rooms = catalog::menu(&state).unwrap();
            state = transition(&state, Event::input(*room.get(&rooms))).unwrap().new_state;
        }

        let options = catalog::menu(&state).unwrap();
        match category {
            LocationCategory::Hostel => {
                prop_assert_eq!(options, catalog::BASE_ISSUES.to_vec());
            }
            LocationCategory::AcademicBlock if via_nilgiri => {
                prop_assert_eq!(options, ISSUES_WITHOUT_PLUMBER.to_vec());
            }
            LocationCategory::AcademicBlock => {
                prop_assert_eq!(options, catalog::BASE_ISSUES.to_vec());
            }
            LocationCategory::Mess => {
                prop_assert_eq!(state.step, Step::MessIssueCategory);
                prop_assert_eq!(options, catalog::MESS_ISSUES.to_vec());
            }
            LocationCategory::Canteens | LocationCategory::CommonAreas => {
                prop_assert!(!options.contains(&"Plumber"));
                prop_assert_eq!(options.last(), Some(&"Other"));
            }
        }
    }
}

#[test]
#[should_panic(expected = "stalled at details-input")]
fn test_blank_details_stall_instead_of_looping() {
    complete_report(&[0], "   ");
}
