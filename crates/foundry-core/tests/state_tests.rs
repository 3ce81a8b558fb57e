use foundry_core::state_machine::{allowed_transitions, validate_transition};
use foundry_core::ValidationState;
use proptest::prelude::*;

fn any_state() -> impl Strategy<Value = ValidationState> {
    prop_oneof![
        Just(ValidationState::Empty),
        Just(ValidationState::Defaulted),
        Just(ValidationState::Editing),
        Just(ValidationState::Validating),
        Just(ValidationState::Valid),
        Just(ValidationState::Invalid),
    ]
}

#[test]
fn test_load_then_edit_then_validate() {
    let path = [
        ValidationState::Empty,
        ValidationState::Defaulted,
        ValidationState::Editing,
        ValidationState::Editing,
        ValidationState::Validating,
        ValidationState::Invalid,
        ValidationState::Editing,
        ValidationState::Validating,
        ValidationState::Valid,
    ];
    for step in path.windows(2) {
        assert!(validate_transition(step[0], step[1]).is_ok(), "{} -> {}", step[0], step[1]);
    }
}

#[test]
fn test_validate_on_load() {
    assert!(validate_transition(ValidationState::Defaulted, ValidationState::Validating).is_ok());
    assert!(validate_transition(ValidationState::Defaulted, ValidationState::Valid).is_err());
}

#[test]
fn test_service_failure_returns_to_editing() {
    assert!(validate_transition(ValidationState::Validating, ValidationState::Editing).is_ok());
}

#[test]
fn test_error_names_both_states() {
    let err = validate_transition(ValidationState::Editing, ValidationState::Invalid).unwrap_err();
    assert_eq!(err.from, ValidationState::Editing);
    assert_eq!(err.to, ValidationState::Invalid);
}

proptest! {
    #[test]
    fn prop_all_transitions_are_subset_of_allowed(from in any_state(), to in any_state()) {
        let res = validate_transition(from, to);
        let allowed = allowed_transitions(from);
        prop_assert_eq!(res.is_ok(), allowed.contains(&to));
    }

    #[test]
    fn prop_every_state_can_reset_and_reload(from in any_state()) {
        prop_assert!(validate_transition(from, ValidationState::Empty).is_ok());
        prop_assert!(validate_transition(from, ValidationState::Defaulted).is_ok());
    }

    #[test]
    fn prop_every_loaded_state_accepts_edits(from in any_state()) {
        let ok = validate_transition(from, ValidationState::Editing).is_ok();
        prop_assert_eq!(ok, from != ValidationState::Empty);
    }
}
