//! Validation lifecycle transitions
//!
//! The store calls [`validate_transition`] before every state change; the
//! table in [`allowed_transitions`] is the whole lifecycle.

use crate::error::TransitionError;
use crate::types::ValidationState;

/// Check that `from -> to` is a legal lifecycle step
///
/// # Errors
/// Returns [`TransitionError`] if the table does not list `to` for `from`.
pub fn validate_transition(
    from: ValidationState,
    to: ValidationState,
) -> Result<(), TransitionError> {
    if allowed(from, to) {
        Ok(())
    } else {
        Err(TransitionError { from, to })
    }
}

/// States reachable from `from` in one step
///
/// Every state may reset to `Empty`. Every loaded state may be reloaded to
/// `Defaulted` (switch and restore).
#[must_use]
pub fn allowed_transitions(from: ValidationState) -> Vec<ValidationState> {
    use ValidationState::*;
    match from {
        Empty => vec![Defaulted, Empty],
        Defaulted => vec![Editing, Validating, Defaulted, Empty],
        Editing => vec![Editing, Validating, Defaulted, Empty],
        Validating => vec![Editing, Valid, Invalid, Defaulted, Empty],
        Valid | Invalid => vec![Editing, Defaulted, Empty],
    }
}

fn allowed(from: ValidationState, to: ValidationState) -> bool {
    allowed_transitions(from).contains(&to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ValidationState::*;

    #[test]
    fn outcome_only_from_validating() {
        for from in ValidationState::ALL {
            let ok = validate_transition(from, Valid).is_ok();
            assert_eq!(ok, from == Validating, "{from} -> valid");
        }
    }

    #[test]
    fn empty_only_loads() {
        assert!(validate_transition(Empty, Defaulted).is_ok());
        assert!(validate_transition(Empty, Editing).is_err());
        assert!(validate_transition(Empty, Validating).is_err());
    }

    #[test]
    fn settled_states_need_an_edit_to_revalidate() {
        assert!(validate_transition(Valid, Validating).is_err());
        assert!(validate_transition(Invalid, Editing).is_ok());
    }
}
