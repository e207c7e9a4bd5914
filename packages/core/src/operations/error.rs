//! Error types for edit-session commands
//!
//! These errors are local: they describe commands an edit session refuses to apply
//! and never correspond to a network request.

use crate::models::ValueType;
use crate::operations::SaveState;
use thiserror::Error;

/// Errors that can occur while applying an [`EditCommand`](crate::operations::EditCommand)
///
/// # Examples
///
/// ```rust
/// use densedia_core::operations::{EditError, SaveState};
///
/// let err = EditError::save_blocked(SaveState::Error);
/// assert_eq!(err.to_string(), "Cannot save: the current value is invalid");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    /// Save was requested while the derived save state is not `ok`
    ///
    /// `SaveState::Error` means the raw text is invalid for the current type;
    /// `SaveState::Disabled` means there is nothing to save.
    #[error("Cannot save: {}", describe_blocked(.state))]
    SaveBlocked { state: SaveState },

    /// Raw text was entered for a type edited without a text field
    #[error("Values of type '{value_type}' are not edited as text")]
    NotTextEditable { value_type: ValueType },

    /// Toggle was requested while the current value is not a bool
    #[error("Cannot toggle a value of type '{value_type}'")]
    NotToggleable { value_type: ValueType },

    /// A value edit was requested while the attribute has no version yet
    #[error("No version yet: choose a type first")]
    NoVersion,

    /// The session was submitted and is waiting for refreshed server data
    #[error("Edit session is waiting for the server")]
    AwaitingServer,
}

fn describe_blocked(state: &SaveState) -> &'static str {
    match state {
        SaveState::Error => "the current value is invalid",
        SaveState::Disabled => "nothing changed",
        SaveState::Ok => "save is allowed",
    }
}

impl EditError {
    /// Create a SaveBlocked error
    pub fn save_blocked(state: SaveState) -> Self {
        Self::SaveBlocked { state }
    }

    /// Create a NotTextEditable error
    pub fn not_text_editable(value_type: ValueType) -> Self {
        Self::NotTextEditable { value_type }
    }

    /// Create a NotToggleable error
    pub fn not_toggleable(value_type: ValueType) -> Self {
        Self::NotToggleable { value_type }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_messages() {
        assert_eq!(
            EditError::save_blocked(SaveState::Disabled).to_string(),
            "Cannot save: nothing changed"
        );
        assert_eq!(
            EditError::save_blocked(SaveState::Error).to_string(),
            "Cannot save: the current value is invalid"
        );
    }

    #[test]
    fn test_type_messages() {
        assert_eq!(
            EditError::not_text_editable(ValueType::Bool).to_string(),
            "Values of type 'bool' are not edited as text"
        );
        assert_eq!(
            EditError::not_toggleable(ValueType::Int).to_string(),
            "Cannot toggle a value of type 'int'"
        );
    }
}
