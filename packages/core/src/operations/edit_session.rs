//! Editable Attribute State Machine
//!
//! One [`EditSession`] drives the edit lifecycle of one displayed attribute, whether it
//! is backed by the last version of a confirmed element or by a pending draft that has
//! not been created yet. All transitions go through a single reducer,
//! [`EditSession::apply`], fed with typed [`EditCommand`]s.
//!
//! # State
//!
//! - `initial` - value the session was opened with (`None` means "no version yet")
//! - `current` - committed draft value, always of the current type
//! - `raw_text` - text as typed by the user
//!
//! `raw_text` and `current` are allowed to disagree: invalid keystrokes are kept in
//! `raw_text` for display while `current` keeps the last valid value. The derived
//! [`SaveState`] turns that disagreement into `SaveState::Error`.
//!
//! # Examples
//!
//! ```rust
//! use densedia_core::models::{TypedValue, ValueType};
//! use densedia_core::operations::{EditCommand, EditOutcome, EditSession, SaveState};
//!
//! let mut session = EditSession::open(Some(TypedValue::Int(7)));
//! assert_eq!(session.save_state(), SaveState::Disabled);
//!
//! session.apply(EditCommand::EditRawText("7x".to_string())).unwrap();
//! assert_eq!(session.current(), Some(&TypedValue::Int(7)));
//! assert_eq!(session.save_state(), SaveState::Error);
//!
//! session.apply(EditCommand::EditRawText("8".to_string())).unwrap();
//! let outcome = session.apply(EditCommand::Save).unwrap();
//! assert_eq!(outcome, Some(EditOutcome::Save(TypedValue::Int(8))));
//! ```

use crate::models::{Element, TypedValue, ValidationError, ValueType, NULL_TEXT};
use crate::operations::EditError;

/// Whether a Save may proceed
///
/// `Disabled` and `Error` both block the save but mean different things to the user:
/// nothing changed versus the current input is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaveState {
    Ok,
    Disabled,
    Error,
}

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    /// Accepting edits
    #[default]
    Editing,
    /// Save or Delete was emitted; waiting for the owner to replace or resume the session
    Submitted,
}

/// Commands accepted by [`EditSession::apply`]
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    /// Replace the raw text; the value follows only if the text is valid
    EditRawText(String),
    /// Flip a bool value
    Toggle,
    /// Switch type, discarding the in-progress value
    ChangeType(ValueType),
    /// Restore the initial state
    Reset,
    /// Emit the current value for persistence
    Save,
    /// Emit a delete intent for the backing element or draft
    Delete,
}

/// Intent emitted to the owner of the session
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    Save(TypedValue),
    Delete,
}

fn raw_text_of(value: Option<&TypedValue>) -> String {
    value
        .map(TypedValue::to_raw_text)
        .unwrap_or_else(|| NULL_TEXT.to_string())
}

/// Editing session for one attribute
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    initial: Option<TypedValue>,
    current: Option<TypedValue>,
    raw_text: String,
    status: SessionStatus,
}

impl EditSession {
    /// Open a session seeded with `initial` (`None` for "no version yet")
    pub fn open(initial: Option<TypedValue>) -> Self {
        let raw_text = raw_text_of(initial.as_ref());
        Self {
            current: initial.clone(),
            initial,
            raw_text,
            status: SessionStatus::Editing,
        }
    }

    /// Open a session for an element that has no version yet, pre-filled with `draft`
    ///
    /// Nothing is saved, so a valid draft can be saved without further edits. `Reset`
    /// returns to the empty state.
    pub fn draft(draft: Option<TypedValue>) -> Self {
        Self {
            raw_text: raw_text_of(draft.as_ref()),
            current: draft,
            ..Self::open(None)
        }
    }

    /// Open a session on an element's current version
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::ValueShapeMismatch` if the current version's JSON
    /// value does not match its type.
    pub fn for_element(element: &Element) -> Result<Self, ValidationError> {
        Ok(Self::open(element.current_value()?))
    }

    pub fn initial(&self) -> Option<&TypedValue> {
        self.initial.as_ref()
    }

    pub fn current(&self) -> Option<&TypedValue> {
        self.current.as_ref()
    }

    pub fn initial_type(&self) -> Option<ValueType> {
        self.initial.as_ref().map(TypedValue::value_type)
    }

    pub fn current_type(&self) -> Option<ValueType> {
        self.current.as_ref().map(TypedValue::value_type)
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// True while the attribute has no version and no type was picked yet
    pub fn has_no_version(&self) -> bool {
        self.initial.is_none() && self.current.is_none()
    }

    /// Whether type or value differ from the initial state
    pub fn is_dirty(&self) -> bool {
        self.current != self.initial
    }

    /// Derive the tri-state save status
    ///
    /// - `Error` when a type is set and the raw text fails that type's validator
    /// - `Disabled` when no type is set, or type and value equal the initial ones
    ///   (even if the raw text is spelled differently, e.g. `"007"` for `7`)
    /// - `Ok` otherwise
    pub fn save_state(&self) -> SaveState {
        let Some(current) = &self.current else {
            return SaveState::Disabled;
        };

        if !current.value_type().validate(&self.raw_text) {
            SaveState::Error
        } else if self.initial.as_ref() == Some(current) {
            SaveState::Disabled
        } else {
            SaveState::Ok
        }
    }

    /// Apply one command
    ///
    /// Returns the intent to forward to the owner for `Save` and `Delete`, `None` for
    /// local edits. After an intent is emitted the session is `Submitted` and rejects
    /// every command until [`EditSession::resume`] is called or the owner replaces it.
    ///
    /// # Errors
    ///
    /// - `EditError::AwaitingServer` while submitted
    /// - `EditError::SaveBlocked` when saving with a save state other than `Ok`
    /// - `EditError::NotTextEditable` / `EditError::NotToggleable` for commands that do
    ///   not apply to the current type
    /// - `EditError::NoVersion` for value edits before a type is chosen
    pub fn apply(&mut self, command: EditCommand) -> Result<Option<EditOutcome>, EditError> {
        if self.status == SessionStatus::Submitted {
            return Err(EditError::AwaitingServer);
        }

        match command {
            EditCommand::EditRawText(text) => {
                let value_type = self.current_type().ok_or(EditError::NoVersion)?;
                if !value_type.is_text_editable() {
                    return Err(EditError::not_text_editable(value_type));
                }
                if let Some(value) = value_type.decode(&text) {
                    self.current = Some(value);
                }
                self.raw_text = text;
                Ok(None)
            }
            EditCommand::Toggle => match &self.current {
                Some(TypedValue::Bool(value)) => {
                    let toggled = TypedValue::Bool(!value);
                    self.raw_text = toggled.to_raw_text();
                    self.current = Some(toggled);
                    Ok(None)
                }
                Some(other) => Err(EditError::not_toggleable(other.value_type())),
                None => Err(EditError::NoVersion),
            },
            EditCommand::ChangeType(value_type) => {
                let value = value_type.default_value();
                self.raw_text = value.to_raw_text();
                self.current = Some(value);
                Ok(None)
            }
            EditCommand::Reset => {
                self.current = self.initial.clone();
                self.raw_text = raw_text_of(self.initial.as_ref());
                Ok(None)
            }
            EditCommand::Save => {
                let state = self.save_state();
                let value = match (&self.current, state) {
                    (Some(value), SaveState::Ok) => value.clone(),
                    _ => return Err(EditError::save_blocked(state)),
                };
                self.status = SessionStatus::Submitted;
                tracing::debug!("Edit session submitted a '{}' value", value.value_type());
                Ok(Some(EditOutcome::Save(value)))
            }
            EditCommand::Delete => {
                self.status = SessionStatus::Submitted;
                Ok(Some(EditOutcome::Delete))
            }
        }
    }

    /// Return to editing after the submitted request failed
    ///
    /// The pre-save draft is untouched so the user can correct it and resubmit.
    pub fn resume(&mut self) {
        self.status = SessionStatus::Editing;
    }
}

#[cfg(test)]
#[path = "edit_session_test.rs"]
mod edit_session_test;
