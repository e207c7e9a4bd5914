//! Service Layer Error Types
//!
//! Errors raised while composing edia, elements, links and edit sessions. Local
//! rejections (validation, staging, edit commands) are kept apart from remote request
//! failures so the caller can decide what reaches the notification queue.

use crate::api::ApiError;
use crate::models::ValidationError;
use crate::operations::EditError;
use thiserror::Error;

/// Rejections of the new-element validity gate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StagingError {
    /// Element names cannot be empty
    #[error("Element name cannot be empty")]
    EmptyName,

    /// An element with this name already exists in the edium
    #[error("Element '{0}' already exists")]
    AlreadyConfirmed(String),

    /// A draft with this name is already waiting for confirmation
    #[error("Element '{0}' is already being created")]
    AlreadyPending(String),

    /// Drafts need an active edium to belong to
    #[error("No edium is selected")]
    NoActiveEdium,
}

impl StagingError {
    pub fn already_confirmed(name: impl Into<String>) -> Self {
        Self::AlreadyConfirmed(name.into())
    }

    pub fn already_pending(name: impl Into<String>) -> Self {
        Self::AlreadyPending(name.into())
    }
}

/// Workspace operation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkspaceError {
    /// Remote request failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Edit command rejected by the session
    #[error("Edit rejected: {0}")]
    Edit(#[from] EditError),

    /// New element draft rejected
    #[error("Cannot add element: {0}")]
    Staging(#[from] StagingError),

    /// Local data or draft validation failed
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// No session is open for the given row
    #[error("No edit session for {0}")]
    UnknownSession(String),
}

impl WorkspaceError {
    pub fn unknown_session(key: impl Into<String>) -> Self {
        Self::UnknownSession(key.into())
    }

    /// True for errors detected locally, which are never routed to notifications
    pub fn is_local(&self) -> bool {
        !matches!(self, Self::Api(_))
    }
}
