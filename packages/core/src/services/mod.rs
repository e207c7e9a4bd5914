//! Client Services
//!
//! This module composes the models and edit sessions into the client's working state:
//!
//! - `EdiumWorkspace` - Active edium, confirmed rows, edit sessions and request routing
//! - `PendingElements` - Staging list of element drafts with name reconciliation
//! - `ElementSuggestions` - Kind-scoped element name ranking, filtered by availability
//! - `NotificationQueue` - Dismissible notifications for remote failures
//!
//! Services coordinate between the [`EdiaApi`](crate::api::EdiaApi) seam and the
//! presentation layer, which stays outside this crate.

pub mod error;
pub mod notifications;
pub mod pending;
pub mod suggestions;
pub mod workspace;

pub use error::{StagingError, WorkspaceError};
pub use notifications::{Notification, NotificationQueue};
pub use pending::{ElementRow, PendingElement, PendingElements};
pub use suggestions::{filter_suggestions, ElementSuggestions};
pub use workspace::{EdiumWorkspace, SessionKey};
