//! Edit Operations
//!
//! This module holds the per-attribute editing state machine. It is pure: commands go
//! in, intents (`Save`, `Delete`) come out, and the owner decides which request to send.
//!
//! - `EditSession` - Tri-state save tracking over a typed value and its raw text
//! - `EditCommand` - Typed commands consumed by the single reducer `EditSession::apply`
//! - `EditError` - Local command rejections

pub mod edit_session;
pub mod error;

pub use edit_session::{EditCommand, EditOutcome, EditSession, SaveState, SessionStatus};
pub use error::EditError;
