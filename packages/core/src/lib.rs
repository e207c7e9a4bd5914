//! DenseEdia Client Core
//!
//! This crate provides the client-side data model and editing logic for DenseEdia, a
//! store of titled, kinded containers ("edia") holding named, versioned attributes
//! ("elements") and linked to each other.
//!
//! # Architecture
//!
//! - **Typed Values**: Element values are a closed sum type with one validator and codec
//!   per kind
//! - **Append-Only Versions**: An element's current value is its single `last` version
//! - **Edit Sessions**: One reducer-driven state machine per displayed attribute, with a
//!   tri-state save (`ok` / `disabled` / `error`)
//! - **Optimistic Drafts**: New elements are staged locally and reconciled by name once
//!   the server confirms them
//! - **Async Service Seam**: Every remote call goes through the `EdiaApi` trait
//!
//! # Modules
//!
//! - [`models`] - Data structures (Edium, Element, Version, Link, TypedValue)
//! - [`operations`] - Edit session state machine
//! - [`services`] - Workspace composition, pending drafts, suggestions, notifications
//! - [`api`] - Service trait, routes, response decoding, in-memory backend
//! - [`config`] - Client configuration

pub mod api;
pub mod config;
pub mod models;
pub mod operations;
pub mod services;

// Re-export commonly used types
pub use api::{ApiError, EdiaApi};
#[cfg(any(test, feature = "memory"))]
pub use api::MemoryApi;
pub use config::ClientConfig;
pub use models::{
    Edium, Element, Link, LinkDirection, LinkDraft, LinkView, TypedValue, ValidationError,
    ValueType, Version, VersionChain,
};
pub use operations::{EditCommand, EditError, EditOutcome, EditSession, SaveState};
pub use services::{EdiumWorkspace, NotificationQueue, SessionKey, WorkspaceError};
