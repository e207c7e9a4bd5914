//! EdiaApi Trait - Remote Service Abstraction
//!
//! This module defines the [`EdiaApi`] trait that abstracts the DenseEdia REST service.
//! The workspace only talks to `Arc<dyn EdiaApi>`, so an HTTP transport and the
//! in-memory [`MemoryApi`] are interchangeable.
//!
//! # Design Decisions
//!
//! 1. **Async-First**: every method is async, matching a network round trip
//! 2. **No Retries**: every failure is terminal for the attempt and surfaces as
//!    [`ApiError`]
//! 3. **Deletes Return the Resource**: the deleted edium, element or link is returned
//!
//! # Examples
//!
//! ```rust
//! use densedia_core::api::{EdiaApi, MemoryApi};
//! use densedia_core::models::EdiumCreate;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let api: Arc<dyn EdiaApi> = Arc::new(MemoryApi::new());
//!     let edium = api
//!         .create_edium(&EdiumCreate {
//!             title: "Notes".to_string(),
//!             kind: Some("project".to_string()),
//!         })
//!         .await?;
//!     assert_eq!(api.list_edia().await?, vec![edium]);
//!     Ok(())
//! }
//! ```

pub mod endpoints;
pub mod error;
#[cfg(any(test, feature = "memory"))]
pub mod memory;

pub use endpoints::{decode_response, Endpoint, Method};
pub use error::ApiError;
#[cfg(any(test, feature = "memory"))]
pub use memory::MemoryApi;

use crate::models::{
    Edium, EdiumCreate, EdiumId, EdiumUpdate, Element, ElementCreate, ElementId,
    ElementNameUsage, Link, LinkCreate, LinkId, Version, VersionCreate,
};
use async_trait::async_trait;

/// Operations offered by the DenseEdia service
///
/// Each method maps to exactly one [`Endpoint`].
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so the workspace can hold them behind an `Arc`.
#[async_trait]
pub trait EdiaApi: Send + Sync {
    //
    // EDIA
    //

    /// `GET /edium`
    async fn list_edia(&self) -> Result<Vec<Edium>, ApiError>;

    /// `POST /edium`
    async fn create_edium(&self, payload: &EdiumCreate) -> Result<Edium, ApiError>;

    /// `PATCH /edium/{id}`
    async fn update_edium(&self, id: EdiumId, payload: &EdiumUpdate) -> Result<Edium, ApiError>;

    /// `DELETE /edium/{id}`; removes the edium's elements and links as well
    async fn delete_edium(&self, id: EdiumId) -> Result<Edium, ApiError>;

    //
    // ELEMENTS AND VERSIONS
    //

    /// `GET /edium/{id}/elements?versions=single`
    ///
    /// Each element carries at most its last version.
    async fn list_elements(&self, edium_id: EdiumId) -> Result<Vec<Element>, ApiError>;

    /// `POST /edium/{id}/element`, creating the element with its first version
    async fn create_element(
        &self,
        edium_id: EdiumId,
        payload: &ElementCreate,
    ) -> Result<Element, ApiError>;

    /// `DELETE /element/{id}`
    async fn delete_element(&self, id: ElementId) -> Result<Element, ApiError>;

    /// `POST /element/{id}/version`; the new version becomes the last one
    async fn create_version(
        &self,
        element_id: ElementId,
        payload: &VersionCreate,
    ) -> Result<Version, ApiError>;

    //
    // LINKS
    //

    /// `GET /edium/{id}/links`, every link incident to the edium
    async fn list_links(&self, edium_id: EdiumId) -> Result<Vec<Link>, ApiError>;

    /// `POST /link`
    async fn create_link(&self, payload: &LinkCreate) -> Result<Link, ApiError>;

    /// `DELETE /link/{id}`
    async fn delete_link(&self, id: LinkId) -> Result<Link, ApiError>;

    //
    // STATISTICS
    //

    /// `GET /stats/most_used_elements/{kind}`, ranked by usage
    async fn most_used_element_names(&self, kind: &str)
        -> Result<Vec<ElementNameUsage>, ApiError>;
}
