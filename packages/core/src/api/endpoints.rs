//! REST Resource Routes and Response Decoding
//!
//! Transport-independent half of the HTTP client: which method and path each operation
//! uses, and how a raw `(status, body)` response becomes a typed value or an
//! [`ApiError`]. A transport only has to perform the I/O.
//!
//! # Examples
//!
//! ```rust
//! use densedia_core::api::{Endpoint, Method};
//! use densedia_core::config::ClientConfig;
//!
//! let endpoint = Endpoint::ListElements(3);
//! assert_eq!(endpoint.method(), Method::Get);
//! assert_eq!(
//!     endpoint.url(&ClientConfig::default()),
//!     "http://127.0.0.1:59130/edium/3/elements?versions=single"
//! );
//! ```

use crate::api::ApiError;
use crate::config::ClientConfig;
use crate::models::{EdiumId, ElementId, LinkId};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

/// HTTP method of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every route of the DenseEdia service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    ListEdia,
    CreateEdium,
    UpdateEdium(EdiumId),
    DeleteEdium(EdiumId),
    /// Elements with only their last version populated
    ListElements(EdiumId),
    CreateElement(EdiumId),
    DeleteElement(ElementId),
    CreateVersion(ElementId),
    ListLinks(EdiumId),
    CreateLink,
    DeleteLink(LinkId),
    /// Ranked `[name, count]` pairs for an edium kind
    MostUsedElements(String),
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::ListEdia
            | Endpoint::ListElements(_)
            | Endpoint::ListLinks(_)
            | Endpoint::MostUsedElements(_) => Method::Get,
            Endpoint::CreateEdium
            | Endpoint::CreateElement(_)
            | Endpoint::CreateVersion(_)
            | Endpoint::CreateLink => Method::Post,
            Endpoint::UpdateEdium(_) => Method::Patch,
            Endpoint::DeleteEdium(_) | Endpoint::DeleteElement(_) | Endpoint::DeleteLink(_) => {
                Method::Delete
            }
        }
    }

    /// Resource path, relative to the configured base URL
    pub fn path(&self) -> String {
        match self {
            Endpoint::ListEdia | Endpoint::CreateEdium => "/edium".to_string(),
            Endpoint::UpdateEdium(id) | Endpoint::DeleteEdium(id) => format!("/edium/{}", id),
            Endpoint::ListElements(id) => format!("/edium/{}/elements?versions=single", id),
            Endpoint::CreateElement(id) => format!("/edium/{}/element", id),
            Endpoint::DeleteElement(id) => format!("/element/{}", id),
            Endpoint::CreateVersion(id) => format!("/element/{}/version", id),
            Endpoint::ListLinks(id) => format!("/edium/{}/links", id),
            Endpoint::CreateLink => "/link".to_string(),
            Endpoint::DeleteLink(id) => format!("/link/{}", id),
            Endpoint::MostUsedElements(kind) => {
                format!("/stats/most_used_elements/{}", urlencoding::encode(kind))
            }
        }
    }

    /// Absolute URL for this route
    pub fn url(&self, config: &ClientConfig) -> String {
        format!("{}{}", config.base_url(), self.path())
    }

    /// Whether the route expects a JSON request body
    pub fn has_body(&self) -> bool {
        matches!(self.method(), Method::Post | Method::Patch)
    }
}

/// Turn a raw response into a typed value
///
/// - body is not JSON ⇒ `ApiError::Decode`
/// - status outside `200..300` ⇒ `ApiError::Application` carrying the `detail` field:
///   a string detail verbatim, a structured detail as JSON text, `HTTP <status>` when
///   absent
/// - JSON of the wrong shape ⇒ `ApiError::Decode`
pub fn decode_response<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<T, ApiError> {
    let json: Value = serde_json::from_slice(body).map_err(|e| {
        tracing::warn!("Response with status {} is not JSON: {}", status, e);
        ApiError::decode(e.to_string())
    })?;

    if !(200..300).contains(&status) {
        tracing::warn!("Request failed with status {}", status);
        let detail = match json.get("detail") {
            Some(Value::String(detail)) => detail.clone(),
            Some(detail) => detail.to_string(),
            None => format!("HTTP {}", status),
        };
        return Err(ApiError::application(status, detail));
    }

    serde_json::from_value(json).map_err(|e| ApiError::decode(e.to_string()))
}
