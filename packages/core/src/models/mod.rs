//! Data Models
//!
//! This module contains the data structures exchanged with the DenseEdia service and
//! the pure, I/O-free rules attached to them:
//!
//! - `Edium` - Titled, kinded container (topic or project folder)
//! - `Element` / `Version` - Named attribute with an append-only version chain
//! - `TypedValue` / `ValueType` - Tagged value with per-kind raw-text validation
//! - `Link` / `LinkDirection` - Optionally directed relation between two edia
//!
//! Identity and persistence belong to the server; the client only caches snapshots.

mod edium;
mod element;
mod link;
mod value;

pub use edium::{Edium, EdiumCreate, EdiumForm, EdiumUpdate};
pub use element::{Element, ElementCreate, ElementNameUsage, Version, VersionChain, VersionCreate};
pub use link::{Link, LinkCreate, LinkDirection, LinkDraft, LinkView};
pub use value::{default_for, TypedValue, ValueType, NULL_TEXT};

use chrono::{DateTime, NaiveDateTime};
use thiserror::Error;

/// Server-assigned edium identifier
pub type EdiumId = i64;

/// Server-assigned element identifier
pub type ElementId = i64;

/// Server-assigned version identifier
pub type VersionId = i64;

/// Server-assigned link identifier
pub type LinkId = i64;

/// Validation errors for model data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Unknown value type: {0}")]
    UnknownValueType(String),

    #[error("Value {value_json} does not match value type '{value_type}'")]
    ValueShapeMismatch {
        value_type: ValueType,
        value_json: String,
    },

    #[error("Element {element_id} has {count} versions flagged as last")]
    MultipleCurrentVersions { element_id: ElementId, count: usize },

    #[error("Link {link_id} does not involve edium {reference}")]
    LinkNotIncident { link_id: LinkId, reference: EdiumId },

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Parse a server `creation_date` string
///
/// Accepts RFC 3339 timestamps (normalized to UTC) as well as naive ISO-8601
/// timestamps with either a `T` or a space separator. Returns `None` for anything
/// else; the raw string stays available on the model.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_utc());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2021, 5, 1)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();

        assert_eq!(parse_timestamp("2021-05-01T12:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2021-05-01 12:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2021-05-01T14:30:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2021-05-01T12:30:00Z"), Some(expected));
        assert!(parse_timestamp("2021-05-01T12:30:00.250000").is_some());
        assert_eq!(parse_timestamp("not a date"), None);
    }
}
