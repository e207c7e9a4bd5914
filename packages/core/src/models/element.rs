//! Elements and Version Chains
//!
//! An element is a named attribute inside an edium. Its value history is an
//! append-only list of versions: creating a version never rewrites or removes an
//! older one, it only moves the `last` flag. Exactly one version carries `last = true`,
//! or none at all when the element has no version yet ("no version" is a valid state).
//!
//! The element listing endpoint (`?versions=single`) only populates the last version,
//! so [`VersionChain`] must work the same on a full history and on a one-entry slice.
//!
//! # Examples
//!
//! ```rust
//! use densedia_core::models::{Element, TypedValue, ValueType, Version};
//! use serde_json::json;
//!
//! let element = Element {
//!     id: 1,
//!     edium_id: 1,
//!     name: "status".to_string(),
//!     creation_date: "2021-05-01T12:00:00".to_string(),
//!     todo: None,
//!     versions: vec![Version {
//!         id: 10,
//!         element_id: 1,
//!         creation_date: "2021-05-01T12:00:00".to_string(),
//!         last: true,
//!         value_type: ValueType::Str,
//!         value_json: json!("draft"),
//!     }],
//! };
//!
//! assert_eq!(
//!     element.current_value().unwrap(),
//!     Some(TypedValue::Str("draft".to_string()))
//! );
//! ```

use crate::models::{parse_timestamp, ElementId, EdiumId, TypedValue, ValidationError, ValueType, VersionId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One historical value of an element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Version {
    pub id: VersionId,
    pub element_id: ElementId,
    pub creation_date: String,
    /// True for the single current version of the element
    pub last: bool,
    pub value_type: ValueType,
    /// Runtime shape must match `value_type`
    #[serde(default)]
    pub value_json: serde_json::Value,
}

impl Version {
    /// Decode the `(value_type, value_json)` pair into a [`TypedValue`]
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::ValueShapeMismatch` if the server sent a value whose
    /// JSON shape does not match its declared type.
    pub fn typed_value(&self) -> Result<TypedValue, ValidationError> {
        TypedValue::from_json(self.value_type, &self.value_json)
    }

    /// Parsed creation timestamp, if the server string is a recognised format
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.creation_date)
    }
}

/// A named attribute inside an edium
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub edium_id: EdiumId,
    /// Unique within the edium (checked client-side before creation)
    pub name: String,
    pub creation_date: String,
    #[serde(default)]
    pub todo: Option<bool>,
    #[serde(default)]
    pub versions: Vec<Version>,
}

impl Element {
    /// Read-only view over the element's versions
    pub fn chain(&self) -> VersionChain<'_> {
        VersionChain::new(&self.versions)
    }

    /// The version flagged `last`, if any
    pub fn current_version(&self) -> Option<&Version> {
        self.chain().current()
    }

    /// The current value, `Ok(None)` when the element has no version yet
    pub fn current_value(&self) -> Result<Option<TypedValue>, ValidationError> {
        self.chain().current_value()
    }

    /// Parsed creation timestamp
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.creation_date)
    }
}

/// Read-only view deriving the current value from a list of versions
#[derive(Debug, Clone, Copy)]
pub struct VersionChain<'a> {
    versions: &'a [Version],
}

impl<'a> VersionChain<'a> {
    pub fn new(versions: &'a [Version]) -> Self {
        Self { versions }
    }

    /// First version flagged `last`
    ///
    /// A chain that violates the one-`last` invariant still yields its first flagged
    /// version here; use [`VersionChain::check`] to detect the violation.
    pub fn current(&self) -> Option<&'a Version> {
        self.versions.iter().find(|version| version.last)
    }

    /// Value of the current version, `Ok(None)` for "no version"
    pub fn current_value(&self) -> Result<Option<TypedValue>, ValidationError> {
        self.current().map(Version::typed_value).transpose()
    }

    /// Type of the current version, `None` for "no version"
    pub fn current_type(&self) -> Option<ValueType> {
        self.current().map(|version| version.value_type)
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Versions ordered oldest first (creation timestamp, then id)
    pub fn history(&self) -> Vec<&'a Version> {
        let mut history: Vec<&Version> = self.versions.iter().collect();
        history.sort_by_key(|version| (version.created_at(), version.id));
        history
    }

    /// Verify the one-`last` invariant
    ///
    /// Zero flagged versions is accepted (the element has no version yet, or the server
    /// returned a partial projection).
    pub fn check(&self) -> Result<(), ValidationError> {
        let flagged: Vec<&Version> = self.versions.iter().filter(|v| v.last).collect();
        if flagged.len() > 1 {
            return Err(ValidationError::MultipleCurrentVersions {
                element_id: flagged[0].element_id,
                count: flagged.len(),
            });
        }
        Ok(())
    }
}

/// Body of `POST /element/{id}/version`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionCreate {
    pub value_type: ValueType,
    pub value_json: serde_json::Value,
}

impl From<&TypedValue> for VersionCreate {
    fn from(value: &TypedValue) -> Self {
        Self {
            value_type: value.value_type(),
            value_json: value.to_json(),
        }
    }
}

/// Body of `POST /edium/{id}/element`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementCreate {
    pub name: String,
    pub version: VersionCreate,
}

impl ElementCreate {
    pub fn new(name: impl Into<String>, value: &TypedValue) -> Self {
        Self {
            name: name.into(),
            version: VersionCreate::from(value),
        }
    }
}

/// One `[name, count]` entry of the most-used element names statistic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementNameUsage(pub String, pub u64);

impl ElementNameUsage {
    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn count(&self) -> u64 {
        self.1
    }
}
