//! Edia
//!
//! An edium is a titled, kinded container for elements, comparable to a topic or a
//! project folder. The `kind` drives the element-name suggestions.

use crate::models::{parse_timestamp, EdiumId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edium {
    pub id: EdiumId,
    pub title: String,
    #[serde(default)]
    pub kind: String,
    pub creation_date: String,
}

impl Edium {
    /// Parsed creation timestamp
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.creation_date)
    }

    /// The kind, or `None` when it is empty
    pub fn kind(&self) -> Option<&str> {
        Some(self.kind.as_str()).filter(|kind| !kind.is_empty())
    }
}

/// Body of `POST /edium`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdiumCreate {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Body of `PATCH /edium/{id}`; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdiumUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Title/kind form used both to create an edium and to modify the selected one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdiumForm {
    pub title: String,
    pub kind: String,
}

impl EdiumForm {
    /// Seed the form from the selected edium, or blank when nothing is selected
    pub fn for_edium(edium: Option<&Edium>) -> Self {
        edium
            .map(|edium| Self {
                title: edium.title.clone(),
                kind: edium.kind.clone(),
            })
            .unwrap_or_default()
    }

    pub fn to_create(&self) -> EdiumCreate {
        EdiumCreate {
            title: self.title.clone(),
            kind: Some(self.kind.clone()),
        }
    }

    pub fn to_update(&self) -> EdiumUpdate {
        EdiumUpdate {
            title: Some(self.title.clone()),
            kind: Some(self.kind.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn notes() -> Edium {
        Edium {
            id: 3,
            title: "Notes".to_string(),
            kind: "project".to_string(),
            creation_date: "2021-05-01T10:00:00".to_string(),
        }
    }

    #[test]
    fn test_form_seeding() {
        assert_eq!(EdiumForm::for_edium(None), EdiumForm::default());

        let form = EdiumForm::for_edium(Some(&notes()));
        assert_eq!(form.title, "Notes");
        assert_eq!(form.kind, "project");
        assert_eq!(form.to_update().title.as_deref(), Some("Notes"));
    }

    #[test]
    fn test_update_omits_absent_fields() {
        let update = EdiumUpdate {
            title: Some("Renamed".to_string()),
            kind: None,
        };
        assert_eq!(serde_json::to_value(update).unwrap(), json!({"title": "Renamed"}));
    }

    #[test]
    fn test_empty_kind_is_no_kind() {
        let mut edium = notes();
        assert_eq!(edium.kind(), Some("project"));
        edium.kind.clear();
        assert_eq!(edium.kind(), None);
    }
}
