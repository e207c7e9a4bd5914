//! In-Memory EdiaApi
//!
//! [`MemoryApi`] keeps edia, elements, versions and links in process memory and
//! enforces the same rules as the service: non-empty titles, element names unique per
//! edium, values matching their declared type, a single `last` version per element,
//! and cascading deletes. It backs the test suites and offline use.
//!
//! A single failure can be injected with [`MemoryApi::fail_next`]; the next call of any
//! method returns it instead of running.

use crate::api::{ApiError, EdiaApi};
use crate::models::{
    Edium, EdiumCreate, EdiumId, EdiumUpdate, Element, ElementCreate, ElementId,
    ElementNameUsage, Link, LinkCreate, LinkId, TypedValue, Version, VersionCreate, VersionId,
};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::{Mutex, RwLock};

const UNPROCESSABLE: u16 = 422;

fn now() -> String {
    chrono::Utc::now()
        .naive_utc()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

#[derive(Debug, Default)]
struct MemoryState {
    next_edium_id: EdiumId,
    next_element_id: ElementId,
    next_version_id: VersionId,
    next_link_id: LinkId,
    edia: BTreeMap<EdiumId, Edium>,
    /// Elements stored without versions; versions live in `versions`
    elements: BTreeMap<ElementId, Element>,
    versions: Vec<Version>,
    links: BTreeMap<LinkId, Link>,
}

impl MemoryState {
    fn allocate(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }

    fn edium(&self, id: EdiumId) -> Result<&Edium, ApiError> {
        self.edia
            .get(&id)
            .ok_or_else(|| ApiError::not_found(format!("Edium {} not found", id)))
    }

    fn element(&self, id: ElementId) -> Result<&Element, ApiError> {
        self.elements
            .get(&id)
            .ok_or_else(|| ApiError::not_found(format!("Element {} not found", id)))
    }

    fn last_version(&self, element_id: ElementId) -> Option<&Version> {
        self.versions
            .iter()
            .find(|version| version.element_id == element_id && version.last)
    }

    /// Element with only its last version populated
    fn with_last_version(&self, element: &Element) -> Element {
        let mut element = element.clone();
        element.versions = self.last_version(element.id).cloned().into_iter().collect();
        element
    }

    fn push_version(&mut self, element_id: ElementId, payload: &VersionCreate) -> Version {
        for version in self
            .versions
            .iter_mut()
            .filter(|version| version.element_id == element_id)
        {
            version.last = false;
        }

        let version = Version {
            id: Self::allocate(&mut self.next_version_id),
            element_id,
            creation_date: now(),
            last: true,
            value_type: payload.value_type,
            value_json: payload.value_json.clone(),
        };
        self.versions.push(version.clone());
        version
    }

    fn remove_element(&mut self, id: ElementId) -> Option<Element> {
        let element = self.elements.remove(&id)?;
        let removed = self.with_last_version(&element);
        self.versions.retain(|version| version.element_id != id);
        Some(removed)
    }
}

fn check_value(payload: &VersionCreate) -> Result<(), ApiError> {
    TypedValue::from_json(payload.value_type, &payload.value_json)
        .map(|_| ())
        .map_err(|e| ApiError::application(UNPROCESSABLE, e.to_string()))
}

fn check_title(title: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::application(UNPROCESSABLE, "Title cannot be empty"));
    }
    Ok(())
}

/// In-memory implementation of [`EdiaApi`]
#[derive(Debug, Default)]
pub struct MemoryApi {
    state: RwLock<MemoryState>,
    next_failure: Mutex<Option<ApiError>>,
}

impl MemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next call, whichever it is, fail with `error`
    pub async fn fail_next(&self, error: ApiError) {
        *self.next_failure.lock().await = Some(error);
    }

    async fn take_failure(&self) -> Result<(), ApiError> {
        match self.next_failure.lock().await.take() {
            Some(error) => {
                tracing::debug!("MemoryApi returning injected failure: {}", error);
                Err(error)
            }
            None => Ok(()),
        }
    }

    /// Full version history of an element, oldest first
    pub async fn element_history(&self, element_id: ElementId) -> Result<Vec<Version>, ApiError> {
        self.take_failure().await?;
        let state = self.state.read().await;
        state.element(element_id)?;
        Ok(state
            .versions
            .iter()
            .filter(|version| version.element_id == element_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl EdiaApi for MemoryApi {
    async fn list_edia(&self) -> Result<Vec<Edium>, ApiError> {
        self.take_failure().await?;
        let state = self.state.read().await;
        Ok(state.edia.values().cloned().collect())
    }

    async fn create_edium(&self, payload: &EdiumCreate) -> Result<Edium, ApiError> {
        self.take_failure().await?;
        check_title(&payload.title)?;

        let mut state = self.state.write().await;
        let edium = Edium {
            id: MemoryState::allocate(&mut state.next_edium_id),
            title: payload.title.clone(),
            kind: payload.kind.clone().unwrap_or_default(),
            creation_date: now(),
        };
        state.edia.insert(edium.id, edium.clone());
        tracing::debug!("Created edium {} '{}'", edium.id, edium.title);
        Ok(edium)
    }

    async fn update_edium(&self, id: EdiumId, payload: &EdiumUpdate) -> Result<Edium, ApiError> {
        self.take_failure().await?;
        if let Some(title) = &payload.title {
            check_title(title)?;
        }

        let mut state = self.state.write().await;
        let edium = state
            .edia
            .get_mut(&id)
            .ok_or_else(|| ApiError::not_found(format!("Edium {} not found", id)))?;
        if let Some(title) = &payload.title {
            edium.title = title.clone();
        }
        if let Some(kind) = &payload.kind {
            edium.kind = kind.clone();
        }
        Ok(edium.clone())
    }

    async fn delete_edium(&self, id: EdiumId) -> Result<Edium, ApiError> {
        self.take_failure().await?;
        let mut state = self.state.write().await;
        let edium = state
            .edia
            .remove(&id)
            .ok_or_else(|| ApiError::not_found(format!("Edium {} not found", id)))?;

        let element_ids: Vec<ElementId> = state
            .elements
            .values()
            .filter(|element| element.edium_id == id)
            .map(|element| element.id)
            .collect();
        for element_id in element_ids {
            state.remove_element(element_id);
        }
        state
            .links
            .retain(|_, link| link.start != id && link.end != id);

        tracing::debug!("Deleted edium {} with its elements and links", id);
        Ok(edium)
    }

    async fn list_elements(&self, edium_id: EdiumId) -> Result<Vec<Element>, ApiError> {
        self.take_failure().await?;
        let state = self.state.read().await;
        state.edium(edium_id)?;
        Ok(state
            .elements
            .values()
            .filter(|element| element.edium_id == edium_id)
            .map(|element| state.with_last_version(element))
            .collect())
    }

    async fn create_element(
        &self,
        edium_id: EdiumId,
        payload: &ElementCreate,
    ) -> Result<Element, ApiError> {
        self.take_failure().await?;
        if payload.name.trim().is_empty() {
            return Err(ApiError::application(
                UNPROCESSABLE,
                "Element name cannot be empty",
            ));
        }
        check_value(&payload.version)?;

        let mut state = self.state.write().await;
        state.edium(edium_id)?;
        if state
            .elements
            .values()
            .any(|element| element.edium_id == edium_id && element.name == payload.name)
        {
            return Err(ApiError::application(
                UNPROCESSABLE,
                format!("Element '{}' already exists in this edium", payload.name),
            ));
        }

        let element = Element {
            id: MemoryState::allocate(&mut state.next_element_id),
            edium_id,
            name: payload.name.clone(),
            creation_date: now(),
            todo: None,
            versions: Vec::new(),
        };
        state.elements.insert(element.id, element.clone());
        state.push_version(element.id, &payload.version);

        tracing::debug!("Created element {} '{}'", element.id, element.name);
        Ok(state.with_last_version(&element))
    }

    async fn delete_element(&self, id: ElementId) -> Result<Element, ApiError> {
        self.take_failure().await?;
        let mut state = self.state.write().await;
        state
            .remove_element(id)
            .ok_or_else(|| ApiError::not_found(format!("Element {} not found", id)))
    }

    async fn create_version(
        &self,
        element_id: ElementId,
        payload: &VersionCreate,
    ) -> Result<Version, ApiError> {
        self.take_failure().await?;
        check_value(payload)?;

        let mut state = self.state.write().await;
        state.element(element_id)?;
        let version = state.push_version(element_id, payload);
        tracing::debug!(
            "Element {} now at version {} ({})",
            element_id,
            version.id,
            version.value_type
        );
        Ok(version)
    }

    async fn list_links(&self, edium_id: EdiumId) -> Result<Vec<Link>, ApiError> {
        self.take_failure().await?;
        let state = self.state.read().await;
        state.edium(edium_id)?;
        Ok(state
            .links
            .values()
            .filter(|link| link.start == edium_id || link.end == edium_id)
            .cloned()
            .collect())
    }

    async fn create_link(&self, payload: &LinkCreate) -> Result<Link, ApiError> {
        self.take_failure().await?;
        let mut state = self.state.write().await;
        state.edium(payload.start)?;
        state.edium(payload.end)?;

        let link = Link {
            id: MemoryState::allocate(&mut state.next_link_id),
            start: payload.start,
            end: payload.end,
            directed: payload.directed,
            label: payload.label.clone(),
        };
        state.links.insert(link.id, link.clone());
        Ok(link)
    }

    async fn delete_link(&self, id: LinkId) -> Result<Link, ApiError> {
        self.take_failure().await?;
        let mut state = self.state.write().await;
        state
            .links
            .remove(&id)
            .ok_or_else(|| ApiError::not_found(format!("Link {} not found", id)))
    }

    async fn most_used_element_names(
        &self,
        kind: &str,
    ) -> Result<Vec<ElementNameUsage>, ApiError> {
        self.take_failure().await?;
        let state = self.state.read().await;

        let mut counts: HashMap<&str, u64> = HashMap::new();
        for element in state.elements.values() {
            let same_kind = state
                .edia
                .get(&element.edium_id)
                .is_some_and(|edium| edium.kind == kind);
            if same_kind {
                *counts.entry(element.name.as_str()).or_default() += 1;
            }
        }

        let mut ranked: Vec<ElementNameUsage> = counts
            .into_iter()
            .map(|(name, count)| ElementNameUsage(name.to_string(), count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ValueType, VersionChain};
    use serde_json::json;

    async fn edium(api: &MemoryApi, title: &str, kind: &str) -> Edium {
        api.create_edium(&EdiumCreate {
            title: title.to_string(),
            kind: Some(kind.to_string()),
        })
        .await
        .unwrap()
    }

    fn str_value(text: &str) -> TypedValue {
        TypedValue::Str(text.to_string())
    }

    #[tokio::test]
    async fn test_create_and_update_edium() {
        let api = MemoryApi::new();
        let notes = edium(&api, "Notes", "project").await;
        assert_eq!(notes.id, 1);
        assert_eq!(notes.kind(), Some("project"));

        let renamed = api
            .update_edium(
                notes.id,
                &EdiumUpdate {
                    title: Some("Renamed".to_string()),
                    kind: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.title, "Renamed");
        assert_eq!(renamed.kind, "project");

        let err = api
            .create_edium(&EdiumCreate {
                title: "  ".to_string(),
                kind: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(422));
    }

    #[tokio::test]
    async fn test_new_version_moves_last_flag() {
        let api = MemoryApi::new();
        let notes = edium(&api, "Notes", "project").await;
        let element = api
            .create_element(notes.id, &ElementCreate::new("status", &str_value("draft")))
            .await
            .unwrap();

        api.create_version(element.id, &VersionCreate::from(&str_value("final")))
            .await
            .unwrap();

        let history = api.element_history(element.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(VersionChain::new(&history).check().is_ok());
        assert_eq!(
            VersionChain::new(&history).current_value().unwrap(),
            Some(str_value("final"))
        );

        // Listing carries only the last version
        let listed = api.list_elements(notes.id).await.unwrap();
        assert_eq!(listed[0].versions.len(), 1);
        assert_eq!(listed[0].current_value().unwrap(), Some(str_value("final")));
    }

    #[tokio::test]
    async fn test_element_rules() {
        let api = MemoryApi::new();
        let notes = edium(&api, "Notes", "project").await;
        api.create_element(notes.id, &ElementCreate::new("owner", &TypedValue::Null))
            .await
            .unwrap();

        let duplicate = api
            .create_element(notes.id, &ElementCreate::new("owner", &TypedValue::Null))
            .await
            .unwrap_err();
        assert_eq!(duplicate.status(), Some(422));

        let mismatched = ElementCreate {
            name: "count".to_string(),
            version: VersionCreate {
                value_type: ValueType::Int,
                value_json: json!("three"),
            },
        };
        let err = api.create_element(notes.id, &mismatched).await.unwrap_err();
        assert_eq!(err.status(), Some(422));

        let missing = api
            .create_element(99, &ElementCreate::new("x", &TypedValue::Null))
            .await
            .unwrap_err();
        assert_eq!(missing.status(), Some(404));
    }

    #[tokio::test]
    async fn test_delete_edium_cascades() {
        let api = MemoryApi::new();
        let notes = edium(&api, "Notes", "project").await;
        let other = edium(&api, "Other", "project").await;
        let element = api
            .create_element(notes.id, &ElementCreate::new("status", &str_value("a")))
            .await
            .unwrap();
        api.create_link(&LinkCreate {
            start: notes.id,
            end: other.id,
            directed: true,
            label: "cites".to_string(),
        })
        .await
        .unwrap();

        let deleted = api.delete_edium(notes.id).await.unwrap();
        assert_eq!(deleted.id, notes.id);
        assert!(api.list_links(other.id).await.unwrap().is_empty());
        assert_eq!(
            api.element_history(element.id).await.unwrap_err().status(),
            Some(404)
        );
    }

    #[tokio::test]
    async fn test_most_used_names_are_ranked_per_kind() {
        let api = MemoryApi::new();
        for title in ["A", "B", "C"] {
            let e = edium(&api, title, "project").await;
            api.create_element(e.id, &ElementCreate::new("status", &TypedValue::Null))
                .await
                .unwrap();
        }
        let b = edium(&api, "D", "project").await;
        api.create_element(b.id, &ElementCreate::new("owner", &TypedValue::Null))
            .await
            .unwrap();
        api.create_element(b.id, &ElementCreate::new("budget", &TypedValue::Null))
            .await
            .unwrap();
        let book = edium(&api, "E", "book").await;
        api.create_element(book.id, &ElementCreate::new("author", &TypedValue::Null))
            .await
            .unwrap();

        let ranked = api.most_used_element_names("project").await.unwrap();
        assert_eq!(
            ranked,
            vec![
                ElementNameUsage("status".to_string(), 3),
                ElementNameUsage("budget".to_string(), 1),
                ElementNameUsage("owner".to_string(), 1),
            ]
        );
    }

    #[tokio::test]
    async fn test_injected_failure_is_one_shot() {
        let api = MemoryApi::new();
        api.fail_next(ApiError::transport("connection refused")).await;

        assert_eq!(
            api.list_edia().await,
            Err(ApiError::transport("connection refused"))
        );
        assert!(api.list_edia().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deletes_return_resource() {
        let api = MemoryApi::new();
        let a = edium(&api, "A", "").await;
        let element = api
            .create_element(a.id, &ElementCreate::new("x", &TypedValue::Bool(true)))
            .await
            .unwrap();
        let link = api
            .create_link(&LinkCreate {
                start: a.id,
                end: a.id,
                directed: false,
                label: String::new(),
            })
            .await
            .unwrap();

        assert_eq!(api.delete_element(element.id).await.unwrap().name, "x");
        assert_eq!(api.delete_link(link.id).await.unwrap(), link);
        assert_eq!(api.delete_link(link.id).await.unwrap_err().status(), Some(404));
    }
}
