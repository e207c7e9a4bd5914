//! Edium Workspace - Composition Layer
//!
//! [`EdiumWorkspace`] ties the pieces together for one user looking at one edium at a
//! time: the cached edia list, the confirmed elements and links of the active edium,
//! the pending drafts, one [`EditSession`] per displayed row, the link draft and the
//! name suggestions. It talks to the service exclusively through `Arc<dyn EdiaApi>`.
//!
//! # Refresh Semantics
//!
//! Every refreshed element list:
//!
//! 1. retires pending drafts now confirmed (see [`PendingElements::reconcile`])
//! 2. drops the sessions whose row disappeared
//! 3. reopens the sessions that were submitted, or whose backing current value changed
//! 4. opens sessions for new rows
//!
//! Untouched in-progress edits survive a refresh.
//!
//! # Concurrency
//!
//! The workspace is driven through `&mut self`, one command at a time. Saves of the same
//! attribute are not serialized against each other; the last response to arrive wins.
//!
//! # Examples
//!
//! ```rust
//! use densedia_core::api::MemoryApi;
//! use densedia_core::models::{EdiumForm, TypedValue, ValueType};
//! use densedia_core::operations::EditCommand;
//! use densedia_core::services::EdiumWorkspace;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut workspace = EdiumWorkspace::new(Arc::new(MemoryApi::new()));
//!     let form = EdiumForm { title: "Notes".to_string(), kind: "project".to_string() };
//!     let notes = workspace.submit_edium_form(&form).await?;
//!     workspace.select_edium(Some(notes.id)).await?;
//!
//!     let key = workspace.stage_element("status")?;
//!     workspace.edit(&key, EditCommand::ChangeType(ValueType::Str)).await?;
//!     workspace.edit(&key, EditCommand::EditRawText("draft".to_string())).await?;
//!     workspace.edit(&key, EditCommand::Save).await?;
//!
//!     assert_eq!(workspace.elements().len(), 1);
//!     assert!(workspace.pending().is_empty());
//!     Ok(())
//! }
//! ```

use crate::api::EdiaApi;
use crate::models::{
    Edium, EdiumForm, EdiumId, Element, ElementCreate, ElementId, ElementNameUsage, Link,
    LinkDraft, LinkId, LinkView, TypedValue, VersionCreate,
};
use crate::operations::{EditCommand, EditOutcome, EditSession, SessionStatus};
use crate::services::{ElementRow, ElementSuggestions, PendingElements, StagingError, WorkspaceError};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Identity of a displayed row, and of its edit session
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SessionKey {
    /// A confirmed element
    Element(ElementId),
    /// A pending draft, keyed by its name
    Pending(String),
}

impl SessionKey {
    pub fn for_row(row: &ElementRow<'_>) -> Self {
        match row {
            ElementRow::Confirmed(element) => SessionKey::Element(element.id),
            ElementRow::Pending(pending) => SessionKey::Pending(pending.name.clone()),
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionKey::Element(id) => write!(f, "element {}", id),
            SessionKey::Pending(name) => write!(f, "pending element '{}'", name),
        }
    }
}

/// State of the edia browser and of the active edium
pub struct EdiumWorkspace {
    api: Arc<dyn EdiaApi>,
    edia: Vec<Edium>,
    active: Option<EdiumId>,
    elements: Vec<Element>,
    links: Vec<Link>,
    pending: PendingElements,
    sessions: HashMap<SessionKey, EditSession>,
    link_draft: LinkDraft,
    suggestions: ElementSuggestions,
}

impl EdiumWorkspace {
    pub fn new(api: Arc<dyn EdiaApi>) -> Self {
        Self {
            api,
            edia: Vec::new(),
            active: None,
            elements: Vec::new(),
            links: Vec::new(),
            pending: PendingElements::default(),
            sessions: HashMap::new(),
            link_draft: LinkDraft::default(),
            suggestions: ElementSuggestions::default(),
        }
    }

    //
    // EDIA
    //

    pub fn edia(&self) -> &[Edium] {
        &self.edia
    }

    pub fn active_id(&self) -> Option<EdiumId> {
        self.active
    }

    pub fn active_edium(&self) -> Option<&Edium> {
        let id = self.active?;
        self.edia.iter().find(|edium| edium.id == id)
    }

    /// Reload the edia list; deselects the active edium if it no longer exists
    pub async fn refresh_edia(&mut self) -> Result<(), WorkspaceError> {
        self.edia = self.api.list_edia().await?;
        tracing::debug!("Loaded {} edia", self.edia.len());

        if let Some(id) = self.active {
            if !self.edia.iter().any(|edium| edium.id == id) {
                tracing::info!("Active edium {} disappeared, deselecting", id);
                self.reset_scope(None);
                self.suggestions.set_kind(None);
            }
        }
        Ok(())
    }

    /// Make `id` the active edium and load its contents
    ///
    /// Switching to another edium discards pending drafts, edit sessions and the link
    /// draft of the previous one.
    pub async fn select_edium(&mut self, id: Option<EdiumId>) -> Result<(), WorkspaceError> {
        if self.active != id {
            tracing::info!("Selecting edium {:?}", id);
            self.reset_scope(id);
        }
        self.refresh_edium().await
    }

    fn reset_scope(&mut self, id: Option<EdiumId>) {
        self.active = id;
        self.pending.set_active_edium(id);
        self.sessions.clear();
        self.link_draft = LinkDraft::default();
        self.elements.clear();
        self.links.clear();
    }

    /// Form seeded from the active edium, blank when none is selected
    pub fn edium_form(&self) -> EdiumForm {
        EdiumForm::for_edium(self.active_edium())
    }

    /// Create an edium when none is selected, patch the active one otherwise
    pub async fn submit_edium_form(&mut self, form: &EdiumForm) -> Result<Edium, WorkspaceError> {
        let edium = match self.active {
            Some(id) => self.api.update_edium(id, &form.to_update()).await?,
            None => self.api.create_edium(&form.to_create()).await?,
        };
        tracing::debug!("Saved edium {} '{}'", edium.id, edium.title);

        self.refresh_edia().await?;
        if self.active.is_some() {
            self.refresh_suggestions().await?;
        }
        Ok(edium)
    }

    /// Delete the active edium and deselect it
    pub async fn delete_active_edium(&mut self) -> Result<Option<Edium>, WorkspaceError> {
        let Some(id) = self.active else {
            return Ok(None);
        };
        let deleted = self.api.delete_edium(id).await?;
        self.reset_scope(None);
        self.suggestions.set_kind(None);
        self.refresh_edia().await?;
        Ok(Some(deleted))
    }

    /// Reload elements, links and suggestions of the active edium
    pub async fn refresh_edium(&mut self) -> Result<(), WorkspaceError> {
        if self.active.is_none() {
            self.suggestions.set_kind(None);
            return Ok(());
        }
        self.refresh_elements().await?;
        self.refresh_links().await?;
        self.refresh_suggestions().await
    }

    //
    // ELEMENTS
    //

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn pending(&self) -> &PendingElements {
        &self.pending
    }

    /// Confirmed rows followed by pending rows
    pub fn rows(&self) -> Vec<ElementRow<'_>> {
        self.pending.rows(&self.elements)
    }

    pub fn session(&self, key: &SessionKey) -> Option<&EditSession> {
        self.sessions.get(key)
    }

    /// Reload confirmed elements, reconcile drafts and sync sessions
    pub async fn refresh_elements(&mut self) -> Result<(), WorkspaceError> {
        let Some(id) = self.active else {
            return Ok(());
        };
        self.elements = self.api.list_elements(id).await?;
        let retired = self.pending.reconcile(&self.elements);
        tracing::debug!(
            "Edium {}: {} element(s), {} draft(s) confirmed",
            id,
            self.elements.len(),
            retired.len()
        );
        self.sync_sessions();
        Ok(())
    }

    fn sync_sessions(&mut self) {
        let mut live = HashSet::new();

        for element in &self.elements {
            let key = SessionKey::Element(element.id);
            let value = match element.current_value() {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!("Element {} has an unreadable value: {}", element.id, e);
                    continue;
                }
            };

            let stale = self.sessions.get(&key).map_or(true, |session| {
                session.status() == SessionStatus::Submitted || session.initial() != value.as_ref()
            });
            if stale {
                self.sessions.insert(key.clone(), EditSession::open(value));
            }
            live.insert(key);
        }

        for pending in self.pending.iter() {
            let key = SessionKey::Pending(pending.name.clone());
            self.sessions
                .entry(key.clone())
                .or_insert_with(|| EditSession::draft(pending.draft.clone()));
            live.insert(key);
        }

        self.sessions.retain(|key, _| live.contains(key));
    }

    pub fn is_new_element_name_valid(&self, name: &str) -> bool {
        self.pending.is_new_element_name_valid(name, &self.elements)
    }

    /// Stage a new element draft and open its session
    pub fn stage_element(&mut self, name: impl Into<String>) -> Result<SessionKey, WorkspaceError> {
        self.stage_element_with(name, None)
    }

    /// Stage a new element draft pre-filled with `draft`
    ///
    /// The session opens on the draft value with nothing saved yet, so a valid draft can
    /// be saved right away.
    pub fn stage_element_with(
        &mut self,
        name: impl Into<String>,
        draft: Option<TypedValue>,
    ) -> Result<SessionKey, WorkspaceError> {
        let staged = self.pending.stage(name, draft, &self.elements)?;
        let key = SessionKey::Pending(staged.name.clone());
        let session = EditSession::draft(staged.draft.clone());
        self.sessions.insert(key.clone(), session);
        Ok(key)
    }

    /// Apply an edit command to the session of `key`
    ///
    /// Local edits only touch the session. `Save` and `Delete` are forwarded:
    ///
    /// | row       | Save               | Delete            |
    /// |-----------|--------------------|-------------------|
    /// | confirmed | create a version   | delete element    |
    /// | pending   | create the element | cancel the draft  |
    ///
    /// On success the element list is refreshed, except after cancelling a draft, which
    /// never reaches the server. On failure the session resumes editing with its draft
    /// intact and the error is returned.
    pub async fn edit(
        &mut self,
        key: &SessionKey,
        command: EditCommand,
    ) -> Result<Option<EditOutcome>, WorkspaceError> {
        let session = self
            .sessions
            .get_mut(key)
            .ok_or_else(|| WorkspaceError::unknown_session(key.to_string()))?;

        let Some(outcome) = session.apply(command)? else {
            return Ok(None);
        };

        let remote = match self.submit(key, &outcome).await {
            Ok(remote) => remote,
            Err(e) => {
                tracing::warn!("Submitting {} failed: {}", key, e);
                if let Some(session) = self.sessions.get_mut(key) {
                    session.resume();
                }
                return Err(e);
            }
        };

        if remote {
            self.refresh_elements().await?;
        }
        Ok(Some(outcome))
    }

    /// Forward an outcome, returning whether the server was changed
    async fn submit(&mut self, key: &SessionKey, outcome: &EditOutcome) -> Result<bool, WorkspaceError> {
        match (key, outcome) {
            (SessionKey::Element(id), EditOutcome::Save(value)) => {
                let version = self
                    .api
                    .create_version(*id, &VersionCreate::from(value))
                    .await?;
                tracing::debug!("Element {} saved as version {}", id, version.id);
            }
            (SessionKey::Element(id), EditOutcome::Delete) => {
                let element = self.api.delete_element(*id).await?;
                tracing::debug!("Deleted element {} '{}'", element.id, element.name);
            }
            (SessionKey::Pending(name), EditOutcome::Save(value)) => {
                let edium = self.active.ok_or(StagingError::NoActiveEdium)?;
                let element = self
                    .api
                    .create_element(edium, &ElementCreate::new(name.as_str(), value))
                    .await?;
                tracing::debug!("Created element {} '{}'", element.id, element.name);
            }
            (SessionKey::Pending(name), EditOutcome::Delete) => {
                self.pending.cancel(name);
                self.sessions.remove(key);
                tracing::debug!("Cancelled draft '{}'", name);
                return Ok(false);
            }
        }
        Ok(true)
    }

    //
    // LINKS
    //

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub async fn refresh_links(&mut self) -> Result<(), WorkspaceError> {
        let Some(id) = self.active else {
            return Ok(());
        };
        self.links = self.api.list_links(id).await?;
        Ok(())
    }

    /// Every confirmed link as seen from the active edium
    pub fn link_views(&self) -> Result<Vec<LinkView>, WorkspaceError> {
        let Some(id) = self.active else {
            return Ok(Vec::new());
        };
        self.links
            .iter()
            .map(|link| link.view_from(id).map_err(WorkspaceError::from))
            .collect()
    }

    pub fn link_draft(&self) -> &LinkDraft {
        &self.link_draft
    }

    pub fn link_draft_mut(&mut self) -> &mut LinkDraft {
        &mut self.link_draft
    }

    /// Create the drafted link from the active edium and clear the draft
    pub async fn submit_link_draft(&mut self) -> Result<Link, WorkspaceError> {
        let reference = self.active.ok_or(StagingError::NoActiveEdium)?;
        let payload = self.link_draft.lower(reference)?;
        let link = self.api.create_link(&payload).await?;
        tracing::debug!("Created link {} ({} -> {})", link.id, link.start, link.end);

        self.link_draft = LinkDraft::default();
        self.refresh_links().await?;
        Ok(link)
    }

    pub async fn delete_link(&mut self, id: LinkId) -> Result<Link, WorkspaceError> {
        let link = self.api.delete_link(id).await?;
        self.refresh_links().await?;
        Ok(link)
    }

    //
    // SUGGESTIONS
    //

    /// Ranked names not yet used by a confirmed element or a draft
    pub fn suggestions(&self) -> Vec<&ElementNameUsage> {
        self.suggestions
            .filtered(|name| self.is_new_element_name_valid(name))
    }

    /// Refetch suggestions if the active edium's kind changed
    pub async fn refresh_suggestions(&mut self) -> Result<(), WorkspaceError> {
        let kind = self.active_edium().and_then(Edium::kind).map(str::to_string);
        let Some(kind) = self.suggestions.set_kind(kind.as_deref()) else {
            return Ok(());
        };

        match self.api.most_used_element_names(&kind).await {
            Ok(ranked) => {
                self.suggestions.load(&kind, ranked);
                Ok(())
            }
            Err(e) => {
                // Forget the kind so the next refresh fetches again
                self.suggestions = ElementSuggestions::default();
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
#[path = "workspace_test.rs"]
mod workspace_test;
