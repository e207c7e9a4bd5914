//! Pending Element Reconciler
//!
//! Elements created by the user are staged locally until the server confirms them.
//! Pending drafts are keyed by name, since they have no id yet, and element names are
//! unique within an edium. Every refreshed confirmed list retires the drafts whose name
//! now appears in it:
//!
//! ```text
//! P' = P \ names(C)
//! ```
//!
//! Retained drafts keep their creation order and are rendered after the confirmed
//! elements. The whole list is cleared when the active edium changes.
//!
//! # Examples
//!
//! ```rust
//! use densedia_core::services::PendingElements;
//!
//! let mut pending = PendingElements::default();
//! pending.set_active_edium(Some(1));
//! pending.stage("owner", None, &[]).unwrap();
//!
//! // A second draft with the same name would be indistinguishable once confirmed
//! assert!(!pending.is_new_element_name_valid("owner", &[]));
//! ```

use crate::models::{EdiumId, Element, TypedValue};
use crate::services::StagingError;
use std::collections::HashSet;

/// A client-staged element waiting for the create request to be confirmed
#[derive(Debug, Clone, PartialEq)]
pub struct PendingElement {
    pub name: String,
    /// Value the draft's edit session opens with; `None` until a type is picked
    pub draft: Option<TypedValue>,
}

/// One rendered row of the element list
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementRow<'a> {
    Confirmed(&'a Element),
    Pending(&'a PendingElement),
}

impl<'a> ElementRow<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            ElementRow::Confirmed(element) => &element.name,
            ElementRow::Pending(pending) => &pending.name,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ElementRow::Pending(_))
    }
}

/// Staging list of element drafts for the active edium
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingElements {
    edium: Option<EdiumId>,
    items: Vec<PendingElement>,
}

impl PendingElements {
    pub fn active_edium(&self) -> Option<EdiumId> {
        self.edium
    }

    /// Scope the list to `edium`, dropping every draft if it changed
    ///
    /// Returns true if drafts were discarded.
    pub fn set_active_edium(&mut self, edium: Option<EdiumId>) -> bool {
        if self.edium == edium {
            return false;
        }
        self.edium = edium;
        let discarded = !self.items.is_empty();
        if discarded {
            tracing::debug!(
                "Active edium changed to {:?}, discarding {} pending element(s)",
                edium,
                self.items.len()
            );
        }
        self.items.clear();
        discarded
    }

    /// Validity gate for a new element name
    ///
    /// # Errors
    ///
    /// - `StagingError::EmptyName` for an empty or blank name
    /// - `StagingError::AlreadyConfirmed` when a confirmed element has the name
    /// - `StagingError::AlreadyPending` when a draft already has the name
    pub fn check_new_name(&self, name: &str, confirmed: &[Element]) -> Result<(), StagingError> {
        if name.trim().is_empty() {
            return Err(StagingError::EmptyName);
        }
        if confirmed.iter().any(|element| element.name == name) {
            return Err(StagingError::already_confirmed(name));
        }
        if self.contains(name) {
            return Err(StagingError::already_pending(name));
        }
        Ok(())
    }

    pub fn is_new_element_name_valid(&self, name: &str, confirmed: &[Element]) -> bool {
        self.check_new_name(name, confirmed).is_ok()
    }

    /// Stage a new draft at the end of the list
    ///
    /// # Errors
    ///
    /// `StagingError::NoActiveEdium` without an active edium, otherwise whatever
    /// [`PendingElements::check_new_name`] rejects.
    pub fn stage(
        &mut self,
        name: impl Into<String>,
        draft: Option<TypedValue>,
        confirmed: &[Element],
    ) -> Result<&PendingElement, StagingError> {
        if self.edium.is_none() {
            return Err(StagingError::NoActiveEdium);
        }
        let name = name.into();
        self.check_new_name(&name, confirmed)?;

        self.items.push(PendingElement { name, draft });
        let index = self.items.len() - 1;
        Ok(&self.items[index])
    }

    /// Remove a draft explicitly
    pub fn cancel(&mut self, name: &str) -> Option<PendingElement> {
        let index = self.items.iter().position(|item| item.name == name)?;
        Some(self.items.remove(index))
    }

    /// Retire every draft now represented in `confirmed`
    ///
    /// Returns the retired drafts in their creation order.
    pub fn reconcile(&mut self, confirmed: &[Element]) -> Vec<PendingElement> {
        let confirmed_names: HashSet<&str> =
            confirmed.iter().map(|element| element.name.as_str()).collect();

        let (retired, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|item| confirmed_names.contains(item.name.as_str()));
        self.items = kept;

        if !retired.is_empty() {
            tracing::debug!(
                "Reconciled {} pending element(s), {} still pending",
                retired.len(),
                self.items.len()
            );
        }
        retired
    }

    /// Confirmed elements first, then the drafts in creation order
    pub fn rows<'a>(&'a self, confirmed: &'a [Element]) -> Vec<ElementRow<'a>> {
        confirmed
            .iter()
            .map(ElementRow::Confirmed)
            .chain(self.items.iter().map(ElementRow::Pending))
            .collect()
    }

    /// Names used by confirmed elements or drafts
    pub fn taken_names<'a>(&'a self, confirmed: &'a [Element]) -> HashSet<&'a str> {
        confirmed
            .iter()
            .map(|element| element.name.as_str())
            .chain(self.items.iter().map(|item| item.name.as_str()))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&PendingElement> {
        self.items.iter().find(|item| item.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingElement> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(id: i64, name: &str) -> Element {
        Element {
            id,
            edium_id: 1,
            name: name.to_string(),
            creation_date: "2021-05-01T12:00:00".to_string(),
            todo: None,
            versions: Vec::new(),
        }
    }

    fn staged(names: &[&str]) -> PendingElements {
        let mut pending = PendingElements::default();
        pending.set_active_edium(Some(1));
        for name in names {
            pending.stage(*name, None, &[]).unwrap();
        }
        pending
    }

    fn names(pending: &PendingElements) -> Vec<&str> {
        pending.iter().map(|item| item.name.as_str()).collect()
    }

    #[test]
    fn test_validity_gate() {
        let pending = staged(&["owner"]);
        let confirmed = vec![element(1, "status")];

        assert_eq!(
            pending.check_new_name("", &confirmed),
            Err(StagingError::EmptyName)
        );
        assert_eq!(
            pending.check_new_name("status", &confirmed),
            Err(StagingError::already_confirmed("status"))
        );
        assert_eq!(
            pending.check_new_name("owner", &confirmed),
            Err(StagingError::already_pending("owner"))
        );
        assert!(pending.is_new_element_name_valid("budget", &confirmed));
    }

    #[test]
    fn test_stage_requires_active_edium() {
        let mut pending = PendingElements::default();
        assert_eq!(
            pending.stage("owner", None, &[]),
            Err(StagingError::NoActiveEdium)
        );
    }

    #[test]
    fn test_reconcile_is_set_difference_preserving_order() {
        let universe = ["a", "b", "c", "d"];

        // Every subset of the universe as pending, against every subset as confirmed
        for pending_mask in 0u8..16 {
            for confirmed_mask in 0u8..16 {
                let pending_names: Vec<&str> = universe
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| (pending_mask & (1 << i)) != 0)
                    .map(|(_, name)| *name)
                    .collect();
                let confirmed: Vec<Element> = universe
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| (confirmed_mask & (1 << i)) != 0)
                    .map(|(i, name)| element(i as i64, name))
                    .collect();

                let mut pending = staged(&pending_names);
                let retired = pending.reconcile(&confirmed);

                let expected: Vec<&str> = pending_names
                    .iter()
                    .copied()
                    .filter(|name| !confirmed.iter().any(|e| e.name == *name))
                    .collect();
                assert_eq!(names(&pending), expected);
                assert_eq!(retired.len() + expected.len(), pending_names.len());

                let rows = pending.rows(&confirmed);
                let row_names: HashSet<&str> = rows.iter().map(|row| row.name()).collect();
                assert_eq!(row_names.len(), rows.len(), "duplicate row rendered");
            }
        }
    }

    #[test]
    fn test_rows_put_confirmed_first() {
        let pending = staged(&["zeta", "alpha"]);
        let confirmed = vec![element(1, "status")];

        let rows = pending.rows(&confirmed);
        assert_eq!(
            rows.iter().map(|row| row.name()).collect::<Vec<_>>(),
            vec!["status", "zeta", "alpha"]
        );
        assert!(!rows[0].is_pending());
        assert!(rows[1].is_pending());
    }

    #[test]
    fn test_edium_change_clears_drafts() {
        let mut pending = staged(&["owner", "budget"]);
        assert!(!pending.set_active_edium(Some(1)));
        assert_eq!(pending.len(), 2);

        assert!(pending.set_active_edium(Some(2)));
        assert!(pending.is_empty());
        assert_eq!(pending.active_edium(), Some(2));
    }

    #[test]
    fn test_cancel_and_taken_names() {
        let mut pending = staged(&["owner", "budget"]);
        assert_eq!(pending.cancel("owner").map(|p| p.name), Some("owner".to_string()));
        assert_eq!(pending.cancel("owner"), None);

        let confirmed = vec![element(1, "status")];
        let taken = pending.taken_names(&confirmed);
        assert!(taken.contains("status"));
        assert!(taken.contains("budget"));
        assert!(!taken.contains("owner"));
    }
}
