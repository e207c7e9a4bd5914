//! Element Name Suggestions
//!
//! The service ranks element names by how often they are used in edia of a given kind.
//! Suggestions follow the active edium's kind: a kind change triggers a refetch, no kind
//! means no suggestions, and names already taken by confirmed elements or pending drafts
//! are filtered out while the server ranking order is kept.

use crate::models::ElementNameUsage;

/// Keep the ranked entries whose name is still available, in ranking order
pub fn filter_suggestions<'a, F>(
    ranked: &'a [ElementNameUsage],
    is_available: F,
) -> Vec<&'a ElementNameUsage>
where
    F: Fn(&str) -> bool,
{
    ranked
        .iter()
        .filter(|usage| is_available(usage.name()))
        .collect()
}

/// Ranked names for the current kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementSuggestions {
    kind: Option<String>,
    ranked: Vec<ElementNameUsage>,
}

impl ElementSuggestions {
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// Track a new kind
    ///
    /// Returns the kind to fetch when it changed to a non-empty value. Any change drops
    /// the loaded ranking.
    pub fn set_kind(&mut self, kind: Option<&str>) -> Option<String> {
        let kind = kind.filter(|kind| !kind.is_empty());
        if self.kind.as_deref() == kind {
            return None;
        }

        self.kind = kind.map(str::to_string);
        self.ranked.clear();
        self.kind.clone()
    }

    /// Store a ranking fetched for `kind`
    ///
    /// Returns false, discarding the ranking, when `kind` is no longer current.
    pub fn load(&mut self, kind: &str, ranked: Vec<ElementNameUsage>) -> bool {
        if self.kind.as_deref() != Some(kind) {
            tracing::debug!(
                "Discarding suggestions for stale kind '{}' (current: {:?})",
                kind,
                self.kind
            );
            return false;
        }
        self.ranked = ranked;
        true
    }

    pub fn ranked(&self) -> &[ElementNameUsage] {
        &self.ranked
    }

    /// Ranked names passing `is_available`
    pub fn filtered<F>(&self, is_available: F) -> Vec<&ElementNameUsage>
    where
        F: Fn(&str) -> bool,
    {
        filter_suggestions(&self.ranked, is_available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranking() -> Vec<ElementNameUsage> {
        vec![
            ElementNameUsage("status".to_string(), 9),
            ElementNameUsage("owner".to_string(), 5),
            ElementNameUsage("deadline".to_string(), 5),
            ElementNameUsage("budget".to_string(), 1),
        ]
    }

    #[test]
    fn test_filter_preserves_ranking_order() {
        let ranked = ranking();
        let kept = filter_suggestions(&ranked, |name| name != "owner" && name != "status");
        assert_eq!(
            kept.iter().map(|usage| usage.name()).collect::<Vec<_>>(),
            vec!["deadline", "budget"]
        );
    }

    #[test]
    fn test_no_kind_means_no_suggestions() {
        let mut suggestions = ElementSuggestions::default();
        assert_eq!(suggestions.set_kind(Some("")), None);
        assert_eq!(suggestions.set_kind(None), None);
        assert!(suggestions.filtered(|_| true).is_empty());
    }

    #[test]
    fn test_kind_change_requests_refetch() {
        let mut suggestions = ElementSuggestions::default();
        assert_eq!(suggestions.set_kind(Some("project")), Some("project".to_string()));
        assert!(suggestions.load("project", ranking()));
        assert_eq!(suggestions.ranked().len(), 4);

        // Same kind again: nothing to fetch, ranking kept
        assert_eq!(suggestions.set_kind(Some("project")), None);
        assert_eq!(suggestions.ranked().len(), 4);

        assert_eq!(suggestions.set_kind(None), None);
        assert!(suggestions.ranked().is_empty());
        assert_eq!(suggestions.kind(), None);
    }

    #[test]
    fn test_stale_ranking_is_discarded() {
        let mut suggestions = ElementSuggestions::default();
        suggestions.set_kind(Some("project"));
        suggestions.set_kind(Some("book"));

        assert!(!suggestions.load("project", ranking()));
        assert!(suggestions.ranked().is_empty());
    }
}
