//! Links and the Link Direction Model
//!
//! A link relates two edia. Stored links are a `{start, end, directed}` triple; the UI
//! always shows them relative to a reference edium (the one being viewed), as an arrow
//! and the id of the other endpoint:
//!
//! | reference is | directed | arrow | other   |
//! |--------------|----------|-------|---------|
//! | `start`      | yes      | `→`   | `end`   |
//! | `start`      | no       | `↔`   | `end`   |
//! | `end`        | yes      | `←`   | `start` |
//! | `end`        | no       | `↔`   | `start` |
//!
//! A self-link (`start == end == reference`) renders as a `↔` self loop whose other
//! endpoint is the reference itself, whatever its `directed` flag.
//!
//! While composing a new link the direction cycles `→ → ← → ↔ → →`, and the draft is
//! lowered back to a stored triple on submit.

use crate::models::{EdiumId, LinkId, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: LinkId,
    pub start: EdiumId,
    pub end: EdiumId,
    pub directed: bool,
    #[serde(default)]
    pub label: String,
}

impl Link {
    /// Derive the display arrow and other endpoint relative to `reference`
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::LinkNotIncident` when `reference` is neither endpoint.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use densedia_core::models::{Link, LinkDirection};
    ///
    /// let link = Link { id: 1, start: 1, end: 2, directed: true, label: String::new() };
    /// assert_eq!(link.view_from(1).unwrap().direction, LinkDirection::Outgoing);
    /// assert_eq!(link.view_from(2).unwrap().direction, LinkDirection::Incoming);
    /// assert_eq!(link.view_from(2).unwrap().other, 1);
    /// ```
    pub fn view_from(&self, reference: EdiumId) -> Result<LinkView, ValidationError> {
        let (direction, other, self_loop) = if self.start == reference && self.end == reference {
            (LinkDirection::Both, reference, true)
        } else if self.start == reference {
            let direction = if self.directed {
                LinkDirection::Outgoing
            } else {
                LinkDirection::Both
            };
            (direction, self.end, false)
        } else if self.end == reference {
            let direction = if self.directed {
                LinkDirection::Incoming
            } else {
                LinkDirection::Both
            };
            (direction, self.start, false)
        } else {
            return Err(ValidationError::LinkNotIncident {
                link_id: self.id,
                reference,
            });
        };

        Ok(LinkView {
            link_id: self.id,
            label: self.label.clone(),
            direction,
            other,
            self_loop,
        })
    }
}

/// Arrow shown between the reference edium and the other endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LinkDirection {
    /// `→` from the reference to the other edium
    #[default]
    Outgoing,
    /// `←` from the other edium to the reference
    Incoming,
    /// `↔` undirected
    Both,
}

impl LinkDirection {
    pub fn arrow(self) -> &'static str {
        match self {
            LinkDirection::Outgoing => "→",
            LinkDirection::Incoming => "←",
            LinkDirection::Both => "↔",
        }
    }

    /// Next state of the compose toggle: `→ → ← → ↔ → →`
    pub fn next(self) -> Self {
        match self {
            LinkDirection::Outgoing => LinkDirection::Incoming,
            LinkDirection::Incoming => LinkDirection::Both,
            LinkDirection::Both => LinkDirection::Outgoing,
        }
    }
}

impl fmt::Display for LinkDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.arrow())
    }
}

/// A link as displayed from one of its endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkView {
    pub link_id: LinkId,
    pub label: String,
    pub direction: LinkDirection,
    pub other: EdiumId,
    pub self_loop: bool,
}

/// Body of `POST /link`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCreate {
    pub start: EdiumId,
    pub end: EdiumId,
    pub directed: bool,
    pub label: String,
}

/// Link being composed from the reference edium
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkDraft {
    pub label: String,
    pub direction: LinkDirection,
    pub other: Option<EdiumId>,
}

impl LinkDraft {
    /// Advance the direction toggle
    pub fn cycle_direction(&mut self) {
        self.direction = self.direction.next();
    }

    /// A draft can be submitted once the other edium is chosen; the label is optional
    pub fn is_submittable(&self) -> bool {
        self.other.is_some()
    }

    /// Lower the draft to a stored triple relative to `reference`
    ///
    /// `←` stores `start = other, end = reference`; any other direction stores
    /// `start = reference, end = other`. The link is directed unless the draft is `↔`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingField` when no other edium is selected.
    pub fn lower(&self, reference: EdiumId) -> Result<LinkCreate, ValidationError> {
        let other = self
            .other
            .ok_or_else(|| ValidationError::MissingField("other".to_string()))?;

        let (start, end) = match self.direction {
            LinkDirection::Incoming => (other, reference),
            LinkDirection::Outgoing | LinkDirection::Both => (reference, other),
        };

        Ok(LinkCreate {
            start,
            end,
            directed: self.direction != LinkDirection::Both,
            label: self.label.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(start: EdiumId, end: EdiumId, directed: bool) -> Link {
        Link {
            id: 7,
            start,
            end,
            directed,
            label: "cites".to_string(),
        }
    }

    #[test]
    fn test_directed_link_views() {
        let link = link(1, 2, true);

        let from_start = link.view_from(1).unwrap();
        assert_eq!(from_start.direction.arrow(), "→");
        assert_eq!(from_start.other, 2);
        assert!(!from_start.self_loop);

        let from_end = link.view_from(2).unwrap();
        assert_eq!(from_end.direction.arrow(), "←");
        assert_eq!(from_end.other, 1);
    }

    #[test]
    fn test_undirected_link_views() {
        let link = link(1, 2, false);
        assert_eq!(link.view_from(1).unwrap().direction, LinkDirection::Both);
        assert_eq!(link.view_from(2).unwrap().direction, LinkDirection::Both);
        assert_eq!(link.view_from(2).unwrap().label, "cites");
    }

    #[test]
    fn test_self_link_is_a_self_loop() {
        let view = link(4, 4, true).view_from(4).unwrap();
        assert_eq!(view.direction, LinkDirection::Both);
        assert_eq!(view.other, 4);
        assert!(view.self_loop);
    }

    #[test]
    fn test_unrelated_reference_is_rejected() {
        assert_eq!(
            link(1, 2, true).view_from(9),
            Err(ValidationError::LinkNotIncident {
                link_id: 7,
                reference: 9
            })
        );
    }

    #[test]
    fn test_direction_cycle_wraps_after_three_states() {
        let start = LinkDirection::default();
        assert_eq!(start, LinkDirection::Outgoing);
        assert_eq!(start.next(), LinkDirection::Incoming);
        assert_eq!(start.next().next(), LinkDirection::Both);
        assert_eq!(start.next().next().next(), start);
    }

    #[test]
    fn test_lowering_drafts() {
        let mut draft = LinkDraft {
            label: "depends on".to_string(),
            direction: LinkDirection::Outgoing,
            other: Some(2),
        };
        let outgoing = draft.lower(1).unwrap();
        assert_eq!((outgoing.start, outgoing.end, outgoing.directed), (1, 2, true));

        draft.cycle_direction();
        let incoming = draft.lower(1).unwrap();
        assert_eq!((incoming.start, incoming.end, incoming.directed), (2, 1, true));

        draft.cycle_direction();
        let both = draft.lower(1).unwrap();
        assert_eq!((both.start, both.end, both.directed), (1, 2, false));
        assert_eq!(both.label, "depends on");
    }

    #[test]
    fn test_lowered_draft_views_back_to_same_arrow() {
        for direction in [
            LinkDirection::Outgoing,
            LinkDirection::Incoming,
            LinkDirection::Both,
        ] {
            let draft = LinkDraft {
                label: String::new(),
                direction,
                other: Some(5),
            };
            let created = draft.lower(1).unwrap();
            let stored = Link {
                id: 1,
                start: created.start,
                end: created.end,
                directed: created.directed,
                label: created.label,
            };
            let view = stored.view_from(1).unwrap();
            assert_eq!(view.direction, direction);
            assert_eq!(view.other, 5);
        }
    }

    #[test]
    fn test_draft_requires_other_edium() {
        let draft = LinkDraft::default();
        assert!(!draft.is_submittable());
        assert_eq!(
            draft.lower(1),
            Err(ValidationError::MissingField("other".to_string()))
        );
    }
}
