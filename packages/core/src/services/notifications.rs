//! Error Notification Queue
//!
//! Remote failures are shown to the user as dismissible notifications. The queue is
//! owned by the caller and fed explicitly; nothing in the core pushes to it on its own.

use crate::services::WorkspaceError;

/// A displayed notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub text: String,
}

/// Order-preserving queue of notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationQueue {
    next_id: u64,
    items: Vec<Notification>,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self {
            next_id: 1,
            items: Vec::new(),
        }
    }
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a notification and return its id
    pub fn push(&mut self, text: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Notification {
            id,
            text: text.into(),
        });
        id
    }

    /// Remove the notification with `id`, if still present
    pub fn dismiss(&mut self, id: u64) -> Option<Notification> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Enqueue a remote failure; local rejections are not notified
    pub fn report(&mut self, error: &WorkspaceError) -> Option<u64> {
        if error.is_local() {
            return None;
        }
        tracing::warn!("Request failed: {}", error);
        Some(self.push(error.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
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
    use crate::api::ApiError;
    use crate::services::StagingError;

    #[test]
    fn test_ids_start_at_one_and_increase() {
        let mut queue = NotificationQueue::new();
        assert_eq!(queue.push("first"), 1);
        assert_eq!(queue.push("second"), 2);

        queue.dismiss(1);
        assert_eq!(queue.push("third"), 3);
        assert_eq!(
            queue.iter().map(|n| n.text.as_str()).collect::<Vec<_>>(),
            vec!["second", "third"]
        );
    }

    #[test]
    fn test_dismiss_unknown_id() {
        let mut queue = NotificationQueue::new();
        queue.push("only");
        assert_eq!(queue.dismiss(7), None);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_report_skips_local_errors() {
        let mut queue = NotificationQueue::new();
        assert_eq!(queue.report(&StagingError::EmptyName.into()), None);
        assert!(queue.is_empty());

        let id = queue.report(&ApiError::application(409, "Conflict on element").into());
        assert_eq!(id, Some(1));
        assert_eq!(queue.iter().next().map(|n| n.text.as_str()), Some("Conflict on element"));
    }
}
