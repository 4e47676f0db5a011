//! Notification Center
//!
//! Local notification feed fed from two sides: the wholesale REST load
//! when the panel opens, and pushes from the realtime channel. Read state
//! is monotonic: a notification flips to read once and never back.

use crate::models::Notification;

/// Badge caps at this count and shows "9+" beyond it
const BADGE_CAP: usize = 9;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NotificationFeed {
    items: Vec<Notification>,
}

impl NotificationFeed {
    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    /// Wholesale replace from the REST load; the only way stale push
    /// state leaves the feed.
    pub fn replace(&mut self, items: Vec<Notification>) {
        self.items = items;
    }

    /// A push prepends as-is; no de-dup against the initial fetch.
    pub fn push_front(&mut self, notification: Notification) {
        self.items.insert(0, notification);
    }

    /// Optimistic read flip. Returns whether anything changed (already-read
    /// entries stay read).
    pub fn mark_read(&mut self, id: u64) -> bool {
        match self.items.iter_mut().find(|n| n.id == id && !n.read) {
            Some(n) => {
                n.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_read(&mut self) {
        for n in &mut self.items {
            n.read = true;
        }
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }

    /// Badge text: None hides the badge entirely
    pub fn badge_text(&self) -> Option<String> {
        match self.unread_count() {
            0 => None,
            n if n > BADGE_CAP => Some("9+".to_string()),
            n => Some(n.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_notification(id: u64, read: bool) -> Notification {
        Notification {
            id,
            message: format!("notification {}", id),
            read,
            created_at: None,
        }
    }

    #[test]
    fn test_badge_hidden_at_zero() {
        let feed = NotificationFeed::default();
        assert_eq!(feed.badge_text(), None);
    }

    #[test]
    fn test_two_pushes_while_panel_closed() {
        let mut feed = NotificationFeed::default();
        feed.push_front(make_notification(1, false));
        feed.push_front(make_notification(2, false));
        assert_eq!(feed.items().len(), 2);
        // Latest push shows first
        assert_eq!(feed.items()[0].id, 2);
        assert_eq!(feed.unread_count(), 2);
        assert_eq!(feed.badge_text(), Some("2".to_string()));
    }

    #[test]
    fn test_badge_caps_at_nine_plus() {
        let mut feed = NotificationFeed::default();
        feed.replace((1..=11).map(|id| make_notification(id, false)).collect());
        assert_eq!(feed.badge_text(), Some("9+".to_string()));
    }

    #[test]
    fn test_mark_read_is_monotonic() {
        let mut feed = NotificationFeed::default();
        feed.replace(vec![make_notification(1, false), make_notification(2, true)]);
        assert!(feed.mark_read(1));
        assert!(!feed.mark_read(1));
        assert!(!feed.mark_read(2));
        assert!(!feed.mark_read(99));
        assert_eq!(feed.unread_count(), 0);
    }

    #[test]
    fn test_mark_all_read_hides_badge() {
        let mut feed = NotificationFeed::default();
        feed.replace((1..=4).map(|id| make_notification(id, false)).collect());
        feed.mark_all_read();
        assert!(feed.items().iter().all(|n| n.read));
        assert_eq!(feed.unread_count(), 0);
        assert_eq!(feed.badge_text(), None);
    }

    #[test]
    fn test_replace_is_wholesale() {
        let mut feed = NotificationFeed::default();
        feed.push_front(make_notification(50, false));
        feed.replace(vec![make_notification(1, true)]);
        assert_eq!(feed.items().len(), 1);
        assert_eq!(feed.items()[0].id, 1);
    }
}
