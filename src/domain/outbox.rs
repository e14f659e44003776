use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

/// A text send awaiting its server echo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    pub content: String,
    pub inserted_at: DateTime<Utc>,
}

/// Map of unconfirmed outbound sends, keyed by client temp id.
///
/// Every entry is either resolved (echo arrived) or failed (transport
/// error); entries are never matched by scanning the transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingOutbox {
    pending: HashMap<String, PendingSend>,
}

impl PendingOutbox {
    pub fn insert(&mut self, temp_id: String, content: String, now: DateTime<Utc>) {
        self.pending.insert(
            temp_id,
            PendingSend {
                content,
                inserted_at: now,
            },
        );
    }

    /// Removes and returns the entry matched by a server echo.
    pub fn resolve(&mut self, temp_id: &str) -> Option<PendingSend> {
        self.pending.remove(temp_id)
    }

    /// Removes the entry for a send that failed at the transport.
    pub fn fail(&mut self, temp_id: &str) -> Option<PendingSend> {
        self.pending.remove(temp_id)
    }

    /// Removes entries whose echo never arrived within `max_age`, returning
    /// their temp ids so the transcript placeholders can be marked failed.
    pub fn expire(&mut self, now: DateTime<Utc>, max_age: Duration) -> Vec<String> {
        let expired: Vec<String> = self
            .pending
            .iter()
            .filter(|(_, send)| now - send.inserted_at >= max_age)
            .map(|(temp_id, _)| temp_id.clone())
            .collect();

        for temp_id in &expired {
            self.pending.remove(temp_id);
        }

        expired
    }

    pub fn contains(&self, temp_id: &str) -> bool {
        self.pending.contains_key(temp_id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_resolve_removes_entry() {
        let mut outbox = PendingOutbox::default();
        outbox.insert("tmp-1".to_owned(), "Hello".to_owned(), Utc::now());

        assert!(outbox.contains("tmp-1"));

        let resolved = outbox.resolve("tmp-1").expect("entry must resolve");
        assert_eq!(resolved.content, "Hello");
        assert!(outbox.is_empty());
    }

    #[test]
    fn resolve_unknown_temp_id_returns_none() {
        let mut outbox = PendingOutbox::default();

        assert!(outbox.resolve("tmp-missing").is_none());
    }

    #[test]
    fn fail_removes_entry_like_resolve() {
        let mut outbox = PendingOutbox::default();
        outbox.insert("tmp-1".to_owned(), "Hello".to_owned(), Utc::now());

        assert!(outbox.fail("tmp-1").is_some());
        assert!(!outbox.contains("tmp-1"));
    }

    #[test]
    fn expire_removes_only_stale_entries() {
        let now = Utc::now();
        let mut outbox = PendingOutbox::default();
        outbox.insert("tmp-old".to_owned(), "a".to_owned(), now - Duration::seconds(31));
        outbox.insert("tmp-fresh".to_owned(), "b".to_owned(), now);

        let expired = outbox.expire(now, Duration::seconds(30));

        assert_eq!(expired, vec!["tmp-old".to_owned()]);
        assert!(!outbox.contains("tmp-old"));
        assert!(outbox.contains("tmp-fresh"));
    }

    #[test]
    fn expire_on_empty_outbox_returns_nothing() {
        let mut outbox = PendingOutbox::default();

        assert!(outbox.expire(Utc::now(), Duration::seconds(30)).is_empty());
    }

    #[test]
    fn distinct_temp_ids_are_tracked_independently() {
        let mut outbox = PendingOutbox::default();
        outbox.insert("tmp-1".to_owned(), "a".to_owned(), Utc::now());
        outbox.insert("tmp-2".to_owned(), "b".to_owned(), Utc::now());

        outbox.resolve("tmp-1");

        assert_eq!(outbox.len(), 1);
        assert!(outbox.contains("tmp-2"));
    }
}
