//! Per-consumer queues of changed dates.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::models::Timestamp;

/// Ordered queue of timestamps touched by mutations.
///
/// Obtained from [`Repository::subscribe_changes`](super::Repository::subscribe_changes);
/// the repository keeps a clone and appends to it after every successful
/// create, update or delete. Each UI surface subscribes for its own handle.
/// Clones share one queue, so a handle must have exactly one reader calling
/// [`ChangeLog::drain`].
#[derive(Debug, Clone, Default)]
pub struct ChangeLog {
    entries: Arc<Mutex<VecDeque<Timestamp>>>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the tail. Duplicates are kept.
    pub fn record(&self, timestamp: Timestamp) {
        self.lock().push_back(timestamp);
    }

    /// Take every pending timestamp in insertion order, leaving the queue empty.
    pub fn drain(&self) -> Vec<Timestamp> {
        self.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// True when the repository holds the only handle left.
    pub(crate) fn is_orphaned(&self) -> bool {
        Arc::strong_count(&self.entries) == 1
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Timestamp>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn ts(s: &str) -> Timestamp {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_drain_preserves_order_and_duplicates() {
        let log = ChangeLog::new();
        log.record(ts("2024-01-02T08:00:00Z"));
        log.record(ts("2024-01-01T08:00:00Z"));
        log.record(ts("2024-01-02T08:00:00Z"));

        assert_eq!(
            log.drain(),
            vec![
                ts("2024-01-02T08:00:00Z"),
                ts("2024-01-01T08:00:00Z"),
                ts("2024-01-02T08:00:00Z"),
            ]
        );
    }

    #[test]
    fn test_second_drain_is_empty() {
        let log = ChangeLog::new();
        log.record(ts("2024-01-01T08:00:00Z"));

        assert_eq!(log.drain().len(), 1);
        assert!(log.drain().is_empty());
        assert!(log.is_empty());
    }

    #[test]
    fn test_clones_share_queue() {
        let producer = ChangeLog::new();
        let consumer = producer.clone();
        assert!(!producer.is_orphaned());

        producer.record(ts("2024-01-01T08:00:00Z"));
        assert_eq!(consumer.len(), 1);

        drop(consumer);
        assert!(producer.is_orphaned());
    }
}
