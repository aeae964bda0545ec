//! Statement accounting.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counts the statements issued against a store.
///
/// Clones share the same count, so a store and every transaction it hands
/// out report into one counter.
#[derive(Debug, Clone, Default)]
pub struct QueryCounter {
    issued: Arc<AtomicU64>,
}

impl QueryCounter {
    /// Creates a counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one issued statement.
    pub fn record(&self, query: &'static str) {
        self.issued.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("store_queries_total", "query" => query).increment(1);
        tracing::trace!(query, "statement issued");
    }

    /// Returns the number of statements issued so far.
    pub fn count(&self) -> u64 {
        self.issued.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        assert_eq!(QueryCounter::new().count(), 0);
    }

    #[test]
    fn clones_share_the_count() {
        let counter = QueryCounter::new();
        let clone = counter.clone();

        counter.record("find_member");
        clone.record("find_item");

        assert_eq!(counter.count(), 2);
        assert_eq!(clone.count(), 2);
    }
}
