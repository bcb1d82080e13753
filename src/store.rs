use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::identity::Id;
use crate::model::RecipeRecord;

/// Keyed record store shared across views, so navigating between pages does
/// not re-fetch and re-hydrate the same recipes. Entries expire after a TTL
/// and are invalidated on mutation. Purely an efficiency layer: a miss just
/// means the caller re-hydrates.
#[derive(Debug)]
pub struct RecordStore {
    ttl: Duration,
    entries: HashMap<Id, Entry>,
}

#[derive(Debug)]
struct Entry {
    record: RecipeRecord,
    stored_at: Instant,
}

impl RecordStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, id: &Id) -> Option<&RecipeRecord> {
        self.entries
            .get(id)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| &entry.record)
    }

    pub fn put(&mut self, record: RecipeRecord) {
        self.entries.insert(
            record.id.clone(),
            Entry {
                record,
                stored_at: Instant::now(),
            },
        );
    }

    pub fn put_all(&mut self, records: &[RecipeRecord]) {
        for record in records {
            self.put(record.clone());
        }
    }

    /// Drop one entry; called after any mutation touching that record.
    pub fn invalidate(&mut self, id: &Id) {
        self.entries.remove(id);
    }

    pub fn purge_expired(&mut self) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Normalizer;
    use serde_json::json;

    fn record(id: i64) -> RecipeRecord {
        Normalizer::new("http://api:8001")
            .normalize(&json!({"id": id}))
            .unwrap()
    }

    #[test]
    fn test_hit_within_ttl() {
        let mut store = RecordStore::new(Duration::from_secs(60));
        store.put(record(1));
        assert!(store.get(&Id::Int(1)).is_some());
        assert!(store.get(&Id::Int(2)).is_none());
    }

    #[test]
    fn test_expired_entry_misses() {
        let mut store = RecordStore::new(Duration::from_millis(10));
        store.put(record(1));
        std::thread::sleep(Duration::from_millis(20));
        assert!(store.get(&Id::Int(1)).is_none());

        store.purge_expired();
        assert!(store.is_empty());
    }

    #[test]
    fn test_invalidate_on_mutation() {
        let mut store = RecordStore::new(Duration::from_secs(60));
        store.put_all(&[record(1), record(2)]);
        store.invalidate(&Id::Int(1));
        assert!(store.get(&Id::Int(1)).is_none());
        assert!(store.get(&Id::Int(2)).is_some());
        assert_eq!(store.len(), 1);
    }
}
