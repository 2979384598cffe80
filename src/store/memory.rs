//! In-memory record store.
//!
//! Reference implementation of [`RecordStore`] for tests and embedding.
//! Supports failure injection per record ID to exercise partial write-back.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use super::fields::unwrap_cell;
use super::{Direction, Fields, Query, Record, RecordStore};
use crate::error::StoreError;

/// Record store backed by in-process collections.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<BTreeMap<String, Vec<Record>>>,
    failing: Mutex<HashSet<String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a collection with its records, replacing any existing one.
    pub fn with_collection(self, name: impl Into<String>, records: Vec<Record>) -> Self {
        lock(&self.collections).insert(name.into(), records);
        self
    }

    /// Makes every update of the given record fail.
    pub fn fail_updates_for(self, id: impl Into<String>) -> Self {
        lock(&self.failing).insert(id.into());
        self
    }

    /// Returns a copy of one record.
    pub fn record(&self, collection: &str, id: &str) -> Option<Record> {
        lock(&self.collections)
            .get(collection)?
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Orders two cell values: numbers, then text, then absent values.
fn compare_cells(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let rank = |v: Option<&Value>| match v.and_then(unwrap_cell) {
        Some(Value::Number(n)) => (0, n.as_f64().unwrap_or(0.0), String::new()),
        Some(Value::String(s)) => (1, 0.0, s.clone()),
        Some(other) => (1, 0.0, other.to_string()),
        None => (2, 0.0, String::new()),
    };
    let (ra, na, sa) = rank(a);
    let (rb, nb, sb) = rank(b);
    ra.cmp(&rb)
        .then(na.total_cmp(&nb))
        .then_with(|| sa.cmp(&sb))
}

impl RecordStore for MemoryStore {
    fn select_records(&self, collection: &str, query: &Query) -> Result<Vec<Record>, StoreError> {
        let mut records = lock(&self.collections)
            .get(collection)
            .cloned()
            .ok_or_else(|| StoreError::CollectionNotFound(collection.to_string()))?;

        records.sort_by(|a, b| {
            query.sorts.iter().fold(Ordering::Equal, |acc, sort| {
                acc.then_with(|| {
                    let ord = compare_cells(a.get(&sort.field), b.get(&sort.field));
                    match sort.direction {
                        Direction::Asc => ord,
                        Direction::Desc => ord.reverse(),
                    }
                })
            })
        });

        Ok(records)
    }

    fn update_record(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        if lock(&self.failing).contains(id) {
            return Err(StoreError::Rejected(format!("update of '{id}' refused")));
        }

        let mut collections = lock(&self.collections);
        let records = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::CollectionNotFound(collection.to_string()))?;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::RecordNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        record.fields.extend(fields);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> MemoryStore {
        MemoryStore::new().with_collection(
            "Jobs",
            vec![
                Record::new("a").with_field("Needs By", "2025-07-01"),
                Record::new("b"),
                Record::new("c").with_field("Needs By", "2025-06-01"),
            ],
        )
    }

    #[test]
    fn test_select_sorted() {
        let records = store()
            .select_records("Jobs", &Query::all().sorted_by("Needs By"))
            .unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_select_sorted_desc() {
        let records = store()
            .select_records("Jobs", &Query::all().sorted_by_desc("Needs By"))
            .unwrap();
        assert_eq!(records[0].id, "b");
    }

    #[test]
    fn test_select_unknown_collection() {
        let err = store().select_records("Nope", &Query::all()).unwrap_err();
        assert_eq!(err, StoreError::CollectionNotFound("Nope".into()));
    }

    #[test]
    fn test_update_merges_fields() {
        let store = store();
        let mut fields = Fields::new();
        fields.insert("Days to Complete".into(), json!(3));
        store.update_record("Jobs", "a", fields).unwrap();

        let record = store.record("Jobs", "a").unwrap();
        assert_eq!(record.get("Days to Complete"), Some(&json!(3)));
        assert_eq!(record.get("Needs By"), Some(&json!("2025-07-01")));
    }

    #[test]
    fn test_update_failures() {
        let store = store().fail_updates_for("b");
        assert!(matches!(
            store.update_record("Jobs", "b", Fields::new()),
            Err(StoreError::Rejected(_))
        ));
        assert!(matches!(
            store.update_record("Jobs", "zz", Fields::new()),
            Err(StoreError::RecordNotFound { .. })
        ));
    }
}
