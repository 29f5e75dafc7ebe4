//! Persistence seam: routine documents by opaque id.

use std::collections::HashMap;

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::routine::RoutineSet;

/// Key -> document store. Implementations stamp the metadata fields; the
/// engine never reads them.
pub trait RoutineStore {
    fn load(&self, id: &str) -> Result<Option<RoutineSet>>;

    /// Overwrite `id`, setting `lastModified`.
    fn save(&mut self, id: &str, doc: &RoutineSet) -> Result<()>;

    /// Store a new document, setting `createdAt` and `lastModified`, and
    /// return its id.
    fn create(&mut self, doc: &RoutineSet) -> Result<String>;
}

/// Copy of `doc` with `lastModified` set to `now` (and `createdAt` too when
/// `created` is true).
pub fn stamp(doc: &RoutineSet, now: DateTime<Utc>, created: bool) -> RoutineSet {
    let ts = now.to_rfc3339();
    let mut out = doc.clone();
    if created {
        out.created_at = Some(ts.clone());
    }
    out.last_modified = Some(ts);
    out
}

/// In-memory store with sequential ids. Handy for tests and previews.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: HashMap<String, RoutineSet>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

impl RoutineStore for MemoryStore {
    fn load(&self, id: &str) -> Result<Option<RoutineSet>> {
        Ok(self.docs.get(id).cloned())
    }

    fn save(&mut self, id: &str, doc: &RoutineSet) -> Result<()> {
        let mut stamped = stamp(doc, Utc::now(), false);
        // Keep the original creation time across saves.
        if let Some(prev) = self.docs.get(id) {
            stamped.created_at = prev.created_at.clone();
        }
        self.docs.insert(id.to_string(), stamped);
        Ok(())
    }

    fn create(&mut self, doc: &RoutineSet) -> Result<String> {
        self.next_id += 1;
        let id = format!("mem-{:04}", self.next_id);
        self.docs.insert(id.clone(), stamp(doc, Utc::now(), true));
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn stamp_sets_timestamps() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 7, 0, 0).unwrap();
        let doc = stamp(&RoutineSet::default(), now, true);
        assert_eq!(doc.created_at.as_deref(), Some("2026-03-02T07:00:00+00:00"));
        assert_eq!(doc.last_modified, doc.created_at);

        let saved = stamp(&RoutineSet::default(), now, false);
        assert!(saved.created_at.is_none());
    }

    #[test]
    fn memory_store_create_load_save() {
        let mut store = MemoryStore::new();
        assert!(store.load("missing").unwrap().is_none());

        let id = store.create(&RoutineSet::default()).unwrap();
        let created = store.load(&id).unwrap().unwrap();
        assert!(created.created_at.is_some());

        store.save(&id, &RoutineSet::default()).unwrap();
        let saved = store.load(&id).unwrap().unwrap();
        assert_eq!(saved.created_at, created.created_at);
        assert!(saved.last_modified.is_some());
        assert_eq!(store.len(), 1);
    }
}
