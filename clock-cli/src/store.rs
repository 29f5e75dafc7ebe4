//! File-backed routine store: one pretty-printed JSON document per id.

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clock_core::RoutineSet;
use clock_core::store::{RoutineStore, stamp};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under `~/.routine-clock/routines`.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(crate::state::routines_dir()?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> Result<PathBuf> {
        // Ids come from the command line; keep them inside the store.
        if id.is_empty()
            || !id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            bail!("invalid routine id '{id}'");
        }
        Ok(self.dir.join(format!("{id}.json")))
    }

    fn write(&self, id: &str, doc: &RoutineSet) -> Result<()> {
        let p = self.path_for(id)?;
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("create {}", self.dir.display()))?;

        let json = serde_json::to_string_pretty(doc)?;
        let tmp = p.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, &p).with_context(|| format!("rename {} -> {}", tmp.display(), p.display()))?;
        Ok(())
    }

    /// Ids of every stored document, sorted. Unreadable entries are skipped.
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(vec![]);
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir).with_context(|| format!("read {}", self.dir.display()))? {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable store entry");
                    continue;
                }
            };
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}

impl RoutineStore for FileStore {
    fn load(&self, id: &str) -> Result<Option<RoutineSet>> {
        let p = self.path_for(id)?;
        if !p.exists() {
            return Ok(None);
        }
        let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
        let doc = serde_json::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
        Ok(Some(doc))
    }

    fn save(&mut self, id: &str, doc: &RoutineSet) -> Result<()> {
        let mut stamped = stamp(doc, Utc::now(), false);
        if stamped.created_at.is_none() {
            if let Some(prev) = self.load(id)? {
                stamped.created_at = prev.created_at;
            }
        }
        self.write(id, &stamped)?;
        info!(id, "saved routine document");
        Ok(())
    }

    fn create(&mut self, doc: &RoutineSet) -> Result<String> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        self.write(&id, &stamp(doc, Utc::now(), true))?;
        info!(id = %id, "created routine document");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clock_editor::EditorSession;

    fn temp_store(name: &str) -> FileStore {
        let dir = std::env::temp_dir().join(format!(
            "routine-clock-test-{name}-{}",
            uuid::Uuid::new_v4().simple()
        ));
        FileStore::new(dir)
    }

    #[test]
    fn create_then_load() {
        let mut store = temp_store("create");
        let doc = EditorSession::example().build().unwrap();

        let id = store.create(&doc).unwrap();
        let loaded = store.load(&id).unwrap().unwrap();
        assert_eq!(loaded.morning, doc.morning);
        assert!(loaded.created_at.is_some());
        assert_eq!(store.list().unwrap(), vec![id]);

        fs::remove_dir_all(store.dir()).ok();
    }

    #[test]
    fn save_keeps_created_at() {
        let mut store = temp_store("save");
        let doc = EditorSession::example().build().unwrap();
        let id = store.create(&doc).unwrap();
        let created = store.load(&id).unwrap().unwrap().created_at;

        // Editor output carries no metadata.
        store.save(&id, &doc).unwrap();
        let saved = store.load(&id).unwrap().unwrap();
        assert_eq!(saved.created_at, created);
        assert!(saved.last_modified.is_some());

        fs::remove_dir_all(store.dir()).ok();
    }

    #[test]
    fn missing_and_invalid_ids() {
        let store = temp_store("missing");
        assert!(store.load("nope").unwrap().is_none());
        assert!(store.load("../etc/passwd").is_err());
        assert!(store.list().unwrap().is_empty());
    }
}
