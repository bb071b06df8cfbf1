//! Single-slot session storage.
//!
//! Reads fail soft: a missing, unreadable or corrupt record is "no session".
//! Writes are fallible and surface as `StoreError`.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

use crate::auth::session::Session;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("session storage lock poisoned")]
    Poisoned,
}

/// Get/set/clear over the one persisted session record.
pub trait SessionStore: Send + Sync {
    fn get(&self) -> Option<Session>;
    fn set(&self, session: &Session) -> Result<(), StoreError>;
    /// Clearing an empty store is a no-op.
    fn clear(&self) -> Result<(), StoreError>;
}

/// `true` when the store holds a readable, unexpired session.
pub fn is_authenticated(store: &dyn SessionStore) -> bool {
    store
        .get()
        .is_some_and(|s| !s.is_expired_at(chrono::Utc::now()))
}

fn decode_record(value: Value) -> Option<Session> {
    match serde_json::from_value::<Session>(value) {
        Ok(session) => Some(session),
        Err(e) => {
            warn!("Discarding corrupt session record: {e}");
            None
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory store
// ────────────────────────────────────────────────────────────────────────────

/// Process-local store. Holds the raw record so corrupt data behaves like the file store.
#[derive(Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<Value>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_raw(raw: Value) -> Self {
        Self {
            slot: Mutex::new(Some(raw)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<Session> {
        let slot = self.slot.lock().ok()?;
        slot.clone().and_then(decode_record)
    }

    fn set(&self, session: &Session) -> Result<(), StoreError> {
        let value = serde_json::to_value(session)?;
        *self.slot.lock().map_err(|_| StoreError::Poisoned)? = Some(value);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.slot.lock().map_err(|_| StoreError::Poisoned)? = None;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// File-backed store
// ────────────────────────────────────────────────────────────────────────────

/// Durable key/value file (a JSON object) holding the session under one key.
///
/// Writes go to a temp file in the same directory and are renamed into place,
/// so a reader never observes a half-written record.
pub struct FileSessionStore {
    path: PathBuf,
    key: String,
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole key/value document. Unreadable documents read as empty.
    fn read_document(&self) -> Map<String, Value> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Map::new(),
            Err(e) => {
                warn!("Cannot read session store {}: {e}", self.path.display());
                return Map::new();
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                warn!("Session store {} is corrupt; treating as empty", self.path.display());
                Map::new()
            }
        }
    }

    fn write_document(&self, document: &Map<String, Value>) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut tmp, document)?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;

        debug!("Session store written to {}", self.path.display());
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Option<Session> {
        self.read_document()
            .remove(&self.key)
            .and_then(decode_record)
    }

    fn set(&self, session: &Session) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut document = self.read_document();
        document.insert(self.key.clone(), serde_json::to_value(session)?);
        self.write_document(&document)
    }

    fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut document = self.read_document();
        if document.remove(&self.key).is_none() {
            return Ok(());
        }
        self.write_document(&document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn jane() -> Session {
        Session::new("user-123", "jane", "jane@example.com")
    }

    #[test]
    fn test_memory_store_roundtrip_and_clear() {
        let store = MemorySessionStore::new();
        assert!(store.get().is_none());
        store.set(&jane()).unwrap();
        assert_eq!(store.get(), Some(jane()));
        store.clear().unwrap();
        assert!(store.get().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn test_memory_store_corrupt_record_reads_as_none() {
        let store = MemorySessionStore::with_raw(json!({ "id": 7 }));
        assert!(store.get().is_none());
        assert!(!is_authenticated(&store));
    }

    #[test]
    fn test_is_authenticated_ignores_expired_session() {
        let store = MemorySessionStore::new();
        let mut s = jane();
        s.expires_at = Some(chrono::Utc::now() - chrono::Duration::minutes(1));
        store.set(&s).unwrap();
        assert!(!is_authenticated(&store));
    }

    #[test]
    fn test_file_store_missing_file_is_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"), "user");
        assert!(store.get().is_none());
        store.clear().unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        FileSessionStore::new(&path, "user").set(&jane()).unwrap();

        let reopened = FileSessionStore::new(&path, "user");
        assert_eq!(reopened.get(), Some(jane()));
        assert!(is_authenticated(&reopened));
    }

    #[test]
    fn test_file_store_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"theme":"dark"}"#).unwrap();

        let store = FileSessionStore::new(&path, "user");
        store.set(&jane()).unwrap();
        store.clear().unwrap();

        let doc: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc, json!({ "theme": "dark" }));
    }

    #[test]
    fn test_file_store_corrupt_file_is_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = FileSessionStore::new(&path, "user");
        assert!(store.get().is_none());

        store.set(&jane()).unwrap();
        assert_eq!(store.get(), Some(jane()));
    }

    #[test]
    fn test_file_store_corrupt_record_is_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"user":"not-an-object"}"#).unwrap();
        assert!(FileSessionStore::new(&path, "user").get().is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"), "user");
        store.set(&jane()).unwrap();
        let bob = Session::new("user-9", "bob", "bob@example.com");
        store.set(&bob).unwrap();
        assert_eq!(store.get(), Some(bob));
    }
}
