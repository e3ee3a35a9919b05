// ── Persistence adapter ──
//
// Serializes the auth slice (plus any configured collections) under one
// namespaced key, and rehydrates it into the initial tree at startup.
// Only `Record`s and the session are persisted, so request-only values
// such as attachments can never reach storage.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::{AuthSession, Record};
use crate::store::{Action, Middleware, RootState, Slice, SliceKey};

/// Storage key holding the whole persisted snapshot.
pub const PERSIST_KEY: &str = "persist:root";

/// Layout version of the persisted snapshot. Snapshots with any other
/// version are discarded on load.
pub const PERSIST_VERSION: u32 = 1;

// ── Storage backends ────────────────────────────────────────────────

/// Durable key/value storage for serialized state.
pub trait Storage: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, CoreError>;

    fn save(&self, key: &str, value: &str) -> Result<(), CoreError>;

    fn remove(&self, key: &str) -> Result<(), CoreError>;
}

/// One JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`; characters unsafe in file names become `-`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '-' })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl Storage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, CoreError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), CoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, CoreError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

// ── Snapshot layout ─────────────────────────────────────────────────

/// On-disk layout of the persisted subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    pub version: u32,
    #[serde(default)]
    pub auth: Option<AuthSession>,
    #[serde(default)]
    pub slices: BTreeMap<SliceKey, Vec<Record>>,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl PersistedState {
    /// Whether two snapshots carry the same data, ignoring timestamps.
    fn same_data(&self, other: &Self) -> bool {
        self.auth == other.auth && self.slices == other.slices
    }
}

/// Minimal header read first so unknown layouts can be rejected before
/// full deserialization.
#[derive(Deserialize)]
struct VersionHeader {
    version: Option<u32>,
}

// ── Persistor ───────────────────────────────────────────────────────

/// Reads and writes the persisted subset of the state tree.
pub struct Persistor {
    storage: Arc<dyn Storage>,
    slices: Vec<SliceKey>,
    last: Mutex<Option<PersistedState>>,
}

impl Persistor {
    /// Persist the auth slice plus the collections of `slices`.
    pub fn new(storage: Arc<dyn Storage>, slices: Vec<SliceKey>) -> Self {
        Self {
            storage,
            slices,
            last: Mutex::new(None),
        }
    }

    pub fn slices(&self) -> &[SliceKey] {
        &self.slices
    }

    /// Build the initial tree from storage.
    ///
    /// Missing, unreadable or version-mismatched snapshots yield the
    /// default tree; a storage I/O failure is an error.
    pub fn rehydrate(&self) -> Result<RootState, CoreError> {
        let Some(raw) = self.storage.load(PERSIST_KEY)? else {
            debug!("no persisted state");
            return Ok(RootState::default());
        };

        let Some(persisted) = decode(&raw) else {
            return Ok(RootState::default());
        };

        let mut state = RootState::default();
        state.auth.session.clone_from(&persisted.auth);
        for (key, items) in &persisted.slices {
            if self.slices.contains(key) {
                *state.slice_mut(*key) = Slice::with_items(items.clone());
            }
        }

        debug!(
            authenticated = persisted.auth.is_some(),
            slices = persisted.slices.len(),
            "rehydrated persisted state"
        );
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(persisted);
        Ok(state)
    }

    /// The persisted subset of `state`.
    pub fn extract(&self, state: &RootState) -> PersistedState {
        PersistedState {
            version: PERSIST_VERSION,
            auth: state.auth.session.clone(),
            slices: self
                .slices
                .iter()
                .map(|key| (*key, state.slice(*key).items.clone()))
                .collect(),
            saved_at: None,
        }
    }

    /// Write the persisted subset if it changed since the last write.
    /// Returns whether anything was written.
    pub fn persist(&self, state: &RootState) -> Result<bool, CoreError> {
        let mut next = self.extract(state);
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        if last.as_ref().is_some_and(|prev| prev.same_data(&next)) {
            return Ok(false);
        }

        next.saved_at = Some(Utc::now());
        let serialized = serde_json::to_string(&next)?;
        self.storage.save(PERSIST_KEY, &serialized)?;
        debug!(bytes = serialized.len(), "persisted state");
        *last = Some(next);
        Ok(true)
    }

    /// Remove the persisted snapshot.
    pub fn purge(&self) -> Result<(), CoreError> {
        self.storage.remove(PERSIST_KEY)?;
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

fn decode(raw: &str) -> Option<PersistedState> {
    let header: VersionHeader = match serde_json::from_str(raw) {
        Ok(header) => header,
        Err(e) => {
            warn!(error = %e, "discarding unreadable persisted state");
            return None;
        }
    };
    if header.version != Some(PERSIST_VERSION) {
        warn!(
            found = ?header.version,
            expected = PERSIST_VERSION,
            "discarding persisted state with unknown version"
        );
        return None;
    }
    match serde_json::from_str(raw) {
        Ok(persisted) => Some(persisted),
        Err(e) => {
            warn!(error = %e, "discarding malformed persisted state");
            None
        }
    }
}

/// Writes the persisted subset after every committed dispatch.
pub struct PersistenceMiddleware {
    persistor: Arc<Persistor>,
}

impl PersistenceMiddleware {
    pub fn new(persistor: Arc<Persistor>) -> Self {
        Self { persistor }
    }
}

impl Middleware for PersistenceMiddleware {
    fn after(&self, _action: &Action, state: &RootState) -> Result<(), CoreError> {
        self.persistor.persist(state).map(|_| ())
    }
}
