//! Persisted preference store.

use parking_lot::{Mutex, RwLock};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

use crate::error::PreferencesError;
use crate::schema::{PreferenceKey, Schema};

type Listener = Arc<dyn Fn(Option<bool>) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, PreferenceKey, Listener)>,
}

/// Holds the persisted schema and its update subscribers.
///
/// Local writes are persisted but not echoed to subscribers: the writer
/// already knows the value. Subscribers hear only about changes made by
/// someone else, delivered through [`apply_external`](Self::apply_external)
/// or [`reload`](Self::reload).
pub struct PersistedStore {
    /// Backing file; `None` keeps everything in memory.
    path: Option<PathBuf>,
    schema: RwLock<Schema>,
    listeners: Arc<Mutex<Listeners>>,
}

impl PersistedStore {
    /// A store that lives only in memory, starting from defaults.
    pub fn in_memory() -> Self {
        Self::with_schema(None, Schema::default())
    }

    /// Open a JSON-file-backed store. A missing file starts from defaults
    /// and is created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PreferencesError> {
        let path = path.into();
        let schema = read_schema(&path)?.unwrap_or_default();
        debug!(path = %path.display(), "Opened preference store");
        Ok(Self::with_schema(Some(path), schema))
    }

    fn with_schema(path: Option<PathBuf>, schema: Schema) -> Self {
        Self {
            path,
            schema: RwLock::new(schema),
            listeners: Arc::new(Mutex::new(Listeners::default())),
        }
    }

    /// Current value of a preference.
    pub fn get(&self, key: PreferenceKey) -> Option<bool> {
        self.schema.read().get(key)
    }

    /// Snapshot of the whole schema.
    pub fn snapshot(&self) -> Schema {
        self.schema.read().clone()
    }

    /// Persist a new value.
    ///
    /// The schema stays write-locked until the file is replaced, so the
    /// file always holds the last value set in memory.
    pub fn write(&self, key: PreferenceKey, value: Option<bool>) -> Result<(), PreferencesError> {
        let mut schema = self.schema.write();
        schema.set(key, value);
        self.persist(&schema)?;
        debug!(%key, ?value, "Wrote preference");
        Ok(())
    }

    /// Adopt a schema written by someone else and notify subscribers of
    /// every key whose value changed.
    ///
    /// Waits for any in-flight [`write`](Self::write) to finish persisting.
    pub fn apply_external(&self, incoming: Schema) {
        let changed = {
            let mut schema = self.schema.write();
            let changed = schema.changed_keys(&incoming);
            *schema = incoming.clone();
            changed
        };

        for key in changed {
            debug!(%key, value = ?incoming.get(key), "External preference update");
            self.notify(key, incoming.get(key));
        }
    }

    /// Re-read the backing file and apply it as an external update.
    ///
    /// No-op for in-memory stores and when the file does not exist.
    pub fn reload(&self) -> Result<(), PreferencesError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(schema) = read_schema(path)? {
            self.apply_external(schema);
        }
        Ok(())
    }

    /// Call `listener` with the new value whenever `key` changes externally.
    ///
    /// The subscription ends when the returned [`Subscription`] is dropped.
    pub fn on_update<F>(&self, key: PreferenceKey, listener: F) -> Subscription
    where
        F: Fn(Option<bool>) + Send + Sync + 'static,
    {
        let mut listeners = self.listeners.lock();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, key, Arc::new(listener)));

        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.listeners.lock().entries.len()
    }

    fn notify(&self, key: PreferenceKey, value: Option<bool>) {
        // Call outside the lock; listeners may subscribe or read the store.
        let matching: Vec<Listener> = self
            .listeners
            .lock()
            .entries
            .iter()
            .filter(|(_, k, _)| *k == key)
            .map(|(_, _, listener)| listener.clone())
            .collect();

        for listener in matching {
            listener(value);
        }
    }

    /// Replace the backing file. Callers hold the schema write lock.
    fn persist(&self, schema: &Schema) -> Result<(), PreferencesError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let json = serde_json::to_vec_pretty(schema)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|source| io_error(&tmp, source))?;
        std::fs::rename(&tmp, path).map_err(|source| io_error(path, source))?;
        Ok(())
    }
}

impl std::fmt::Debug for PersistedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistedStore")
            .field("path", &self.path)
            .field("schema", &*self.schema.read())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Live registration of an update listener. Dropping it unsubscribes.
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    listeners: Weak<Mutex<Listeners>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.lock().entries.retain(|(id, _, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

fn read_schema(path: &Path) -> Result<Option<Schema>, PreferencesError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => {
            warn!(path = %path.display(), error = %source, "Failed to read preferences");
            Err(io_error(path, source))
        }
    }
}

fn io_error(path: &Path, source: std::io::Error) -> PreferencesError {
    PreferencesError::Io {
        path: path.to_path_buf(),
        source,
    }
}
