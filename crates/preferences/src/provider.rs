//! Live preference providers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::PreferencesError;
use crate::schema::{PreferenceKey, Schema};
use crate::store::{PersistedStore, Subscription};

/// The "auto-like own posts" preference.
///
/// Reads the persisted value once, writes through on [`set`](Self::set),
/// and follows updates made by other writers for as long as it lives.
pub struct AutoLikeOwnPosts {
    store: Arc<PersistedStore>,
    value: Arc<AtomicBool>,
    _subscription: Subscription,
}

impl AutoLikeOwnPosts {
    const KEY: PreferenceKey = PreferenceKey::AutoLikeOwnPosts;

    /// Value used when no provider is in scope.
    pub fn default_value() -> bool {
        Schema::default().get(Self::KEY).unwrap_or(false)
    }

    /// Start tracking the preference held by `store`.
    pub fn new(store: Arc<PersistedStore>) -> Self {
        let value = Arc::new(AtomicBool::new(store.get(Self::KEY).unwrap_or(false)));

        let tracked = value.clone();
        let subscription = store.on_update(Self::KEY, move |next| {
            tracked.store(next.unwrap_or(false), Ordering::SeqCst);
        });

        Self {
            store,
            value,
            _subscription: subscription,
        }
    }

    /// Current value.
    pub fn get(&self) -> bool {
        self.value.load(Ordering::SeqCst)
    }

    /// Update the value and persist it.
    ///
    /// The in-memory value changes even if persisting fails.
    pub fn set(&self, enabled: bool) -> Result<(), PreferencesError> {
        self.value.store(enabled, Ordering::SeqCst);
        self.store.write(Self::KEY, Some(enabled))
    }
}

impl std::fmt::Debug for AutoLikeOwnPosts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoLikeOwnPosts")
            .field("value", &self.get())
            .finish()
    }
}
