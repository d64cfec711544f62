//! Persisted user preferences.
//!
//! [`PersistedStore`] holds the persisted [`Schema`], optionally backed by a
//! JSON file, and notifies subscribers when another writer (another window,
//! another process) changes a value. Providers such as
//! [`AutoLikeOwnPosts`] keep a live copy of one preference: read once at
//! construction, written through on set, refreshed on external updates.

mod error;
mod provider;
mod schema;
mod store;

pub use error::PreferencesError;
pub use provider::AutoLikeOwnPosts;
pub use schema::{PreferenceKey, Schema};
pub use store::{PersistedStore, Subscription};
