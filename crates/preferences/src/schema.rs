//! The persisted preference schema.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Keys of the persisted schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    /// Like your own posts automatically when publishing them.
    AutoLikeOwnPosts,
}

impl PreferenceKey {
    /// Every key, in schema order.
    pub const ALL: [PreferenceKey; 1] = [PreferenceKey::AutoLikeOwnPosts];

    /// Name of the key in the persisted JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            PreferenceKey::AutoLikeOwnPosts => "autoLikeOwnPosts",
        }
    }
}

impl fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted preferences.
///
/// Values are optional: an explicit `null` in storage is kept as `None`
/// and read as `false` by providers. Keys missing from storage take their
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Schema {
    pub auto_like_own_posts: Option<bool>,
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            auto_like_own_posts: Some(false),
        }
    }
}

impl Schema {
    /// Get a value by key.
    pub fn get(&self, key: PreferenceKey) -> Option<bool> {
        match key {
            PreferenceKey::AutoLikeOwnPosts => self.auto_like_own_posts,
        }
    }

    /// Set a value by key.
    pub fn set(&mut self, key: PreferenceKey, value: Option<bool>) {
        match key {
            PreferenceKey::AutoLikeOwnPosts => self.auto_like_own_posts = value,
        }
    }

    /// Keys whose values differ between `self` and `other`.
    pub fn changed_keys(&self, other: &Schema) -> Vec<PreferenceKey> {
        PreferenceKey::ALL
            .into_iter()
            .filter(|key| self.get(*key) != other.get(*key))
            .collect()
    }
}
