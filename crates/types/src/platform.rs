//! Deployment target of the hosting client.

use std::fmt;

/// The surface a provider is mounted on.
///
/// Active-view arbitration only exists on the web surface; native surfaces
/// drive playback through their own list virtualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Web,
    Ios,
    Android,
}

impl Platform {
    /// Whether this is the web surface.
    pub fn is_web(self) -> bool {
        matches!(self, Platform::Web)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Web => "web",
            Platform::Ios => "ios",
            Platform::Android => "android",
        };
        f.write_str(name)
    }
}
