//! Provider configuration.

use feedview_arbiter::ArbiterConfig;
use feedview_types::Platform;

/// Configuration for mounting an [`ArbiterProvider`](crate::ArbiterProvider).
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Surface the provider is mounted on. Only `Platform::Web` is accepted.
    pub platform: Platform,

    /// Window height at mount time. Later changes arrive through
    /// `ArbiterProvider::resize`.
    pub viewport_height: f64,

    /// Arbitration tuning.
    pub arbiter: ArbiterConfig,
}

impl ProviderConfig {
    /// Web provider with default arbitration settings.
    pub fn web(viewport_height: f64) -> Self {
        Self {
            platform: Platform::Web,
            viewport_height,
            arbiter: ArbiterConfig::default(),
        }
    }

    /// Set the platform.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Set the arbiter configuration.
    pub fn with_arbiter(mut self, arbiter: ArbiterConfig) -> Self {
        self.arbiter = arbiter;
        self
    }
}
