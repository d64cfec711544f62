//! Wiring errors.

use feedview_types::Platform;
use thiserror::Error;

/// A provider or registrant was wired up incorrectly.
///
/// These indicate programmer errors, not runtime conditions: callers should
/// surface them immediately rather than retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// Active-view arbitration is only available on the web surface.
    #[error("active video arbitration may only be used on web, not {0}")]
    UnsupportedPlatform(Platform),

    /// A registrant asked for its handle without a mounted provider.
    #[error("registrant handle must be obtained within a mounted active video provider")]
    ProviderNotMounted,

    /// The provider was mounted outside an async runtime.
    #[error("active video provider must be mounted inside a tokio runtime")]
    NoRuntime,
}
