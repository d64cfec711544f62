//! Provider: mounts one arbiter and hands out registrant handles.

use feedview_arbiter::ActiveViewState;
use feedview_core::{ConfigurationError, Event};
use feedview_types::{Platform, ViewId, ViewIdAllocator};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::ProviderConfig;
use crate::handle::RegistrantHandle;
use crate::runner::ArbiterTask;

/// One mounted arbiter scope (a screen or a whole app).
///
/// Mounting spawns the arbiter task and starts the sweep timer. The scope
/// ends with [`unmount`](Self::unmount), or when the provider is dropped;
/// either way the task is cancelled and no sweep fires afterwards.
pub struct ArbiterProvider {
    platform: Platform,
    events: mpsc::UnboundedSender<Event>,
    active: watch::Receiver<Option<ViewId>>,
    ids: ViewIdAllocator,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl ArbiterProvider {
    /// Mount a provider.
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::UnsupportedPlatform`] unless the platform is web
    /// - [`ConfigurationError::NoRuntime`] when called outside a tokio runtime
    pub fn mount(config: ProviderConfig) -> Result<Self, ConfigurationError> {
        if !config.platform.is_web() {
            return Err(ConfigurationError::UnsupportedPlatform(config.platform));
        }
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| ConfigurationError::NoRuntime)?;

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (active_tx, active_rx) = watch::channel(None);
        let cancel = CancellationToken::new();

        let state = ActiveViewState::new(config.arbiter.clone(), config.viewport_height);
        let task = ArbiterTask::new(state, event_rx, active_tx, cancel.clone());
        let task = runtime.spawn(task.run());

        info!(
            platform = %config.platform,
            viewport_height = config.viewport_height,
            sweep_interval = ?config.arbiter.sweep_interval,
            "Mounted active video provider"
        );

        Ok(Self {
            platform: config.platform,
            events: event_tx,
            active: active_rx,
            ids: ViewIdAllocator::new(),
            cancel,
            task: Some(task),
        })
    }

    /// Register a new view and return its handle.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::ProviderNotMounted`] if the arbiter task has
    /// already stopped.
    pub fn register(&self) -> Result<RegistrantHandle, ConfigurationError> {
        if !self.is_mounted() {
            return Err(ConfigurationError::ProviderNotMounted);
        }
        let id = self.ids.allocate();
        Ok(RegistrantHandle::new(
            id,
            self.events.clone(),
            self.active.clone(),
        ))
    }

    /// Whether the arbiter task is still accepting events.
    pub fn is_mounted(&self) -> bool {
        !self.cancel.is_cancelled() && !self.events.is_closed()
    }

    /// Platform this provider was mounted on.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Snapshot of the active view.
    pub fn active_view(&self) -> Option<ViewId> {
        *self.active.borrow()
    }

    /// Report a new window height.
    pub fn resize(&self, height: f64) {
        if self.events.send(Event::ViewportResized { height }).is_err() {
            warn!(height, "Resize after provider unmounted");
        }
    }

    /// Stop the arbiter and wait for its task to finish.
    ///
    /// When this returns, the sweep timer is gone and every handle's
    /// `active_changed` resolves immediately.
    pub async fn unmount(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "Arbiter task ended abnormally");
            }
        }
        info!("Unmounted active video provider");
    }
}

impl Drop for ArbiterProvider {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for ArbiterProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArbiterProvider")
            .field("platform", &self.platform)
            .field("mounted", &self.is_mounted())
            .field("active", &self.active_view())
            .finish()
    }
}
