//! Per-registrant view of the arbiter.

use feedview_core::{ConfigurationError, Event};
use feedview_types::ViewId;
use tokio::sync::{mpsc, watch};
use tracing::warn;

use crate::provider::ArbiterProvider;

/// What one mounted video view sees of the arbiter.
///
/// Dropping the handle unregisters the view, so its last position can no
/// longer win a sweep.
pub struct RegistrantHandle {
    id: ViewId,
    events: mpsc::UnboundedSender<Event>,
    active: watch::Receiver<Option<ViewId>>,
}

impl RegistrantHandle {
    pub(crate) fn new(
        id: ViewId,
        events: mpsc::UnboundedSender<Event>,
        mut active: watch::Receiver<Option<ViewId>>,
    ) -> Self {
        // Only changes after registration count for `active_changed`.
        active.borrow_and_update();
        Self { id, events, active }
    }

    /// Obtain a handle from whatever provider is in scope.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::ProviderNotMounted`] when there is no provider,
    /// or it has been unmounted.
    pub fn from_context(provider: Option<&ArbiterProvider>) -> Result<Self, ConfigurationError> {
        provider
            .ok_or(ConfigurationError::ProviderNotMounted)?
            .register()
    }

    /// This view's id.
    pub fn id(&self) -> ViewId {
        self.id
    }

    /// Whether this view is the active one.
    pub fn is_active(&self) -> bool {
        *self.active.borrow() == Some(self.id)
    }

    /// The active view, whoever it is.
    pub fn current_active_view(&self) -> Option<ViewId> {
        *self.active.borrow()
    }

    /// Ask to become the active view (explicit tap).
    pub fn set_active(&self) {
        self.send(Event::ActivationRequested { view: self.id });
    }

    /// Report this view's current vertical position.
    pub fn send_position(&self, y: f64) {
        self.send(Event::PositionReported { view: self.id, y });
    }

    /// Wait for the next change of the active view and return it.
    ///
    /// Resolves immediately with the last known value once the provider
    /// has unmounted.
    pub async fn active_changed(&mut self) -> Option<ViewId> {
        // An error only means the arbiter task is gone.
        let _ = self.active.changed().await;
        *self.active.borrow_and_update()
    }

    fn send(&self, event: Event) {
        if self.events.send(event).is_err() {
            warn!(view = %self.id, "Provider unmounted, dropping event");
        }
    }
}

impl Drop for RegistrantHandle {
    fn drop(&mut self) {
        // Nobody to tell if the provider is already gone.
        let _ = self.events.send(Event::ViewUnregistered { view: self.id });
    }
}

impl std::fmt::Debug for RegistrantHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrantHandle")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
