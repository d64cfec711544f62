//! Inbound events for the arbiter state machine.

use feedview_types::ViewId;

/// Everything that can happen to the arbiter.
///
/// Events are delivered strictly in the order the runner dequeues them.
/// Timer events are ordinary events; they never race a report.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    // ═══════════════════════════════════════════════════════════════════════
    // Registrant Events
    // ═══════════════════════════════════════════════════════════════════════
    /// A registrant reported its current vertical position.
    PositionReported { view: ViewId, y: f64 },

    /// A registrant asked to become active (explicit tap or programmatic).
    ActivationRequested { view: ViewId },

    /// A registrant unmounted.
    ViewUnregistered { view: ViewId },

    // ═══════════════════════════════════════════════════════════════════════
    // Environment Events
    // ═══════════════════════════════════════════════════════════════════════
    /// The hosting window changed height.
    ViewportResized { height: f64 },

    // ═══════════════════════════════════════════════════════════════════════
    // Timer Events
    // ═══════════════════════════════════════════════════════════════════════
    /// Periodic safe-zone correction sweep.
    SweepTimer,
}

impl Event {
    /// Get a human-readable name for this event type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Event::PositionReported { .. } => "PositionReported",
            Event::ActivationRequested { .. } => "ActivationRequested",
            Event::ViewUnregistered { .. } => "ViewUnregistered",
            Event::ViewportResized { .. } => "ViewportResized",
            Event::SweepTimer => "SweepTimer",
        }
    }

    /// The registrant this event concerns, if any.
    pub fn view(&self) -> Option<ViewId> {
        match self {
            Event::PositionReported { view, .. }
            | Event::ActivationRequested { view }
            | Event::ViewUnregistered { view } => Some(*view),
            Event::ViewportResized { .. } | Event::SweepTimer => None,
        }
    }

    /// Check if this is a timer event.
    pub fn is_timer(&self) -> bool {
        matches!(self, Event::SweepTimer)
    }
}
