//! Last-reported positions of registered views.

use feedview_types::ViewId;
use indexmap::IndexMap;

/// Tracks the most recent position reported by each registered view.
///
/// The arbiter's copy is non-authoritative: the view owns its real layout,
/// and an entry lives only from the first report until the view
/// unregisters. Iteration follows first-report order, which is what breaks
/// exact distance ties in the safe-zone sweep (the earlier reporter wins).
#[derive(Debug, Default, Clone)]
pub struct PositionTracker {
    /// view -> last reported y
    positions: IndexMap<ViewId, f64>,
}

impl PositionTracker {
    /// Create a new empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a position, replacing any earlier report from the same view.
    ///
    /// A view keeps its original iteration slot when it reports again.
    pub fn record(&mut self, view: ViewId, y: f64) {
        self.positions.insert(view, y);
    }

    /// Remove a view, returning its last position if it had reported.
    pub fn remove(&mut self, view: ViewId) -> Option<f64> {
        self.positions.shift_remove(&view)
    }

    /// Last reported position of a view.
    pub fn get(&self, view: ViewId) -> Option<f64> {
        self.positions.get(&view).copied()
    }

    /// Iterate `(view, y)` in first-report order.
    pub fn iter(&self) -> impl Iterator<Item = (ViewId, f64)> + '_ {
        self.positions.iter().map(|(view, y)| (*view, *y))
    }

    /// Get the number of views being tracked.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Check if the tracker is empty.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
