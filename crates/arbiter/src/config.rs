//! Configuration for active-view arbitration.

use feedview_types::DEFAULT_SAFE_ZONE_RATIO;
use std::time::Duration;

/// Shortest sweep interval the arbiter will arm.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Tuning knobs for the arbiter.
#[derive(Debug, Clone, PartialEq)]
pub struct ArbiterConfig {
    /// Period of the safe-zone correction sweep.
    pub sweep_interval: Duration,

    /// Safe-zone radius as a fraction of the viewport height.
    ///
    /// A view whose distance to the vertical center is strictly below
    /// `height * safe_zone_ratio` is inside the safe zone.
    pub safe_zone_ratio: f64,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_millis(100),
            safe_zone_ratio: DEFAULT_SAFE_ZONE_RATIO,
        }
    }
}

impl ArbiterConfig {
    /// Set the sweep interval. Raised to [`MIN_SWEEP_INTERVAL`]; a zero
    /// interval would re-fire the sweep without ever yielding.
    pub fn with_sweep_interval(mut self, sweep_interval: Duration) -> Self {
        self.sweep_interval = sweep_interval.max(MIN_SWEEP_INTERVAL);
        self
    }

    /// Set the safe-zone ratio. Clamped to `[0, 0.5]`; beyond one half the
    /// zone would reach past the viewport edges.
    pub fn with_safe_zone_ratio(mut self, ratio: f64) -> Self {
        self.safe_zone_ratio = ratio.clamp(0.0, 0.5);
        self
    }
}
