//! Vertical viewport geometry.

/// Fraction of the viewport height used as the safe-zone radius.
pub const DEFAULT_SAFE_ZONE_RATIO: f64 = 0.35;

/// The visible vertical band, in pixels.
///
/// Only the height matters for arbitration. Everything else is derived on
/// demand so that a resize is picked up by the very next evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    height: f64,
    safe_zone_ratio: f64,
}

impl Viewport {
    /// Create a viewport with the default safe-zone ratio.
    pub fn new(height: f64) -> Self {
        Self::with_safe_zone_ratio(height, DEFAULT_SAFE_ZONE_RATIO)
    }

    /// Create a viewport with a custom safe-zone ratio.
    pub fn with_safe_zone_ratio(height: f64, safe_zone_ratio: f64) -> Self {
        Self {
            height,
            safe_zone_ratio,
        }
    }

    /// Viewport height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Replace the height, keeping the safe-zone ratio.
    pub fn set_height(&mut self, height: f64) {
        self.height = height;
    }

    /// Safe-zone ratio this viewport was built with.
    pub fn safe_zone_ratio(&self) -> f64 {
        self.safe_zone_ratio
    }

    /// Vertical center.
    pub fn center(&self) -> f64 {
        self.height / 2.0
    }

    /// Radius of the safe zone around the center.
    pub fn safe_zone_radius(&self) -> f64 {
        self.height * self.safe_zone_ratio
    }

    /// Absolute distance from `y` to the center.
    pub fn distance_to_center(&self, y: f64) -> f64 {
        (y - self.center()).abs()
    }

    /// Whether `y` lies strictly inside the safe zone.
    pub fn in_safe_zone(&self, y: f64) -> bool {
        self.distance_to_center(y) < self.safe_zone_radius()
    }

    /// Whether `y` lies strictly inside `(0, height)`.
    pub fn contains(&self, y: f64) -> bool {
        y > 0.0 && y < self.height
    }
}
