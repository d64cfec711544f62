//! Active-view arbiter state machine.
//!
//! Many independently mounted video views report their vertical position;
//! the arbiter decides which single one is active (audible/autoplaying).
//!
//! # Architecture
//!
//! The arbiter processes events synchronously:
//!
//! - `Event::PositionReported` → Record position, run the immediate safe-zone
//!   sweep, then the per-report tie-break rules
//! - `Event::ActivationRequested` → Manual activation, shielded from the
//!   periodic sweep
//! - `Event::SweepTimer` → Re-arm the timer and, unless manually locked,
//!   promote the most centered view inside the safe zone
//! - `Event::ViewUnregistered` → Drop the view's position entry
//! - `Event::ViewportResized` → Update the geometry used by later evaluations
//!
//! Timers and notifications are carried out by the runner via returned
//! `Action`s.

mod config;
mod state;
mod tracker;

pub use config::{ArbiterConfig, MIN_SWEEP_INTERVAL};
pub use state::ActiveViewState;
pub use tracker::PositionTracker;
