//! Deterministic simulation runner.
//!
//! This crate drives the arbiter against a virtual clock. Given the same
//! scenario, it produces identical activation histories every run, which is
//! how sweep timing and scroll sequences are tested without real time.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  SimulationRunner                       │
//! │                                                         │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     Event Queue (BTreeMap<EventKey, Event>)        │ │
//! │  │     Ordered by: time, sequence                     │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     ActiveViewState (one event at a time)          │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     Actions → timers, activation history           │ │
//! │  └────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────┘
//! ```

mod event_queue;
mod runner;
mod scenario;

pub use event_queue::EventKey;
pub use runner::{ActivationRecord, SimulationRunner, SimulationStats};
pub use scenario::{Scenario, ScenarioError, Step, StepKind};
