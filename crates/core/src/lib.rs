//! Core types for the Feedview state machines.
//!
//! State machines consume [`Event`]s and return [`Action`]s. They never
//! perform I/O, read clocks, or spawn timers themselves; a runner does all
//! of that (the deterministic simulation runner in tests, the tokio runner
//! in production).

mod action;
mod error;
mod event;
mod traits;

pub use action::{Action, ActivationReason, TimerId};
pub use error::ConfigurationError;
pub use event::Event;
pub use traits::StateMachine;
