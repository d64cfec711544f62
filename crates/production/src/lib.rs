//! Production runner for the active-view arbiter.
//!
//! An [`ArbiterProvider`] confines one [`ActiveViewState`] to a single tokio
//! task. Registrants talk to it only through their [`RegistrantHandle`]:
//! reports and activations are queued on an unbounded channel and handled
//! strictly in order, interleaved with the sweep timer by the task's
//! `select!` loop. The active view is published back through a watch
//! channel so every handle can read a snapshot without blocking.
//!
//! ```text
//!  RegistrantHandle ──┐
//!  RegistrantHandle ──┼── mpsc<Event> ──▶ arbiter task ──▶ watch<Option<ViewId>>
//!  ArbiterProvider ───┘                   (sweep timer)          │
//!          ▲                                                     │
//!          └──────────────────── snapshots ◀─────────────────────┘
//! ```
//!
//! [`ActiveViewState`]: feedview_arbiter::ActiveViewState

mod config;
mod handle;
mod provider;
mod runner;

pub use config::ProviderConfig;
pub use handle::RegistrantHandle;
pub use provider::ArbiterProvider;
