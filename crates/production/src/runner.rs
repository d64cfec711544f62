//! The arbiter task.

use feedview_arbiter::ActiveViewState;
use feedview_core::{Action, Event, StateMachine, TimerId};
use feedview_types::ViewId;
use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Owns the arbiter state for the lifetime of one provider.
pub(crate) struct ArbiterTask {
    state: ActiveViewState,
    events: mpsc::UnboundedReceiver<Event>,
    active: watch::Sender<Option<ViewId>>,
    cancel: CancellationToken,
    /// Deadline of the armed sweep timer.
    sweep_deadline: Option<Instant>,
    started_at: Instant,
}

impl ArbiterTask {
    pub(crate) fn new(
        state: ActiveViewState,
        events: mpsc::UnboundedReceiver<Event>,
        active: watch::Sender<Option<ViewId>>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            state,
            events,
            active,
            cancel,
            sweep_deadline: None,
            started_at: Instant::now(),
        }
    }

    /// Run until cancelled or until every sender is gone.
    ///
    /// Cancellation is polled first on every iteration, so no event or
    /// timer is handled once the token fires.
    pub(crate) async fn run(mut self) {
        self.state.set_time(self.started_at.elapsed());
        let actions = self.state.on_start();
        self.apply(actions);

        loop {
            let event = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                received = self.events.recv() => match received {
                    Some(event) => event,
                    None => break,
                },
                _ = wait_for(self.sweep_deadline) => {
                    self.sweep_deadline = None;
                    Event::SweepTimer
                }
            };

            trace!(event = event.type_name(), view = ?event.view(), "Handling event");
            self.state.set_time(self.started_at.elapsed());
            let actions = self.state.handle(event);
            self.apply(actions);
        }

        debug!(active = ?self.state.active_view(), "Arbiter task stopped");
    }

    fn apply(&mut self, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::SetTimer {
                    id: TimerId::Sweep,
                    duration,
                } => {
                    self.sweep_deadline = Some(Instant::now() + duration);
                }
                Action::ActiveViewChanged {
                    previous,
                    current,
                    reason,
                } => {
                    debug!(
                        ?previous,
                        ?current,
                        %reason,
                        heuristic = reason.is_heuristic(),
                        "Publishing active view"
                    );
                    self.active.send_replace(current);
                }
            }
        }
    }
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
