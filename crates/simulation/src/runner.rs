//! Single-threaded event loop over virtual time.

use feedview_arbiter::ActiveViewState;
use feedview_core::{Action, ActivationReason, Event, StateMachine, TimerId};
use feedview_types::ViewId;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::{debug, trace};

use crate::event_queue::EventKey;

/// One change of the active view, as observed by the runner.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivationRecord {
    /// Virtual time of the change.
    pub at: Duration,
    /// View active before the change.
    pub previous: Option<ViewId>,
    /// View active after the change.
    pub current: Option<ViewId>,
    /// Why it changed.
    pub reason: ActivationReason,
}

/// Counters collected during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationStats {
    /// Events handed to the state machine.
    pub events_processed: u64,
    /// Sweep timer firings.
    pub sweeps: u64,
    /// Changes of the active view.
    pub activation_changes: u64,
}

/// Deterministic runner for one arbiter.
///
/// Owns the state machine, a virtual clock and the event queue. Timer
/// actions become queued `SweepTimer` events; `ActiveViewChanged` actions
/// are appended to the history.
pub struct SimulationRunner {
    state: ActiveViewState,
    queue: BTreeMap<EventKey, Event>,
    /// Pending timer events, so re-arming replaces instead of stacking.
    timers: HashMap<TimerId, EventKey>,
    now: Duration,
    next_sequence: u64,
    history: Vec<ActivationRecord>,
    stats: SimulationStats,
}

impl SimulationRunner {
    /// Create a runner and start the state machine at time zero.
    pub fn new(mut state: ActiveViewState) -> Self {
        state.set_time(Duration::ZERO);
        let start_actions = state.on_start();

        let mut runner = Self {
            state,
            queue: BTreeMap::new(),
            timers: HashMap::new(),
            now: Duration::ZERO,
            next_sequence: 0,
            history: Vec::new(),
            stats: SimulationStats::default(),
        };
        runner.process_actions(start_actions);
        runner
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// The state machine.
    pub fn state(&self) -> &ActiveViewState {
        &self.state
    }

    /// Currently active view.
    pub fn active_view(&self) -> Option<ViewId> {
        self.state.active_view()
    }

    /// Every active-view change so far, in order.
    pub fn history(&self) -> &[ActivationRecord] {
        &self.history
    }

    /// Counters for this run.
    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    /// Number of queued events, timers included.
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Queue an event at an absolute virtual time.
    ///
    /// Times in the past are clamped to now, so the event fires next among
    /// events at the current instant.
    pub fn schedule(&mut self, at: Duration, event: Event) -> EventKey {
        let key = EventKey::new(at.max(self.now), self.next_sequence);
        self.next_sequence += 1;
        self.queue.insert(key, event);
        key
    }

    /// Process the next event. Returns false if the queue is empty.
    pub fn step(&mut self) -> bool {
        let Some((key, event)) = self.queue.pop_first() else {
            return false;
        };

        if event.is_timer() {
            self.timers.remove(&TimerId::Sweep);
            self.stats.sweeps += 1;
        }

        self.now = key.time;
        self.state.set_time(self.now);
        self.stats.events_processed += 1;

        trace!(now = ?self.now, event = event.type_name(), "Processing event");
        let actions = self.state.handle(event);
        self.process_actions(actions);
        true
    }

    /// Process every event due at or before `end`, then advance the clock
    /// to `end`.
    ///
    /// The sweep timer re-arms itself forever, so this always terminates at
    /// `end` rather than on an empty queue.
    pub fn run_until(&mut self, end: Duration) {
        while let Some((key, _)) = self.queue.first_key_value() {
            if key.time > end {
                break;
            }
            self.step();
        }
        self.now = self.now.max(end);
    }

    /// Advance the clock by `duration`, processing everything due.
    pub fn run_for(&mut self, duration: Duration) {
        let end = self.now + duration;
        self.run_until(end);
    }

    fn process_actions(&mut self, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::SetTimer { id, duration } => {
                    if let Some(old) = self.timers.remove(&id) {
                        self.queue.remove(&old);
                    }
                    let key = self.schedule(self.now + duration, timer_event(id));
                    self.timers.insert(id, key);
                }
                Action::ActiveViewChanged {
                    previous,
                    current,
                    reason,
                } => {
                    debug!(
                        at = ?self.now,
                        ?previous,
                        ?current,
                        %reason,
                        "Active view changed"
                    );
                    self.stats.activation_changes += 1;
                    self.history.push(ActivationRecord {
                        at: self.now,
                        previous,
                        current,
                        reason,
                    });
                }
            }
        }
    }
}

fn timer_event(id: TimerId) -> Event {
    match id {
        TimerId::Sweep => Event::SweepTimer,
    }
}
