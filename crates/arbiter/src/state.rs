//! Active-view arbiter state.
//!
//! Decides which single registrant is active. Two mechanisms cooperate:
//!
//! - **Per-report evaluation**: every position report runs the safe-zone
//!   sweep immediately, then falls back to pairwise tie-break rules between
//!   the reporter and the current active view.
//! - **Periodic sweep**: every `sweep_interval` the safe-zone sweep runs on
//!   its own, so the choice converges even when no reports arrive. A manual
//!   activation suspends this sweep (but not the per-report one) until the
//!   heuristic promotes someone else.

use feedview_core::{Action, ActivationReason, Event, StateMachine, TimerId};
use feedview_types::{ViewId, Viewport};
use std::time::Duration;
use tracing::{debug, trace};

use crate::config::{ArbiterConfig, MIN_SWEEP_INTERVAL};
use crate::tracker::PositionTracker;

/// Arbiter state for one provider.
///
/// Owned by exactly one runner; all mutation goes through [`StateMachine::handle`]
/// or the equivalent `pub` methods below, one event at a time.
pub struct ActiveViewState {
    /// Arbitration configuration.
    config: ArbiterConfig,

    /// Current viewport geometry.
    viewport: Viewport,

    /// Last reported position per registered view.
    positions: PositionTracker,

    /// Currently active view.
    active: Option<ViewId>,

    /// Best-known position of the active view; infinity when unknown.
    active_location: f64,

    /// Whether `active` came from an explicit activation.
    manually_set: bool,

    /// Current time.
    now: Duration,
}

impl ActiveViewState {
    /// Create a new arbiter for a viewport of the given height.
    ///
    /// A `sweep_interval` set below [`MIN_SWEEP_INTERVAL`] through the
    /// public field is raised to it.
    pub fn new(mut config: ArbiterConfig, viewport_height: f64) -> Self {
        config.sweep_interval = config.sweep_interval.max(MIN_SWEEP_INTERVAL);
        let viewport = Viewport::with_safe_zone_ratio(viewport_height, config.safe_zone_ratio);
        Self {
            config,
            viewport,
            positions: PositionTracker::new(),
            active: None,
            active_location: f64::INFINITY,
            manually_set: false,
            now: Duration::ZERO,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Queries
    // ═══════════════════════════════════════════════════════════════════════════

    /// Get the active view, if any.
    pub fn active_view(&self) -> Option<ViewId> {
        self.active
    }

    /// Check if `view` is the active view.
    pub fn is_active(&self, view: ViewId) -> bool {
        self.active == Some(view)
    }

    /// Whether the active view was set manually.
    pub fn is_manually_set(&self) -> bool {
        self.manually_set
    }

    /// Best-known position of the active view.
    pub fn active_location(&self) -> f64 {
        self.active_location
    }

    /// Last reported position of a view.
    pub fn position(&self, view: ViewId) -> Option<f64> {
        self.positions.get(view)
    }

    /// Number of views that have reported and not unregistered.
    pub fn tracked_views(&self) -> usize {
        self.positions.len()
    }

    /// Current viewport geometry.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Arbitration configuration.
    pub fn config(&self) -> &ArbiterConfig {
        &self.config
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Operations
    // ═══════════════════════════════════════════════════════════════════════════

    /// Make `view` active unconditionally.
    ///
    /// The real position is unknown at this point; the viewport center is
    /// used so the view is never treated as off-screen by later comparisons.
    pub fn activate(&mut self, view: ViewId) -> Vec<Action> {
        let previous = self.active.replace(view);
        self.manually_set = true;
        self.active_location = self.viewport.center();

        if previous == Some(view) {
            return vec![];
        }

        debug!(%view, ?previous, "Manual activation");
        vec![Action::ActiveViewChanged {
            previous,
            current: Some(view),
            reason: ActivationReason::Manual,
        }]
    }

    /// Record a position report and re-evaluate the active view.
    pub fn report_position(&mut self, view: ViewId, y: f64) -> Vec<Action> {
        self.positions.record(view, y);

        // The immediate sweep ignores manual activation.
        if let Some(action) = self.sweep() {
            return vec![action];
        }

        if self.active == Some(view) {
            self.active_location = y;
            return vec![];
        }

        let new_in_safe_zone = self.viewport.in_safe_zone(y);
        let active_in_safe_zone = self.viewport.in_safe_zone(self.active_location);
        let new_distance = self.viewport.distance_to_center(y);
        let active_distance = self.viewport.distance_to_center(self.active_location);

        if new_in_safe_zone && !active_in_safe_zone {
            return vec![self.promote(view, y, ActivationReason::SafeZoneEntry)];
        }

        if new_in_safe_zone && active_in_safe_zone {
            if new_distance < active_distance {
                return vec![self.promote(view, y, ActivationReason::CloserInSafeZone)];
            }
            return vec![];
        }

        if new_distance < active_distance {
            // A manual choice is only usurped once it has left the screen.
            if self.manually_set && self.viewport.contains(self.active_location) {
                trace!(
                    %view,
                    y,
                    active_location = self.active_location,
                    "Closer view ignored, manual activation still on screen"
                );
                return vec![];
            }
            return vec![self.promote(view, y, ActivationReason::CloserToCenter)];
        }

        vec![]
    }

    /// Handle the periodic sweep timer.
    ///
    /// Always re-arms the timer; sweeps only when not manually locked.
    pub fn on_sweep_timer(&mut self) -> Vec<Action> {
        let mut actions = vec![Action::SetTimer {
            id: TimerId::Sweep,
            duration: self.config.sweep_interval,
        }];

        if self.manually_set {
            trace!(active = ?self.active, "Sweep skipped, manual activation");
            return actions;
        }
        if self.positions.is_empty() {
            trace!("Sweep skipped, no positions reported");
            return actions;
        }

        actions.extend(self.sweep());
        actions
    }

    /// Forget a view that unmounted.
    ///
    /// If it was active, nothing is active until the next report or sweep
    /// elects a successor.
    pub fn unregister(&mut self, view: ViewId) -> Vec<Action> {
        self.positions.remove(view);

        if self.active != Some(view) {
            return vec![];
        }

        self.active = None;
        self.active_location = f64::INFINITY;
        self.manually_set = false;

        debug!(%view, "Active view unregistered");
        vec![Action::ActiveViewChanged {
            previous: Some(view),
            current: None,
            reason: ActivationReason::Unregistered,
        }]
    }

    /// Apply a new viewport height. Takes effect at the next evaluation.
    pub fn resize(&mut self, height: f64) -> Vec<Action> {
        debug!(
            old_height = self.viewport.height(),
            new_height = height,
            "Viewport resized"
        );
        self.viewport.set_height(height);
        vec![]
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Internal
    // ═══════════════════════════════════════════════════════════════════════════

    /// The view inside the safe zone closest to center, with its position.
    ///
    /// Only a strictly smaller distance replaces the current best, so the
    /// earliest reporter wins a tie.
    fn best_in_safe_zone(&self) -> Option<(ViewId, f64)> {
        let radius = self.viewport.safe_zone_radius();
        let mut best: Option<(ViewId, f64, f64)> = None;

        for (view, y) in self.positions.iter() {
            let distance = self.viewport.distance_to_center(y);
            if distance >= radius || distance.is_nan() {
                continue;
            }
            match best {
                Some((_, _, best_distance)) if distance >= best_distance => {}
                _ => best = Some((view, y, distance)),
            }
        }

        best.map(|(view, y, _)| (view, y))
    }

    /// Promote the most centered safe-zone view if it is not already active.
    fn sweep(&mut self) -> Option<Action> {
        let (view, y) = self.best_in_safe_zone()?;
        if self.active == Some(view) {
            return None;
        }
        Some(self.promote(view, y, ActivationReason::SafeZoneSweep))
    }

    /// Heuristic promotion: clears the manual flag.
    fn promote(&mut self, view: ViewId, y: f64, reason: ActivationReason) -> Action {
        let previous = self.active.replace(view);
        self.active_location = y;
        self.manually_set = false;

        debug!(
            %view,
            ?previous,
            y,
            distance = self.viewport.distance_to_center(y),
            %reason,
            "Promoted active view"
        );

        Action::ActiveViewChanged {
            previous,
            current: Some(view),
            reason,
        }
    }
}

impl StateMachine for ActiveViewState {
    fn on_start(&mut self) -> Vec<Action> {
        vec![Action::SetTimer {
            id: TimerId::Sweep,
            duration: self.config.sweep_interval,
        }]
    }

    fn handle(&mut self, event: Event) -> Vec<Action> {
        match event {
            Event::PositionReported { view, y } => self.report_position(view, y),
            Event::ActivationRequested { view } => self.activate(view),
            Event::ViewUnregistered { view } => self.unregister(view),
            Event::ViewportResized { height } => self.resize(height),
            Event::SweepTimer => self.on_sweep_timer(),
        }
    }

    fn set_time(&mut self, now: Duration) {
        self.now = now;
    }

    fn now(&self) -> Duration {
        self.now
    }
}

impl std::fmt::Debug for ActiveViewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveViewState")
            .field("active", &self.active)
            .field("active_location", &self.active_location)
            .field("manually_set", &self.manually_set)
            .field("tracked_views", &self.positions.len())
            .field("viewport_height", &self.viewport.height())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    const A: ViewId = ViewId(1);
    const B: ViewId = ViewId(2);
    const C: ViewId = ViewId(3);

    /// Viewport of 1000px: center 500, safe zone (150, 850).
    fn make_test_state() -> ActiveViewState {
        ActiveViewState::new(ArbiterConfig::default(), 1000.0)
    }

    fn changed_to(actions: &[Action]) -> Option<(Option<ViewId>, ActivationReason)> {
        actions.iter().find_map(|action| match action {
            Action::ActiveViewChanged {
                current, reason, ..
            } => Some((*current, *reason)),
            _ => None,
        })
    }

    #[traced_test]
    #[test]
    fn test_no_active_view_by_default() {
        let state = make_test_state();
        assert_eq!(state.active_view(), None);
        assert!(!state.is_active(A));
        assert_eq!(state.active_location(), f64::INFINITY);
        assert!(!state.is_manually_set());
    }

    #[traced_test]
    #[test]
    fn test_first_report_in_safe_zone_activates() {
        let mut state = make_test_state();

        let actions = state.report_position(A, 480.0);

        assert_eq!(state.active_view(), Some(A));
        assert_eq!(state.active_location(), 480.0);
        assert_eq!(
            changed_to(&actions),
            Some((Some(A), ActivationReason::SafeZoneSweep))
        );
    }

    #[traced_test]
    #[test]
    fn test_first_report_outside_safe_zone_still_activates() {
        let mut state = make_test_state();

        // Anything finite is closer than the unknown (infinite) location.
        let actions = state.report_position(A, 40.0);

        assert_eq!(state.active_view(), Some(A));
        assert_eq!(
            changed_to(&actions),
            Some((Some(A), ActivationReason::CloserToCenter))
        );
    }

    #[traced_test]
    #[test]
    fn test_closer_view_outside_safe_zone_wins() {
        let mut state = make_test_state();
        state.report_position(A, 50.0); // distance 450

        let actions = state.report_position(B, 100.0); // distance 400

        assert_eq!(state.active_view(), Some(B));
        assert_eq!(state.active_location(), 100.0);
        assert_eq!(
            changed_to(&actions),
            Some((Some(B), ActivationReason::CloserToCenter))
        );
    }

    #[traced_test]
    #[test]
    fn test_equal_distance_never_promotes() {
        let mut state = make_test_state();
        state.report_position(A, 50.0); // distance 450

        let actions = state.report_position(B, 950.0); // distance 450

        assert_eq!(state.active_view(), Some(A));
        assert!(actions.is_empty());
    }

    #[traced_test]
    #[test]
    fn test_manual_activation_is_protected_while_on_screen() {
        let mut state = make_test_state();
        let actions = state.activate(A);
        assert_eq!(
            changed_to(&actions),
            Some((Some(A), ActivationReason::Manual))
        );
        assert_eq!(state.active_location(), 500.0);
        assert!(state.is_manually_set());

        // A drifts out of the safe zone but stays on screen.
        state.report_position(A, 60.0); // distance 440
        assert!(state.is_manually_set());

        // B is closer, but A was chosen manually and is still visible.
        let actions = state.report_position(B, 100.0); // distance 400
        assert!(actions.is_empty());
        assert_eq!(state.active_view(), Some(A));

        // A scrolls off screen; the next closer report usurps it.
        state.report_position(A, -20.0);
        let actions = state.report_position(B, 100.0);
        assert_eq!(
            changed_to(&actions),
            Some((Some(B), ActivationReason::CloserToCenter))
        );
        assert!(!state.is_manually_set());
    }

    #[traced_test]
    #[test]
    fn test_live_safe_zone_sweep_overrides_manual() {
        let mut state = make_test_state();
        state.activate(A);
        state.report_position(A, 60.0);
        assert_eq!(state.active_view(), Some(A));

        let actions = state.report_position(B, 480.0);

        assert_eq!(state.active_view(), Some(B));
        assert!(!state.is_manually_set());
        assert_eq!(
            changed_to(&actions),
            Some((Some(B), ActivationReason::SafeZoneSweep))
        );
    }

    #[traced_test]
    #[test]
    fn test_safe_zone_entry_beats_active_outside_zone() {
        let mut state = make_test_state();
        state.report_position(A, 300.0);
        state.activate(A); // location = 500

        // 400px viewport: center 200, safe zone (60, 340). A's recorded
        // position (300) is inside, its location (500) is not.
        state.resize(400.0);

        // C is inside the zone but farther from center than A's recorded
        // position, so the sweep keeps A; the entry rule then promotes C.
        let actions = state.report_position(C, 320.0);

        assert_eq!(state.active_view(), Some(C));
        assert_eq!(state.active_location(), 320.0);
        assert!(!state.is_manually_set());
        assert_eq!(
            changed_to(&actions),
            Some((Some(C), ActivationReason::SafeZoneEntry))
        );
    }

    /// A recorded at 560, manually activated at center 500, then the
    /// viewport grows to 1100px (center 550): A's position is at distance
    /// 10, its location at distance 50, both inside the safe zone.
    fn make_state_with_stale_location() -> ActiveViewState {
        let mut state = make_test_state();
        state.report_position(A, 560.0);
        state.activate(A);
        state.resize(1100.0);
        state
    }

    #[traced_test]
    #[test]
    fn test_closer_in_safe_zone_promotes() {
        let mut state = make_state_with_stale_location();

        let actions = state.report_position(B, 520.0); // distance 30

        assert_eq!(state.active_view(), Some(B));
        assert!(!state.is_manually_set());
        assert_eq!(
            changed_to(&actions),
            Some((Some(B), ActivationReason::CloserInSafeZone))
        );
    }

    #[traced_test]
    #[test]
    fn test_both_in_safe_zone_requires_strictly_closer() {
        let mut state = make_state_with_stale_location();

        let actions = state.report_position(B, 600.0); // distance 50, ties A

        assert!(actions.is_empty());
        assert_eq!(state.active_view(), Some(A));
        assert!(state.is_manually_set());
    }

    #[traced_test]
    #[test]
    fn test_self_report_updates_location_only() {
        let mut state = make_test_state();
        state.report_position(A, 480.0);

        let actions = state.report_position(A, 470.5);

        assert!(actions.is_empty());
        assert_eq!(state.active_view(), Some(A));
        assert_eq!(state.active_location(), 470.5);
    }

    fn seed_three_views(state: &mut ActiveViewState, manually_set: bool) {
        // Distances 5, 50 and 200 from center; all inside the safe zone.
        state.positions.record(A, 505.0);
        state.positions.record(B, 450.0);
        state.positions.record(C, 700.0);
        state.active = Some(C);
        state.active_location = 700.0;
        state.manually_set = manually_set;
    }

    #[traced_test]
    #[test]
    fn test_periodic_sweep_converges_on_most_centered() {
        let mut state = make_test_state();
        seed_three_views(&mut state, false);

        let actions = state.on_sweep_timer();

        assert_eq!(state.active_view(), Some(A));
        assert_eq!(state.active_location(), 505.0);
        assert_eq!(
            actions[0],
            Action::SetTimer {
                id: TimerId::Sweep,
                duration: Duration::from_millis(100),
            }
        );
        assert_eq!(
            actions[1],
            Action::ActiveViewChanged {
                previous: Some(C),
                current: Some(A),
                reason: ActivationReason::SafeZoneSweep,
            }
        );
    }

    #[traced_test]
    #[test]
    fn test_periodic_sweep_skipped_under_manual_lock() {
        let mut state = make_test_state();
        seed_three_views(&mut state, true);

        let actions = state.on_sweep_timer();

        assert_eq!(state.active_view(), Some(C));
        assert_eq!(actions.len(), 1, "only the timer is re-armed");
    }

    #[traced_test]
    #[test]
    fn test_sweep_tie_goes_to_first_reporter() {
        let mut state = make_test_state();
        state.positions.record(B, 520.0);
        state.positions.record(A, 480.0);

        state.on_sweep_timer();

        assert_eq!(state.active_view(), Some(B));
    }

    #[traced_test]
    #[test]
    fn test_sweep_without_safe_zone_candidates_keeps_active() {
        let mut state = make_test_state();
        state.report_position(A, 50.0);
        state.report_position(B, 990.0);

        let actions = state.on_sweep_timer();

        assert_eq!(actions.len(), 1);
        assert_eq!(state.active_view(), Some(A));
    }

    #[traced_test]
    #[test]
    fn test_activate_is_idempotent() {
        let mut state = make_test_state();
        assert_eq!(state.activate(A).len(), 1);
        assert!(state.activate(A).is_empty());
        assert_eq!(state.active_view(), Some(A));
        assert!(state.is_manually_set());
    }

    #[traced_test]
    #[test]
    fn test_unregistered_view_cannot_win_sweep() {
        let mut state = make_test_state();
        state.report_position(B, 300.0); // distance 200, in zone
        state.report_position(A, 100.0); // distance 400, out
        state.report_position(C, 140.0); // distance 360, out
        assert_eq!(state.active_view(), Some(B));
        assert!(!state.is_manually_set());

        // 200px viewport: center 100, safe zone (30, 170). A now sits dead
        // center, C is inside the zone, B has left it.
        state.resize(200.0);

        // A departs before the sweep can pick it.
        state.unregister(A);
        let actions = state.on_sweep_timer();

        assert_eq!(state.active_view(), Some(C));
        assert_eq!(
            changed_to(&actions),
            Some((Some(C), ActivationReason::SafeZoneSweep))
        );
        assert_eq!(state.position(A), None);
        assert_eq!(state.tracked_views(), 2);
    }

    #[traced_test]
    #[test]
    fn test_sweep_with_no_reports_only_rearms() {
        let mut state = make_test_state();
        let actions = state.on_sweep_timer();
        assert_eq!(actions.len(), 1);
        assert_eq!(state.active_view(), None);
    }

    #[traced_test]
    #[test]
    fn test_zero_sweep_interval_field_is_raised() {
        let config = ArbiterConfig {
            sweep_interval: Duration::ZERO,
            ..ArbiterConfig::default()
        };
        let mut state = ActiveViewState::new(config, 1000.0);

        assert_eq!(
            state.on_start(),
            vec![Action::SetTimer {
                id: TimerId::Sweep,
                duration: MIN_SWEEP_INTERVAL,
            }]
        );
    }

    #[traced_test]
    #[test]
    fn test_unregister_active_clears_it() {
        let mut state = make_test_state();
        state.report_position(A, 500.0);
        state.report_position(B, 100.0);
        state.activate(A);

        let actions = state.unregister(A);

        assert_eq!(
            actions,
            vec![Action::ActiveViewChanged {
                previous: Some(A),
                current: None,
                reason: ActivationReason::Unregistered,
            }]
        );
        assert_eq!(state.active_view(), None);
        assert_eq!(state.active_location(), f64::INFINITY);
        assert!(!state.is_manually_set());

        // B is outside the safe zone: the sweep does nothing, the next
        // report from B elects it.
        state.on_sweep_timer();
        assert_eq!(state.active_view(), None);
        state.report_position(B, 110.0);
        assert_eq!(state.active_view(), Some(B));
    }

    #[traced_test]
    #[test]
    fn test_unregister_unknown_view_is_noop() {
        let mut state = make_test_state();
        assert!(state.unregister(A).is_empty());
    }

    #[traced_test]
    #[test]
    fn test_resize_moves_safe_zone() {
        let mut state = make_test_state();
        state.report_position(A, 100.0); // distance 400
        state.report_position(B, 20.0); // distance 480
        assert_eq!(state.active_view(), Some(A));

        // 60px viewport: center 30, safe zone (9, 51). Only B is inside.
        state.resize(60.0);
        let actions = state.on_sweep_timer();

        assert_eq!(state.viewport().center(), 30.0);
        assert_eq!(state.active_view(), Some(B));
        assert_eq!(
            changed_to(&actions),
            Some((Some(B), ActivationReason::SafeZoneSweep))
        );
    }

    #[traced_test]
    #[test]
    fn test_nan_position_is_inert() {
        let mut state = make_test_state();
        state.report_position(A, 300.0);

        let actions = state.report_position(B, f64::NAN);

        assert!(actions.is_empty());
        assert_eq!(state.active_view(), Some(A));
    }

    #[traced_test]
    #[test]
    fn test_handle_dispatches_events() {
        let mut state = make_test_state();
        assert_eq!(
            state.on_start(),
            vec![Action::SetTimer {
                id: TimerId::Sweep,
                duration: Duration::from_millis(100),
            }]
        );

        state.set_time(Duration::from_millis(250));
        state.handle(Event::PositionReported { view: A, y: 480.0 });
        state.handle(Event::ActivationRequested { view: B });
        assert_eq!(state.active_view(), Some(B));
        state.handle(Event::ViewportResized { height: 600.0 });
        assert_eq!(state.viewport().height(), 600.0);
        state.handle(Event::ViewUnregistered { view: B });
        assert_eq!(state.active_view(), None);
        assert_eq!(state.now(), Duration::from_millis(250));
    }
}
