//! Outbound actions returned by the arbiter state machine.

use feedview_types::ViewId;
use std::fmt;
use std::time::Duration;

/// Timers a state machine can ask its runner to manage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerId {
    /// The periodic safe-zone sweep.
    Sweep,
}

/// Why the active view changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivationReason {
    /// Explicit activation by the registrant.
    Manual,
    /// Safe-zone sweep elected the most centered registrant.
    SafeZoneSweep,
    /// The reporter entered the safe zone while the active view was outside it.
    SafeZoneEntry,
    /// Both inside the safe zone, reporter strictly closer to center.
    CloserInSafeZone,
    /// Neither inside the safe zone, reporter strictly closer to center.
    CloserToCenter,
    /// The active registrant unmounted.
    Unregistered,
}

impl ActivationReason {
    /// Whether this change was decided by the heuristic rather than a caller.
    pub fn is_heuristic(self) -> bool {
        !matches!(self, ActivationReason::Manual | ActivationReason::Unregistered)
    }
}

impl fmt::Display for ActivationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActivationReason::Manual => "manual",
            ActivationReason::SafeZoneSweep => "safe_zone_sweep",
            ActivationReason::SafeZoneEntry => "safe_zone_entry",
            ActivationReason::CloserInSafeZone => "closer_in_safe_zone",
            ActivationReason::CloserToCenter => "closer_to_center",
            ActivationReason::Unregistered => "unregistered",
        };
        f.write_str(name)
    }
}

/// Something the runner must do on the state machine's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Arm (or re-arm) a timer. Replaces any pending timer with the same id.
    SetTimer { id: TimerId, duration: Duration },

    /// The active registrant changed; publish it to every registrant.
    ActiveViewChanged {
        previous: Option<ViewId>,
        current: Option<ViewId>,
        reason: ActivationReason,
    },
}

impl Action {
    /// Get a human-readable name for this action type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Action::SetTimer { .. } => "SetTimer",
            Action::ActiveViewChanged { .. } => "ActiveViewChanged",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_and_unregistered_are_not_heuristic() {
        assert!(!ActivationReason::Manual.is_heuristic());
        assert!(!ActivationReason::Unregistered.is_heuristic());
        assert!(ActivationReason::SafeZoneSweep.is_heuristic());
        assert!(ActivationReason::CloserToCenter.is_heuristic());
    }

    #[test]
    fn test_reason_display_is_snake_case() {
        assert_eq!(
            ActivationReason::CloserInSafeZone.to_string(),
            "closer_in_safe_zone"
        );
    }
}
