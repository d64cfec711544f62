//! Scripted scroll scenarios.
//!
//! A scenario is a TOML file describing a viewport and a timeline of what
//! the registered views do. It is the input of the `feedview-replay` binary
//! and of the replay tests.
//!
//! ```toml
//! viewport_height = 1000.0
//!
//! [[steps]]
//! at_ms = 0
//! kind = "report"
//! view = 1
//! y = 480.0
//!
//! [[steps]]
//! at_ms = 50
//! kind = "scroll"
//! delta = 120.0
//! ```

use feedview_arbiter::{ActiveViewState, ArbiterConfig};
use feedview_core::Event;
use feedview_types::ViewId;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::runner::SimulationRunner;

/// Errors loading or validating a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The scenario file could not be read.
    #[error("Failed to read scenario {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The scenario is not valid TOML or does not match the schema.
    #[error("Invalid scenario: {0}")]
    Parse(#[from] toml::de::Error),

    /// A viewport height is not a positive, finite number.
    #[error("Invalid viewport height: {0}")]
    InvalidViewport(f64),

    /// The sweep interval override is zero.
    #[error("Invalid sweep interval: {0}ms (must be at least 1ms)")]
    InvalidSweepInterval(u64),
}

/// What happens at one step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepKind {
    /// A view lays out at `y`.
    Report { view: ViewId, y: f64 },
    /// A view is tapped.
    Activate { view: ViewId },
    /// A view unmounts.
    Unregister { view: ViewId },
    /// The window changes height.
    Resize { height: f64 },
    /// The feed scrolls by `delta` pixels; every mounted view moves up by
    /// `delta` and reports its new position.
    Scroll { delta: f64 },
}

/// One timestamped step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Step {
    /// Milliseconds since the provider mounted.
    pub at_ms: u64,
    #[serde(flatten)]
    pub kind: StepKind,
}

/// A complete scenario.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Scenario {
    /// Initial viewport height.
    pub viewport_height: f64,

    /// Override of the sweep interval.
    #[serde(default)]
    pub sweep_interval_ms: Option<u64>,

    /// Override of the safe-zone ratio.
    #[serde(default)]
    pub safe_zone_ratio: Option<f64>,

    /// Timeline, in any order; steps are sorted by time (stable) on replay.
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Load and validate a scenario file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate a scenario from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = toml::from_str(contents)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Check the sweep interval and every viewport height in the scenario.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.sweep_interval_ms == Some(0) {
            return Err(ScenarioError::InvalidSweepInterval(0));
        }
        check_height(self.viewport_height)?;
        for step in &self.steps {
            if let StepKind::Resize { height } = step.kind {
                check_height(height)?;
            }
        }
        Ok(())
    }

    /// Arbiter configuration with this scenario's overrides applied.
    pub fn arbiter_config(&self) -> ArbiterConfig {
        let mut config = ArbiterConfig::default();
        if let Some(ms) = self.sweep_interval_ms {
            config = config.with_sweep_interval(Duration::from_millis(ms));
        }
        if let Some(ratio) = self.safe_zone_ratio {
            config = config.with_safe_zone_ratio(ratio);
        }
        config
    }

    /// Time of the last step.
    pub fn end_time(&self) -> Duration {
        let last = self.steps.iter().map(|step| step.at_ms).max().unwrap_or(0);
        Duration::from_millis(last)
    }

    /// Translate the timeline into arbiter events, in delivery order.
    ///
    /// Scroll steps are expanded against the layout the scenario itself
    /// tracks (the last position each mounted view reported), the same way
    /// a real feed re-lays-out every mounted view on scroll.
    pub fn events(&self) -> Vec<(Duration, Event)> {
        let mut steps: Vec<&Step> = self.steps.iter().collect();
        steps.sort_by_key(|step| step.at_ms);

        let mut layout: BTreeMap<ViewId, f64> = BTreeMap::new();
        let mut events = Vec::new();

        for step in steps {
            let at = Duration::from_millis(step.at_ms);
            match step.kind {
                StepKind::Report { view, y } => {
                    layout.insert(view, y);
                    events.push((at, Event::PositionReported { view, y }));
                }
                StepKind::Activate { view } => {
                    events.push((at, Event::ActivationRequested { view }));
                }
                StepKind::Unregister { view } => {
                    layout.remove(&view);
                    events.push((at, Event::ViewUnregistered { view }));
                }
                StepKind::Resize { height } => {
                    events.push((at, Event::ViewportResized { height }));
                }
                StepKind::Scroll { delta } => {
                    for (view, y) in layout.iter_mut() {
                        *y -= delta;
                        events.push((
                            at,
                            Event::PositionReported {
                                view: *view,
                                y: *y,
                            },
                        ));
                    }
                }
            }
        }

        events
    }

    /// Build a runner with every step already queued.
    pub fn into_runner(self) -> SimulationRunner {
        let state = ActiveViewState::new(self.arbiter_config(), self.viewport_height);
        let mut runner = SimulationRunner::new(state);
        for (at, event) in self.events() {
            runner.schedule(at, event);
        }
        runner
    }
}

fn check_height(height: f64) -> Result<(), ScenarioError> {
    if height.is_finite() && height > 0.0 {
        Ok(())
    } else {
        Err(ScenarioError::InvalidViewport(height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCROLL: &str = r#"
viewport_height = 1000.0
sweep_interval_ms = 50

[[steps]]
at_ms = 0
kind = "report"
view = 1
y = 480.0

[[steps]]
at_ms = 0
kind = "report"
view = 2
y = 1100.0

[[steps]]
at_ms = 40
kind = "scroll"
delta = 500.0
"#;

    #[test]
    fn test_parse_scenario() {
        let scenario = Scenario::from_toml_str(SCROLL).unwrap();

        assert_eq!(scenario.steps.len(), 3);
        assert_eq!(
            scenario.steps[0].kind,
            StepKind::Report {
                view: ViewId(1),
                y: 480.0
            }
        );
        assert_eq!(scenario.steps[2].kind, StepKind::Scroll { delta: 500.0 });
        assert_eq!(
            scenario.arbiter_config().sweep_interval,
            Duration::from_millis(50)
        );
        assert_eq!(scenario.end_time(), Duration::from_millis(40));
    }

    #[test]
    fn test_scroll_expands_to_reports() {
        let scenario = Scenario::from_toml_str(SCROLL).unwrap();
        let events = scenario.events();

        assert_eq!(events.len(), 4);
        assert_eq!(
            events[2],
            (
                Duration::from_millis(40),
                Event::PositionReported {
                    view: ViewId(1),
                    y: -20.0
                }
            )
        );
        assert_eq!(
            events[3],
            (
                Duration::from_millis(40),
                Event::PositionReported {
                    view: ViewId(2),
                    y: 600.0
                }
            )
        );
    }

    #[test]
    fn test_scroll_skips_unregistered_views() {
        let scenario = Scenario::from_toml_str(
            r#"
viewport_height = 800.0

[[steps]]
at_ms = 0
kind = "report"
view = 1
y = 100.0

[[steps]]
at_ms = 10
kind = "unregister"
view = 1

[[steps]]
at_ms = 20
kind = "scroll"
delta = 50.0
"#,
        )
        .unwrap();

        let events = scenario.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].1, Event::ViewUnregistered { view: ViewId(1) });
    }

    #[test]
    fn test_rejects_bad_viewport() {
        let err = Scenario::from_toml_str("viewport_height = 0.0").unwrap_err();
        assert!(matches!(err, ScenarioError::InvalidViewport(h) if h == 0.0));

        let err = Scenario::from_toml_str(
            r#"
viewport_height = 500.0

[[steps]]
at_ms = 5
kind = "resize"
height = -1.0
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ScenarioError::InvalidViewport(_)));
    }

    #[test]
    fn test_rejects_zero_sweep_interval() {
        let err = Scenario::from_toml_str("viewport_height = 1000.0\nsweep_interval_ms = 0")
            .unwrap_err();
        assert!(matches!(err, ScenarioError::InvalidSweepInterval(0)));
    }

    #[test]
    fn test_rejects_unknown_step_kind() {
        let err = Scenario::from_toml_str(
            r#"
viewport_height = 500.0

[[steps]]
at_ms = 5
kind = "teleport"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ScenarioError::Parse(_)));
    }
}
