//! Scenario shift policies.
//!
//! A shift turns one historical move `(earlier, later)` into a fractional
//! scenario return for a target horizon. The engine only sees the
//! [`ScenarioShift`] trait; any `Fn(f64, f64, f64) -> f64` closure or function
//! qualifies as well.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use hsv_types::{HsvResult, VarError};

/// Maps two consecutive observed values and a horizon to a scenario return
pub trait ScenarioShift: Send + Sync {
    fn shift(&self, earlier_value: f64, later_value: f64, horizon_days: f64) -> HsvResult<f64>;

    /// Short label used in logs and reports.
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> ScenarioShift for F
where
    F: Fn(f64, f64, f64) -> f64 + Send + Sync,
{
    fn shift(&self, earlier_value: f64, later_value: f64, horizon_days: f64) -> HsvResult<f64> {
        Ok(self(earlier_value, later_value, horizon_days))
    }
}

/// Square-root-of-time scaled log return: `exp(ln(later / earlier) * sqrt(h)) - 1`.
///
/// Unchecked; non-positive inputs give NaN. [`LogShift`] wraps it with a
/// domain check.
pub fn log_shift(earlier_value: f64, later_value: f64, horizon_days: f64) -> f64 {
    ((later_value / earlier_value).ln() * horizon_days.sqrt()).exp() - 1.0
}

/// Simple return scaled by `sqrt(h)`: `(later / earlier - 1) * sqrt(h)`.
pub fn relative_shift(earlier_value: f64, later_value: f64, horizon_days: f64) -> f64 {
    (later_value / earlier_value - 1.0) * horizon_days.sqrt()
}

fn ensure_positive(earlier_value: f64, later_value: f64) -> HsvResult<()> {
    // negated comparison also rejects NaN
    if !(earlier_value > 0.0) || !(later_value > 0.0) {
        return Err(VarError::InvalidSeriesValue {
            date: None,
            earlier: earlier_value,
            later: later_value,
        }
        .into());
    }
    Ok(())
}

/// [`log_shift`] with a positivity check on both values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogShift;

impl ScenarioShift for LogShift {
    fn shift(&self, earlier_value: f64, later_value: f64, horizon_days: f64) -> HsvResult<f64> {
        ensure_positive(earlier_value, later_value)?;
        Ok(log_shift(earlier_value, later_value, horizon_days))
    }

    fn name(&self) -> &str {
        "log"
    }
}

/// [`relative_shift`] with a positivity check on both values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelativeShift;

impl ScenarioShift for RelativeShift {
    fn shift(&self, earlier_value: f64, later_value: f64, horizon_days: f64) -> HsvResult<f64> {
        ensure_positive(earlier_value, later_value)?;
        Ok(relative_shift(earlier_value, later_value, horizon_days))
    }

    fn name(&self) -> &str {
        "relative"
    }
}

/// Built-in shift selectable by name from configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftKind {
    #[default]
    Log,
    Relative,
}

impl ShiftKind {
    pub fn build(self) -> Arc<dyn ScenarioShift> {
        match self {
            ShiftKind::Log => Arc::new(LogShift),
            ShiftKind::Relative => Arc::new(RelativeShift),
        }
    }
}

impl fmt::Display for ShiftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ShiftKind::Log => "log",
            ShiftKind::Relative => "relative",
        };
        write!(f, "{}", s)
    }
}
