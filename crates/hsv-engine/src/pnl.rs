//! Per-instrument scenario PnL.

use std::fmt;
use std::sync::Arc;

use hsv_types::{validation_error, AlignedPair, HsvError, HsvResult, PnlVector, TimeSeries};

use crate::align::align;
use crate::shift::ScenarioShift;

/// One instrument of the portfolio: its history, horizon, size and shift policy
#[derive(Clone)]
pub struct Position {
    pub name: String,
    pub series: Arc<TimeSeries>,
    pub horizon_days: f64,
    /// Monetary size used to turn a fractional shift into PnL.
    pub notional: f64,
    pub shift: Arc<dyn ScenarioShift>,
}

impl Position {
    pub fn new<S>(series: TimeSeries, horizon_days: f64, notional: f64, shift: S) -> Self
    where
        S: ScenarioShift + 'static,
    {
        Self::shared(Arc::new(series), horizon_days, notional, Arc::new(shift))
    }

    /// Build from an already shared series and shift, e.g. several positions
    /// on the same history.
    pub fn shared(
        series: Arc<TimeSeries>,
        horizon_days: f64,
        notional: f64,
        shift: Arc<dyn ScenarioShift>,
    ) -> Self {
        Self {
            name: series.name.clone(),
            series,
            horizon_days,
            notional,
            shift,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Checks horizon and notional. Series values are left to the shift.
    pub fn validate(&self) -> HsvResult<()> {
        if !self.horizon_days.is_finite() || self.horizon_days < 0.0 {
            return Err(validation_error!(
                "position {}: horizon_days must be finite and non-negative, got {}",
                self.name,
                self.horizon_days
            ));
        }
        if !self.notional.is_finite() {
            return Err(validation_error!(
                "position {}: notional must be finite, got {}",
                self.name,
                self.notional
            ));
        }
        Ok(())
    }

    /// Scenario PnL vector for this position.
    pub fn pnl(&self) -> HsvResult<PnlVector> {
        instrument_pnl(self)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Position")
            .field("name", &self.name)
            .field("observations", &self.series.len())
            .field("horizon_days", &self.horizon_days)
            .field("notional", &self.notional)
            .field("shift", &self.shift.name())
            .finish()
    }
}

/// Apply `shift` to every aligned pair and scale by `notional`.
pub fn pnl_from_pairs(
    name: &str,
    pairs: &[AlignedPair],
    horizon_days: f64,
    notional: f64,
    shift: &dyn ScenarioShift,
) -> HsvResult<PnlVector> {
    let mut pnl = PnlVector::new(name);
    for pair in pairs {
        let scenario_return = shift
            .shift(pair.earlier_value, pair.later_value, horizon_days)
            .map_err(|e| match e {
                HsvError::Var(err) => HsvError::Var(err.at_date(pair.date)),
                other => other,
            })?;
        pnl.insert(pair.date, scenario_return * notional);
    }
    Ok(pnl)
}

/// Align the position's series and compute its PnL vector.
pub fn instrument_pnl(position: &Position) -> HsvResult<PnlVector> {
    let pairs = align(&position.series);
    tracing::debug!(
        "Computing {} scenarios for {} with {} shift",
        pairs.len(),
        position.name,
        position.shift.name()
    );
    pnl_from_pairs(
        &position.name,
        &pairs,
        position.horizon_days,
        position.notional,
        position.shift.as_ref(),
    )
}
