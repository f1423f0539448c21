//! Engine entry point: positions in, VaR estimate out.
//!
//! [`VarEngine`] runs the pipeline align → PnL → aggregate → quantile. PnL
//! vectors are independent per position and go through rayon when
//! [`EngineConfig::parallel`] is set; results are collected in input order so
//! both modes produce the same portfolio vector.

use chrono::{DateTime, NaiveDate, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use hsv_types::{DateDomain, EngineConfig, HsvResult, PnlVector, QuantileRule, VarError};

use crate::aggregate::aggregate;
use crate::pnl::{instrument_pnl, Position};
use crate::quantile::estimate_var;

/// Outcome of one VaR run with the context needed to read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarReport {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// Interpolated order statistic of the portfolio PnL; negative means loss.
    pub var: f64,
    pub scenario_count: usize,
    pub position_count: usize,
    pub worst_date: Option<NaiveDate>,
    pub worst_pnl: Option<f64>,
    pub quantile: QuantileRule,
    pub date_domain: DateDomain,
}

/// Historical-simulation VaR engine
#[derive(Debug, Clone, Default)]
pub struct VarEngine {
    config: EngineConfig,
}

impl VarEngine {
    pub fn new(config: EngineConfig) -> HsvResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Scenario PnL vector of every position, in input order.
    pub fn position_pnls(&self, positions: &[Position]) -> HsvResult<Vec<PnlVector>> {
        for position in positions {
            position.validate()?;
        }

        if self.config.parallel {
            positions.par_iter().map(instrument_pnl).collect()
        } else {
            positions.iter().map(instrument_pnl).collect()
        }
    }

    /// Date-aligned sum of all position PnL vectors.
    pub fn portfolio_pnl(&self, positions: &[Position]) -> HsvResult<PnlVector> {
        let vectors = self.position_pnls(positions)?;
        let portfolio = aggregate(vectors, self.config.date_domain)?;
        debug!(
            "Aggregated {} positions into {} scenarios ({:?} domain)",
            positions.len(),
            portfolio.len(),
            self.config.date_domain
        );
        Ok(portfolio)
    }

    pub fn calculate_var(&self, positions: &[Position]) -> HsvResult<f64> {
        let portfolio = self.portfolio_pnl(positions)?;
        let var = estimate_var(&scenario_values(&portfolio)?, &self.config.quantile)?;
        info!(
            "VaR over {} positions and {} scenarios: {}",
            positions.len(),
            portfolio.len(),
            var
        );
        Ok(var)
    }

    pub fn report(&self, positions: &[Position]) -> HsvResult<VarReport> {
        let portfolio = self.portfolio_pnl(positions)?;
        let var = estimate_var(&scenario_values(&portfolio)?, &self.config.quantile)?;
        let worst = portfolio.worst();

        Ok(VarReport {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            var,
            scenario_count: portfolio.len(),
            position_count: positions.len(),
            worst_date: worst.map(|(date, _)| date),
            worst_pnl: worst.map(|(_, pnl)| pnl),
            quantile: self.config.quantile,
            date_domain: self.config.date_domain,
        })
    }
}

/// Portfolio values, failing on the first dated NaN or infinite scenario.
fn scenario_values(portfolio: &PnlVector) -> HsvResult<Vec<f64>> {
    if let Some((date, value)) = portfolio.iter().find(|(_, v)| !v.is_finite()) {
        return Err(VarError::NonFiniteScenario {
            date: Some(date),
            value,
        }
        .into());
    }
    Ok(portfolio.values())
}

/// VaR of `positions` under the default configuration.
pub fn calculate_var(positions: &[Position]) -> HsvResult<f64> {
    VarEngine::default().calculate_var(positions)
}
