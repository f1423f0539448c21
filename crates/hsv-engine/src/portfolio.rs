//! File-driven portfolio runs.
//!
//! A [`PortfolioConfig`] names a series file, the engine settings and one
//! [`PositionSpec`] per instrument column:
//!
//! ```json
//! {
//!   "source": { "path": "data/ccy_rates.txt" },
//!   "positions": [
//!     { "column": "ccy-1", "horizon_days": 1, "notional": 153084.81, "shift": "log" },
//!     { "column": "ccy-2", "horizon_days": 1, "notional": 95891.51 }
//!   ]
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use hsv_data::{SeriesSource, SeriesTable};
use hsv_types::{config_error, EngineConfig, HsvResult, TimeSeries};

use crate::engine::{VarEngine, VarReport};
use crate::pnl::Position;
use crate::shift::ShiftKind;

/// One instrument column and how to size and shift it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSpec {
    pub column: String,
    #[serde(default = "default_horizon_days")]
    pub horizon_days: f64,
    pub notional: f64,
    #[serde(default)]
    pub shift: ShiftKind,
}

fn default_horizon_days() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioConfig {
    pub source: SeriesSource,
    #[serde(default)]
    pub engine: EngineConfig,
    pub positions: Vec<PositionSpec>,
}

impl PortfolioConfig {
    pub fn from_json_str(json: &str) -> HsvResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> HsvResult<Self> {
        let path = path.as_ref();
        info!("Reading portfolio config from: {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> HsvResult<()> {
        if self.positions.is_empty() {
            return Err(config_error!("portfolio has no positions"));
        }
        self.engine.validate()
    }

    /// Resolve each [`PositionSpec`] against a loaded table. Positions on the same
    /// column share one copy of the series.
    pub fn build_positions(&self, table: &SeriesTable) -> HsvResult<Vec<Position>> {
        let mut shared: Vec<(String, Arc<TimeSeries>)> = Vec::new();
        let mut positions = Vec::with_capacity(self.positions.len());

        for spec in &self.positions {
            let series = match shared.iter().find(|(column, _)| *column == spec.column) {
                Some((_, series)) => series.clone(),
                None => {
                    let series = Arc::new(table.column(&spec.column)?.clone());
                    shared.push((spec.column.clone(), series.clone()));
                    series
                }
            };
            positions.push(Position::shared(
                series,
                spec.horizon_days,
                spec.notional,
                spec.shift.build(),
            ));
        }
        Ok(positions)
    }

    /// Load the source, build positions and produce a report.
    pub fn run(&self) -> HsvResult<VarReport> {
        let table = self.source.load()?;
        let positions = self.build_positions(&table)?;
        VarEngine::new(self.engine.clone())?.report(&positions)
    }
}
