//! Historical-simulation portfolio Value-at-Risk.
//!
//! Every position's history is aligned row-on-row, each historical move is
//! turned into a scenario return by a pluggable [`ScenarioShift`], scaled by
//! the position's notional, summed across positions by date, and the sorted
//! portfolio scenarios are read at a fixed pair of order statistics.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use hsv_engine::{calculate_var, LogShift, Position};
//! use hsv_types::TimeSeries;
//!
//! let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
//! let series = TimeSeries::from_pairs(
//!     "ccy-1",
//!     vec![(day(2), 1.00), (day(3), 0.99), (day(4), 0.97), (day(5), 0.98), (day(8), 0.96), (day(9), 0.97)],
//! )
//! .unwrap();
//!
//! let positions = vec![Position::new(series, 1.0, 100_000.0, LogShift)];
//! let var = calculate_var(&positions).unwrap();
//! assert!(var < 0.0);
//! ```

pub mod aggregate;
pub mod align;
pub mod engine;
pub mod pnl;
pub mod portfolio;
pub mod quantile;
pub mod shift;

pub use aggregate::{aggregate, PortfolioAggregator};
pub use align::align;
pub use engine::{calculate_var, VarEngine, VarReport};
pub use pnl::{instrument_pnl, pnl_from_pairs, Position};
pub use portfolio::{PortfolioConfig, PositionSpec};
pub use quantile::estimate_var;
pub use shift::{log_shift, relative_shift, LogShift, RelativeShift, ScenarioShift, ShiftKind};
