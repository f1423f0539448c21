//! Run a portfolio VaR from a JSON config, or from a built-in two-currency
//! portfolio when no path is given.
//! Set `RUST_LOG=debug` to see per-position scenario counts.

use chrono::{Duration, NaiveDate};
use hsv_engine::{LogShift, PortfolioConfig, Position, VarEngine, VarReport};
use hsv_types::TimeSeries;
use tracing_subscriber::EnvFilter;

fn synthetic_series(name: &str, start_value: f64, drift: f64, len: usize) -> anyhow::Result<TimeSeries> {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).ok_or_else(|| anyhow::anyhow!("bad start date"))?;
    let points = (0..len).map(|i| {
        let x = i as f64;
        let value = start_value * (1.0 + drift * x + 0.01 * (x * 0.9).sin());
        (start + Duration::days(i as i64), value)
    });
    Ok(TimeSeries::from_pairs(name, points)?)
}

fn built_in_report() -> anyhow::Result<VarReport> {
    let positions = vec![
        Position::new(synthetic_series("ccy-1", 1.31, 0.0002, 250)?, 1.0, 153084.81, LogShift),
        Position::new(synthetic_series("ccy-2", 0.74, -0.0001, 250)?, 1.0, 95891.51, LogShift),
    ];
    Ok(VarEngine::default().report(&positions)?)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let report = match std::env::args().nth(1) {
        Some(path) => PortfolioConfig::from_json_file(&path)?.run()?,
        None => built_in_report()?,
    };

    tracing::info!(
        var = report.var,
        scenarios = report.scenario_count,
        positions = report.position_count,
        "VaR estimate"
    );
    if let (Some(date), Some(pnl)) = (report.worst_date, report.worst_pnl) {
        tracing::info!("Worst scenario: {} on {}", pnl, date);
    }
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
