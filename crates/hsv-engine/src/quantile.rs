//! VaR estimate from the sorted portfolio scenarios.

use hsv_types::{HsvResult, QuantileRule, VarError};

/// Sort the scenario PnLs ascending (worst first) and interpolate between
/// the two order statistics named by `rule`.
///
/// Fails with [`VarError::InsufficientScenarios`] instead of reading past the
/// end, and with [`VarError::NonFiniteScenario`] on any NaN or infinite value:
/// a single one would shift every rank and skew the estimate.
pub fn estimate_var(values: &[f64], rule: &QuantileRule) -> HsvResult<f64> {
    let required = rule.required_scenarios();
    if values.len() < required {
        return Err(VarError::InsufficientScenarios {
            required,
            available: values.len(),
        }
        .into());
    }
    if let Some(value) = values.iter().copied().find(|v| !v.is_finite()) {
        return Err(VarError::NonFiniteScenario { date: None, value }.into());
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    Ok(sorted[rule.lower_rank] * rule.lower_weight + sorted[rule.upper_rank] * rule.upper_weight)
}
