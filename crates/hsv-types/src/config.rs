//! Engine configuration shared by the VaR pipeline and file-driven runs.

use serde::{Deserialize, Serialize};

use crate::config_error;
use crate::errors::HsvResult;

/// Which dates the portfolio accumulator is indexed by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateDomain {
    /// Every date seen in any position; missing dates contribute zero.
    #[default]
    Union,
    /// Only dates present in every position.
    Intersection,
}

/// Linear interpolation between two order statistics of the sorted PnL.
///
/// The default reads the second- and third-worst scenarios with weights
/// 0.4 and 0.6. It is non-parametric: no confidence level or sample size
/// feeds into it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantileRule {
    /// 0-based rank of the lower order statistic
    pub lower_rank: usize,
    /// 0-based rank of the upper order statistic
    pub upper_rank: usize,
    pub lower_weight: f64,
    pub upper_weight: f64,
}

impl Default for QuantileRule {
    fn default() -> Self {
        Self {
            lower_rank: 1,
            upper_rank: 2,
            lower_weight: 0.4,
            upper_weight: 0.6,
        }
    }
}

impl QuantileRule {
    pub fn new(lower_rank: usize, upper_rank: usize, lower_weight: f64, upper_weight: f64) -> Self {
        Self {
            lower_rank,
            upper_rank,
            lower_weight,
            upper_weight,
        }
    }

    /// Number of sorted scenarios the rule has to read. Saturates at
    /// `usize::MAX`, which no scenario vector can satisfy.
    pub fn required_scenarios(&self) -> usize {
        self.lower_rank.max(self.upper_rank).saturating_add(1)
    }

    pub fn validate(&self) -> HsvResult<()> {
        if self.upper_rank.checked_add(1).is_none() {
            return Err(config_error!("quantile upper_rank {} is out of range", self.upper_rank));
        }
        if self.lower_rank > self.upper_rank {
            return Err(config_error!(
                "quantile lower_rank {} is above upper_rank {}",
                self.lower_rank,
                self.upper_rank
            ));
        }
        for (label, weight) in [("lower_weight", self.lower_weight), ("upper_weight", self.upper_weight)] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(config_error!("quantile {} must be finite and non-negative, got {}", label, weight));
            }
        }
        Ok(())
    }
}

/// Engine-wide settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub quantile: QuantileRule,
    pub date_domain: DateDomain,
    /// Compute per-position PnL vectors on the rayon pool.
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            quantile: QuantileRule::default(),
            date_domain: DateDomain::Union,
            parallel: true,
        }
    }
}

impl EngineConfig {
    pub fn with_quantile(mut self, quantile: QuantileRule) -> Self {
        self.quantile = quantile;
        self
    }

    pub fn with_date_domain(mut self, date_domain: DateDomain) -> Self {
        self.date_domain = date_domain;
        self
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn validate(&self) -> HsvResult<()> {
        self.quantile.validate()
    }

    pub fn from_json_str(json: &str) -> HsvResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HsvError;

    #[test]
    fn test_default_rule_reads_ranks_one_and_two() {
        let rule = QuantileRule::default();
        assert_eq!(rule.lower_rank, 1);
        assert_eq!(rule.upper_rank, 2);
        assert_eq!(rule.lower_weight, 0.4);
        assert_eq!(rule.upper_weight, 0.6);
        assert_eq!(rule.required_scenarios(), 3);
        assert!(rule.validate().is_ok());
    }

    #[test]
    fn test_rule_validation() {
        assert!(QuantileRule::new(3, 2, 0.5, 0.5).validate().is_err());
        assert!(QuantileRule::new(0, 0, -0.1, 1.1).validate().is_err());
        assert!(QuantileRule::new(0, 1, f64::NAN, 0.5).validate().is_err());
        assert!(QuantileRule::new(0, 0, 0.0, 1.0).validate().is_ok());
    }

    #[test]
    fn test_config_from_json_fills_defaults() {
        let config = EngineConfig::from_json_str(r#"{ "date_domain": "intersection" }"#).unwrap();
        assert_eq!(config.date_domain, DateDomain::Intersection);
        assert_eq!(config.quantile, QuantileRule::default());
        assert!(config.parallel);
    }

    #[test]
    fn test_config_from_json_rejects_bad_rule() {
        let json = r#"{ "quantile": { "lower_rank": 4, "upper_rank": 1, "lower_weight": 0.5, "upper_weight": 0.5 } }"#;
        match EngineConfig::from_json_str(json) {
            Err(HsvError::Config(msg)) => assert!(msg.contains("lower_rank")),
            other => panic!("Expected Config error, got: {:?}", other),
        }
    }

    #[test]
    fn test_config_from_json_rejects_unbounded_rank() {
        let json = r#"{ "quantile": { "lower_rank": 0, "upper_rank": 18446744073709551615, "lower_weight": 0.5, "upper_weight": 0.5 } }"#;
        match EngineConfig::from_json_str(json) {
            Err(HsvError::Config(msg)) => assert!(msg.contains("upper_rank"), "msg = {msg}"),
            other => panic!("Expected Config error, got: {:?}", other),
        }

        let rule = QuantileRule::new(0, usize::MAX, 0.5, 0.5);
        assert_eq!(rule.required_scenarios(), usize::MAX);
        assert!(rule.validate().is_err());
    }

    #[test]
    fn test_builder_methods() {
        let config = EngineConfig::default()
            .with_date_domain(DateDomain::Intersection)
            .with_quantile(QuantileRule::new(0, 1, 0.5, 0.5))
            .sequential();
        assert!(!config.parallel);
        assert_eq!(config.quantile.required_scenarios(), 2);
    }
}
