//! Dated value containers: time series, aligned pairs and PnL vectors.
//!
//! Both [`TimeSeries`] and [`PnlVector`] are ordered maps keyed by
//! [`NaiveDate`], so chronological order and date uniqueness hold by
//! construction.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{DataError, HsvResult};

/// A single dated value for one instrument
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Chronologically ordered observations of a single instrument
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeSeries {
    pub name: String,
    points: BTreeMap<NaiveDate, f64>,
}

impl TimeSeries {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            points: BTreeMap::new(),
        }
    }

    /// Build a series from observations in any order.
    ///
    /// Fails with [`DataError::DuplicateDate`] if a date appears twice.
    pub fn from_observations<I>(name: &str, observations: I) -> HsvResult<Self>
    where
        I: IntoIterator<Item = Observation>,
    {
        let mut series = Self::new(name);
        for obs in observations {
            series.push(obs)?;
        }
        Ok(series)
    }

    /// Convenience constructor from `(date, value)` tuples.
    pub fn from_pairs<I>(name: &str, pairs: I) -> HsvResult<Self>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        Self::from_observations(name, pairs.into_iter().map(|(d, v)| Observation::new(d, v)))
    }

    /// Insert an observation, rejecting a date that is already present.
    pub fn push(&mut self, observation: Observation) -> HsvResult<()> {
        if self.points.contains_key(&observation.date) {
            return Err(DataError::DuplicateDate {
                series: self.name.clone(),
                date: observation.date,
            }
            .into());
        }
        self.points.insert(observation.date, observation.value);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, date: &NaiveDate) -> Option<f64> {
        self.points.get(date).copied()
    }

    /// Observations in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = Observation> + '_ {
        self.points.iter().map(|(d, v)| Observation::new(*d, *v))
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.keys().copied()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.keys().next_back().copied()
    }
}

/// A date paired with the value of the preceding row and its own value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignedPair {
    pub date: NaiveDate,
    pub earlier_value: f64,
    pub later_value: f64,
}

/// Scenario profit and loss keyed by date
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PnlVector {
    pub name: String,
    entries: BTreeMap<NaiveDate, f64>,
}

impl PnlVector {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: BTreeMap::new(),
        }
    }

    pub fn from_entries<I>(name: &str, entries: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        Self {
            name: name.to_string(),
            entries: entries.into_iter().collect(),
        }
    }

    /// Set the PnL for a date, replacing any previous value.
    pub fn insert(&mut self, date: NaiveDate, pnl: f64) {
        self.entries.insert(date, pnl);
    }

    /// Add `pnl` onto the entry for `date`, starting from zero when absent.
    pub fn accumulate(&mut self, date: NaiveDate, pnl: f64) {
        *self.entries.entry(date).or_insert(0.0) += pnl;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, date: &NaiveDate) -> Option<f64> {
        self.entries.get(date).copied()
    }

    pub fn contains_date(&self, date: &NaiveDate) -> bool {
        self.entries.contains_key(date)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.entries.iter().map(|(d, v)| (*d, *v))
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.entries.keys().copied()
    }

    pub fn values(&self) -> Vec<f64> {
        self.entries.values().copied().collect()
    }

    /// The date and value of the most negative entry.
    pub fn worst(&self) -> Option<(NaiveDate, f64)> {
        self.iter().min_by(|a, b| a.1.total_cmp(&b.1))
    }
}
