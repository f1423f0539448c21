//! Date-aligned summation of per-position PnL vectors.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use hsv_types::{DateDomain, HsvResult, PnlVector, VarError};

/// Builds the portfolio PnL vector one position at a time.
///
/// The accumulator's dates come only from the vectors that are added.
#[derive(Debug)]
pub struct PortfolioAggregator {
    domain: DateDomain,
    accumulator: PnlVector,
    components: Vec<PnlVector>,
}

impl PortfolioAggregator {
    pub fn new(domain: DateDomain) -> Self {
        Self {
            domain,
            accumulator: PnlVector::new("portfolio"),
            components: Vec::new(),
        }
    }

    pub fn add(&mut self, pnl: PnlVector) {
        match self.domain {
            DateDomain::Union => {
                for (date, value) in pnl.iter() {
                    self.accumulator.accumulate(date, value);
                }
            }
            // needs every component before the shared dates are known
            DateDomain::Intersection => self.components.push(pnl),
        }
    }

    /// Hand over the summed vector.
    ///
    /// Fails with [`VarError::MisalignedDates`] when intersecting non-empty
    /// vectors leaves no shared date.
    pub fn finish(self) -> HsvResult<PnlVector> {
        match self.domain {
            DateDomain::Union => Ok(self.accumulator),
            DateDomain::Intersection => intersect_and_sum(self.accumulator, self.components),
        }
    }
}

fn intersect_and_sum(mut accumulator: PnlVector, components: Vec<PnlVector>) -> HsvResult<PnlVector> {
    let Some((first, rest)) = components.split_first() else {
        return Ok(accumulator);
    };

    let shared: BTreeSet<NaiveDate> = first
        .dates()
        .filter(|date| rest.iter().all(|pnl| pnl.contains_date(date)))
        .collect();

    let any_dates = components.iter().any(|pnl| !pnl.is_empty());
    if shared.is_empty() && any_dates {
        let names: Vec<&str> = components.iter().map(|pnl| pnl.name.as_str()).collect();
        return Err(VarError::MisalignedDates {
            message: format!("no date is shared by all of {:?}", names),
        }
        .into());
    }

    for pnl in &components {
        for date in &shared {
            if let Some(value) = pnl.get(date) {
                accumulator.accumulate(*date, value);
            }
        }
    }

    tracing::debug!(
        "Intersected {} vectors onto {} shared dates",
        components.len(),
        shared.len()
    );
    Ok(accumulator)
}

/// Sum PnL vectors over the configured date domain.
pub fn aggregate<I>(vectors: I, domain: DateDomain) -> HsvResult<PnlVector>
where
    I: IntoIterator<Item = PnlVector>,
{
    let mut aggregator = PortfolioAggregator::new(domain);
    for pnl in vectors {
        aggregator.add(pnl);
    }
    aggregator.finish()
}
