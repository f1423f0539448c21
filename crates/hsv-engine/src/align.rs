//! Pairs each observation with the row before it.

use hsv_types::{AlignedPair, TimeSeries};

/// Align a series against a one-row-shifted copy of itself.
///
/// The predecessor is the previous row in date order, not the previous
/// calendar day, so weekends and holidays need no special handling. The
/// earliest date has no predecessor and produces no pair.
pub fn align(series: &TimeSeries) -> Vec<AlignedPair> {
    series
        .iter()
        .zip(series.iter().skip(1))
        .map(|(earlier, later)| AlignedPair {
            date: later.date,
            earlier_value: earlier.value,
            later_value: later.value,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[test]
    fn test_pairs_consecutive_rows() {
        let series = TimeSeries::from_pairs(
            "fx",
            vec![(day(1, 2), 1.0), (day(1, 3), 2.0), (day(1, 4), 4.0), (day(1, 5), 8.0)],
        )
        .unwrap();

        let pairs = align(&series);
        assert_eq!(pairs.len(), series.len() - 1);
        assert_eq!(
            pairs,
            vec![
                AlignedPair { date: day(1, 3), earlier_value: 1.0, later_value: 2.0 },
                AlignedPair { date: day(1, 4), earlier_value: 2.0, later_value: 4.0 },
                AlignedPair { date: day(1, 5), earlier_value: 4.0, later_value: 8.0 },
            ]
        );
    }

    #[test]
    fn test_first_date_never_an_output_date() {
        let series = TimeSeries::from_pairs("fx", vec![(day(3, 1), 1.0), (day(2, 1), 0.5), (day(4, 1), 1.5)])
            .unwrap();

        let pairs = align(&series);
        assert!(pairs.iter().all(|p| p.date != day(2, 1)));
        assert_eq!(pairs[0].earlier_value, 0.5);
    }

    #[test]
    fn test_gaps_use_previous_row() {
        // Friday then Monday
        let series = TimeSeries::from_pairs("fx", vec![(day(3, 8), 1.10), (day(3, 11), 1.20)]).unwrap();

        let pairs = align(&series);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].date, day(3, 11));
        assert_eq!(pairs[0].earlier_value, 1.10);
    }

    #[test]
    fn test_short_series_produce_no_pairs() {
        assert!(align(&TimeSeries::new("empty")).is_empty());
        let single = TimeSeries::from_pairs("one", vec![(day(1, 1), 1.0)]).unwrap();
        assert!(align(&single).is_empty());
    }
}
