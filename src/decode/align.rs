//! Positional alignment of metric series against a date axis.
//!
//! The trend endpoint returns each metric and the date axis as separate lists.
//! We assume index `i` of every list refers to the same day, so alignment is
//! purely by position: long series are truncated, short ones are right-padded
//! with absent values. No timestamp join is attempted.

use crate::domain::{NamedSeries, NumericSeries};

/// Force `series` to exactly `len` entries.
pub fn align_to(len: usize, mut series: NumericSeries) -> NumericSeries {
    if series.len() != len {
        tracing::trace!(from = series.len(), to = len, "aligning series length");
    }
    series.resize(len, None);
    series
}

/// Align every named series to the reference length.
pub fn align_all(len: usize, series: Vec<NamedSeries>) -> Vec<NamedSeries> {
    series
        .into_iter()
        .map(|s| NamedSeries {
            name: s.name,
            values: align_to(len, s.values),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_short_series_with_absent() {
        let out = align_to(5, vec![Some(1.0), Some(2.0), Some(3.0)]);
        assert_eq!(out, vec![Some(1.0), Some(2.0), Some(3.0), None, None]);
    }

    #[test]
    fn truncates_long_series() {
        let input: NumericSeries = (0..7).map(|i| Some(i as f64)).collect();
        let out = align_to(5, input);
        assert_eq!(out.len(), 5);
        assert_eq!(out.last(), Some(&Some(4.0)));
    }

    #[test]
    fn equal_length_is_unchanged_and_zero_length_empties() {
        let input = vec![None, Some(2.0)];
        assert_eq!(align_to(2, input.clone()), input);
        assert!(align_to(0, input).is_empty());
    }

    #[test]
    fn align_all_keeps_names_and_order() {
        let out = align_all(
            2,
            vec![
                NamedSeries::new("active_users", vec![Some(1.0)]),
                NamedSeries::new("avg_earnings", vec![Some(1.0), Some(2.0), Some(3.0)]),
            ],
        );
        assert_eq!(out[0].name, "active_users");
        assert_eq!(out[0].values, vec![Some(1.0), None]);
        assert_eq!(out[1].name, "avg_earnings");
        assert_eq!(out[1].values, vec![Some(1.0), Some(2.0)]);
    }
}
