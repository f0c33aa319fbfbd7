//! # Pulseboard Statistics Library
//!
//! Pure functions over numeric series. This crate performs no I/O and holds
//! no state; everything downstream (the correlation matrix, the projector)
//! is built on top of these two primitives.
//!
//! ## Degenerate-input policy
//!
//! These functions never return `NaN` and never error on well-typed input.
//! Inputs too short or too flat to carry a meaningful answer get a defined
//! fallback (an empty series, a correlation of `0.0`) so that callers do not
//! have to special-case non-finite floats.

/// Computes the unweighted simple moving average of `series` over a trailing
/// `window`.
///
/// The output is aligned to the tail of the input: element `i` of the result
/// is the mean of `series[i..i + window]`, so the result is shorter than the
/// source by `window - 1` elements. No padding is performed for the missing
/// leading elements; callers aligning the output back to the source
/// timestamps must handle the offset themselves.
///
/// # Returns
///
/// A vector of length `max(0, series.len() - window + 1)`. The result is
/// empty when `series.len() < window` or `window == 0`.
pub fn simple_moving_average(series: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || series.len() < window {
        return Vec::new();
    }

    series
        .windows(window)
        .map(|w| w.iter().sum::<f64>() / window as f64)
        .collect()
}

/// Computes the Pearson correlation coefficient between two series.
///
/// Only the first `n = min(a.len(), b.len())` elements of each series are
/// considered; trailing elements of the longer series are silently ignored.
/// No resampling or timestamp alignment is performed.
///
/// # Returns
///
/// `covariance / (σa · σb)` using population statistics, clamped to
/// `[-1.0, 1.0]` to guard against floating-point drift. Returns `0.0` when
/// `n < 2` or when either series has zero variance over the first `n`
/// elements; this is the defined degenerate-case fallback, not an error.
pub fn pearson_correlation(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n < 2 {
        return 0.0;
    }

    let mean_a = a[..n].iter().sum::<f64>() / n as f64;
    let mean_b = b[..n].iter().sum::<f64>() / n as f64;

    let mut variance_a = 0.0;
    let mut variance_b = 0.0;
    let mut covariance = 0.0;

    for i in 0..n {
        let da = a[i] - mean_a;
        let db = b[i] - mean_b;
        variance_a += da * da;
        variance_b += db * db;
        covariance += da * db;
    }

    variance_a /= n as f64;
    variance_b /= n as f64;
    covariance /= n as f64;

    if variance_a == 0.0 || variance_b == 0.0 {
        return 0.0;
    }

    (covariance / (variance_a.sqrt() * variance_b.sqrt())).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_output_is_shorter_than_source_by_window_minus_one() {
        let series = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        for window in 1..=series.len() {
            let sma = simple_moving_average(&series, window);
            assert_eq!(sma.len(), series.len() - window + 1);
        }
    }

    #[test]
    fn sma_elements_are_exact_window_means() {
        let series = [2.0, 4.0, 6.0, 8.0];
        let sma = simple_moving_average(&series, 2);
        assert_eq!(sma, vec![3.0, 5.0, 7.0]);

        let sma = simple_moving_average(&series, 4);
        assert_eq!(sma, vec![5.0]);
    }

    #[test]
    fn sma_is_empty_when_series_is_shorter_than_window() {
        assert!(simple_moving_average(&[1.0, 2.0], 3).is_empty());
        assert!(simple_moving_average(&[], 1).is_empty());
    }

    #[test]
    fn sma_with_zero_window_is_empty() {
        assert!(simple_moving_average(&[1.0, 2.0, 3.0], 0).is_empty());
    }

    #[test]
    fn pearson_self_correlation_is_one_for_non_constant_series() {
        let a = [1.0, 2.0, 4.0, 8.0, 16.0];
        assert!((pearson_correlation(&a, &a) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_is_zero_for_constant_series() {
        let flat = [3.0, 3.0, 3.0, 3.0];
        let moving = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(pearson_correlation(&flat, &flat), 0.0);
        assert_eq!(pearson_correlation(&flat, &moving), 0.0);
        assert_eq!(pearson_correlation(&moving, &flat), 0.0);
    }

    #[test]
    fn pearson_is_zero_for_series_shorter_than_two() {
        assert_eq!(pearson_correlation(&[1.0], &[2.0]), 0.0);
        assert_eq!(pearson_correlation(&[], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn pearson_is_symmetric() {
        let a = [1.0, 3.0, 2.0, 5.0, 4.0];
        let b = [2.0, 1.0, 4.0, 3.0, 6.0];
        assert_eq!(pearson_correlation(&a, &b), pearson_correlation(&b, &a));
    }

    #[test]
    fn pearson_ignores_trailing_elements_of_the_longer_series() {
        let short = [1.0, 2.0, 3.0];
        let long = [1.0, 2.0, 3.0, 100.0, -50.0];
        assert!((pearson_correlation(&short, &long) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_detects_perfect_inverse_correlation() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [4.0, 3.0, 2.0, 1.0];
        assert!((pearson_correlation(&a, &b) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_stays_within_unit_interval() {
        let a = [1.0, 5.0, 2.0, 8.0, 3.0, 9.0];
        let b = [2.0, 4.0, 1.0, 9.0, 2.0, 8.0];
        let r = pearson_correlation(&a, &b);
        assert!((-1.0..=1.0).contains(&r));
    }
}
