use crate::error::AnalyticsError;
use core_types::{PredictionPoint, TimeSeriesPoint};
use statistics::simple_moving_average;

/// Milliseconds in one simulated day. Every forecast step advances by exactly
/// this much, independent of the source series' actual sampling interval.
pub const DAY_MS: i64 = 86_400_000;

/// Short-term moving-average window used for the crossover read.
pub const SMA_FAST_WINDOW: usize = 20;

/// Long-term moving-average window used for the crossover read.
pub const SMA_SLOW_WINDOW: usize = 50;

/// The fixed trend heuristic behind the forecast.
///
/// A fast-over-slow moving-average crossover is read as bullish and every
/// projected step multiplies the price by `bullish_factor`; otherwise
/// `bearish_factor` applies. The defaults are a hardcoded placeholder rather
/// than a fitted model; they live in a named struct so a real model can be
/// substituted without touching the surrounding pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendRule {
    pub bullish_factor: f64,
    pub bearish_factor: f64,
}

impl Default for TrendRule {
    fn default() -> Self {
        Self {
            bullish_factor: 1.002,
            bearish_factor: 0.998,
        }
    }
}

impl TrendRule {
    /// Picks the per-step factor from the last defined values of the fast and
    /// slow moving averages.
    fn factor(&self, last_fast: f64, last_slow: f64) -> f64 {
        if last_fast > last_slow {
            self.bullish_factor
        } else {
            self.bearish_factor
        }
    }
}

/// The naive trend-extrapolation forecaster.
///
/// Not a statistical model: it extends the last observed price as a strict
/// exponential in the chosen trend factor. Useful as a visual cue on a chart,
/// nothing more.
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    rule: TrendRule,
    fast_window: usize,
    slow_window: usize,
}

impl Default for Projector {
    fn default() -> Self {
        Self::new(TrendRule::default())
    }
}

impl Projector {
    pub fn new(rule: TrendRule) -> Self {
        Self {
            rule,
            fast_window: SMA_FAST_WINDOW,
            slow_window: SMA_SLOW_WINDOW,
        }
    }

    /// Overrides the crossover windows; the defaults are 20 and 50.
    ///
    /// It performs validation to ensure the windows are logical: the fast
    /// window must be nonzero and shorter than the slow window, or the
    /// crossover read is meaningless.
    pub fn with_windows(
        rule: TrendRule,
        fast_window: usize,
        slow_window: usize,
    ) -> Result<Self, AnalyticsError> {
        if fast_window == 0 || fast_window >= slow_window {
            return Err(AnalyticsError::InvalidParameter(
                "sma windows".to_string(),
                "fast window must be nonzero and less than the slow window".to_string(),
            ));
        }

        Ok(Self {
            rule,
            fast_window,
            slow_window,
        })
    }

    /// Projects `horizon` daily steps forward from the end of `history`.
    ///
    /// The fast (20) and slow (50) moving averages are computed over the
    /// history's values; when the history is too short for a window to have
    /// any defined value, the last observed price stands in for it, which
    /// degrades the crossover read to "bearish" rather than failing.
    ///
    /// Step `k` (1-based) is priced at `last_price * factor^k` and stamped
    /// `last_timestamp + k * DAY_MS`, so the output is strictly exponential
    /// and its timestamps strictly increasing.
    ///
    /// # Errors
    ///
    /// `AnalyticsError::EmptySeries` when `history` is empty; there is no
    /// last price to extrapolate from, and silently producing NaN is worse
    /// than refusing.
    pub fn project(
        &self,
        history: &[TimeSeriesPoint],
        horizon: usize,
    ) -> Result<Vec<PredictionPoint>, AnalyticsError> {
        let last = history.last().ok_or(AnalyticsError::EmptySeries)?;

        let values: Vec<f64> = history.iter().map(|p| p.value).collect();
        let sma_fast = simple_moving_average(&values, self.fast_window);
        let sma_slow = simple_moving_average(&values, self.slow_window);

        let last_fast = sma_fast.last().copied().unwrap_or(last.value);
        let last_slow = sma_slow.last().copied().unwrap_or(last.value);
        let factor = self.rule.factor(last_fast, last_slow);

        tracing::debug!(
            last_price = last.value,
            last_fast,
            last_slow,
            factor,
            horizon,
            "projecting price series"
        );

        Ok((1..=horizon as i64)
            .map(|k| PredictionPoint {
                timestamp: last.timestamp + k * DAY_MS,
                predicted_price: last.value * factor.powi(k as i32),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> Vec<TimeSeriesPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| TimeSeriesPoint::new(i as i64 * 3_600_000, v))
            .collect()
    }

    #[test]
    fn bearish_projection_matches_the_closed_form() {
        // History too short for either SMA window, so both fall back to the
        // last price and the rule reads bearish (no strict crossover).
        let history = series(&[95.0, 98.0, 100.0]);
        let forecast = Projector::default().project(&history, 3).unwrap();

        let expected: Vec<f64> = (1..=3).map(|k| 100.0 * 0.998f64.powi(k)).collect();
        for (point, want) in forecast.iter().zip(expected) {
            assert!((point.predicted_price - want).abs() < 1e-9);
        }
    }

    #[test]
    fn bullish_projection_compounds_the_bullish_factor() {
        // A long rising series keeps the fast SMA above the slow SMA.
        let values: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let history = series(&values);
        let forecast = Projector::default().project(&history, 3).unwrap();

        let last_price = 159.0;
        for (k, point) in forecast.iter().enumerate() {
            let want = last_price * 1.002f64.powi(k as i32 + 1);
            assert!((point.predicted_price - want).abs() < 1e-9);
        }
    }

    #[test]
    fn prediction_values_follow_the_documented_example() {
        // trendFactor 0.998 is bearish; force the bullish branch by swapping
        // the factors so the documented 1.002 sequence applies.
        let rule = TrendRule {
            bullish_factor: 1.002,
            bearish_factor: 1.002,
        };
        let history = vec![TimeSeriesPoint::new(1_700_000_000_000, 100.0)];
        let forecast = Projector::new(rule).project(&history, 3).unwrap();

        let prices: Vec<f64> = forecast.iter().map(|p| p.predicted_price).collect();
        assert!((prices[0] - 100.2).abs() < 1e-9);
        assert!((prices[1] - 100.4004).abs() < 1e-9);
        assert!((prices[2] - 100.6012008).abs() < 1e-9);
    }

    #[test]
    fn timestamps_advance_one_day_per_step_from_the_last_observation() {
        let last_ts = 1_700_000_000_000;
        let history = vec![
            TimeSeriesPoint::new(last_ts - 60_000, 99.0),
            TimeSeriesPoint::new(last_ts, 100.0),
        ];
        let forecast = Projector::default().project(&history, 4).unwrap();

        for (k, point) in forecast.iter().enumerate() {
            assert_eq!(point.timestamp, last_ts + (k as i64 + 1) * DAY_MS);
        }
    }

    #[test]
    fn empty_history_is_an_input_validation_error() {
        let err = Projector::default().project(&[], 5).unwrap_err();
        assert!(matches!(err, AnalyticsError::EmptySeries));
    }

    #[test]
    fn degenerate_crossover_windows_are_rejected() {
        let err = Projector::with_windows(TrendRule::default(), 50, 20).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidParameter(..)));

        assert!(Projector::with_windows(TrendRule::default(), 0, 50).is_err());
        assert!(Projector::with_windows(TrendRule::default(), 20, 20).is_err());
        assert!(Projector::with_windows(TrendRule::default(), 20, 50).is_ok());
    }

    #[test]
    fn zero_horizon_yields_an_empty_forecast() {
        let history = series(&[100.0]);
        let forecast = Projector::default().project(&history, 0).unwrap();
        assert!(forecast.is_empty());
    }
}
