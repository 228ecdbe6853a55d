// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula (non-adjusted, seeded from the first value):
//   alpha  = 2 / (span + 1)
//   EMA_0  = x_0
//   EMA_t  = EMA_{t-1} + alpha * (x_t - EMA_{t-1})
//
// The incremental form leaves a constant series exactly constant.
// =============================================================================

use serde::Serialize;

/// Compute the EMA series for `values` with the given `span`.
///
/// The output has the same length as the input.  A `span` of zero is treated
/// as one (no smoothing).
pub fn calculate_ema(values: &[f64], span: usize) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };

    let alpha = 2.0 / (span.max(1) as f64 + 1.0);

    let mut result = Vec::with_capacity(values.len());
    let mut prev = first;
    result.push(prev);

    for &x in &values[1..] {
        prev += alpha * (x - prev);
        result.push(prev);
    }

    result
}

/// Latest EMA value, or the arithmetic mean of all samples when the series is
/// shorter than `span`.  Returns 0.0 for an empty series.
pub fn ema_or_mean(values: &[f64], span: usize) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    if values.len() < span {
        return values.iter().sum::<f64>() / values.len() as f64;
    }

    calculate_ema(values, span).last().copied().unwrap_or(0.0)
}

/// Short / medium / long EMA snapshot (20 / 50 / 200 by default).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmaTriplet {
    #[serde(rename = "EMA20")]
    pub short: f64,
    #[serde(rename = "EMA50")]
    pub medium: f64,
    #[serde(rename = "EMA200")]
    pub long: f64,
}

/// Compute the EMA triplet for the given spans.
pub fn calculate_ema_triplet(values: &[f64], spans: [usize; 3]) -> EmaTriplet {
    EmaTriplet {
        short: ema_or_mean(values, spans[0]),
        medium: ema_or_mean(values, spans[1]),
        long: ema_or_mean(values, spans[2]),
    }
}

impl EmaTriplet {
    /// `true` when price > short > medium.
    pub fn bullish_alignment(&self, price: f64) -> bool {
        price > self.short && self.short > self.medium
    }

    /// `true` when price < short < medium.
    pub fn bearish_alignment(&self, price: f64) -> bool {
        price < self.short && self.short < self.medium
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: build a simple ascending price series.
    fn ascending(n: usize) -> Vec<f64> {
        (1..=n).map(|i| i as f64).collect()
    }

    // ---- calculate_ema ---------------------------------------------------

    #[test]
    fn ema_empty_input() {
        assert!(calculate_ema(&[], 5).is_empty());
    }

    #[test]
    fn ema_seeded_from_first_value() {
        let ema = calculate_ema(&[10.0, 20.0], 3);
        assert_eq!(ema.len(), 2);
        assert!((ema[0] - 10.0).abs() < 1e-12);
        // alpha = 0.5
        assert!((ema[1] - 15.0).abs() < 1e-12);
    }

    #[test]
    fn ema_known_values() {
        let closes: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let ema = calculate_ema(&closes, 5);
        assert_eq!(ema.len(), 10);

        let alpha = 2.0 / 6.0;
        let mut expected = closes[0];
        for (i, &c) in closes.iter().enumerate().skip(1) {
            expected = alpha * c + (1.0 - alpha) * expected;
            assert!((ema[i] - expected).abs() < 1e-10, "index {i}");
        }
    }

    #[test]
    fn ema_constant_series_stays_constant() {
        let ema = calculate_ema(&[0.1; 50], 12);
        assert!(ema.iter().all(|&v| v == 0.1));
    }

    #[test]
    fn ema_lags_rising_series() {
        let closes = ascending(30);
        let ema = calculate_ema(&closes, 10);
        let last = *ema.last().unwrap();
        assert!(last < 30.0 && last > 20.0);
    }

    // ---- ema_or_mean / triplet --------------------------------------------

    #[test]
    fn short_series_falls_back_to_mean() {
        let closes = ascending(21);
        assert!((ema_or_mean(&closes, 50) - 11.0).abs() < 1e-12);
        assert!((ema_or_mean(&closes, 200) - 11.0).abs() < 1e-12);
        assert_eq!(ema_or_mean(&[], 20), 0.0);
    }

    #[test]
    fn triplet_on_rising_series_is_bullish() {
        let closes = ascending(21);
        let triplet = calculate_ema_triplet(&closes, [20, 50, 200]);
        assert!(triplet.short > triplet.medium);
        assert!(triplet.bullish_alignment(21.0));
        assert!(!triplet.bearish_alignment(21.0));
    }

    #[test]
    fn triplet_on_flat_series_is_not_aligned() {
        let triplet = calculate_ema_triplet(&[42.0; 20], [20, 50, 200]);
        assert_eq!(triplet.short, 42.0);
        assert_eq!(triplet.medium, 42.0);
        assert!(!triplet.bullish_alignment(42.0));
        assert!(!triplet.bearish_alignment(42.0));
    }

    #[test]
    fn triplet_serialises_with_span_keys() {
        let triplet = calculate_ema_triplet(&[1.0; 5], [20, 50, 200]);
        let json = serde_json::to_value(triplet).unwrap();
        assert!(json.get("EMA20").is_some());
        assert!(json.get("EMA200").is_some());
    }
}
