// =============================================================================
// Moving Average Convergence / Divergence (MACD)
// =============================================================================
//
//   MACD line   = EMA(fast) - EMA(slow)
//   Signal line = EMA(signal) of the MACD line
//   Histogram   = MACD line - Signal line
//
// All EMAs are the non-adjusted recursive form from `ema.rs`, so every output
// series has one value per input close.
// =============================================================================

use serde::Serialize;

use super::ema::calculate_ema;

/// Latest MACD reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacdValue {
    pub macd: f64,
    pub signal: f64,
    pub hist: f64,
}

/// Full MACD series, index-aligned with the input closes.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub hist: Vec<f64>,
}

impl MacdSeries {
    /// Most recent reading; all zeros for an empty series.
    pub fn latest(&self) -> MacdValue {
        MacdValue {
            macd: self.macd.last().copied().unwrap_or(0.0),
            signal: self.signal.last().copied().unwrap_or(0.0),
            hist: self.hist.last().copied().unwrap_or(0.0),
        }
    }
}

/// Compute MACD for `closes` with the given fast / slow / signal spans.
pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let fast_ema = calculate_ema(closes, fast);
    let slow_ema = calculate_ema(closes, slow);

    let macd: Vec<f64> = fast_ema
        .iter()
        .zip(slow_ema.iter())
        .map(|(f, s)| f - s)
        .collect();

    let signal_line = calculate_ema(&macd, signal);

    let hist = macd
        .iter()
        .zip(signal_line.iter())
        .map(|(m, s)| m - s)
        .collect();

    MacdSeries {
        macd,
        signal: signal_line,
        hist,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macd_empty_input() {
        let series = calculate_macd(&[], 12, 26, 9);
        assert!(series.macd.is_empty());
        assert_eq!(series.latest(), MacdValue { macd: 0.0, signal: 0.0, hist: 0.0 });
    }

    #[test]
    fn macd_series_lengths_match_input() {
        let closes: Vec<f64> = (1..=40).map(|x| x as f64).collect();
        let series = calculate_macd(&closes, 12, 26, 9);
        assert_eq!(series.macd.len(), 40);
        assert_eq!(series.signal.len(), 40);
        assert_eq!(series.hist.len(), 40);
        // First sample seeds every EMA with the same value.
        assert_eq!(series.macd[0], 0.0);
    }

    #[test]
    fn macd_bullish_on_uptrend() {
        let closes: Vec<f64> = (100..=120).map(|x| x as f64).collect();
        let latest = calculate_macd(&closes, 12, 26, 9).latest();
        assert!(latest.macd > 0.0);
        assert!(latest.macd > latest.signal);
        assert!(latest.hist > 0.0);
    }

    #[test]
    fn macd_bearish_on_downtrend() {
        let closes: Vec<f64> = (100..=120).rev().map(|x| x as f64).collect();
        let latest = calculate_macd(&closes, 12, 26, 9).latest();
        assert!(latest.macd < 0.0);
        assert!(latest.hist < 0.0);
    }

    #[test]
    fn macd_flat_is_exactly_zero() {
        let latest = calculate_macd(&[42.0; 20], 12, 26, 9).latest();
        assert_eq!(latest.macd, 0.0);
        assert_eq!(latest.signal, 0.0);
        assert_eq!(latest.hist, 0.0);
    }

    #[test]
    fn histogram_is_macd_minus_signal() {
        let closes = [5.0, 7.0, 6.0, 9.0, 8.5, 10.0, 9.0, 11.0];
        let series = calculate_macd(&closes, 3, 6, 2);
        for i in 0..closes.len() {
            assert!((series.hist[i] - (series.macd[i] - series.signal[i])).abs() < 1e-12);
        }
    }
}
