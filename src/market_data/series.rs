// =============================================================================
// Series Preparation
// =============================================================================
//
// Turns a raw price history into the uniform, finite, minimum-length series
// the indicator bank expects:
//
//   1. Reject an empty history (nothing to pad from).
//   2. Reject NaN / infinite samples.
//   3. Use caller-supplied highs / lows when they line up with the prices,
//      otherwise synthesise them as a fixed band around the price.
//   4. Pad short histories by repeating the last sample up to `min_points`.
//
// Padding keeps every indicator defined on thin histories.  The padded tail is
// not market data, so `PreparedSeries::padded` must be surfaced to callers.
// =============================================================================

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::AnalysisError;
use crate::runtime_config::SeriesParams;

/// Indicator-ready price series. All three columns have the same length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparedSeries {
    pub closes: Vec<f64>,
    pub highs: Vec<f64>,
    pub lows: Vec<f64>,
    /// Number of real samples before padding.
    pub original_len: usize,
    /// `true` when the tail was padded with repeated last values.
    pub padded: bool,
    /// `true` when highs / lows were synthesised from the price.
    pub synthesized_range: bool,
}

impl PreparedSeries {
    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Latest close (the last real sample; padding repeats it).
    pub fn last_close(&self) -> f64 {
        self.closes.last().copied().unwrap_or(0.0)
    }
}

/// Prepare a raw series with the default 20-point minimum and ±2 % synthetic
/// high/low band.
///
/// # Errors
/// - [`AnalysisError::InsufficientData`] when `prices` is empty.
/// - [`AnalysisError::InvalidData`] when any price, high or low is NaN or
///   infinite.
pub fn prepare_series(
    prices: &[f64],
    highs: Option<&[f64]>,
    lows: Option<&[f64]>,
) -> Result<PreparedSeries, AnalysisError> {
    prepare_series_with(prices, highs, lows, &SeriesParams::default())
}

/// [`prepare_series`] with explicit padding threshold and band width.
pub fn prepare_series_with(
    prices: &[f64],
    highs: Option<&[f64]>,
    lows: Option<&[f64]>,
    params: &SeriesParams,
) -> Result<PreparedSeries, AnalysisError> {
    let min_points = params.min_points;
    let band_pct = params.range_band_pct;

    if prices.is_empty() {
        return Err(AnalysisError::InsufficientData(
            "price series is empty".to_string(),
        ));
    }

    ensure_finite("price", prices)?;

    // --- High / low columns --------------------------------------------------
    let supplied = match (highs, lows) {
        (Some(h), Some(l)) if h.len() == prices.len() && l.len() == prices.len() => {
            ensure_finite("high", h)?;
            ensure_finite("low", l)?;
            Some((h.to_vec(), l.to_vec()))
        }
        (None, None) => None,
        (h, l) => {
            warn!(
                prices = prices.len(),
                highs = h.map(|v| v.len()),
                lows = l.map(|v| v.len()),
                "high/low columns do not line up with prices, synthesising range"
            );
            None
        }
    };

    let synthesized_range = supplied.is_none();
    let (mut highs, mut lows) = supplied.unwrap_or_else(|| synthesize_range(prices, band_pct));
    let mut closes = prices.to_vec();

    // --- Padding --------------------------------------------------------------
    let original_len = closes.len();
    let padded = original_len < min_points;
    if padded {
        pad_with_last(&mut closes, min_points);
        pad_with_last(&mut highs, min_points);
        pad_with_last(&mut lows, min_points);
        debug!(original_len, min_points, "series padded with last value");
    }

    // Synthesised band math can overflow near f64::MAX.
    ensure_finite("high", &highs)?;
    ensure_finite("low", &lows)?;

    Ok(PreparedSeries {
        closes,
        highs,
        lows,
        original_len,
        padded,
        synthesized_range,
    })
}

/// Sample standard deviation of simple returns, scaled by
/// `sqrt(annualisation)`.
///
/// Returns `None` for fewer than three samples, a zero previous price, or a
/// non-finite result.
pub fn realized_volatility(prices: &[f64], annualisation: f64) -> Option<f64> {
    if prices.len() < 3 {
        return None;
    }

    let mut returns = Vec::with_capacity(prices.len() - 1);
    for w in prices.windows(2) {
        if w[0] == 0.0 {
            return None;
        }
        returns.push(w[1] / w[0] - 1.0);
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let vol = variance.sqrt() * annualisation.max(0.0).sqrt();

    if vol.is_finite() {
        Some(vol)
    } else {
        None
    }
}

// =============================================================================
// Internal helpers
// =============================================================================

fn ensure_finite(column: &str, values: &[f64]) -> Result<(), AnalysisError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(idx) => Err(AnalysisError::InvalidData(format!(
            "non-finite {column} at index {idx}"
        ))),
        None => Ok(()),
    }
}

/// Approximate highs / lows as `price * (1 ± band_pct)`.  A zero band gives
/// high == low == price.
fn synthesize_range(prices: &[f64], band_pct: f64) -> (Vec<f64>, Vec<f64>) {
    let band = band_pct.abs();
    let highs = prices.iter().map(|p| p * (1.0 + band)).collect();
    let lows = prices.iter().map(|p| p * (1.0 - band)).collect();
    (highs, lows)
}

fn pad_with_last(values: &mut Vec<f64>, target: usize) {
    if let Some(&last) = values.last() {
        values.resize(target.max(values.len()), last);
    }
}
