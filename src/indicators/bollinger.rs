// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ). The Band Width (BBW) is the normalised
// distance: BBW = (upper - lower) / middle * 100.
//
// σ is the population standard deviation of the trailing window.  Before
// `period` samples exist the window shrinks to whatever is available, so every
// index has a defined band.

use serde::Serialize;

/// Bollinger reading at a single index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BollingerResult {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    /// (upper - lower) / middle * 100, or 0 when middle is zero.
    pub width: f64,
}

/// Calculate Bollinger Bands at every index of `closes`.
///
/// A `period` of zero is treated as one; `num_std` is used by magnitude so
/// `upper >= middle >= lower` always holds.
pub fn calculate_bollinger_series(
    closes: &[f64],
    period: usize,
    num_std: f64,
) -> Vec<BollingerResult> {
    let period = period.max(1);
    let k = num_std.abs();

    (0..closes.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(period);
            band_for_window(&closes[start..=i], k)
        })
        .collect()
}

/// Latest Bollinger reading, or `None` for an empty series.
pub fn calculate_bollinger(closes: &[f64], period: usize, num_std: f64) -> Option<BollingerResult> {
    if closes.is_empty() {
        return None;
    }
    let period = period.max(1);
    let start = closes.len().saturating_sub(period);
    Some(band_for_window(&closes[start..], num_std.abs()))
}

fn band_for_window(window: &[f64], k: f64) -> BollingerResult {
    let n = window.len() as f64;
    let middle = window.iter().sum::<f64>() / n;
    let variance = window.iter().map(|x| (x - middle).powi(2)).sum::<f64>() / n;
    let half_width = k * variance.sqrt();

    let upper = middle + half_width;
    let lower = middle - half_width;
    let width = if middle != 0.0 {
        (upper - lower) / middle * 100.0
    } else {
        0.0
    };

    BollingerResult {
        upper,
        middle,
        lower,
        width,
    }
}
