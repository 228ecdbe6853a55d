// =============================================================================
// Average True Range (ATR) — EMA smoothing
// =============================================================================
//
// ATR measures market volatility by decomposing the entire range of a bar.
//
// True Range (TR) for each bar after the first:
//   TR = max(|H - L|, |H - prevClose|, |L - prevClose|)
//
// ATR is the EMA (span = period) of the TR series, seeded from the first TR.
// Default period: 14
// =============================================================================

use super::ema::calculate_ema;

/// True Range for every bar-to-bar transition.
///
/// The output has `closes.len() - 1` values (empty for fewer than two bars).
/// Columns are truncated to the shortest of the three.
pub fn true_range(highs: &[f64], lows: &[f64], closes: &[f64]) -> Vec<f64> {
    let n = highs.len().min(lows.len()).min(closes.len());
    if n < 2 {
        return Vec::new();
    }

    (1..n)
        .map(|i| {
            let high = highs[i];
            let low = lows[i];
            let prev_close = closes[i - 1];

            let hl = (high - low).abs();
            let hc = (high - prev_close).abs();
            let lc = (low - prev_close).abs();

            hl.max(hc).max(lc)
        })
        .collect()
}

/// ATR series aligned with `true_range` output (one value per transition).
pub fn calculate_atr(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<f64> {
    calculate_ema(&true_range(highs, lows, closes), period)
}
