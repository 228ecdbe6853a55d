// =============================================================================
// Rate of Change (ROC) — Momentum Indicator
// =============================================================================
//
// ROC measures the percentage change in price over a look-back period:
//   ROC = ((close - close_n) / close_n) * 100
//
// Positive ROC indicates upward momentum; negative indicates downward.  The
// analysis pipeline uses the whole-window ROC as momentum when the caller does
// not supply a 24h price change.

/// Calculate the Rate of Change (ROC) for the given closing prices and period.
///
/// Returns a vector of ROC values, one per close starting at index `period`.
pub fn calculate_roc(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() <= period {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(closes.len() - period);
    for i in period..closes.len() {
        let prev = closes[i - period];
        if prev == 0.0 {
            result.push(0.0);
        } else {
            result.push(((closes[i] - prev) / prev) * 100.0);
        }
    }
    result
}

/// Return the most recent ROC value.
pub fn current_roc(closes: &[f64], period: usize) -> Option<f64> {
    calculate_roc(closes, period).last().copied()
}

/// Percentage change from the first to the last close; 0 for fewer than two
/// closes.
pub fn window_roc(closes: &[f64]) -> f64 {
    current_roc(closes, closes.len().saturating_sub(1)).unwrap_or(0.0)
}
