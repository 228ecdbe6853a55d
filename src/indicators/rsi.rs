// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Compute price changes (deltas) from consecutive closes.
// Step 2 — Seed average gain / average loss with the SMA of the first `period`
//          gains / losses.
// Step 3 — Apply Wilder's exponential smoothing (alpha = 1 / period):
//            avg_gain = (prev_avg_gain * (period - 1) + current_gain) / period
//            avg_loss = (prev_avg_loss * (period - 1) + current_loss) / period
// Step 4 — RS  = avg_gain / max(avg_loss, 1e-4)
//          RSI = 100 - 100 / (1 + RS)
//
// Window overrides, checked on the trailing `period` deltas before Step 4:
//   flat window      => 50.0
//   no losses        => 100.0
//   no gains         => 0.0
//
// Thresholds:  RSI > 70 => OVERBOUGHT,  RSI < 30 => OVERSOLD.
// =============================================================================

/// RSI value reported when there is not enough history or no movement.
pub const NEUTRAL_RSI: f64 = 50.0;

/// Floor applied to the average loss before dividing.
///
/// The floor is absolute, not relative to price, so RSI is scale dependent
/// for sub-cent tokens: when every loss is far below 1e-4 the floor dominates
/// and RSI collapses towards 0 even on a mixed, rising series.
const MIN_AVG_LOSS: f64 = 1e-4;

/// Compute the full RSI series for the given `closes` and `period`.
///
/// The output has one value per close.  Indices before the first complete
/// window (`period` deltas) hold [`NEUTRAL_RSI`], as does the whole series
/// when `closes.len() < period + 1`.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let n = closes.len();
    if period == 0 || n < period + 1 {
        return vec![NEUTRAL_RSI; n];
    }

    // --- Compute price deltas ------------------------------------------------
    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    // --- Seed averages with SMA of first `period` deltas ---------------------
    let (sum_gain, sum_loss) = split_gains_losses(&deltas[..period]);
    let period_f = period as f64;
    let mut avg_gain = sum_gain / period_f;
    let mut avg_loss = sum_loss / period_f;

    let mut result = vec![NEUTRAL_RSI; period];
    result.push(rsi_for_window(&deltas[..period], avg_gain, avg_loss));

    // --- Wilder's smoothing for subsequent values ----------------------------
    for i in period..deltas.len() {
        let delta = deltas[i];
        let gain = if delta > 0.0 { delta } else { 0.0 };
        let loss = if delta < 0.0 { -delta } else { 0.0 };

        avg_gain = (avg_gain * (period_f - 1.0) + gain) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + loss) / period_f;

        let window = &deltas[i + 1 - period..=i];
        result.push(rsi_for_window(window, avg_gain, avg_loss));
    }

    result
}

/// Most recent RSI value. Never fails; short series return [`NEUTRAL_RSI`].
pub fn current_rsi(closes: &[f64], period: usize) -> f64 {
    calculate_rsi(closes, period)
        .last()
        .copied()
        .unwrap_or(NEUTRAL_RSI)
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Sum of positive deltas and absolute sum of negative deltas.
fn split_gains_losses(deltas: &[f64]) -> (f64, f64) {
    deltas.iter().fold((0.0_f64, 0.0_f64), |(g, l), &d| {
        if d > 0.0 {
            (g + d, l)
        } else {
            (g, l - d)
        }
    })
}

/// Apply the window overrides, then convert the smoothed averages into an
/// RSI value in [0, 100].
fn rsi_for_window(window: &[f64], avg_gain: f64, avg_loss: f64) -> f64 {
    let (gains, losses) = split_gains_losses(window);

    let rsi = if gains == 0.0 && losses == 0.0 {
        NEUTRAL_RSI
    } else if losses == 0.0 {
        100.0
    } else if gains == 0.0 {
        0.0
    } else {
        let rs = avg_gain / avg_loss.max(MIN_AVG_LOSS);
        100.0 - 100.0 / (1.0 + rs)
    };

    if rsi.is_finite() {
        rsi.clamp(0.0, 100.0)
    } else {
        NEUTRAL_RSI
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    // ---- calculate_rsi ---------------------------------------------------

    #[test]
    fn rsi_empty_input() {
        assert!(calculate_rsi(&[], 14).is_empty());
        assert_eq!(current_rsi(&[], 14), NEUTRAL_RSI);
    }

    #[test]
    fn rsi_period_zero_is_neutral() {
        assert_eq!(calculate_rsi(&[1.0, 2.0, 3.0], 0), vec![50.0; 3]);
    }

    #[test]
    fn rsi_insufficient_data_is_neutral() {
        // Need period+1 closes (period deltas). 14 closes => 13 deltas < 14.
        let closes: Vec<f64> = (1..=14).map(|x| x as f64).collect();
        let series = calculate_rsi(&closes, 14);
        assert_eq!(series.len(), 14);
        assert!(series.iter().all(|&v| v == NEUTRAL_RSI));
    }

    #[test]
    fn rsi_output_aligned_with_input() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let series = calculate_rsi(&closes, 14);
        assert_eq!(series.len(), 30);
        assert_eq!(series[13], NEUTRAL_RSI);
    }

    #[test]
    fn rsi_all_gains() {
        // Strictly ascending prices => RSI should be 100.
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let series = calculate_rsi(&closes, 14);
        for &v in &series[14..] {
            assert!((v - 100.0).abs() < 1e-10, "expected 100.0, got {v}");
        }
    }

    #[test]
    fn rsi_all_losses() {
        // Strictly descending prices => RSI should be 0.
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        let series = calculate_rsi(&closes, 14);
        for &v in &series[14..] {
            assert!(v.abs() < 1e-10, "expected 0.0, got {v}");
        }
    }

    #[test]
    fn rsi_flat_market() {
        let closes = vec![100.0; 30];
        assert_eq!(current_rsi(&closes, 14), 50.0);
    }

    #[test]
    fn rsi_flat_window_after_movement_is_neutral() {
        // Early volatility, then a window of unchanged prices.
        let mut closes = vec![10.0, 12.0, 9.0, 11.0, 8.0];
        closes.extend(std::iter::repeat(9.5).take(20));
        assert_eq!(current_rsi(&closes, 14), 50.0);
    }

    #[test]
    fn rsi_recent_uptrend_overrides_old_losses() {
        let mut closes: Vec<f64> = (1..=20).rev().map(|x| x as f64).collect();
        closes.extend((2..=20).map(|x| x as f64));
        assert_eq!(current_rsi(&closes, 14), 100.0);
    }

    #[test]
    fn rsi_range_check() {
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        let series = calculate_rsi(&closes, 14);
        for &v in &series {
            assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
        }
        let last = *series.last().unwrap();
        assert!(last > 0.0 && last < 100.0);
    }

    #[test]
    fn rsi_mixed_moves_follow_wilder_formula() {
        // 3-period RSI computed by hand.
        let closes = [10.0, 11.0, 10.5, 11.5, 11.0];
        // deltas: +1, -0.5, +1, -0.5
        // seed: gain 2/3, loss 0.5/3
        // step: gain (2/3*2 + 0)/3 = 4/9, loss (0.5/3*2 + 0.5)/3 = 0.5/9*2 + 0.5/3
        let avg_gain = 4.0 / 9.0;
        let avg_loss = (0.5 / 3.0 * 2.0 + 0.5) / 3.0;
        let expected = 100.0 - 100.0 / (1.0 + avg_gain / avg_loss);
        let got = current_rsi(&closes, 3);
        assert!((got - expected).abs() < 1e-10, "got {got}, expected {expected}");
    }

    #[test]
    fn loss_floor_makes_rsi_scale_dependent() {
        // +0.02 / -0.01 alternating: seed RS = 0.01 / 0.005 = 2.
        let closes: Vec<f64> = (0..21)
            .map(|i| 1.0 + 0.01 * (i / 2) as f64 + if i % 2 == 1 { 0.02 } else { 0.0 })
            .collect();
        let dollar = current_rsi(&closes, 14);
        assert!(dollar > 50.0, "got {dollar}");

        let micro: Vec<f64> = closes.iter().map(|c| c * 1e-6).collect();
        let sub_cent = current_rsi(&micro, 14);
        assert!(sub_cent < 1.0, "got {sub_cent}");
    }
}
