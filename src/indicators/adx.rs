// =============================================================================
// Average Directional Index (ADX)
// =============================================================================
//
// ADX quantifies trend **strength** regardless of direction.
//
// Calculation pipeline (one value per bar-to-bar transition):
//   1. Compute True Range (TR) and smooth it with EMA(period) => ATR.
//   2. Compute +DM / -DM per bar; the non-dominant or negative side is 0.
//   3. Smooth +DM and -DM with EMA(period).
//   4. +DI = smoothed(+DM) / ATR * 100,  -DI = smoothed(-DM) / ATR * 100
//   5. DX  = |+DI - -DI| / (+DI + -DI) * 100
//   6. ADX = EMA(period) of DX.
//
// The output is index-aligned with the input closes; the first bar has no
// predecessor and reads 0.  Fewer than `period + 1` bars gives all zeros.
//
// Interpretation:
//   ADX > 25  => trending market
//   ADX < 20  => ranging / choppy market
// =============================================================================

use super::atr::calculate_atr;
use super::ema::calculate_ema;

/// Bars averaged by [`trend_strength`].
pub const TREND_WINDOW: usize = 10;

/// Compute the ADX series for the given high / low / close columns.
///
/// Columns are truncated to the shortest of the three.
pub fn calculate_adx(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<f64> {
    let n = highs.len().min(lows.len()).min(closes.len());
    if period == 0 || n < period + 1 {
        return vec![0.0; n];
    }

    // ------------------------------------------------------------------
    // Step 1: ATR
    // ------------------------------------------------------------------
    let atr = calculate_atr(&highs[..n], &lows[..n], &closes[..n], period);

    // ------------------------------------------------------------------
    // Step 2: Raw +DM, -DM for each consecutive pair
    // ------------------------------------------------------------------
    let mut plus_dm = Vec::with_capacity(n - 1);
    let mut minus_dm = Vec::with_capacity(n - 1);

    for i in 1..n {
        let up_move = highs[i] - highs[i - 1];
        let down_move = lows[i - 1] - lows[i];

        let pdm = if up_move > down_move && up_move > 0.0 {
            up_move
        } else {
            0.0
        };
        let mdm = if down_move > up_move && down_move > 0.0 {
            down_move
        } else {
            0.0
        };

        plus_dm.push(pdm);
        minus_dm.push(mdm);
    }

    // ------------------------------------------------------------------
    // Steps 3-5: smoothed DM => DI => DX
    // ------------------------------------------------------------------
    let smooth_plus = calculate_ema(&plus_dm, period);
    let smooth_minus = calculate_ema(&minus_dm, period);

    let dx: Vec<f64> = atr
        .iter()
        .zip(smooth_plus.iter().zip(smooth_minus.iter()))
        .map(|(&tr, (&pdm, &mdm))| compute_dx(pdm, mdm, tr))
        .collect();

    // ------------------------------------------------------------------
    // Step 6: ADX = EMA of DX
    // ------------------------------------------------------------------
    let mut result = Vec::with_capacity(n);
    result.push(0.0);
    result.extend(calculate_ema(&dx, period).into_iter().map(|v| {
        if v.is_finite() {
            v.clamp(0.0, 100.0)
        } else {
            0.0
        }
    }));

    result
}

/// Most recent ADX value, 0.0 when there is not enough data.
/// Mean of the trailing `window` ADX values, scaled to [0, 1].
///
/// Smooths the latest reading over recent bars; 0 for an empty series.
pub fn trend_strength(adx: &[f64], window: usize) -> f64 {
    let tail = &adx[adx.len().saturating_sub(window.max(1))..];
    if tail.is_empty() {
        return 0.0;
    }
    let mean = tail.iter().sum::<f64>() / tail.len() as f64;
    (mean / 100.0).clamp(0.0, 1.0)
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Compute DX from smoothed +DM, -DM, and ATR values.
///
/// A zero ATR or zero directional movement yields 0.
fn compute_dx(smooth_plus_dm: f64, smooth_minus_dm: f64, atr: f64) -> f64 {
    if atr == 0.0 {
        return 0.0;
    }

    let plus_di = (smooth_plus_dm / atr) * 100.0;
    let minus_di = (smooth_minus_dm / atr) * 100.0;

    let di_sum = plus_di + minus_di;
    if di_sum == 0.0 {
        return 0.0;
    }

    let dx = ((plus_di - minus_di).abs() / di_sum) * 100.0;

    if dx.is_finite() {
        dx
    } else {
        0.0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn latest_adx(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> f64 {
        calculate_adx(highs, lows, closes, period)
            .last()
            .copied()
            .unwrap_or(0.0)
    }

    /// Split (high, low, close) triples into columns.
    fn columns(bars: &[(f64, f64, f64)]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        (
            bars.iter().map(|b| b.0).collect(),
            bars.iter().map(|b| b.1).collect(),
            bars.iter().map(|b| b.2).collect(),
        )
    }

    #[test]
    fn adx_period_zero() {
        let (h, l, c) = columns(&[(2.0, 0.5, 1.5); 50]);
        assert!(calculate_adx(&h, &l, &c, 0).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn adx_insufficient_data_is_all_zero() {
        let (h, l, c) = columns(&[(2.0, 0.5, 1.5); 14]);
        let adx = calculate_adx(&h, &l, &c, 14);
        assert_eq!(adx.len(), 14);
        assert!(adx.iter().all(|&v| v == 0.0));
        assert_eq!(latest_adx(&h, &l, &c, 14), 0.0);
    }

    #[test]
    fn adx_output_aligned_with_input() {
        let bars: Vec<(f64, f64, f64)> = (0..30)
            .map(|i| {
                let base = 100.0 + i as f64;
                (base + 1.0, base - 1.0, base)
            })
            .collect();
        let (h, l, c) = columns(&bars);
        let adx = calculate_adx(&h, &l, &c, 14);
        assert_eq!(adx.len(), 30);
        assert_eq!(adx[0], 0.0);
    }

    #[test]
    fn adx_strong_uptrend() {
        // Consecutive higher highs and higher lows: a strong trend.
        let bars: Vec<(f64, f64, f64)> = (0..60)
            .map(|i| {
                let base = 100.0 + i as f64 * 2.0;
                (base + 1.5, base - 0.5, base + 1.0)
            })
            .collect();
        let (h, l, c) = columns(&bars);
        let value = latest_adx(&h, &l, &c, 14);
        assert!(value > 25.0, "expected ADX > 25 for strong trend, got {value}");
    }

    #[test]
    fn adx_pure_uptrend_reaches_hundred() {
        // No down moves at all: -DI is zero, DX is 100 on every bar.
        let closes: Vec<f64> = (100..=120).map(|x| x as f64).collect();
        let highs: Vec<f64> = closes.iter().map(|c| c * 1.02).collect();
        let lows: Vec<f64> = closes.iter().map(|c| c * 0.98).collect();
        let value = latest_adx(&highs, &lows, &closes, 14);
        assert!((value - 100.0).abs() < 1e-9, "got {value}");
    }

    #[test]
    fn adx_flat_market() {
        // Identical bars, no directional movement.
        let (h, l, c) = columns(&[(101.0, 99.0, 100.0); 60]);
        let value = latest_adx(&h, &l, &c, 14);
        assert_eq!(value, 0.0);
    }

    #[test]
    fn adx_result_range() {
        let bars: Vec<(f64, f64, f64)> = (0..100)
            .map(|i| {
                let base = 50.0 + (i as f64 * 0.3).sin() * 10.0;
                (base + 1.0, base - 1.0, base + 0.5)
            })
            .collect();
        let (h, l, c) = columns(&bars);
        for value in calculate_adx(&h, &l, &c, 14) {
            assert!(
                (0.0..=100.0).contains(&value),
                "ADX {value} out of [0,100] range"
            );
        }
    }

    #[test]
    fn adx_minimum_bars_exact() {
        let period = 5;
        let bars: Vec<(f64, f64, f64)> = (0..=period)
            .map(|i| {
                let base = 100.0 + i as f64;
                (base + 1.0, base - 0.5, base + 0.5)
            })
            .collect();
        let (h, l, c) = columns(&bars);
        assert!(latest_adx(&h, &l, &c, period) > 0.0);

        // One fewer bar falls below period + 1.
        assert_eq!(latest_adx(&h[..period], &l[..period], &c[..period], period), 0.0);
    }

    #[test]
    fn trend_strength_averages_trailing_window() {
        let mut adx = vec![0.0; 20];
        adx.extend([40.0; 10]);
        assert!((trend_strength(&adx, TREND_WINDOW) - 0.4).abs() < 1e-12);
        // Shorter than the window: mean of everything.
        assert!((trend_strength(&[20.0, 60.0], TREND_WINDOW) - 0.4).abs() < 1e-12);
        assert_eq!(trend_strength(&[], TREND_WINDOW), 0.0);
    }
}
