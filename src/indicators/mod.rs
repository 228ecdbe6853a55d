// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators in the analysis
// report.  Series functions return one value per input close; edge cases
// (short windows, zero denominators) resolve to documented sentinel values
// instead of errors.  `compute_indicators` collects the latest readings into
// a typed `IndicatorSet`.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod roc;
pub mod rsi;

use serde::Serialize;
use tracing::debug;

use crate::error::AnalysisError;
use crate::market_data::PreparedSeries;
use crate::runtime_config::IndicatorParams;

pub use bollinger::BollingerResult;
pub use ema::EmaTriplet;
pub use macd::MacdValue;

/// Latest value of every indicator, keyed the way reports expose them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorSet {
    #[serde(rename = "RSI")]
    pub rsi: f64,
    #[serde(rename = "MACD")]
    pub macd: MacdValue,
    #[serde(rename = "BB")]
    pub bollinger: BollingerResult,
    #[serde(rename = "EMA")]
    pub ema: EmaTriplet,
    #[serde(rename = "ADX")]
    pub adx: f64,
    /// Mean ADX over the last ten bars, scaled to [0, 1].
    #[serde(rename = "ADX_trend")]
    pub adx_trend: f64,
}

impl IndicatorSet {
    /// Fail when any reading is NaN or infinite (e.g. overflow on extreme
    /// prices).
    pub fn ensure_finite(&self) -> Result<(), AnalysisError> {
        let readings = [
            ("RSI", self.rsi),
            ("MACD", self.macd.macd),
            ("MACD signal", self.macd.signal),
            ("MACD histogram", self.macd.hist),
            ("BB upper", self.bollinger.upper),
            ("BB middle", self.bollinger.middle),
            ("BB lower", self.bollinger.lower),
            ("EMA short", self.ema.short),
            ("EMA medium", self.ema.medium),
            ("EMA long", self.ema.long),
            ("ADX", self.adx),
            ("ADX trend", self.adx_trend),
        ];

        match readings.iter().find(|(_, v)| !v.is_finite()) {
            Some((name, value)) => Err(AnalysisError::Computation(format!(
                "{name} produced non-finite value {value}"
            ))),
            None => Ok(()),
        }
    }
}

/// Compute every indicator's latest value from a prepared series.
///
/// Never fails: short or degenerate series yield the neutral defaults of each
/// indicator.
pub fn compute_indicators(series: &PreparedSeries, params: &IndicatorParams) -> IndicatorSet {
    let closes = &series.closes;

    let rsi = rsi::current_rsi(closes, params.rsi_period);
    let macd = macd::calculate_macd(closes, params.macd_fast, params.macd_slow, params.macd_signal)
        .latest();
    let bollinger = bollinger::calculate_bollinger(closes, params.bb_period, params.bb_std)
        .unwrap_or(BollingerResult {
            upper: 0.0,
            middle: 0.0,
            lower: 0.0,
            width: 0.0,
        });
    let ema = ema::calculate_ema_triplet(closes, params.ema_spans);
    let adx_series = adx::calculate_adx(&series.highs, &series.lows, closes, params.adx_period);
    let adx = adx_series.last().copied().unwrap_or(0.0);
    let adx_trend = adx::trend_strength(&adx_series, adx::TREND_WINDOW);

    debug!(
        samples = closes.len(),
        rsi,
        macd = macd.macd,
        macd_hist = macd.hist,
        bb_upper = bollinger.upper,
        bb_lower = bollinger.lower,
        ema_short = ema.short,
        adx,
        adx_trend,
        "indicators computed"
    );

    IndicatorSet {
        rsi,
        macd,
        bollinger,
        ema,
        adx,
        adx_trend,
    }
}
