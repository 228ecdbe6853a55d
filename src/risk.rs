// =============================================================================
// Risk Scorer — market-structure risk of a token
// =============================================================================
//
// Five sub-scores, each in [0, 1] where 1 means "safe":
//   1. Liquidity        min(liquidity / cap, 1)        cap  $100M
//   2. Volume           min(volume_24h / cap, 1)       cap   $10M
//   3. Market cap       min(market_cap / cap, 1)       cap    $1B
//   4. Inverse vol.     1 - min(volatility / cap, 1)   cap    0.1
//   5. Buy/sell balance 1 - |1 - buy_sell_ratio|
//
// risk_score = 1 - weighted_average(sub-scores), clamped to [0, 1].
// Polarity: a HIGHER risk_score means MORE risk.
//
// Liquidity depth (reported alongside): depth_score = liquidity / volume_24h.
// =============================================================================

use serde::Serialize;
use tracing::debug;

use crate::runtime_config::RiskParams;
use crate::signals::weighted_score::{
    finite_or, unit, volatility_factor, weighted_average, DEFAULT_VOLATILITY,
};

/// Raw market inputs of the risk score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskInputs {
    pub liquidity: f64,
    pub volume: f64,
    pub market_cap: f64,
    pub volatility: f64,
    pub buy_sell_ratio: f64,
}

/// Normalised sub-scores (1 = safe), in weight order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskBreakdown {
    pub liquidity: f64,
    pub volume: f64,
    pub market_cap: f64,
    pub stability: f64,
    pub balance: f64,
}

impl RiskBreakdown {
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.liquidity,
            self.volume,
            self.market_cap,
            self.stability,
            self.balance,
        ]
    }
}

/// Normalise the raw inputs.
///
/// Non-finite inputs are replaced before scoring: volatility by
/// [`DEFAULT_VOLATILITY`], the ratio by 1.0 (balanced), everything else by 0.
pub fn risk_breakdown(inputs: &RiskInputs, params: &RiskParams) -> RiskBreakdown {
    let liquidity = finite_or("liquidity", inputs.liquidity, 0.0);
    let volume = finite_or("volume", inputs.volume, 0.0);
    let market_cap = finite_or("market_cap", inputs.market_cap, 0.0);
    let volatility = finite_or("volatility", inputs.volatility, DEFAULT_VOLATILITY);
    let ratio = finite_or("buy_sell_ratio", inputs.buy_sell_ratio, 1.0);

    RiskBreakdown {
        liquidity: capped(liquidity, params.liquidity_cap),
        volume: capped(volume, params.volume_cap),
        market_cap: capped(market_cap, params.market_cap_cap),
        stability: volatility_factor(volatility, params.volatility_cap),
        balance: unit(1.0 - (1.0 - ratio).abs()),
    }
}

/// Risk score in [0, 1]; higher means riskier. Never fails.
pub fn score_risk(inputs: &RiskInputs, params: &RiskParams) -> f64 {
    let breakdown = risk_breakdown(inputs, params);

    let pairs: Vec<(f64, f64)> = breakdown
        .as_array()
        .into_iter()
        .zip(params.weights)
        .collect();
    let safety = weighted_average(&pairs);
    let risk = unit(1.0 - safety);

    debug!(
        liquidity = breakdown.liquidity,
        volume = breakdown.volume,
        market_cap = breakdown.market_cap,
        stability = breakdown.stability,
        balance = breakdown.balance,
        risk,
        "risk scored"
    );

    risk
}

/// Pool liquidity relative to traded volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LiquidityAnalysis {
    pub total_liquidity: f64,
    pub volume_24h: f64,
    /// `liquidity / volume_24h`; 0 without positive volume.
    pub depth_score: f64,
}

/// Depth of the pool against its 24h volume. Never fails.
pub fn analyze_liquidity(liquidity: f64, volume_24h: f64) -> LiquidityAnalysis {
    let depth_score = if volume_24h > 0.0 && volume_24h.is_finite() && liquidity.is_finite() {
        liquidity / volume_24h
    } else {
        0.0
    };

    LiquidityAnalysis {
        total_liquidity: liquidity,
        volume_24h,
        depth_score,
    }
}

/// `value / cap` clamped to [0, 1]; a non-positive cap scores any positive
/// value as 1.
fn capped(value: f64, cap: f64) -> f64 {
    if cap > 0.0 {
        unit(value / cap)
    } else if value > 0.0 {
        1.0
    } else {
        0.0
    }
}
