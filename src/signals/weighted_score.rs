// =============================================================================
// Weighted Confidence Scorer — blends votes, risk, momentum and volatility
// =============================================================================
//
// Components (each normalised to [0, 1]):
//   buy_ratio          buy_votes / total_votes, 0.5 with no votes
//   safety             1 - risk_score
//   momentum_score     0.5 + momentum_pct / 100
//   volatility_factor  1 - min(volatility / cap, 1)
//
// confidence = weighted average of the components, clamped to [0, 1].
// =============================================================================

use serde::Serialize;
use tracing::warn;

use crate::runtime_config::ConfidenceParams;
use crate::signals::votes::VoteCounts;

/// Volatility assumed when the measured value is NaN or infinite.
pub const DEFAULT_VOLATILITY: f64 = 0.5;

/// Risk score assumed when the supplied value is NaN or infinite.
pub const DEFAULT_RISK_SCORE: f64 = 0.5;

/// Weights of trend strength, RSI momentum and signal agreement in the
/// technical score.
pub const TECHNICAL_WEIGHTS: [f64; 3] = [0.4, 0.3, 0.3];

/// The contribution of a single component to the final score.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreContribution {
    pub name: &'static str,
    pub value: f64,
    pub weight: f64,
}

/// Weighted average of `(value, weight)` pairs.
///
/// Negative or non-finite weights count as zero; with no usable weight the
/// neutral 0.5 is returned.
pub fn weighted_average(components: &[(f64, f64)]) -> f64 {
    let (sum, total_weight) = components
        .iter()
        .map(|&(value, weight)| {
            let w = if weight.is_finite() && weight > 0.0 {
                weight
            } else {
                0.0
            };
            (value * w, w)
        })
        .fold((0.0, 0.0), |(s, tw), (v, w)| (s + v, tw + w));

    if total_weight > 0.0 {
        sum / total_weight
    } else {
        0.5
    }
}

/// Replace a NaN / infinite input with `default`, logging which one.
pub fn finite_or(name: &str, value: f64, default: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        warn!(input = name, %value, default, "non-finite scoring input replaced");
        default
    }
}

/// Clamp into [0, 1].
pub fn unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Normalised components of the confidence score, in weight order.
pub fn confidence_components(
    votes: &VoteCounts,
    risk_score: f64,
    momentum: f64,
    volatility: f64,
    params: &ConfidenceParams,
) -> [ScoreContribution; 4] {
    let risk_score = unit(finite_or("risk_score", risk_score, DEFAULT_RISK_SCORE));
    let momentum = finite_or("momentum", momentum, 0.0);
    let volatility = finite_or("volatility", volatility, DEFAULT_VOLATILITY);

    let buy_ratio = match votes.total() {
        0 => 0.5,
        total => votes.buy as f64 / total as f64,
    };
    let momentum_score = unit(0.5 + momentum / 100.0);
    let vol_factor = volatility_factor(volatility, params.volatility_cap);

    let w = params.weights;
    [
        ScoreContribution {
            name: "buy_ratio",
            value: buy_ratio,
            weight: w[0],
        },
        ScoreContribution {
            name: "safety",
            value: 1.0 - risk_score,
            weight: w[1],
        },
        ScoreContribution {
            name: "momentum",
            value: momentum_score,
            weight: w[2],
        },
        ScoreContribution {
            name: "volatility",
            value: vol_factor,
            weight: w[3],
        },
    ]
}

/// Confidence in the recommendation, in [0, 1]. Never fails; out-of-range
/// inputs are clamped and non-finite ones replaced by defaults.
pub fn score_confidence(
    votes: &VoteCounts,
    risk_score: f64,
    momentum: f64,
    volatility: f64,
    params: &ConfidenceParams,
) -> f64 {
    let components = confidence_components(votes, risk_score, momentum, volatility, params);
    let pairs: Vec<(f64, f64)> = components.iter().map(|c| (c.value, c.weight)).collect();
    unit(weighted_average(&pairs))
}

/// Technical score in [0, 1].
///
/// Blends ADX trend strength (already scaled to [0, 1]), RSI distance from
/// neutral `|rsi - 50| / 50`, and the magnitude of the composite vote.
pub fn score_technical(trend_strength: f64, rsi: f64, composite_signal: f64) -> f64 {
    let trend = unit(finite_or("trend_strength", trend_strength, 0.0));
    let momentum = unit((finite_or("rsi", rsi, 50.0) - 50.0).abs() / 50.0);
    let agreement = unit(finite_or("composite_signal", composite_signal, 0.0).abs());

    let pairs: Vec<(f64, f64)> = [trend, momentum, agreement]
        .into_iter()
        .zip(TECHNICAL_WEIGHTS)
        .collect();
    unit(weighted_average(&pairs))
}

/// `1 - min(volatility / cap, 1)`, clamped to [0, 1].  A non-positive cap
/// treats any positive volatility as maximal.
pub fn volatility_factor(volatility: f64, cap: f64) -> f64 {
    let ratio = if cap > 0.0 {
        volatility / cap
    } else if volatility > 0.0 {
        1.0
    } else {
        0.0
    };
    unit(1.0 - ratio.min(1.0))
}
