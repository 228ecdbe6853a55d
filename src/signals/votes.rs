// =============================================================================
// Indicator Votes — discrete per-indicator signals and their aggregate
// =============================================================================
//
// Each indicator casts one vote from its latest reading:
//   RSI        BUY < oversold,  SELL > overbought
//   MACD       BUY macd > signal,  SELL macd < signal
//   Bollinger  BUY price < lower,  SELL price > upper
//   EMA        BUY price > EMA20 > EMA50,  SELL price < EMA20 < EMA50
//
// Aggregation: buy_strength = buy / total, sell_strength = sell / total.
// Buy-side thresholds are evaluated before sell-side ones.
// =============================================================================

use serde::Serialize;

use crate::indicators::{EmaTriplet, IndicatorSet};
use crate::runtime_config::SignalThresholds;
use crate::signals::weighted_score::score_technical;
use crate::types::{Recommendation, SignalVote};

/// Vote of every indicator, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorVotes {
    pub rsi: SignalVote,
    pub macd: SignalVote,
    pub bollinger: SignalVote,
    pub ema: SignalVote,
}

impl IndicatorVotes {
    pub fn as_array(&self) -> [SignalVote; 4] {
        [self.rsi, self.macd, self.bollinger, self.ema]
    }
}

/// Tally of votes by category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VoteCounts {
    #[serde(rename = "buy_signals")]
    pub buy: u32,
    #[serde(rename = "sell_signals")]
    pub sell: u32,
    #[serde(rename = "neutral_signals")]
    pub neutral: u32,
}

impl VoteCounts {
    pub fn total(&self) -> u32 {
        self.buy + self.sell + self.neutral
    }

    pub fn record(&mut self, vote: SignalVote) {
        match vote {
            SignalVote::Buy => self.buy += 1,
            SignalVote::Sell => self.sell += 1,
            SignalVote::Neutral => self.neutral += 1,
        }
    }

    /// Fraction of BUY votes; 0 when there are no votes.
    pub fn buy_strength(&self) -> f64 {
        self.share(self.buy)
    }

    /// Fraction of SELL votes; 0 when there are no votes.
    pub fn sell_strength(&self) -> f64 {
        self.share(self.sell)
    }

    /// Mean of the votes scored +1 (BUY), -1 (SELL) and 0 (NEUTRAL); 0 when
    /// there are no votes.
    pub fn composite(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => (self.buy as f64 - self.sell as f64) / total as f64,
        }
    }

    fn share(&self, count: u32) -> f64 {
        match self.total() {
            0 => 0.0,
            total => count as f64 / total as f64,
        }
    }
}

impl FromIterator<SignalVote> for VoteCounts {
    fn from_iter<I: IntoIterator<Item = SignalVote>>(iter: I) -> Self {
        let mut counts = Self::default();
        for vote in iter {
            counts.record(vote);
        }
        counts
    }
}

/// Output of the signal generator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TradingSignals {
    pub votes: IndicatorVotes,
    #[serde(flatten)]
    pub counts: VoteCounts,
    pub total_signals: u32,
    pub recommendation: Recommendation,
    /// Mean vote in [-1, 1].
    pub composite_signal: f64,
    /// Trend, momentum and signal agreement in [0, 1].
    pub technical_score: f64,
}

// -----------------------------------------------------------------------------
// Per-indicator votes
// -----------------------------------------------------------------------------

pub fn rsi_vote(rsi: f64, thresholds: &SignalThresholds) -> SignalVote {
    if rsi < thresholds.rsi_oversold {
        SignalVote::Buy
    } else if rsi > thresholds.rsi_overbought {
        SignalVote::Sell
    } else {
        SignalVote::Neutral
    }
}

pub fn macd_vote(macd: f64, signal: f64) -> SignalVote {
    if macd > signal {
        SignalVote::Buy
    } else if macd < signal {
        SignalVote::Sell
    } else {
        SignalVote::Neutral
    }
}

pub fn bollinger_vote(price: f64, upper: f64, lower: f64) -> SignalVote {
    if price < lower {
        SignalVote::Buy
    } else if price > upper {
        SignalVote::Sell
    } else {
        SignalVote::Neutral
    }
}

pub fn ema_vote(price: f64, ema: &EmaTriplet) -> SignalVote {
    if ema.bullish_alignment(price) {
        SignalVote::Buy
    } else if ema.bearish_alignment(price) {
        SignalVote::Sell
    } else {
        SignalVote::Neutral
    }
}

// -----------------------------------------------------------------------------
// Aggregation
// -----------------------------------------------------------------------------

/// Map vote counts to a recommendation.
pub fn recommend(counts: &VoteCounts, thresholds: &SignalThresholds) -> Recommendation {
    let buy = counts.buy_strength();
    let sell = counts.sell_strength();

    if buy > thresholds.strong_threshold {
        Recommendation::StrongBuy
    } else if buy > thresholds.moderate_threshold {
        Recommendation::Buy
    } else if sell > thresholds.strong_threshold {
        Recommendation::StrongSell
    } else if sell > thresholds.moderate_threshold {
        Recommendation::Sell
    } else {
        Recommendation::Neutral
    }
}

/// Vote on every indicator against `current_price` and aggregate.
pub fn generate_signals(
    indicators: &IndicatorSet,
    current_price: f64,
    thresholds: &SignalThresholds,
) -> TradingSignals {
    let votes = IndicatorVotes {
        rsi: rsi_vote(indicators.rsi, thresholds),
        macd: macd_vote(indicators.macd.macd, indicators.macd.signal),
        bollinger: bollinger_vote(
            current_price,
            indicators.bollinger.upper,
            indicators.bollinger.lower,
        ),
        ema: ema_vote(current_price, &indicators.ema),
    };

    let counts: VoteCounts = votes.as_array().into_iter().collect();
    let composite_signal = counts.composite();

    TradingSignals {
        votes,
        counts,
        total_signals: counts.total(),
        recommendation: recommend(&counts, thresholds),
        composite_signal,
        technical_score: score_technical(indicators.adx_trend, indicators.rsi, composite_signal),
    }
}
