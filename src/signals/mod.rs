// =============================================================================
// Signals Module
// =============================================================================
//
// Signal generation and confidence scoring:
// - Per-indicator BUY / SELL / NEUTRAL votes and the aggregate recommendation
// - Weighted confidence score over votes, risk, momentum and volatility

pub mod votes;
pub mod weighted_score;

pub use votes::{generate_signals, IndicatorVotes, TradingSignals, VoteCounts};
pub use weighted_score::{score_confidence, weighted_average};
