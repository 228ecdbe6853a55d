// =============================================================================
// TokenScope — technical analysis engine for crypto tokens
// =============================================================================
//
// Turns a token's price history and market fields into indicators (RSI, MACD,
// Bollinger Bands, EMA triplet, ADX), discrete trading signals, risk and
// confidence scores, and one structured report.
//
//   MarketSnapshot -> prepare_series -> compute_indicators -> generate_signals
//                  -> score_risk / score_confidence -> assemble_report
//
// The engine is pure and synchronous; `api` wraps it in an axum service.
// =============================================================================

pub mod analysis;
pub mod api;
pub mod app_state;
pub mod error;
pub mod indicators;
pub mod market_data;
pub mod report;
pub mod risk;
pub mod runtime_config;
pub mod signals;
pub mod types;

pub use analysis::analyze;
pub use error::{AnalysisError, ErrorKind};
pub use indicators::{compute_indicators, IndicatorSet};
pub use market_data::{prepare_series, MarketSnapshot, PreparedSeries, PricePoint};
pub use report::{assemble_report, AnalysisReport};
pub use risk::score_risk;
pub use runtime_config::AnalysisConfig;
pub use signals::{generate_signals, score_confidence, TradingSignals, VoteCounts};
pub use types::{AnalysisStatus, Recommendation, SignalVote};
