// =============================================================================
// Analysis Report — the record handed back for every analysed token
// =============================================================================
//
// Assembly is pure aggregation: the pipeline computes, the assembler only
// packages.  The report always carries the raw market fields and a series
// summary; indicators, signals and scores are attached only to a successful
// analysis.
//
// Status downgrade order (first match wins):
//   no price data            -> no_data
//   NaN / Inf in the input   -> invalid_data
//   fewer than 10 samples    -> limited_data
//   non-finite indicator     -> analysis_error
//   otherwise                -> success
// =============================================================================

use serde::Serialize;

use crate::error::AnalysisError;
use crate::indicators::IndicatorSet;
use crate::market_data::{MarketSnapshot, PreparedSeries, PricePoint};
use crate::risk::{analyze_liquidity, LiquidityAnalysis};
use crate::runtime_config::AnalysisConfig;
use crate::signals::TradingSignals;
use crate::types::AnalysisStatus;

/// Raw market fields, echoed back regardless of status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSummary {
    pub current_price: f64,
    pub volume_24h: f64,
    pub liquidity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_change_24h: Option<f64>,
    pub market_cap: f64,
    pub buy_sell_ratio: f64,
}

impl MarketSummary {
    pub fn from_snapshot(snapshot: &MarketSnapshot) -> Self {
        Self {
            current_price: snapshot.current_price(),
            volume_24h: snapshot.volume_24h,
            liquidity: snapshot.liquidity_usd,
            price_change_24h: snapshot.price_change_24h,
            market_cap: snapshot.market_cap,
            buy_sell_ratio: snapshot.buy_sell_ratio(),
        }
    }
}

/// What the engine saw of the price history.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeriesSummary {
    /// Real samples supplied.
    pub samples: usize,
    /// Points the indicators ran on (after padding).
    pub analysed_points: usize,
    pub padded: bool,
    pub synthesized_range: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
}

impl SeriesSummary {
    /// Summary of the raw history. Non-finite prices are left out of the
    /// min / max.
    pub fn from_snapshot(snapshot: &MarketSnapshot) -> Self {
        let finite = snapshot
            .prices
            .iter()
            .map(|p| p.price)
            .filter(|p| p.is_finite());

        let (min_price, max_price) =
            finite.fold((None, None), |(lo, hi): (Option<f64>, Option<f64>), p| {
                (
                    Some(lo.map_or(p, |lo| lo.min(p))),
                    Some(hi.map_or(p, |hi| hi.max(p))),
                )
            });

        Self {
            samples: snapshot.prices.len(),
            analysed_points: 0,
            padded: false,
            synthesized_range: false,
            first_timestamp: snapshot.prices.first().map(|p| p.timestamp),
            last_timestamp: snapshot.prices.last().map(|p| p.timestamp),
            min_price,
            max_price,
        }
    }

    /// Record how the series was prepared for the indicators.
    pub fn record_preparation(&mut self, series: &PreparedSeries) {
        self.analysed_points = series.len();
        self.padded = series.padded;
        self.synthesized_range = series.synthesized_range;
    }
}

/// Indicator readings and the signals voted from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechnicalAnalysis {
    pub indicators: IndicatorSet,
    pub signals: TradingSignals,
}

/// Scores derived from the market fields and the signals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskMetrics {
    /// Higher means riskier.
    pub risk_score: f64,
    pub confidence_score: f64,
    pub volatility: f64,
}

/// Identity and raw fields shared by every report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportContext {
    pub token_address: String,
    pub chain: String,
    pub chain_name: String,
    pub native_symbol: Option<String>,
    pub market_data: MarketSummary,
    pub liquidity_analysis: LiquidityAnalysis,
    pub series: SeriesSummary,
    pub price_history: Vec<PricePoint>,
}

impl ReportContext {
    pub fn from_snapshot(snapshot: &MarketSnapshot, config: &AnalysisConfig) -> Self {
        let price_history = if config.series.include_price_history {
            snapshot.prices.clone()
        } else {
            Vec::new()
        };

        Self {
            token_address: snapshot.token_address.clone(),
            chain: snapshot.chain.clone(),
            chain_name: config.chain_name(&snapshot.chain),
            native_symbol: config
                .chain_info(&snapshot.chain)
                .map(|c| c.native_symbol.clone()),
            market_data: MarketSummary::from_snapshot(snapshot),
            liquidity_analysis: analyze_liquidity(snapshot.liquidity_usd, snapshot.volume_24h),
            series: SeriesSummary::from_snapshot(snapshot),
            price_history,
        }
    }
}

/// Result of running the pipeline on one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Complete {
        technical: TechnicalAnalysis,
        risk: RiskMetrics,
    },
    LimitedData {
        samples: usize,
        required: usize,
    },
    Failed(AnalysisError),
}

impl AnalysisOutcome {
    pub fn status(&self) -> AnalysisStatus {
        match self {
            Self::Complete { .. } => AnalysisStatus::Success,
            Self::LimitedData { .. } => AnalysisStatus::LimitedData,
            Self::Failed(err) => err.status(),
        }
    }
}

/// Complete analysis record for one token.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Unique identifier for this report (UUID v4).
    pub id: String,

    /// RFC 3339 timestamp of assembly.
    pub timestamp: String,

    pub token_address: String,
    pub chain: String,
    pub chain_name: String,

    /// Native currency of the chain; absent for chains outside the table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_symbol: Option<String>,

    pub status: AnalysisStatus,
    pub market_data: MarketSummary,
    pub liquidity_analysis: LiquidityAnalysis,
    pub series: SeriesSummary,

    /// Raw (timestamp, price) history, oldest first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub price_history: Vec<PricePoint>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub technical_analysis: Option<TechnicalAnalysis>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_metrics: Option<RiskMetrics>,

    /// Human-readable explanation of a downgraded or padded analysis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Package a pipeline outcome into a report.
pub fn assemble_report(context: ReportContext, outcome: AnalysisOutcome) -> AnalysisReport {
    let status = outcome.status();

    let (technical_analysis, risk_metrics, note) = match outcome {
        AnalysisOutcome::Complete { technical, risk } => {
            let note = context.series.padded.then(|| {
                format!(
                    "Only {} price samples; series padded to {} points by repeating the last price",
                    context.series.samples, context.series.analysed_points
                )
            });
            (Some(technical), Some(risk), note)
        }
        AnalysisOutcome::LimitedData { samples, required } => (
            None,
            None,
            Some(format!(
                "Only {samples} price samples; at least {required} are needed for technical analysis"
            )),
        ),
        AnalysisOutcome::Failed(err) => (None, None, Some(err.to_string())),
    };

    AnalysisReport {
        id: uuid::Uuid::new_v4().to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        token_address: context.token_address,
        chain: context.chain,
        chain_name: context.chain_name,
        native_symbol: context.native_symbol,
        status,
        market_data: context.market_data,
        liquidity_analysis: context.liquidity_analysis,
        series: context.series,
        price_history: context.price_history,
        technical_analysis,
        risk_metrics,
        note,
    }
}
