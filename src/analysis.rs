// =============================================================================
// Analysis Pipeline — snapshot in, report out
// =============================================================================
//
// Pipeline:
//   1. Prepare the series (validate, synthesise high/low, pad)
//   2. Gate on the minimum sample count
//   3. Compute the indicator bank
//   4. Vote signals from the latest readings
//   5. Score risk and confidence
//   6. Assemble the report
//
// `analyze` never fails: every error is folded into the report status.
// =============================================================================

use tracing::{debug, info, warn};

use crate::error::AnalysisError;
use crate::indicators::compute_indicators;
use crate::indicators::roc::window_roc;
use crate::market_data::{prepare_series_with, realized_volatility, MarketSnapshot, PreparedSeries};
use crate::report::{
    assemble_report, AnalysisOutcome, AnalysisReport, ReportContext, RiskMetrics,
    TechnicalAnalysis,
};
use crate::risk::{score_risk, RiskInputs};
use crate::runtime_config::AnalysisConfig;
use crate::signals::generate_signals;
use crate::signals::weighted_score::{score_confidence, DEFAULT_VOLATILITY};

/// Run the full analysis on one snapshot.
pub fn analyze(snapshot: &MarketSnapshot, config: &AnalysisConfig) -> AnalysisReport {
    let mut context = ReportContext::from_snapshot(snapshot, config);
    let closes = snapshot.closes();

    let outcome = match prepare_series_with(
        &closes,
        snapshot.highs.as_deref(),
        snapshot.lows.as_deref(),
        &config.series,
    ) {
        Err(err) => AnalysisOutcome::Failed(err),
        Ok(series) => {
            context.series.record_preparation(&series);
            let required = config.series.min_analysis_points;
            if series.original_len < required {
                AnalysisOutcome::LimitedData {
                    samples: series.original_len,
                    required,
                }
            } else {
                match evaluate(&series, &closes, snapshot, config) {
                    Ok((technical, risk)) => AnalysisOutcome::Complete { technical, risk },
                    Err(err) => AnalysisOutcome::Failed(err),
                }
            }
        }
    };

    let report = assemble_report(context, outcome);

    match &report.note {
        Some(note) if !report.status.is_complete() => warn!(
            token = %report.token_address,
            chain = %report.chain,
            samples = report.series.samples,
            status = %report.status,
            note = %note,
            "analysis downgraded"
        ),
        _ => info!(
            token = %report.token_address,
            chain = %report.chain,
            samples = report.series.samples,
            padded = report.series.padded,
            status = %report.status,
            recommendation = ?report
                .technical_analysis
                .as_ref()
                .map(|t| t.signals.recommendation),
            "analysis complete"
        ),
    }

    report
}

/// Indicators, signals and scores of a prepared series.
///
/// `raw_closes` is the unpadded history; volatility and the momentum
/// fallback are measured on it so padding does not flatten them.
fn evaluate(
    series: &PreparedSeries,
    raw_closes: &[f64],
    snapshot: &MarketSnapshot,
    config: &AnalysisConfig,
) -> Result<(TechnicalAnalysis, RiskMetrics), AnalysisError> {
    let indicators = compute_indicators(series, &config.indicators);
    indicators.ensure_finite()?;

    let current_price = series.last_close();
    let signals = generate_signals(&indicators, current_price, &config.signals);

    let volatility = realized_volatility(raw_closes, config.series.volatility_annualisation)
        .unwrap_or_else(|| {
            debug!(
                samples = raw_closes.len(),
                default = DEFAULT_VOLATILITY,
                "volatility undefined, using default"
            );
            DEFAULT_VOLATILITY
        });

    let momentum = snapshot
        .price_change_24h
        .unwrap_or_else(|| window_roc(raw_closes));

    let risk_score = score_risk(
        &RiskInputs {
            liquidity: snapshot.liquidity_usd,
            volume: snapshot.volume_24h,
            market_cap: snapshot.market_cap,
            volatility,
            buy_sell_ratio: snapshot.buy_sell_ratio(),
        },
        &config.risk,
    );

    let confidence_score = score_confidence(
        &signals.counts,
        risk_score,
        momentum,
        volatility,
        &config.confidence,
    );

    Ok((
        TechnicalAnalysis {
            indicators,
            signals,
        },
        RiskMetrics {
            risk_score,
            confidence_score,
            volatility,
        },
    ))
}
