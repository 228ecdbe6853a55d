// =============================================================================
// Runtime Configuration — Analysis parameters with atomic save
// =============================================================================
//
// Every tunable of the analysis pipeline lives here: indicator periods, vote
// thresholds, scoring caps and weights, and the chain lookup table.  The HTTP
// layer can swap the whole config at runtime without a restart.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash.  All fields carry `#[serde(default)]` so that adding new fields
// never breaks loading an older config file.
//
// =============================================================================

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_min_points() -> usize {
    20
}

fn default_min_analysis_points() -> usize {
    10
}

fn default_range_band_pct() -> f64 {
    0.02
}

fn default_volatility_annualisation() -> f64 {
    24.0
}

fn default_true() -> bool {
    true
}

fn default_rsi_period() -> usize {
    14
}

fn default_macd_fast() -> usize {
    12
}

fn default_macd_slow() -> usize {
    26
}

fn default_macd_signal() -> usize {
    9
}

fn default_bb_period() -> usize {
    20
}

fn default_bb_std() -> f64 {
    2.0
}

fn default_ema_spans() -> [usize; 3] {
    [20, 50, 200]
}

fn default_adx_period() -> usize {
    14
}

fn default_rsi_oversold() -> f64 {
    30.0
}

fn default_rsi_overbought() -> f64 {
    70.0
}

fn default_strong_threshold() -> f64 {
    0.6
}

fn default_moderate_threshold() -> f64 {
    0.4
}

fn default_liquidity_cap() -> f64 {
    100_000_000.0
}

fn default_volume_cap() -> f64 {
    10_000_000.0
}

fn default_market_cap_cap() -> f64 {
    1_000_000_000.0
}

fn default_volatility_cap() -> f64 {
    0.1
}

fn default_risk_weights() -> [f64; 5] {
    [0.30, 0.20, 0.25, 0.15, 0.10]
}

fn default_confidence_weights() -> [f64; 4] {
    [0.35, 0.25, 0.25, 0.15]
}

fn default_chains() -> HashMap<String, ChainInfo> {
    [
        ("ethereum", "Ethereum", "ETH"),
        ("bsc", "BNB Smart Chain", "BNB"),
        ("polygon", "Polygon", "MATIC"),
        ("arbitrum", "Arbitrum One", "ETH"),
        ("base", "Base", "ETH"),
        ("solana", "Solana", "SOL"),
    ]
    .into_iter()
    .map(|(id, name, native)| {
        (
            id.to_string(),
            ChainInfo {
                name: name.to_string(),
                native_symbol: native.to_string(),
            },
        )
    })
    .collect()
}

// =============================================================================
// SeriesParams
// =============================================================================

/// Controls how raw price samples are turned into an indicator-ready series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesParams {
    /// Series shorter than this are padded with the last price.
    #[serde(default = "default_min_points")]
    pub min_points: usize,

    /// Below this many raw samples the report omits indicators entirely.
    #[serde(default = "default_min_analysis_points")]
    pub min_analysis_points: usize,

    /// Half-width of the synthetic high/low band as a fraction of price.
    #[serde(default = "default_range_band_pct")]
    pub range_band_pct: f64,

    /// Scaling factor (periods per day) applied to return volatility.
    #[serde(default = "default_volatility_annualisation")]
    pub volatility_annualisation: f64,

    /// Echo the raw (timestamp, price) history in every report.
    #[serde(default = "default_true")]
    pub include_price_history: bool,
}

impl Default for SeriesParams {
    fn default() -> Self {
        Self {
            min_points: default_min_points(),
            min_analysis_points: default_min_analysis_points(),
            range_band_pct: default_range_band_pct(),
            volatility_annualisation: default_volatility_annualisation(),
            include_price_history: default_true(),
        }
    }
}

// =============================================================================
// IndicatorParams
// =============================================================================

/// Look-back periods for every indicator in the bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorParams {
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,

    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,

    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,

    #[serde(default = "default_bb_period")]
    pub bb_period: usize,

    /// Band half-width in standard deviations.
    #[serde(default = "default_bb_std")]
    pub bb_std: f64,

    /// Spans of the short / medium / long EMA.
    #[serde(default = "default_ema_spans")]
    pub ema_spans: [usize; 3],

    #[serde(default = "default_adx_period")]
    pub adx_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: default_rsi_period(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
            bb_period: default_bb_period(),
            bb_std: default_bb_std(),
            ema_spans: default_ema_spans(),
            adx_period: default_adx_period(),
        }
    }
}

// =============================================================================
// SignalThresholds
// =============================================================================

/// Vote and recommendation thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalThresholds {
    #[serde(default = "default_rsi_oversold")]
    pub rsi_oversold: f64,

    #[serde(default = "default_rsi_overbought")]
    pub rsi_overbought: f64,

    /// Vote share above which the recommendation is STRONG_*.
    #[serde(default = "default_strong_threshold")]
    pub strong_threshold: f64,

    /// Vote share above which the recommendation is BUY / SELL.
    #[serde(default = "default_moderate_threshold")]
    pub moderate_threshold: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            rsi_oversold: default_rsi_oversold(),
            rsi_overbought: default_rsi_overbought(),
            strong_threshold: default_strong_threshold(),
            moderate_threshold: default_moderate_threshold(),
        }
    }
}

// =============================================================================
// RiskParams / ConfidenceParams
// =============================================================================

/// Normalisation caps and weights for the risk score.
///
/// Weights apply in order: liquidity, volume, market cap, inverse
/// volatility, buy/sell balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskParams {
    #[serde(default = "default_liquidity_cap")]
    pub liquidity_cap: f64,

    #[serde(default = "default_volume_cap")]
    pub volume_cap: f64,

    #[serde(default = "default_market_cap_cap")]
    pub market_cap_cap: f64,

    #[serde(default = "default_volatility_cap")]
    pub volatility_cap: f64,

    #[serde(default = "default_risk_weights")]
    pub weights: [f64; 5],
}

impl Default for RiskParams {
    fn default() -> Self {
        Self {
            liquidity_cap: default_liquidity_cap(),
            volume_cap: default_volume_cap(),
            market_cap_cap: default_market_cap_cap(),
            volatility_cap: default_volatility_cap(),
            weights: default_risk_weights(),
        }
    }
}

/// Weights for the confidence score, in order: buy ratio, safety
/// (1 - risk), momentum, volatility factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceParams {
    #[serde(default = "default_confidence_weights")]
    pub weights: [f64; 4],

    #[serde(default = "default_volatility_cap")]
    pub volatility_cap: f64,
}

impl Default for ConfidenceParams {
    fn default() -> Self {
        Self {
            weights: default_confidence_weights(),
            volatility_cap: default_volatility_cap(),
        }
    }
}

// =============================================================================
// ChainInfo
// =============================================================================

/// Display metadata for a chain identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainInfo {
    pub name: String,
    pub native_symbol: String,
}

// =============================================================================
// AnalysisConfig
// =============================================================================

/// Top-level configuration for the analysis engine.
///
/// Every field has a serde default so that older JSON files missing new fields
/// will still deserialise correctly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub series: SeriesParams,

    #[serde(default)]
    pub indicators: IndicatorParams,

    #[serde(default)]
    pub signals: SignalThresholds,

    #[serde(default)]
    pub risk: RiskParams,

    #[serde(default)]
    pub confidence: ConfidenceParams,

    /// Chain id (lower-case) -> display metadata.
    #[serde(default = "default_chains")]
    pub chains: HashMap<String, ChainInfo>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            series: SeriesParams::default(),
            indicators: IndicatorParams::default(),
            signals: SignalThresholds::default(),
            risk: RiskParams::default(),
            confidence: ConfidenceParams::default(),
            chains: default_chains(),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read analysis config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse analysis config from {}", path.display()))?;

        info!(
            path = %path.display(),
            chains = config.chains.len(),
            rsi_period = config.indicators.rsi_period,
            "analysis config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise analysis config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "analysis config saved (atomic)");
        Ok(())
    }

    /// Metadata of a chain id, matched case-insensitively.
    pub fn chain_info(&self, chain: &str) -> Option<&ChainInfo> {
        self.chains.get(&chain.to_lowercase())
    }

    /// Resolve a chain id to its display name. Unknown chains pass through.
    pub fn chain_name(&self, chain: &str) -> String {
        self.chain_info(chain)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| chain.to_string())
    }
}
