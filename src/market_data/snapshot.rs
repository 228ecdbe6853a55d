// =============================================================================
// Market Snapshot — the engine's input record
// =============================================================================
//
// Whatever fetched the data (DEX aggregator, CoinGecko, a test fixture) hands
// the engine one `MarketSnapshot`: a time-ordered price history plus the
// scalar market fields used by the risk scorer.  Missing scalars default to
// zero so a bare price history is still analysable.
// =============================================================================

use serde::{Deserialize, Serialize};

fn default_chain() -> String {
    "ethereum".to_string()
}

/// A single (timestamp, price) sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Unix epoch milliseconds.
    #[serde(default)]
    pub timestamp: i64,
    pub price: f64,
}

/// Raw market data for one token, oldest sample first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    #[serde(default)]
    pub token_address: String,

    #[serde(default = "default_chain")]
    pub chain: String,

    #[serde(default)]
    pub prices: Vec<PricePoint>,

    /// Optional per-sample highs, parallel to `prices`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highs: Option<Vec<f64>>,

    /// Optional per-sample lows, parallel to `prices`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lows: Option<Vec<f64>>,

    #[serde(default)]
    pub volume_24h: f64,

    #[serde(default)]
    pub liquidity_usd: f64,

    #[serde(default)]
    pub market_cap: f64,

    /// 24h price change in percent. `None` falls back to the series ROC.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_change_24h: Option<f64>,

    #[serde(default)]
    pub buys_24h: u64,

    #[serde(default)]
    pub sells_24h: u64,
}

impl Default for MarketSnapshot {
    fn default() -> Self {
        Self {
            token_address: String::new(),
            chain: default_chain(),
            prices: Vec::new(),
            highs: None,
            lows: None,
            volume_24h: 0.0,
            liquidity_usd: 0.0,
            market_cap: 0.0,
            price_change_24h: None,
            buys_24h: 0,
            sells_24h: 0,
        }
    }
}

impl MarketSnapshot {
    /// Build a snapshot from bare prices with synthetic one-minute timestamps.
    pub fn from_prices(prices: &[f64]) -> Self {
        Self {
            prices: prices
                .iter()
                .enumerate()
                .map(|(i, &price)| PricePoint {
                    timestamp: i as i64 * 60_000,
                    price,
                })
                .collect(),
            ..Self::default()
        }
    }

    /// Price column, oldest first.
    pub fn closes(&self) -> Vec<f64> {
        self.prices.iter().map(|p| p.price).collect()
    }

    /// Most recent price, or 0.0 for an empty history.
    pub fn current_price(&self) -> f64 {
        self.prices.last().map(|p| p.price).unwrap_or(0.0)
    }

    /// Ratio of buy to sell transactions.
    ///
    /// No transactions at all reads as balanced (1.0); no sells reports the
    /// raw buy count so a one-sided book scores as maximally unbalanced.
    pub fn buy_sell_ratio(&self) -> f64 {
        match (self.buys_24h, self.sells_24h) {
            (0, 0) => 1.0,
            (buys, 0) => buys as f64,
            (buys, sells) => buys as f64 / sells as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buy_sell_ratio_edge_cases() {
        let mut snap = MarketSnapshot::default();
        assert!((snap.buy_sell_ratio() - 1.0).abs() < 1e-12);

        snap.buys_24h = 30;
        snap.sells_24h = 10;
        assert!((snap.buy_sell_ratio() - 3.0).abs() < 1e-12);

        snap.sells_24h = 0;
        assert!((snap.buy_sell_ratio() - 30.0).abs() < 1e-12);

        snap.buys_24h = 0;
        snap.sells_24h = 4;
        assert!(snap.buy_sell_ratio().abs() < 1e-12);
    }

    #[test]
    fn deserialise_minimal_snapshot() {
        let json = r#"{ "prices": [ { "timestamp": 1, "price": 2.5 }, { "price": 3.0 } ] }"#;
        let snap: MarketSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.chain, "ethereum");
        assert_eq!(snap.closes(), vec![2.5, 3.0]);
        assert!((snap.current_price() - 3.0).abs() < 1e-12);
        assert!(snap.highs.is_none());
        assert!(snap.price_change_24h.is_none());
    }

    #[test]
    fn from_prices_spaces_timestamps() {
        let snap = MarketSnapshot::from_prices(&[1.0, 2.0, 3.0]);
        assert_eq!(snap.prices.len(), 3);
        assert_eq!(snap.prices[2].timestamp, 120_000);
    }

    #[test]
    fn default_matches_empty_json() {
        let from_json: MarketSnapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(MarketSnapshot::default(), from_json);
        assert_eq!(MarketSnapshot::default().chain, "ethereum");
    }
}
