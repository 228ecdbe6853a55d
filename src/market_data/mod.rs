pub mod series;
pub mod snapshot;

// Re-export the input and prepared series types for convenient access.
pub use series::{prepare_series, prepare_series_with, realized_volatility, PreparedSeries};
pub use snapshot::{MarketSnapshot, PricePoint};
