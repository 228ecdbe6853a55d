// =============================================================================
// Shared Application State — TokenScope service
// =============================================================================
//
// Analyses themselves are stateless; the service only shares the active
// configuration, where it is persisted, and a request counter.
//
// Thread safety:
//   - AtomicU64 for the lock-free analyses counter.
//   - parking_lot::RwLock around the configuration; handlers clone it out
//     before running an analysis so no lock is held during computation.
// =============================================================================

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::info;

use crate::market_data::MarketSnapshot;
use crate::report::AnalysisReport;
use crate::runtime_config::AnalysisConfig;

/// State shared across request handlers via `Arc<AppState>`.
pub struct AppState {
    /// Active analysis configuration.
    pub config: RwLock<AnalysisConfig>,

    /// Number of analyses served since startup.
    pub analyses_served: AtomicU64,

    /// Where `PUT /api/v1/config` persists the configuration.
    pub config_path: PathBuf,

    /// Bearer token required for config mutation. `None` disables mutation.
    pub admin_token: Option<String>,
}

impl AppState {
    pub fn new(
        config: AnalysisConfig,
        config_path: impl Into<PathBuf>,
        admin_token: Option<String>,
    ) -> Self {
        Self {
            config: RwLock::new(config),
            analyses_served: AtomicU64::new(0),
            config_path: config_path.into(),
            admin_token: admin_token.filter(|t| !t.is_empty()),
        }
    }

    /// Clone of the active configuration.
    pub fn config_snapshot(&self) -> AnalysisConfig {
        self.config.read().clone()
    }

    /// Analyse a snapshot with the active configuration and count it.
    pub fn analyze(&self, snapshot: &MarketSnapshot) -> AnalysisReport {
        let config = self.config_snapshot();
        let report = crate::analysis::analyze(snapshot, &config);
        self.analyses_served.fetch_add(1, Ordering::Relaxed);
        report
    }

    pub fn analyses_served(&self) -> u64 {
        self.analyses_served.load(Ordering::Relaxed)
    }

    /// Persist `config` atomically, then make it the active configuration.
    ///
    /// The in-memory configuration is left untouched when the write fails.
    /// The write lock is held across the save so concurrent replacements
    /// reach disk and memory in the same order.
    pub fn replace_config(&self, config: AnalysisConfig) -> anyhow::Result<()> {
        let mut active = self.config.write();
        config.save(&self.config_path)?;
        *active = config;
        drop(active);
        info!(path = %self.config_path.display(), "analysis config replaced");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AnalysisStatus;

    #[test]
    fn analyze_counts_requests() {
        let state = AppState::new(AnalysisConfig::default(), "unused.json", None);
        let prices: Vec<f64> = (1..=25).map(|x| x as f64).collect();

        let report = state.analyze(&MarketSnapshot::from_prices(&prices));
        assert_eq!(report.status, AnalysisStatus::Success);
        state.analyze(&MarketSnapshot::default());
        assert_eq!(state.analyses_served(), 2);
    }

    #[test]
    fn replace_config_persists_and_applies() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let state = AppState::new(AnalysisConfig::default(), &path, Some("t".into()));

        let mut config = AnalysisConfig::default();
        config.indicators.rsi_period = 7;
        state.replace_config(config.clone()).unwrap();

        assert_eq!(state.config_snapshot().indicators.rsi_period, 7);
        assert_eq!(AnalysisConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn failed_save_keeps_old_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("config.json");
        let state = AppState::new(AnalysisConfig::default(), path, None);

        let mut config = AnalysisConfig::default();
        config.indicators.rsi_period = 3;
        assert!(state.replace_config(config).is_err());
        assert_eq!(state.config_snapshot().indicators.rsi_period, 14);
    }

    #[test]
    fn empty_admin_token_is_disabled() {
        let state = AppState::new(AnalysisConfig::default(), "c.json", Some(String::new()));
        assert!(state.admin_token.is_none());
    }

    #[test]
    fn concurrent_replacements_leave_disk_and_memory_in_sync() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let state = std::sync::Arc::new(AppState::new(AnalysisConfig::default(), &path, None));

        let handles: Vec<_> = (2..18)
            .map(|period| {
                let state = state.clone();
                std::thread::spawn(move || {
                    let mut config = AnalysisConfig::default();
                    config.indicators.rsi_period = period;
                    state.replace_config(config).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let on_disk = AnalysisConfig::load(&path).unwrap();
        assert_eq!(on_disk, state.config_snapshot());
    }
}
