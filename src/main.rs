// =============================================================================
// TokenScope — Main Entry Point
// =============================================================================
//
// Two modes:
//   tokenscope                          serve the HTTP API until Ctrl-C
//   tokenscope analyze <snapshot.json>  print one report as JSON and exit
// =============================================================================

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tokenscope::api;
use tokenscope::app_state::AppState;
use tokenscope::{analyze, AnalysisConfig, MarketSnapshot};

const DEFAULT_CONFIG_PATH: &str = "tokenscope_config.json";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & logging ─────────────────────────────────────────
    let _ = dotenv::dotenv();

    // Logs go to stderr so one-shot mode keeps stdout for the report.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path: PathBuf = std::env::var("TOKENSCOPE_CONFIG")
        .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into())
        .into();
    let config = load_config(&config_path);

    // ── 2. One-shot mode ─────────────────────────────────────────────────
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => {}
        [cmd, file] if cmd == "analyze" => return analyze_file(Path::new(file), &config),
        _ => bail!("usage: tokenscope [analyze <snapshot.json>]"),
    }

    // ── 3. Shared state ──────────────────────────────────────────────────
    let admin_token = std::env::var("TOKENSCOPE_ADMIN_TOKEN").ok();
    if admin_token.as_deref().map_or(true, str::is_empty) {
        warn!("TOKENSCOPE_ADMIN_TOKEN not set, PUT /api/v1/config is disabled");
    }
    let state = Arc::new(AppState::new(config, config_path, admin_token));

    // ── 4. API server ────────────────────────────────────────────────────
    let bind_addr =
        std::env::var("TOKENSCOPE_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server to {bind_addr}"))?;

    info!(addr = %bind_addr, "TokenScope API listening");

    axum::serve(listener, api::rest::router(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server failed")?;

    info!(
        analyses_served = state.analyses_served(),
        "TokenScope shut down complete"
    );
    Ok(())
}

/// Load the analysis config, falling back to defaults when the file is
/// missing or unreadable.
fn load_config(path: &Path) -> AnalysisConfig {
    if !path.exists() {
        warn!(path = %path.display(), "config file not found, using defaults");
        return AnalysisConfig::default();
    }
    AnalysisConfig::load(path).unwrap_or_else(|e| {
        warn!(error = %format!("{e:#}"), "failed to load config, using defaults");
        AnalysisConfig::default()
    })
}

/// Analyse one snapshot file and print the report to stdout.
fn analyze_file(path: &Path, config: &AnalysisConfig) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot from {}", path.display()))?;
    let snapshot: MarketSnapshot = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse snapshot from {}", path.display()))?;

    let report = analyze(&snapshot, config);
    let json = serde_json::to_string_pretty(&report).context("failed to serialise report")?;
    println!("{json}");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    warn!("Shutdown signal received, stopping gracefully");
}
