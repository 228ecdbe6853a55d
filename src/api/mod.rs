// =============================================================================
// HTTP API — axum router and bearer authentication
// =============================================================================

pub mod auth;
pub mod rest;
