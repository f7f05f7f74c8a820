//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::warn;

/// Warn when the static assets directory is missing; the API still works,
/// the frontend just 404s.
pub async fn check_static_assets(static_dir: &str) {
    if tokio::fs::metadata(static_dir).await.is_err() {
        warn!(%static_dir, "static assets directory not found; frontend may 404");
    }
}
