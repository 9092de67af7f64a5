pub mod auth;
pub mod listings;
pub mod search;
pub mod uploads;

/// Liveness probe.
pub async fn health() -> &'static str {
    "FlatFinder Backend is live!"
}
