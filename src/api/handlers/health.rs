//! Handler for health check endpoint.

/// Liveness probe.
///
/// # Endpoint
///
/// `GET /health`
///
/// Always answers `200 OK` with the body `OK`. Touches neither the database
/// nor the admin gate.
pub async fn health_handler() -> &'static str {
    "OK"
}
