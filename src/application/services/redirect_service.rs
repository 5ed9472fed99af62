//! Short code resolution with click accounting.

use std::sync::Arc;

use serde_json::json;

use crate::application::services::AnalyticsRecorder;
use crate::domain::click_context::ClickContext;
use crate::domain::clock::Clock;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Where a resolved request should be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    pub location: String,
}

/// Resolves short codes to destinations.
///
/// On a hit, the analytics insert and the click counter update run
/// concurrently and independently. Either may fail without affecting the
/// other or the redirect; failures are only logged. The Link row is never
/// re-validated here.
pub struct RedirectService {
    links: Arc<dyn LinkRepository>,
    recorder: Arc<AnalyticsRecorder>,
    clock: Arc<dyn Clock>,
    default_destination: String,
}

impl RedirectService {
    pub fn new(
        links: Arc<dyn LinkRepository>,
        recorder: Arc<AnalyticsRecorder>,
        clock: Arc<dyn Clock>,
        default_destination: String,
    ) -> Self {
        Self {
            links,
            recorder,
            clock,
            default_destination,
        }
    }

    /// Resolves `short_code` for a request carrying `query` (without `?`).
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] with code `LINK_NOT_FOUND` for an unknown short
    ///   code. Nothing is written in that case.
    /// - [`AppError::Internal`] with code `REDIRECT_FAILED` if the lookup
    ///   itself fails.
    pub async fn resolve(
        &self,
        short_code: &str,
        query: Option<&str>,
        ctx: &ClickContext,
    ) -> Result<RedirectTarget, AppError> {
        if short_code.is_empty() {
            return Ok(RedirectTarget {
                location: self.default_destination.clone(),
            });
        }

        let link = self
            .links
            .find_by_short_code(short_code)
            .await
            .map_err(|e| {
                tracing::error!(short_code, error = %e, "Error processing redirect");
                AppError::internal("REDIRECT_FAILED", "Service Error")
            })?
            .ok_or_else(|| {
                tracing::warn!(short_code, "Short code not found");
                AppError::not_found(
                    "LINK_NOT_FOUND",
                    format!("Short link not found: /{short_code}"),
                    json!({ "short_code": short_code }),
                )
            })?;

        let clicked_at = self.clock.now();
        let ((), click) = tokio::join!(
            self.recorder.record(ctx, &link),
            self.links.record_click(link.id, clicked_at)
        );

        if let Err(e) = click {
            tracing::error!(short_code, error = %e, "Failed to update click count");
        }

        let location = link.destination_with_query(query);

        tracing::info!(
            short_code,
            destination = %link.destination_url,
            click = link.click_count + 1,
            "Redirect resolved"
        );

        Ok(RedirectTarget { location })
    }
}
