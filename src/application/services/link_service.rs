//! Admin link management.

use std::sync::Arc;

use serde_json::json;

use crate::domain::clock::Clock;
use crate::domain::entities::{Link, LinkUpdate, NewLink};
use crate::domain::repositories::{AnalyticsRepository, LinkRepository};
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, validate_short_code};
use crate::utils::url_validator::validate_destination;

/// Attempts at finding an unused generated code before giving up.
const MAX_GENERATION_ATTEMPTS: usize = 10;

/// Fields accepted when creating a link.
#[derive(Debug, Clone, Default)]
pub struct CreateLink {
    pub short_code: Option<String>,
    pub destination_url: String,
    pub notes: Option<String>,
}

/// Service behind the `/api/admin/links` endpoints.
pub struct LinkService {
    links: Arc<dyn LinkRepository>,
    analytics: Arc<dyn AnalyticsRepository>,
    clock: Arc<dyn Clock>,
}

impl LinkService {
    pub fn new(
        links: Arc<dyn LinkRepository>,
        analytics: Arc<dyn AnalyticsRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            links,
            analytics,
            clock,
        }
    }

    /// Lists one page of links, newest first, with the total match count.
    pub async fn list(
        &self,
        page: i64,
        limit: i64,
        search: Option<String>,
    ) -> Result<(Vec<Link>, i64), AppError> {
        let offset = page.saturating_sub(1).max(0).saturating_mul(limit);
        let (links, total) = tokio::try_join!(
            self.links.list(offset, limit, search.clone()),
            self.links.count(search)
        )?;

        Ok((links, total))
    }

    /// Creates a link.
    ///
    /// Without a `short_code`, a random 5-character code is generated.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for a refused destination or short code
    /// - [`AppError::Conflict`] if the short code is taken
    pub async fn create(&self, input: CreateLink) -> Result<Link, AppError> {
        validate_destination(&input.destination_url)
            .map_err(|e| e.into_app_error(&input.destination_url))?;

        let short_code = match input.short_code.filter(|c| !c.is_empty()) {
            Some(code) => {
                validate_short_code(&code)?;
                if let Some(existing) = self.links.find_by_short_code(&code).await? {
                    return Err(shortcode_taken(&code, existing.id));
                }
                code
            }
            None => self.generate_unused_code().await?,
        };

        let link = self
            .links
            .create(NewLink {
                short_code,
                destination_url: input.destination_url,
                notes: input.notes,
                created_at: self.clock.now(),
            })
            .await?;

        tracing::info!(
            id = link.id,
            short_code = %link.short_code,
            destination = %link.destination_url,
            "Created link"
        );

        Ok(link)
    }

    /// Replaces a link's short code, destination and notes.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if no link has this id
    /// - [`AppError::Conflict`] if another link owns the short code
    pub async fn update(&self, id: i64, update: LinkUpdate) -> Result<Link, AppError> {
        validate_destination(&update.destination_url)
            .map_err(|e| e.into_app_error(&update.destination_url))?;
        validate_short_code(&update.short_code)?;

        if let Some(existing) = self.links.find_by_short_code(&update.short_code).await?
            && existing.id != id
        {
            return Err(shortcode_taken(&update.short_code, existing.id));
        }

        let link = self
            .links
            .update(id, update)
            .await?
            .ok_or_else(|| link_not_found(id))?;

        tracing::info!(
            id,
            short_code = %link.short_code,
            destination = %link.destination_url,
            "Updated link"
        );

        Ok(link)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.links.delete(id).await? {
            return Err(link_not_found(id));
        }

        tracing::info!(id, "Deleted link");
        Ok(())
    }

    /// Zeroes the click counter and deletes the link's analytics rows.
    ///
    /// The two writes are not atomic. Returns the number of analytics rows
    /// removed.
    pub async fn reset_stats(&self, id: i64) -> Result<u64, AppError> {
        if !self.links.reset_stats(id).await? {
            return Err(link_not_found(id));
        }

        let deleted = self.analytics.delete_for_link(id).await?;

        tracing::info!(id, deleted_analytics = deleted, "Reset link statistics");
        Ok(deleted)
    }

    async fn generate_unused_code(&self) -> Result<String, AppError> {
        for _ in 0..MAX_GENERATION_ATTEMPTS {
            let code = generate_code()?;
            if validate_short_code(&code).is_err() {
                continue;
            }
            if self.links.find_by_short_code(&code).await?.is_none() {
                return Ok(code);
            }
        }

        Err(AppError::internal(
            "CODE_GENERATION_FAILED",
            "Failed to generate a unique short code",
        ))
    }
}

fn link_not_found(id: i64) -> AppError {
    AppError::not_found(
        "LINK_NOT_FOUND",
        format!("Link not found: No link exists with ID {id}"),
        json!({
            "link_id": id,
            "hint": "Check that the link ID is correct. The link may have been deleted."
        }),
    )
}

fn shortcode_taken(code: &str, existing_id: i64) -> AppError {
    AppError::conflict(
        "SHORTCODE_ALREADY_EXISTS",
        format!("Conflict: Short code \"{code}\" already exists"),
        json!({
            "conflicting_short_code": code,
            "existing_link_id": existing_id,
            "hint": "Choose a different short code or update the existing link instead."
        }),
    )
}
