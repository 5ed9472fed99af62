//! PostgreSQL implementation of the rate-limit repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::RateLimitRecord;
use crate::domain::repositories::RateLimitRepository;
use crate::error::AppError;

pub struct PgRateLimitRepository {
    pool: Arc<PgPool>,
}

impl PgRateLimitRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RateLimitRepository for PgRateLimitRepository {
    async fn find(&self, ip: &str) -> Result<Option<RateLimitRecord>, AppError> {
        let record = sqlx::query_as::<_, RateLimitRecord>(
            r#"
            SELECT ip_address, failed_attempts, first_attempt_at, last_attempt_at, blocked_until
            FROM rate_limit
            WHERE ip_address = $1
            "#,
        )
        .bind(ip)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(record)
    }

    async fn insert_first_failure(&self, ip: &str, now: DateTime<Utc>) -> Result<(), AppError> {
        // A concurrent first failure from the same IP lands on the conflict arm.
        sqlx::query(
            r#"
            INSERT INTO rate_limit (ip_address, failed_attempts, first_attempt_at, last_attempt_at)
            VALUES ($1, 1, $2, $2)
            ON CONFLICT (ip_address) DO UPDATE
            SET failed_attempts = rate_limit.failed_attempts + 1, last_attempt_at = $2
            "#,
        )
        .bind(ip)
        .bind(now)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn restart_window(&self, ip: &str, now: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE rate_limit
            SET failed_attempts = 1, first_attempt_at = $2, last_attempt_at = $2, blocked_until = NULL
            WHERE ip_address = $1
            "#,
        )
        .bind(ip)
        .bind(now)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn increment(&self, ip: &str, now: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE rate_limit
            SET failed_attempts = failed_attempts + 1, last_attempt_at = $2
            WHERE ip_address = $1
            "#,
        )
        .bind(ip)
        .bind(now)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn set_blocked_until(&self, ip: &str, until: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query("UPDATE rate_limit SET blocked_until = $2 WHERE ip_address = $1")
            .bind(ip)
            .bind(until)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn delete(&self, ip: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM rate_limit WHERE ip_address = $1")
            .bind(ip)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<RateLimitRecord>, AppError> {
        let records = sqlx::query_as::<_, RateLimitRecord>(
            r#"
            SELECT ip_address, failed_attempts, first_attempt_at, last_attempt_at, blocked_until
            FROM rate_limit
            ORDER BY last_attempt_at DESC
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(records)
    }
}
