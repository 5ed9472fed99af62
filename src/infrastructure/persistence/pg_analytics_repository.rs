//! PostgreSQL implementation of the analytics repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{AnalyticsEvent, NewAnalyticsEvent};
use crate::domain::repositories::{AnalyticsFilter, AnalyticsRepository, CountEntry, LinkSummary};
use crate::error::AppError;

const EVENT_COLUMNS: &str = r#"
    a.id, a.link_id, l.short_code, l.destination_url,
    a.ip_address, a.user_agent, a.referer,
    a.country, a.city, a.region, a.region_code, a.continent, a.timezone, a.postal_code,
    a.latitude, a.longitude, a.asn, a.as_organization, a.colo,
    a.http_protocol, a.tls_version, a.bot_category, a.device_type, a.client_tcp_rtt,
    a."timestamp"
"#;

const FILTER_CLAUSE: &str = r#"
    ($1::bigint IS NULL OR a.link_id = $1)
    AND ($2::text IS NULL OR a.country = $2)
    AND ($3::text IS NULL OR a."timestamp" >= $3)
    AND ($4::text IS NULL OR a."timestamp" <= $4)
"#;

#[derive(sqlx::FromRow)]
struct Totals {
    total_clicks: i64,
    unique_visitors: i64,
    countries: i64,
}

/// PostgreSQL repository for click events.
pub struct PgAnalyticsRepository {
    pool: Arc<PgPool>,
}

impl PgAnalyticsRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn grouped(
        &self,
        column: &str,
        link_id: i64,
        skip_empty: bool,
        limit: i64,
    ) -> Result<Vec<CountEntry>, AppError> {
        let empty_filter = if skip_empty {
            format!("AND {column} <> ''")
        } else {
            String::new()
        };

        let rows = sqlx::query_as::<_, CountEntry>(&format!(
            r#"
            SELECT {column} AS value, COUNT(*) AS count
            FROM analytics
            WHERE link_id = $1 {empty_filter}
            GROUP BY {column}
            ORDER BY count DESC, value
            LIMIT $2
            "#
        ))
        .bind(link_id)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }
}

#[async_trait]
impl AnalyticsRepository for PgAnalyticsRepository {
    async fn insert(&self, event: NewAnalyticsEvent) -> Result<(), AppError> {
        let geo = event.geo;

        sqlx::query(
            r#"
            INSERT INTO analytics (
                link_id, ip_address, user_agent, referer, country, city,
                region, region_code, continent, timezone, postal_code,
                latitude, longitude, asn, as_organization, colo,
                http_protocol, tls_version, bot_category, device_type, client_tcp_rtt,
                "timestamp"
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22
            )
            "#,
        )
        .bind(event.link_id)
        .bind(&event.ip_address)
        .bind(&event.user_agent)
        .bind(&event.referer)
        .bind(geo.country.unwrap_or_default())
        .bind(geo.city.unwrap_or_default())
        .bind(geo.region.unwrap_or_default())
        .bind(geo.region_code.unwrap_or_default())
        .bind(geo.continent.unwrap_or_default())
        .bind(geo.timezone.unwrap_or_default())
        .bind(geo.postal_code.unwrap_or_default())
        .bind(geo.latitude)
        .bind(geo.longitude)
        .bind(geo.asn)
        .bind(geo.as_organization.unwrap_or_default())
        .bind(geo.colo.unwrap_or_default())
        .bind(geo.http_protocol.unwrap_or_default())
        .bind(geo.tls_version.unwrap_or_default())
        .bind(geo.bot_category.unwrap_or_default())
        .bind(event.device_type.as_str())
        .bind(geo.client_tcp_rtt)
        .bind(&event.timestamp)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn list(
        &self,
        filter: AnalyticsFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<AnalyticsEvent>, AppError> {
        let events = sqlx::query_as::<_, AnalyticsEvent>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM analytics a
            JOIN links l ON a.link_id = l.id
            WHERE {FILTER_CLAUSE}
            ORDER BY a."timestamp" DESC, a.id DESC
            LIMIT $5 OFFSET $6
            "#
        ))
        .bind(filter.link_id)
        .bind(filter.country)
        .bind(filter.date_from)
        .bind(filter.date_to)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(events)
    }

    async fn count(&self, filter: AnalyticsFilter) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM analytics a JOIN links l ON a.link_id = l.id WHERE {FILTER_CLAUSE}"
        ))
        .bind(filter.link_id)
        .bind(filter.country)
        .bind(filter.date_from)
        .bind(filter.date_to)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn recent_for_link(
        &self,
        link_id: i64,
        limit: i64,
    ) -> Result<Vec<AnalyticsEvent>, AppError> {
        let events = sqlx::query_as::<_, AnalyticsEvent>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM analytics a
            JOIN links l ON a.link_id = l.id
            WHERE a.link_id = $1
            ORDER BY a."timestamp" DESC, a.id DESC
            LIMIT $2
            "#
        ))
        .bind(link_id)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(events)
    }

    async fn summary_for_link(&self, link_id: i64, top: i64) -> Result<LinkSummary, AppError> {
        let totals = sqlx::query_as::<_, Totals>(
            r#"
            SELECT
                COUNT(*) AS total_clicks,
                COUNT(DISTINCT ip_address) AS unique_visitors,
                COUNT(DISTINCT NULLIF(country, '')) AS countries
            FROM analytics
            WHERE link_id = $1
            "#,
        )
        .bind(link_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        let (device_types, top_countries, top_referers) = tokio::try_join!(
            self.grouped("device_type", link_id, false, i64::MAX),
            self.grouped("country", link_id, true, top),
            self.grouped("referer", link_id, true, top)
        )?;

        Ok(LinkSummary {
            total_clicks: totals.total_clicks,
            unique_visitors: totals.unique_visitors,
            countries: totals.countries,
            device_types,
            top_countries,
            top_referers,
        })
    }

    async fn delete_for_link(&self, link_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM analytics WHERE link_id = $1")
            .bind(link_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    async fn count_all(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM analytics")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
