#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, extract::ConnectInfo};
use axum_test::TestServer;
use chrono::{DateTime, TimeZone, Utc};
use go_links::application::services::RateLimitPolicy;
use go_links::domain::clock::{Clock, ManualClock};
use go_links::domain::entities::{
    AnalyticsEvent, Link, LinkUpdate, NewAnalyticsEvent, NewLink, RateLimitRecord,
};
use go_links::domain::repositories::{
    AnalyticsFilter, AnalyticsRepository, CountEntry, LinkRepository, LinkSummary,
    RateLimitRepository,
};
use go_links::error::AppError;
use go_links::routes::app_router;
use go_links::state::{AppState, Repositories, ServiceSettings};
use serde_json::json;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tower::Layer;

pub const ADMIN_KEY: &str = "test-admin-key";
pub const DEFAULT_REDIRECT: &str = "https://www.example.com";

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

fn store_down() -> AppError {
    AppError::internal("DB_QUERY_FAILED", "Database error")
}

// ---------------------------------------------------------------------------
// Links
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryLinks {
    rows: Mutex<BTreeMap<i64, Link>>,
    next_id: Mutex<i64>,
    pub fail: AtomicBool,
    pub fail_clicks: AtomicBool,
}

impl InMemoryLinks {
    fn check(&self) -> Result<(), AppError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(store_down())
        } else {
            Ok(())
        }
    }

    pub fn get(&self, id: i64) -> Option<Link> {
        self.rows.lock().unwrap().get(&id).cloned()
    }

    pub fn by_code(&self, code: &str) -> Option<Link> {
        self.rows
            .lock()
            .unwrap()
            .values()
            .find(|l| l.short_code == code)
            .cloned()
    }

    fn matches(link: &Link, search: &Option<String>) -> bool {
        match search {
            Some(s) => {
                let s = s.to_lowercase();
                link.short_code.to_lowercase().contains(&s)
                    || link.destination_url.to_lowercase().contains(&s)
            }
            None => true,
        }
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinks {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        if rows.values().any(|l| l.short_code == new_link.short_code) {
            return Err(AppError::conflict(
                "SHORTCODE_ALREADY_EXISTS",
                "Unique constraint violation",
                json!({}),
            ));
        }

        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let link = Link::new(
            *next_id,
            new_link.short_code,
            new_link.destination_url,
            new_link.notes,
            new_link.created_at,
        );
        rows.insert(link.id, link.clone());
        Ok(link)
    }

    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<Link>, AppError> {
        self.check()?;
        Ok(self.by_code(short_code))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        self.check()?;
        Ok(self.get(id))
    }

    async fn list(
        &self,
        offset: i64,
        limit: i64,
        search: Option<String>,
    ) -> Result<Vec<Link>, AppError> {
        self.check()?;
        let rows = self.rows.lock().unwrap();
        let mut links: Vec<Link> = rows
            .values()
            .filter(|l| Self::matches(l, &search))
            .cloned()
            .collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(links
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self, search: Option<String>) -> Result<i64, AppError> {
        self.check()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows.values().filter(|l| Self::matches(l, &search)).count() as i64)
    }

    async fn update(&self, id: i64, update: LinkUpdate) -> Result<Option<Link>, AppError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        if rows
            .values()
            .any(|l| l.id != id && l.short_code == update.short_code)
        {
            return Err(AppError::conflict(
                "SHORTCODE_ALREADY_EXISTS",
                "Unique constraint violation",
                json!({}),
            ));
        }

        Ok(rows.get_mut(&id).map(|link| {
            link.short_code = update.short_code;
            link.destination_url = update.destination_url;
            link.notes = update.notes;
            link.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        self.check()?;
        Ok(self.rows.lock().unwrap().remove(&id).is_some())
    }

    async fn record_click(&self, id: i64, at: DateTime<Utc>) -> Result<(), AppError> {
        self.check()?;
        if self.fail_clicks.load(Ordering::SeqCst) {
            return Err(store_down());
        }
        if let Some(link) = self.rows.lock().unwrap().get_mut(&id) {
            link.click_count += 1;
            link.last_clicked = Some(at);
        }
        Ok(())
    }

    async fn reset_stats(&self, id: i64) -> Result<bool, AppError> {
        self.check()?;
        Ok(match self.rows.lock().unwrap().get_mut(&id) {
            Some(link) => {
                link.click_count = 0;
                link.last_clicked = None;
                true
            }
            None => false,
        })
    }
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

pub struct InMemoryAnalytics {
    links: Arc<InMemoryLinks>,
    rows: Mutex<Vec<(i64, NewAnalyticsEvent)>>,
    pub fail: AtomicBool,
}

impl InMemoryAnalytics {
    pub fn new(links: Arc<InMemoryLinks>) -> Self {
        Self {
            links,
            rows: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    fn check(&self) -> Result<(), AppError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(store_down())
        } else {
            Ok(())
        }
    }

    /// Stored events whose link still exists, like `ON DELETE CASCADE`.
    pub fn events(&self) -> Vec<NewAnalyticsEvent> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, e)| self.links.get(e.link_id).is_some())
            .map(|(_, e)| e.clone())
            .collect()
    }

    fn to_event(&self, id: i64, e: &NewAnalyticsEvent) -> Option<AnalyticsEvent> {
        let link = self.links.get(e.link_id)?;
        let geo = e.geo.clone();
        Some(AnalyticsEvent {
            id,
            link_id: e.link_id,
            short_code: link.short_code,
            destination_url: link.destination_url,
            ip_address: e.ip_address.clone(),
            user_agent: e.user_agent.clone(),
            referer: e.referer.clone(),
            country: geo.country.unwrap_or_default(),
            city: geo.city.unwrap_or_default(),
            region: geo.region.unwrap_or_default(),
            region_code: geo.region_code.unwrap_or_default(),
            continent: geo.continent.unwrap_or_default(),
            timezone: geo.timezone.unwrap_or_default(),
            postal_code: geo.postal_code.unwrap_or_default(),
            latitude: geo.latitude,
            longitude: geo.longitude,
            asn: geo.asn,
            as_organization: geo.as_organization.unwrap_or_default(),
            colo: geo.colo.unwrap_or_default(),
            http_protocol: geo.http_protocol.unwrap_or_default(),
            tls_version: geo.tls_version.unwrap_or_default(),
            bot_category: geo.bot_category.unwrap_or_default(),
            device_type: e.device_type.as_str().to_string(),
            client_tcp_rtt: geo.client_tcp_rtt,
            timestamp: e.timestamp.clone(),
        })
    }

    fn filtered(&self, filter: &AnalyticsFilter) -> Vec<AnalyticsEvent> {
        let rows = self.rows.lock().unwrap();
        let mut events: Vec<AnalyticsEvent> = rows
            .iter()
            .filter_map(|(id, e)| self.to_event(*id, e))
            .filter(|e| filter.link_id.is_none_or(|id| e.link_id == id))
            .filter(|e| filter.country.as_ref().is_none_or(|c| &e.country == c))
            .filter(|e| filter.date_from.as_ref().is_none_or(|d| &e.timestamp >= d))
            .filter(|e| filter.date_to.as_ref().is_none_or(|d| &e.timestamp <= d))
            .collect();
        events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        events
    }

    fn grouped(values: Vec<String>, limit: usize) -> Vec<CountEntry> {
        let mut counts: HashMap<String, i64> = HashMap::new();
        for v in values {
            *counts.entry(v).or_default() += 1;
        }
        let mut entries: Vec<CountEntry> = counts
            .into_iter()
            .map(|(value, count)| CountEntry { value, count })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count).then(a.value.cmp(&b.value)));
        entries.truncate(limit);
        entries
    }
}

#[async_trait]
impl AnalyticsRepository for InMemoryAnalytics {
    async fn insert(&self, event: NewAnalyticsEvent) -> Result<(), AppError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let id = rows.len() as i64 + 1;
        rows.push((id, event));
        Ok(())
    }

    async fn list(
        &self,
        filter: AnalyticsFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<AnalyticsEvent>, AppError> {
        self.check()?;
        Ok(self
            .filtered(&filter)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self, filter: AnalyticsFilter) -> Result<i64, AppError> {
        self.check()?;
        Ok(self.filtered(&filter).len() as i64)
    }

    async fn recent_for_link(
        &self,
        link_id: i64,
        limit: i64,
    ) -> Result<Vec<AnalyticsEvent>, AppError> {
        self.check()?;
        let filter = AnalyticsFilter {
            link_id: Some(link_id),
            ..Default::default()
        };
        Ok(self
            .filtered(&filter)
            .into_iter()
            .take(limit as usize)
            .collect())
    }

    async fn summary_for_link(&self, link_id: i64, top: i64) -> Result<LinkSummary, AppError> {
        self.check()?;
        let events = self.filtered(&AnalyticsFilter {
            link_id: Some(link_id),
            ..Default::default()
        });

        let unique: HashSet<&str> = events.iter().map(|e| e.ip_address.as_str()).collect();
        let countries: HashSet<&str> = events
            .iter()
            .map(|e| e.country.as_str())
            .filter(|c| !c.is_empty())
            .collect();

        Ok(LinkSummary {
            total_clicks: events.len() as i64,
            unique_visitors: unique.len() as i64,
            countries: countries.len() as i64,
            device_types: Self::grouped(
                events.iter().map(|e| e.device_type.clone()).collect(),
                usize::MAX,
            ),
            top_countries: Self::grouped(
                events
                    .iter()
                    .map(|e| e.country.clone())
                    .filter(|c| !c.is_empty())
                    .collect(),
                top as usize,
            ),
            top_referers: Self::grouped(
                events
                    .iter()
                    .map(|e| e.referer.clone())
                    .filter(|r| !r.is_empty())
                    .collect(),
                top as usize,
            ),
        })
    }

    async fn delete_for_link(&self, link_id: i64) -> Result<u64, AppError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|(_, e)| e.link_id != link_id);
        Ok((before - rows.len()) as u64)
    }

    async fn count_all(&self) -> Result<i64, AppError> {
        self.check()?;
        Ok(self.rows.lock().unwrap().len() as i64)
    }
}

// ---------------------------------------------------------------------------
// Rate limits
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemoryRateLimits {
    rows: Mutex<HashMap<String, RateLimitRecord>>,
    pub fail: AtomicBool,
}

impl InMemoryRateLimits {
    fn check(&self) -> Result<(), AppError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(store_down())
        } else {
            Ok(())
        }
    }

    pub fn record(&self, ip: &str) -> Option<RateLimitRecord> {
        self.rows.lock().unwrap().get(ip).cloned()
    }
}

#[async_trait]
impl RateLimitRepository for InMemoryRateLimits {
    async fn find(&self, ip: &str) -> Result<Option<RateLimitRecord>, AppError> {
        self.check()?;
        Ok(self.record(ip))
    }

    async fn insert_first_failure(&self, ip: &str, now: DateTime<Utc>) -> Result<(), AppError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        rows.entry(ip.to_string())
            .and_modify(|r| {
                r.failed_attempts += 1;
                r.last_attempt_at = now;
            })
            .or_insert(RateLimitRecord {
                ip_address: ip.to_string(),
                failed_attempts: 1,
                first_attempt_at: now,
                last_attempt_at: now,
                blocked_until: None,
            });
        Ok(())
    }

    async fn restart_window(&self, ip: &str, now: DateTime<Utc>) -> Result<(), AppError> {
        self.check()?;
        if let Some(r) = self.rows.lock().unwrap().get_mut(ip) {
            r.failed_attempts = 1;
            r.first_attempt_at = now;
            r.last_attempt_at = now;
            r.blocked_until = None;
        }
        Ok(())
    }

    async fn increment(&self, ip: &str, now: DateTime<Utc>) -> Result<(), AppError> {
        self.check()?;
        if let Some(r) = self.rows.lock().unwrap().get_mut(ip) {
            r.failed_attempts += 1;
            r.last_attempt_at = now;
        }
        Ok(())
    }

    async fn set_blocked_until(&self, ip: &str, until: DateTime<Utc>) -> Result<(), AppError> {
        self.check()?;
        if let Some(r) = self.rows.lock().unwrap().get_mut(ip) {
            r.blocked_until = Some(until);
        }
        Ok(())
    }

    async fn delete(&self, ip: &str) -> Result<bool, AppError> {
        self.check()?;
        Ok(self.rows.lock().unwrap().remove(ip).is_some())
    }

    async fn list(&self) -> Result<Vec<RateLimitRecord>, AppError> {
        self.check()?;
        let mut records: Vec<RateLimitRecord> =
            self.rows.lock().unwrap().values().cloned().collect();
        records.sort_by(|a, b| b.last_attempt_at.cmp(&a.last_attempt_at));
        Ok(records)
    }
}

// ---------------------------------------------------------------------------
// Test application
// ---------------------------------------------------------------------------

/// Inserts a fixed peer address, as `into_make_service_with_connect_info`
/// does for real connections.
#[derive(Clone)]
struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub links: Arc<InMemoryLinks>,
    pub analytics: Arc<InMemoryAnalytics>,
    pub rate_limits: Arc<InMemoryRateLimits>,
    pub clock: ManualClock,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_time_zone("UTC")
    }

    pub fn with_time_zone(time_zone: &str) -> Self {
        let links = Arc::new(InMemoryLinks::default());
        let analytics = Arc::new(InMemoryAnalytics::new(links.clone()));
        let rate_limits = Arc::new(InMemoryRateLimits::default());
        let clock = ManualClock::new(t0());

        let state = AppState::new(
            Repositories {
                links: links.clone(),
                analytics: analytics.clone(),
                rate_limits: rate_limits.clone(),
            },
            Arc::new(clock.clone()),
            ServiceSettings {
                admin_key: ADMIN_KEY.to_string(),
                default_redirect: DEFAULT_REDIRECT.to_string(),
                time_zone: time_zone.to_string(),
                rate_limit: RateLimitPolicy::default(),
                trust_proxy: true,
            },
        );

        let app = Router::new()
            .fallback_service(app_router(state))
            .layer(MockConnectInfoLayer);

        Self {
            server: TestServer::new(app).unwrap(),
            links,
            analytics,
            rate_limits,
            clock,
        }
    }

    /// Stores a link directly, bypassing the admin API.
    pub async fn seed_link(&self, code: &str, destination: &str) -> Link {
        self.links
            .create(NewLink {
                short_code: code.to_string(),
                destination_url: destination.to_string(),
                notes: None,
                created_at: self.clock.now(),
            })
            .await
            .unwrap()
    }
}
