//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::application::services::{
    AdminGate, AnalyticsRecorder, AnalyticsService, LinkService, RateLimitPolicy, RateLimiter,
    RedirectService,
};
use crate::config::Config;
use crate::domain::clock::Clock;
use crate::domain::repositories::{AnalyticsRepository, LinkRepository, RateLimitRepository};

/// Values from configuration that the services are built with.
#[derive(Clone)]
pub struct ServiceSettings {
    pub admin_key: String,
    pub default_redirect: String,
    pub time_zone: String,
    pub rate_limit: RateLimitPolicy,
    pub trust_proxy: bool,
}

impl From<&Config> for ServiceSettings {
    fn from(config: &Config) -> Self {
        Self {
            admin_key: config.admin_key.clone(),
            default_redirect: config.default_redirect.clone(),
            time_zone: config.default_timezone.clone(),
            rate_limit: config.rate_limit_policy(),
            trust_proxy: config.behind_proxy,
        }
    }
}

/// Storage backends the services run against.
#[derive(Clone)]
pub struct Repositories {
    pub links: Arc<dyn LinkRepository>,
    pub analytics: Arc<dyn AnalyticsRepository>,
    pub rate_limits: Arc<dyn RateLimitRepository>,
}

#[derive(Clone)]
pub struct AppState {
    pub redirect_service: Arc<RedirectService>,
    pub link_service: Arc<LinkService>,
    pub analytics_service: Arc<AnalyticsService>,
    pub admin_gate: Arc<AdminGate>,
    /// Read forwarded client IPs and edge geo headers.
    pub trust_proxy: bool,
}

impl AppState {
    /// Wires every service from the given repositories, clock and settings.
    pub fn new(repos: Repositories, clock: Arc<dyn Clock>, settings: ServiceSettings) -> Self {
        let recorder = Arc::new(AnalyticsRecorder::new(
            repos.analytics.clone(),
            clock.clone(),
            &settings.time_zone,
        ));

        let redirect_service = Arc::new(RedirectService::new(
            repos.links.clone(),
            recorder,
            clock.clone(),
            settings.default_redirect,
        ));

        let link_service = Arc::new(LinkService::new(
            repos.links.clone(),
            repos.analytics.clone(),
            clock.clone(),
        ));

        let analytics_service = Arc::new(AnalyticsService::new(repos.links, repos.analytics));

        let limiter = Arc::new(RateLimiter::new(
            repos.rate_limits,
            clock,
            settings.rate_limit,
        ));
        let admin_gate = Arc::new(AdminGate::new(limiter, settings.admin_key));

        Self {
            redirect_service,
            link_service,
            analytics_service,
            admin_gate,
            trust_proxy: settings.trust_proxy,
        }
    }
}
