//! Per-request metadata captured for click analytics.

/// Geo and network attributes supplied by the edge platform in front of the
/// service.
///
/// Every field is optional. Values are passed through to storage as given;
/// nothing here is validated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoInfo {
    pub country: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub region_code: Option<String>,
    pub continent: Option<String>,
    pub timezone: Option<String>,
    pub postal_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub asn: Option<i64>,
    pub as_organization: Option<String>,
    pub colo: Option<String>,
    pub http_protocol: Option<String>,
    pub tls_version: Option<String>,
    pub bot_category: Option<String>,
    pub client_tcp_rtt: Option<i32>,
}

/// Everything the analytics recorder needs to know about one click.
///
/// Built by the redirect handler from the inbound request and handed to
/// [`crate::application::services::RedirectService::resolve`].
#[derive(Debug, Clone, Default)]
pub struct ClickContext {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub geo: GeoInfo,
}

impl ClickContext {
    pub fn new(
        ip: Option<String>,
        user_agent: Option<&str>,
        referer: Option<&str>,
        geo: GeoInfo,
    ) -> Self {
        Self {
            ip,
            user_agent: user_agent.map(|s| s.to_string()),
            referer: referer.map(|s| s.to_string()),
            geo,
        }
    }
}
