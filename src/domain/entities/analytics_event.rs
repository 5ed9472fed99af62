//! Analytics event entity: one row per resolved redirect.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::click_context::GeoInfo;

/// Coarse device class derived from the user agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Mobile,
    Tablet,
    Bot,
    Desktop,
    Unknown,
}

impl DeviceType {
    /// Classifies a user agent string.
    ///
    /// First match wins over the lower-cased string, in this order:
    ///
    /// 1. `mobile`, `android`, `iphone` → [`DeviceType::Mobile`]
    /// 2. `tablet`, `ipad` → [`DeviceType::Tablet`]
    /// 3. `bot`, `crawler`, `spider` → [`DeviceType::Bot`]
    /// 4. anything else → [`DeviceType::Desktop`]
    ///
    /// An empty user agent is [`DeviceType::Unknown`].
    ///
    /// Because the mobile tokens are checked first, an iPad user agent that
    /// also advertises "Mobile" (as Mobile Safari on iPad does) is reported
    /// as `Mobile`, and Android tablets are reported as `Mobile` too. Stored
    /// analytics depend on this ordering, so it is kept.
    pub fn classify(user_agent: &str) -> Self {
        if user_agent.is_empty() {
            return DeviceType::Unknown;
        }

        let ua = user_agent.to_lowercase();
        let has_any = |needles: &[&str]| needles.iter().any(|n| ua.contains(n));

        if has_any(&["mobile", "android", "iphone"]) {
            DeviceType::Mobile
        } else if has_any(&["tablet", "ipad"]) {
            DeviceType::Tablet
        } else if has_any(&["bot", "crawler", "spider"]) {
            DeviceType::Bot
        } else {
            DeviceType::Desktop
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Mobile => "mobile",
            DeviceType::Tablet => "tablet",
            DeviceType::Bot => "bot",
            DeviceType::Desktop => "desktop",
            DeviceType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored click event joined with the short code and destination of its
/// link.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct AnalyticsEvent {
    pub id: i64,
    pub link_id: i64,
    pub short_code: String,
    pub destination_url: String,
    pub ip_address: String,
    pub user_agent: String,
    pub referer: String,
    pub country: String,
    pub city: String,
    pub region: String,
    pub region_code: String,
    pub continent: String,
    pub timezone: String,
    pub postal_code: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub asn: Option<i64>,
    pub as_organization: String,
    pub colo: String,
    pub http_protocol: String,
    pub tls_version: String,
    pub bot_category: String,
    pub device_type: String,
    pub client_tcp_rtt: Option<i32>,
    pub timestamp: String,
}

/// Input for appending a click event.
///
/// Text attributes that the platform did not supply are stored as empty
/// strings, numeric ones as `NULL`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnalyticsEvent {
    pub link_id: i64,
    pub ip_address: String,
    pub user_agent: String,
    pub referer: String,
    pub geo: GeoInfo,
    pub device_type: DeviceType,
    pub timestamp: String,
}
