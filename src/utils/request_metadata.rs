//! Edge-supplied geo and network metadata.

use axum::http::{HeaderMap, Version};

use crate::domain::click_context::GeoInfo;

fn text(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn number<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    text(headers, name).and_then(|v| v.parse().ok())
}

/// Protocol label as reported by edge platforms, e.g. `HTTP/2`.
pub fn protocol_label(version: Version) -> Option<String> {
    let label = match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2",
        Version::HTTP_3 => "HTTP/3",
        _ => return None,
    };
    Some(label.to_string())
}

/// Reads geo/network attributes from edge headers.
///
/// Headers are only honoured when `trust_proxy` is set; the protocol always
/// comes from the request itself. Numeric headers that do not parse are
/// treated as absent. The data centre code is the suffix of `CF-Ray`
/// (`8f2c1d9e7a6b5c4d-AMS` → `AMS`).
pub fn geo_from_headers(headers: &HeaderMap, version: Version, trust_proxy: bool) -> GeoInfo {
    let http_protocol = protocol_label(version);

    if !trust_proxy {
        return GeoInfo {
            http_protocol,
            ..Default::default()
        };
    }

    let colo = text(headers, "cf-ray")
        .and_then(|ray| ray.rsplit_once('-').map(|(_, colo)| colo.to_string()))
        .filter(|c| !c.is_empty());

    GeoInfo {
        country: text(headers, "cf-ipcountry"),
        city: text(headers, "cf-ipcity"),
        region: text(headers, "cf-region"),
        region_code: text(headers, "cf-region-code"),
        continent: text(headers, "cf-ipcontinent"),
        timezone: text(headers, "cf-timezone"),
        postal_code: text(headers, "cf-postal-code"),
        latitude: number(headers, "cf-iplatitude"),
        longitude: number(headers, "cf-iplongitude"),
        asn: number(headers, "x-asn"),
        as_organization: text(headers, "x-as-organization"),
        colo,
        http_protocol,
        tls_version: text(headers, "x-tls-version"),
        bot_category: text(headers, "x-bot-category"),
        client_tcp_rtt: number(headers, "x-client-tcp-rtt"),
    }
}
