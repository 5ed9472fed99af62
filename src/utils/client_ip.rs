//! Client IP resolution.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::{HeaderMap, request::Parts};

use crate::state::AppState;

/// Placeholder stored when no address is known.
pub const UNKNOWN_IP: &str = "unknown";

/// Resolves the address a request came from.
///
/// With `trust_proxy`, the first non-empty of the last `X-Forwarded-For`
/// entry, `CF-Connecting-IP` and `X-Real-IP` wins. Earlier forwarded entries
/// are client-supplied and ignored. Otherwise, or when none is present, the
/// socket peer is used.
pub fn resolve_client_ip(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trust_proxy: bool,
) -> Option<String> {
    if trust_proxy {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let forwarded = header("x-forwarded-for")
            .and_then(|v| v.rsplit(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .or_else(|| header("cf-connecting-ip"))
            .or_else(|| header("x-real-ip"));

        if let Some(ip) = forwarded {
            return Some(ip.to_string());
        }
    }

    peer.map(|addr| addr.ip().to_string())
}

/// Extractor yielding the caller's IP, or `None` if it cannot be determined.
///
/// Never rejects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub Option<String>);

impl ClientIp {
    /// The IP, or [`UNKNOWN_IP`].
    pub fn or_unknown(&self) -> &str {
        self.0.as_deref().unwrap_or(UNKNOWN_IP)
    }
}

impl FromRequestParts<AppState> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        Ok(ClientIp(resolve_client_ip(
            &parts.headers,
            peer,
            state.trust_proxy,
        )))
    }
}
