//! Destination URL policy for admin-created links.

use serde_json::json;
use url::Url;

use crate::error::AppError;

/// Reasons a destination is refused.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum DestinationError {
    #[error("Invalid URL format: {0}")]
    Malformed(String),

    #[error("Security: Only HTTPS URLs are allowed. Got protocol: {0}:")]
    InsecureProtocol(String),

    #[error("Invalid URL: Missing hostname")]
    MissingHostname,

    #[error("Security: URLs pointing to localhost or private networks are not allowed ({0})")]
    PrivateNetwork(String),
}

impl DestinationError {
    pub fn code(&self) -> &'static str {
        match self {
            DestinationError::Malformed(_) => "MALFORMED_URL",
            DestinationError::InsecureProtocol(_) => "INSECURE_PROTOCOL",
            DestinationError::MissingHostname => "MISSING_HOSTNAME",
            DestinationError::PrivateNetwork(_) => "PRIVATE_NETWORK_BLOCKED",
        }
    }

    fn hint(&self) -> String {
        match self {
            DestinationError::Malformed(_) => {
                "Ensure the URL is properly formatted (e.g., https://example.com/page)".to_string()
            }
            DestinationError::InsecureProtocol(scheme) => {
                format!("Change the URL to use HTTPS (https://) instead of {scheme}:")
            }
            DestinationError::MissingHostname => {
                "URL must include a domain name (e.g., https://example.com/path)".to_string()
            }
            DestinationError::PrivateNetwork(_) => {
                "Use a public HTTPS URL instead of localhost or private IP addresses.".to_string()
            }
        }
    }

    pub fn into_app_error(self, provided: &str) -> AppError {
        let code = self.code();
        let hint = self.hint();
        AppError::bad_request(
            code,
            self.to_string(),
            json!({ "hint": hint, "provided_url": provided }),
        )
    }
}

/// Checks that `input` is an HTTPS URL with a public-looking hostname.
///
/// Only the literal prefixes below are refused; this is a guard against
/// obvious mistakes, not an SSRF filter.
///
/// - `localhost`, `127.0.0.1`, `[::1]`
/// - `10.*`, `192.168.*`, `172.16.*`, `169.254.*`
///
/// # Errors
///
/// Returns the first [`DestinationError`] that applies.
pub fn validate_destination(input: &str) -> Result<(), DestinationError> {
    let url = Url::parse(input).map_err(|e| DestinationError::Malformed(e.to_string()))?;

    if url.scheme() != "https" {
        return Err(DestinationError::InsecureProtocol(url.scheme().to_string()));
    }

    let host = match url.host_str() {
        Some(h) if !h.is_empty() => h.to_ascii_lowercase(),
        _ => return Err(DestinationError::MissingHostname),
    };

    let private = host == "localhost"
        || host == "127.0.0.1"
        || host == "[::1]"
        || ["10.", "192.168.", "172.16.", "169.254."]
            .iter()
            .any(|prefix| host.starts_with(prefix));

    if private {
        return Err(DestinationError::PrivateNetwork(host));
    }

    Ok(())
}
