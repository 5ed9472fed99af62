//! Short code generation and validation utilities.

use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

use crate::error::AppError;

/// Length of generated codes.
pub const GENERATED_CODE_LENGTH: usize = 5;

const ALPHABET: &[u8; 36] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Largest multiple of the alphabet size that fits in a byte; bytes at or
/// above it are discarded to keep the distribution uniform.
const REJECTION_BOUND: u8 = 252;

/// Codes that collide with fixed routes.
pub const RESERVED_CODES: &[&str] = &["api", "admin", "analytics", "health"];

static CODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^/?#\s]{1,64}$").expect("valid short code regex")
});

/// Generates a random 5-character `[a-z0-9]` code.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random source fails.
pub fn generate_code() -> Result<String, AppError> {
    let mut code = String::with_capacity(GENERATED_CODE_LENGTH);
    let mut buffer = [0u8; 16];

    while code.len() < GENERATED_CODE_LENGTH {
        getrandom::fill(&mut buffer).map_err(|e| {
            tracing::error!(error = %e, "System random source failed");
            AppError::internal("CODE_GENERATION_FAILED", "Failed to generate short code")
        })?;

        for byte in buffer {
            if byte < REJECTION_BOUND && code.len() < GENERATED_CODE_LENGTH {
                code.push(ALPHABET[(byte % 36) as usize] as char);
            }
        }
    }

    Ok(code)
}

/// Validates an admin-provided short code.
///
/// # Rules
///
/// - 1-64 characters, no `/`, `?`, `#` or whitespace
/// - Not one of [`RESERVED_CODES`]
///
/// Codes are case-sensitive and stored as given.
pub fn validate_short_code(code: &str) -> Result<(), AppError> {
    if !CODE_PATTERN.is_match(code) {
        return Err(AppError::bad_request(
            "INVALID_SHORTCODE",
            "Short code must be 1-64 characters without '/', '?', '#' or whitespace",
            json!({ "short_code": code }),
        ));
    }

    if RESERVED_CODES.contains(&code) {
        return Err(AppError::bad_request(
            "RESERVED_SHORTCODE",
            format!("Short code \"{code}\" is reserved"),
            json!({ "short_code": code, "reserved": RESERVED_CODES }),
        ));
    }

    Ok(())
}
