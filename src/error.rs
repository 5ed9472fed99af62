//! Application error type and its HTTP mapping.
//!
//! Every fallible operation in the service layer returns [`AppError`]. The
//! HTTP layer renders it as a JSON body:
//!
//! ```json
//! {
//!   "error": {
//!     "code": "INVALID_ADMIN_KEY",
//!     "message": "Authentication failed: Invalid admin key",
//!     "details": { "hint": "Keys are case-sensitive." }
//!   }
//! }
//! ```

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serialized error payload.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation {
        code: &'static str,
        message: String,
        details: Value,
    },

    #[error("{message}")]
    NotFound {
        code: &'static str,
        message: String,
        details: Value,
    },

    #[error("{message}")]
    Conflict {
        code: &'static str,
        message: String,
        details: Value,
    },

    #[error("{message}")]
    Unauthorized {
        code: &'static str,
        message: String,
        details: Value,
    },

    /// The caller's IP is blocked by the admin rate limiter.
    #[error("{message}")]
    RateLimited {
        message: String,
        retry_after_secs: i64,
    },

    /// Store unavailable or another server-side failure. The message is
    /// generic; the cause is only logged.
    #[error("{message}")]
    Internal { code: &'static str, message: String },
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            code,
            message: message.into(),
            details,
        }
    }

    pub fn not_found(code: &'static str, message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            code,
            message: message.into(),
            details,
        }
    }

    pub fn conflict(code: &'static str, message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            code,
            message: message.into(),
            details,
        }
    }

    pub fn unauthorized(code: &'static str, message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            code,
            message: message.into(),
            details,
        }
    }

    pub fn rate_limited(message: impl Into<String>, retry_after_secs: i64) -> Self {
        Self::RateLimited {
            message: message.into(),
            retry_after_secs,
        }
    }

    pub fn internal(code: &'static str, message: impl Into<String>) -> Self {
        Self::Internal {
            code,
            message: message.into(),
        }
    }

    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into its serializable form.
    pub fn to_error_info(&self) -> ErrorInfo {
        match self {
            AppError::Validation {
                code,
                message,
                details,
            }
            | AppError::NotFound {
                code,
                message,
                details,
            }
            | AppError::Conflict {
                code,
                message,
                details,
            }
            | AppError::Unauthorized {
                code,
                message,
                details,
            } => ErrorInfo {
                code: *code,
                message: message.clone(),
                details: details.clone(),
            },
            AppError::RateLimited {
                message,
                retry_after_secs,
            } => ErrorInfo {
                code: "RATE_LIMIT_EXCEEDED",
                message: message.clone(),
                details: json!({
                    "retry_after": retry_after_secs,
                    "hint": "Wait for the block period to expire, or ask an administrator to unblock your IP."
                }),
            },
            AppError::Internal { code, message } => ErrorInfo {
                code: *code,
                message: message.clone(),
                details: json!({}),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        let mut response = (status, Json(body)).into_response();

        if let AppError::RateLimited {
            retry_after_secs, ..
        } = self
            && let Ok(value) = HeaderValue::from_str(&retry_after_secs.max(0).to_string())
        {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }

        response
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(
                "SHORTCODE_ALREADY_EXISTS",
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }

        tracing::error!(error = %e, "Database error");
        AppError::internal("DB_QUERY_FAILED", "Database error")
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::bad_request(
            "VALIDATION_FAILED",
            "Request validation failed",
            json!({ "fields": e.field_errors().keys().collect::<Vec<_>>() }),
        )
    }
}
