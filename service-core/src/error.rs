use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Service-level error taxonomy.
///
/// Every failure that escapes a handler is one of these variants; the
/// `IntoResponse` impl converts it to a JSON `{error, details?}` body with
/// the matching status. Nothing is retried and nothing crashes the process.
#[derive(Debug, Error)]
pub enum AppError {
    /// Caller error. No upstream call is made for these.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The upstream provider rejected our credential.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The upstream provider answered with an unusable shape.
    #[error("Bad gateway: {0}")]
    BadGateway(String),

    /// The upstream provider could not be reached at all.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Uncategorized failure. The caller sees the message, the log gets
    /// the full chain.
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) | AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<String>,
        }

        let status = self.status();
        let (error, details) = match self {
            AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::BadGateway(msg)
            | AppError::ServiceUnavailable(msg)
            | AppError::Internal(msg) => (msg, None),
            AppError::ConfigError(err) => ("Configuration error".to_string(), Some(err.to_string())),
        };

        (status, Json(ErrorResponse { error, details })).into_response()
    }
}
