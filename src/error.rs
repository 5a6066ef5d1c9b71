/*!
 * API Errors
 * Request-boundary failures and their HTTP representation
 */
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::{collections::BTreeMap, io, net::SocketAddr};
use validator::ValidationErrors;

use crate::config::ConfigError;
use crate::logging::LoggingError;

/// Conditions that stop the process before or while serving.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to initialize logging: {0}")]
    Logging(#[from] LoggingError),

    #[error("failed to bind {addr}: {source}")]
    Bind { addr: SocketAddr, source: io::Error },

    #[error("server error: {0}")]
    Serve(io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),
}

/// Error body returned for rejected requests
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<BTreeMap<String, Vec<String>>>,
}

/// Flatten validator output into `field -> [messages]`.
pub fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                let details = field_messages(&errors);
                tracing::debug!(
                    fields = ?details.keys().collect::<Vec<_>>(),
                    "request failed validation"
                );
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(ErrorResponse {
                        error: "Validation failed".to_string(),
                        message: None,
                        details: Some(details),
                    }),
                )
                    .into_response()
            }
            ApiError::InvalidBody(rejection) => (
                rejection.status(),
                Json(ErrorResponse {
                    error: "Invalid request body".to_string(),
                    message: Some(rejection.body_text()),
                    details: None,
                }),
            )
                .into_response(),
        }
    }
}
