use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::meals::validation::ValidationError;
use crate::query::MutationKind;

/// Failure talking to the `/Food` backend. `Display` is the human-readable message.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("{0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("invalid response from meal service: {0}")]
    Decode(String),

    #[error("invalid meal service url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

/// Everything a catalog action can fail with. All of it is recoverable by the user.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("meal data is invalid")]
    Validation(Vec<ValidationError>),

    #[error("a {0} request is already in progress")]
    Busy(MutationKind),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            CatalogError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "message": message, "errors": errors })),
            )
                .into_response(),
            CatalogError::Busy(_) => {
                (StatusCode::CONFLICT, Json(json!({ "message": message }))).into_response()
            }
            CatalogError::Api(ApiError::Status { status: 404, .. }) => {
                (StatusCode::NOT_FOUND, Json(json!({ "message": message }))).into_response()
            }
            CatalogError::Api(e) => {
                error!(error = %e, "meal service request failed");
                (StatusCode::BAD_GATEWAY, Json(json!({ "message": message }))).into_response()
            }
            CatalogError::Internal(e) => {
                error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": message })),
                )
                    .into_response()
            }
        }
    }
}
