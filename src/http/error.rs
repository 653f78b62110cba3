//! API error taxonomy.
//!
//! Every error surfaced by the payment endpoints becomes a JSON body of the
//! shape `{"error": message}` with the matching status code. Errors are
//! terminal for the request; nothing is retried.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::store::StoreError;

/// Errors surfaced to API callers.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// Client input failed presence/type checks.
    #[error("{0}")]
    InvalidRequest(String),

    /// Missing login session, or a payment confirmation whose signature does
    /// not verify.
    #[error("{0}")]
    Unauthorized(String),

    /// No matching booking, or an unmatched route.
    #[error("{0}")]
    NotFound(String),

    /// A second paid transition with a different payment id.
    #[error("{0}")]
    Conflict(String),

    /// The payment gateway call failed or returned no usable order id.
    #[error("{0}")]
    Gateway(String),

    /// Unexpected store or runtime failure.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal() -> Self {
        Self::Internal("Something went wrong!".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Gateway(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UnknownOrder(_) => Self::NotFound("Booking not found.".to_string()),
            StoreError::PaymentConflict(_) => {
                Self::Conflict("Booking already paid with a different payment id.".to_string())
            }
            StoreError::DuplicateOrder(_)
            | StoreError::Closed
            | StoreError::Dropped => {
                error!(%err, "store failure");
                Self::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(%status, error = %self, "request failed");
        } else {
            warn!(%status, error = %self, "request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
