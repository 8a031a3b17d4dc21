//! HTTP error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain_shop_lib::DomainShopError;
use serde_json::json;
use thiserror::Error;

/// Errors a handler can return, rendered as `{"detail": <message>}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Caller input failed validation
    #[error("{0}")]
    Unprocessable(String),

    /// Upstream or internal failure
    #[error("{0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainShopError> for ApiError {
    fn from(err: DomainShopError) -> Self {
        if err.is_client_error() {
            ApiError::Unprocessable(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
