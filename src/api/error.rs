use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::search::SearchError;

/// Error returned by every handler; renders as `{msg}` or `{msg, error}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{msg}: {error}")]
    Internal { msg: String, error: String },
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>, error: impl ToString) -> Self {
        Self::Internal {
            msg: msg.into(),
            error: error.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(error: SearchError) -> Self {
        match error {
            SearchError::Validation(msg) => Self::BadRequest(msg),
            SearchError::NotFound(msg) => Self::NotFound(msg),
            SearchError::NotConfigured(provider) => {
                Self::internal(format!("{provider} API not configured"), "missing credentials")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::BadRequest(msg) | Self::NotFound(msg) => json!({ "msg": msg }),
            Self::Internal { msg, error } => {
                tracing::error!("{msg}: {error}");
                json!({ "msg": msg, "error": error })
            }
        };
        (status, Json(body)).into_response()
    }
}
