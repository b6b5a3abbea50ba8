use axum::{
    extract::rejection::{BytesRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::protocol::ErrorBody;
use thiserror::Error;
use crate::error::{HostError, ServiceError};

/// Every failure a request can end in. This is the only place registry
/// errors become HTTP status codes.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Malformed body or a path that does not carry an id
    #[error("{0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Host(HostError::NotFound)
            | ApiError::Service(ServiceError::NotFound | ServiceError::HostNotFound) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Host(HostError::AlreadyExists | HostError::InconsistentIds)
            | ApiError::Service(ServiceError::AlreadyExists | ServiceError::InconsistentIds) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        ApiError::Decode(rejection.body_text())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Decode(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(component = "HTTP", "Request failed: {}", self);
        } else {
            tracing::debug!(component = "HTTP", "Request rejected: {}", self);
        }

        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}
