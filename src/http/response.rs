//! Error responses.
//!
//! Every failure leaves the service as `{"error": "<message>"}` with the
//! status code chosen here.

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("User not found")]
    UserNotFound,
    #[error("Name and email are required")]
    MissingRequiredFields,
    #[error("Invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("{0}")]
    Body(#[from] BytesRejection),
    #[error("Not found")]
    RouteNotFound,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Request timed out")]
    Timeout,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UserNotFound | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::MissingRequiredFields | ApiError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            ApiError::Body(rejection) => rejection.status(),
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::UserNotFound,
            StoreError::MissingRequiredFields => ApiError::MissingRequiredFields,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_client_statuses() {
        assert_eq!(ApiError::from(StoreError::NotFound(9)).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(StoreError::MissingRequiredFields).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn messages_match_the_public_contract() {
        assert_eq!(ApiError::UserNotFound.to_string(), "User not found");
        assert_eq!(
            ApiError::MissingRequiredFields.to_string(),
            "Name and email are required"
        );
    }

    #[test]
    fn protocol_errors_keep_their_statuses() {
        assert_eq!(ApiError::MethodNotAllowed.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(ApiError::Timeout.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(ApiError::Timeout.to_string(), "Request timed out");
    }

    #[test]
    fn malformed_json_is_a_bad_request() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let api = ApiError::from(err);
        assert_eq!(api.status(), StatusCode::BAD_REQUEST);
        assert!(api.to_string().starts_with("Invalid JSON body"));
    }
}
