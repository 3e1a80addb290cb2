use axum::{
    http::StatusCode,
    response::{ IntoResponse, Response },
    Json,
};
use thiserror::Error;

use crate::models::wire::ErrorBody;

pub const PROCESSING_FAILURE_MESSAGE: &str = "Failed to process chat message";

/// Failures of one relay call, mapped onto HTTP status codes at the endpoint boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RelayError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Failed to process chat message: {0}")]
    ProcessingFailure(String),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::ProcessingFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            RelayError::InvalidRequest(msg) =>
                ErrorBody {
                    error: msg.clone(),
                    details: None,
                },
            RelayError::ProcessingFailure(details) =>
                ErrorBody {
                    error: PROCESSING_FAILURE_MESSAGE.to_string(),
                    details: Some(details.clone()),
                },
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

/// Failures seen by the chat client. Every one of them rolls the send back.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Failed to send message: {0}")]
    NetworkFailure(String),

    #[error("Malformed timestamp '{0}'")]
    MalformedTimestamp(String),

    #[error("No send is in flight")]
    NotSending,
}
