use axum::{
    Json, extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse,
    response::Response,
};
use serde::Serialize;

use crate::application::errors::ApplicationError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ApplicationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApplicationError::Validation(_) | ApplicationError::InvalidArgument(_) => {
                StatusCode::BAD_REQUEST
            }
            ApplicationError::UserNotFound(_) | ApplicationError::TrainingNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ApplicationError::Conflict(_) => StatusCode::CONFLICT,
            ApplicationError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (
            status,
            Json(ErrorBody {
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Body that could not be read as the expected JSON.
pub fn rejected_body(rejection: JsonRejection) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorBody {
            message: rejection.body_text(),
        }),
    )
        .into_response()
}
