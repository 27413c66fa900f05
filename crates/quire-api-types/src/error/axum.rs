use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::{Error, ErrorCategory};

impl Error {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self.category {
            ErrorCategory::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCategory::Outage => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCategory::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCategory::AccessDenied => StatusCode::UNAUTHORIZED,
            ErrorCategory::NotFound => StatusCode::NOT_FOUND,
            ErrorCategory::Conflict => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}
