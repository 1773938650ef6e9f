use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum FileServerError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl FileServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            FileServerError::NotFound(_) => StatusCode::NOT_FOUND,
            FileServerError::Forbidden(_) => StatusCode::FORBIDDEN,
            FileServerError::Internal(_) | FileServerError::InvalidConfig(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Clients only ever see the status line text; the cause stays in the log.
impl IntoResponse for FileServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!("{}", self);
        } else {
            warn!("{}", self);
        }

        let body = match status {
            StatusCode::NOT_FOUND => "404 Not Found",
            StatusCode::FORBIDDEN => "403 Forbidden",
            _ => "500 Internal Server Error",
        };

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response()
    }
}
