use hyper::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
    #[error("Failed to read request body: {0}")]
    Body(String),
    #[error("Invalid request body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("No such path: {0}")]
    NotFound(String),
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(hyper::Method),
}

impl ServeError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServeError::Body(_) => StatusCode::BAD_REQUEST,
            ServeError::Json(_) => StatusCode::BAD_REQUEST,
            ServeError::NotFound(_) => StatusCode::NOT_FOUND,
            ServeError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}
