use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or malformed tool argument, or a scrape target outside the allow-list.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown tool: {0}")]
    MethodNotFound(String),

    /// Network or API failure from an outbound collaborator.
    #[error("{0}")]
    CollaboratorFailure(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    /// Transport-level malformation: bad JSON, unsupported RPC method or verb.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Corpus load failed: {0}")]
    CorpusError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: u16,
}

impl AppError {
    /// Only transport malformation is a client error. Anything raised while
    /// dispatching a tool call, including argument and lookup errors, is a
    /// dispatch fault.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidArgument(_)
            | AppError::MethodNotFound(_)
            | AppError::CollaboratorFailure(_)
            | AppError::InternalError(_)
            | AppError::CorpusError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(error = %message, "Dispatch fault");
        } else {
            tracing::warn!(error = %message, "Client error");
        }

        let body = Json(ErrorResponse {
            error: message,
            code: status.as_u16(),
        });

        (status, body).into_response()
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
