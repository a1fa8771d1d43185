use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::{BytesRejection, JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::ExtractionError;
use crate::llm_client::LlmError;
use crate::render::RenderError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant is reported as `{"error": message, "code": CODE}`. Nothing is retried.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    /// The request itself could not be read: bad body, content type, size or query.
    #[error("{message}")]
    Request { status: StatusCode, message: String },

    #[error("{0}")]
    Extraction(#[from] ExtractionError),

    #[error("{0}")]
    NotFound(String),

    #[error("Template file '{0}' not found")]
    TemplateNotFound(String),

    #[error("An error occurred while creating the document: {0}")]
    Render(String),

    #[error("Model response was not valid: {0}")]
    MalformedModelOutput(String),

    #[error("An error occurred while calling the model: {0}")]
    Llm(String),

    #[error("Document conversion failed: {0}")]
    Conversion(String),

    #[error("An error occurred: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Request { status, .. } => (*status, "INVALID_REQUEST"),
            AppError::Extraction(_) => (StatusCode::BAD_REQUEST, "EXTRACTION_ERROR"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::TemplateNotFound(_) => (StatusCode::BAD_REQUEST, "TEMPLATE_NOT_FOUND"),
            AppError::Render(_) => (StatusCode::INTERNAL_SERVER_ERROR, "RENDER_ERROR"),
            AppError::MalformedModelOutput(_) => (StatusCode::BAD_GATEWAY, "MALFORMED_MODEL_OUTPUT"),
            AppError::Llm(_) => (StatusCode::BAD_GATEWAY, "LLM_ERROR"),
            AppError::Conversion(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONVERSION_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

/// Extractor rejections keep axum's status and message but use the JSON body.
macro_rules! impl_from_rejection {
    ($($rejection:ty),* $(,)?) => {
        $(
            impl From<$rejection> for AppError {
                fn from(rejection: $rejection) -> Self {
                    AppError::Request {
                        status: rejection.status(),
                        message: rejection.body_text(),
                    }
                }
            }
        )*
    };
}

impl_from_rejection!(
    JsonRejection,
    QueryRejection,
    MultipartRejection,
    MultipartError,
    BytesRejection,
);

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Parse(inner) => AppError::MalformedModelOutput(inner.to_string()),
            other => AppError::Llm(other.to_string()),
        }
    }
}

impl From<RenderError> for AppError {
    fn from(e: RenderError) -> Self {
        match e {
            RenderError::TemplateNotFound(path) => {
                AppError::TemplateNotFound(path.display().to_string())
            }
            RenderError::Conversion(msg) => AppError::Conversion(msg),
            RenderError::Io(inner) => AppError::Internal(inner.into()),
            other => AppError::Render(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(code, "{message}");
        } else {
            tracing::warn!(code, "{message}");
        }

        let body = Json(json!({
            "error": message,
            "code": code,
        }));

        (status, body).into_response()
    }
}
