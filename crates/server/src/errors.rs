use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use seocrew::PipelineError;
use serde_json::json;
use tracing::error;

/// A custom error type for the server application.
///
/// This enum encapsulates different kinds of errors that can occur within the server,
/// allowing them to be converted into appropriate HTTP responses.
pub enum AppError {
    /// Errors originating from the `seocrew` pipeline.
    Pipeline(PipelineError),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        AppError::Pipeline(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

/// Maps a pipeline error to its HTTP status, looking through stage wrappers.
fn status_for(err: &PipelineError) -> StatusCode {
    match err.root_cause() {
        PipelineError::UnknownClient(_) => StatusCode::NOT_FOUND,
        PipelineError::AiRequest(_)
        | PipelineError::AiDeserialization(_)
        | PipelineError::AiApi(_)
        | PipelineError::MalformedOutput { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::Pipeline(err) => {
                let status = status_for(&err);
                match status {
                    StatusCode::NOT_FOUND => (status, err.to_string()),
                    StatusCode::BAD_GATEWAY => {
                        // Log the original error for debugging purposes
                        error!("Content generation failed: {:?}", err);
                        (status, format!("Content generation failed: {err}"))
                    }
                    _ => {
                        error!("PipelineError: {:?}", err);
                        (status, "Server is not configured correctly.".to_string())
                    }
                }
            }
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
