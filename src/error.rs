use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, error};

/// One rejected input field, shaped the way clients already parse it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub msg: String,
    pub param: String,
    pub location: String,
}

impl FieldError {
    pub fn body(param: &str, msg: &str) -> Self {
        Self {
            msg: msg.to_string(),
            param: param.to_string(),
            location: "body".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::Validation(errors) => json!({ "errors": errors }),
            AppError::NotFound(msg) | AppError::Unauthorized(msg) | AppError::Conflict(msg) => {
                json!({ "msg": msg })
            }
            AppError::Internal(e) => {
                error!(error = ?e, "internal error");
                json!({ "msg": "Server Error" })
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        // Serde detail stays in the log; clients get a fixed message.
        debug!(error = %rejection.body_text(), "json body rejected");
        let msg = match rejection {
            JsonRejection::MissingJsonContentType(_) => "Content-Type must be application/json",
            JsonRejection::JsonSyntaxError(_) => "Body is not valid JSON",
            JsonRejection::JsonDataError(_) => "Body has missing or mistyped fields",
            _ => "Body could not be read",
        };
        AppError::Validation(vec![FieldError::body("body", msg)])
    }
}
