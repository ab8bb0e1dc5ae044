use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

use crate::errors::{AnalyticsError, IngestError};

/// Typed error surface for the API. The body shape is always
/// `{"error": {"code", "message", "file"?}}`, so a failed request is never
/// confusable with an empty result.
#[derive(Debug)]
pub enum ApiError {
    BadRequest {
        code: &'static str,
        message: String,
    },
    RejectedUpload {
        code: &'static str,
        message: String,
        file: Option<String>,
    },
    NotFound {
        message: String,
    },
    Internal(anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: ErrorDetail<'a>,
}

#[derive(Serialize)]
struct ErrorDetail<'a> {
    code: &'a str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<&'a str>,
}

impl ApiError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound {
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, file) = match self {
            ApiError::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, code, message, None)
            }
            ApiError::RejectedUpload {
                code,
                message,
                file,
            } => (StatusCode::UNPROCESSABLE_ENTITY, code, message, file),
            ApiError::NotFound { message } => {
                (StatusCode::NOT_FOUND, "not_found", message, None)
            }
            ApiError::Internal(error) => {
                log::error!("Internal error: {error:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    "internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorBody {
            error: ErrorDetail {
                code,
                message,
                file: file.as_deref(),
            },
        });
        (status, body).into_response()
    }
}

impl From<AnalyticsError> for ApiError {
    fn from(error: AnalyticsError) -> Self {
        let code = match &error {
            AnalyticsError::InvalidRange { .. } => "invalid_range",
            AnalyticsError::InvalidTeamId { .. } => "invalid_team_id",
        };
        ApiError::bad_request(code, error.to_string())
    }
}

/// Service errors arrive as anyhow; typed ingestion rejections are unwrapped
/// back out of them, everything else is a 500.
impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        match error.downcast::<IngestError>() {
            Ok(rejected) => ApiError::from(rejected),
            Err(other) => ApiError::Internal(other),
        }
    }
}

impl From<IngestError> for ApiError {
    fn from(error: IngestError) -> Self {
        let message = error.to_string();
        match &error {
            IngestError::Validation { file, .. } => ApiError::RejectedUpload {
                code: "invalid_file",
                message,
                file: Some(file.clone()),
            },
            IngestError::Parse { file, .. } => ApiError::RejectedUpload {
                code: "unparseable_file",
                message,
                file: Some(file.clone()),
            },
            IngestError::UnknownIdentity { .. } => {
                ApiError::bad_request("unknown_identity", message)
            }
            IngestError::EmptyBatch => ApiError::bad_request("empty_batch", message),
            IngestError::TooManyFiles { .. } => ApiError::bad_request("too_many_files", message),
            IngestError::InvalidDate { .. } => ApiError::bad_request("invalid_date", message),
            IngestError::UnknownTeam { .. } => ApiError::bad_request("unknown_team", message),
        }
    }
}
