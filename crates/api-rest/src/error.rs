use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use api_shared::{ErrorRes, GuideErrorRes};
use guia_core::constants::{INVALID_ROLE_MESSAGE, MISSING_FIELDS_MESSAGE, NOT_FOUND_MESSAGE};
use guia_core::{FormContext, GuideError};

/// HTTP-facing error. Form errors carry the form context so the client can re-prompt.
#[derive(Debug)]
pub enum ApiError {
    Form {
        status: StatusCode,
        message: String,
        context: FormContext,
    },
    BadRequest(String),
    Unprocessable(String),
    Internal,
}

impl ApiError {
    /// Maps a core error, logging it at a level matching who is at fault.
    pub fn from_guide(err: GuideError, context: impl FnOnce() -> FormContext) -> Self {
        match err {
            GuideError::Validation(field) => {
                tracing::warn!("guide request missing field: {}", field);
                ApiError::Form {
                    status: StatusCode::BAD_REQUEST,
                    message: MISSING_FIELDS_MESSAGE.into(),
                    context: context(),
                }
            }
            GuideError::NotFound => ApiError::Form {
                status: StatusCode::NOT_FOUND,
                message: NOT_FOUND_MESSAGE.into(),
                context: context(),
            },
            GuideError::InvalidArgument(msg) => {
                tracing::warn!("invalid argument: {}", msg);
                ApiError::BadRequest(INVALID_ROLE_MESSAGE.into())
            }
            GuideError::Render(e) => {
                tracing::warn!("guide render rejected: {}", e);
                ApiError::Unprocessable(e.to_string())
            }
            other => {
                tracing::error!("guide error: {:?}", other);
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Form {
                status,
                message,
                context,
            } => (
                status,
                Json(GuideErrorRes {
                    error: message,
                    origin_sections: context.origin_sections,
                    destination_sections: context.destination_sections,
                }),
            )
                .into_response(),
            ApiError::BadRequest(error) => {
                (StatusCode::BAD_REQUEST, Json(ErrorRes { error })).into_response()
            }
            ApiError::Unprocessable(error) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorRes { error })).into_response()
            }
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorRes {
                    error: "Internal error".into(),
                }),
            )
                .into_response(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
