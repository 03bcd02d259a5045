use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use std::{borrow::Cow, future::Future};
use thiserror::Error;
use tracing::{error, warn};

use sm_common::api::ValidationError;
use sm_common::db::{
    PersonnelSkillStorageError, PersonnelStorageError, ProjectStorageError, SkillStorageError,
    SnapshotStorageError,
};
use sm_common::matching::MatchError;

tokio::task_local! {
    static REQUEST_ID: String;
}

fn sanitize_message(message: &str) -> String {
    const MAX_LEN: usize = 240;

    let mut cleaned = message
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .split_whitespace()
        .map(|token| {
            if token.contains("://") {
                "[redacted-url]".to_string()
            } else if token.starts_with('/') || token.contains('\\') {
                "[redacted-path]".to_string()
            } else {
                token.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    if cleaned.len() > MAX_LEN {
        let mut cut = MAX_LEN;
        while !cleaned.is_char_boundary(cut) {
            cut -= 1;
        }
        cleaned.truncate(cut);
        cleaned.push_str("...");
    }

    if cleaned.trim().is_empty() {
        "unexpected error".to_string()
    } else {
        cleaned
    }
}

pub async fn with_request_id<Fut, T>(request_id: Option<String>, fut: Fut) -> T
where
    Fut: Future<Output = T>,
{
    match request_id {
        Some(request_id) => REQUEST_ID.scope(request_id, fut).await,
        None => fut.await,
    }
}

pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(|value| value.clone()).ok()
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("database error: {0}")]
    Database(String),
    #[error("data integrity error: {0}")]
    DataIntegrity(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("too many requests: {0}")]
    TooManyRequests(String),
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("internal server error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    code: &'static str,
    message: String,
    request_id: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let code = self.code();
        let request_id = current_request_id();

        if status.is_server_error() {
            error!(
                code,
                status = %status,
                request_id = request_id.as_deref().unwrap_or(""),
                error = %self,
                "api_error"
            );
        } else {
            warn!(
                code,
                status = %status,
                request_id = request_id.as_deref().unwrap_or(""),
                error = %self,
                "api_error"
            );
        }

        let body = Json(ErrorResponse {
            code,
            message: self.public_message().into_owned(),
            request_id,
        });

        (status, body).into_response()
    }
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::TooManyRequests(_) => "too_many_requests",
            ApiError::ServiceUnavailable(_) => "service_unavailable",
            ApiError::Database(_) => "database_error",
            ApiError::DataIntegrity(_) => "data_integrity_error",
            ApiError::Internal(_) => "internal_error",
        }
    }

    fn public_message(&self) -> Cow<'static, str> {
        match self {
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) | ApiError::Conflict(msg) => {
                Cow::Owned(sanitize_message(msg))
            }
            ApiError::Unauthorized(_) => Cow::Borrowed("unauthorized"),
            ApiError::TooManyRequests(_) => Cow::Borrowed("too many requests"),
            ApiError::ServiceUnavailable(_) => Cow::Borrowed("service unavailable"),
            ApiError::DataIntegrity(_) => {
                Cow::Borrowed("project references a skill that no longer exists")
            }
            ApiError::Database(_) | ApiError::Internal(_) => Cow::Borrowed("internal server error"),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Database(_) | ApiError::DataIntegrity(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(value: ValidationError) -> Self {
        ApiError::BadRequest(value.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        ApiError::BadRequest(value.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(value: PathRejection) -> Self {
        ApiError::BadRequest(value.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(value: QueryRejection) -> Self {
        ApiError::BadRequest(value.body_text())
    }
}

impl From<MatchError> for ApiError {
    fn from(value: MatchError) -> Self {
        ApiError::DataIntegrity(value.to_string())
    }
}

impl From<SnapshotStorageError> for ApiError {
    fn from(value: SnapshotStorageError) -> Self {
        ApiError::Database(value.to_string())
    }
}

impl From<PersonnelStorageError> for ApiError {
    fn from(value: PersonnelStorageError) -> Self {
        match value {
            PersonnelStorageError::NotFound(_) => ApiError::NotFound(value.to_string()),
            PersonnelStorageError::DuplicateEmail(_) => ApiError::Conflict(value.to_string()),
            other => ApiError::Database(other.to_string()),
        }
    }
}

impl From<SkillStorageError> for ApiError {
    fn from(value: SkillStorageError) -> Self {
        match value {
            SkillStorageError::NotFound(_) => ApiError::NotFound(value.to_string()),
            SkillStorageError::DuplicateName(_) => ApiError::Conflict(value.to_string()),
            other => ApiError::Database(other.to_string()),
        }
    }
}

impl From<PersonnelSkillStorageError> for ApiError {
    fn from(value: PersonnelSkillStorageError) -> Self {
        match value {
            PersonnelSkillStorageError::NotFound(_)
            | PersonnelSkillStorageError::UnknownPersonnel(_)
            | PersonnelSkillStorageError::UnknownSkill(_) => ApiError::NotFound(value.to_string()),
            PersonnelSkillStorageError::AlreadyAssigned { .. } => {
                ApiError::Conflict(value.to_string())
            }
            other => ApiError::Database(other.to_string()),
        }
    }
}

impl From<ProjectStorageError> for ApiError {
    fn from(value: ProjectStorageError) -> Self {
        match value {
            ProjectStorageError::NotFound(_) => ApiError::NotFound(value.to_string()),
            ProjectStorageError::UnknownSkill(_) => ApiError::BadRequest(value.to_string()),
            other => ApiError::Database(other.to_string()),
        }
    }
}
