use axum::{Json, extract::State, http::StatusCode};

use sm_common::api::project::{ProjectRecord, ProjectRequest};
use sm_common::db;

use crate::SharedState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};

pub async fn list(
    State(state): State<SharedState>,
    _auth: AuthUser,
) -> Result<Json<Vec<ProjectRecord>>, ApiError> {
    Ok(Json(db::list_projects(&state.pool).await?))
}

pub async fn get(
    State(state): State<SharedState>,
    _auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ProjectRecord>, ApiError> {
    Ok(Json(db::get_project(&state.pool, id).await?))
}

pub async fn create(
    State(state): State<SharedState>,
    _auth: AuthUser,
    ApiJson(request): ApiJson<ProjectRequest>,
) -> Result<(StatusCode, Json<ProjectRecord>), ApiError> {
    let insert = request.into_insert()?;
    let project = db::insert_project(&state.pool, &insert).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// Full replacement, including the requirement list.
pub async fn replace(
    State(state): State<SharedState>,
    _auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<ProjectRequest>,
) -> Result<Json<ProjectRecord>, ApiError> {
    let update = request.into_insert()?;
    Ok(Json(db::update_project(&state.pool, id, &update).await?))
}

pub async fn delete(
    State(state): State<SharedState>,
    _auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    db::delete_project(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
