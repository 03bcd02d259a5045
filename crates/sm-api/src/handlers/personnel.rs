use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use sm_common::api::personnel::{PersonnelRecord, PersonnelRequest};
use sm_common::api::personnel_skill::HeldSkillRecord;
use sm_common::db;

use crate::SharedState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};

#[derive(Debug, Default, Deserialize)]
pub struct PersonnelFilter {
    pub role: Option<String>,
}

pub async fn list(
    State(state): State<SharedState>,
    _auth: AuthUser,
    ApiQuery(filter): ApiQuery<PersonnelFilter>,
) -> Result<Json<Vec<PersonnelRecord>>, ApiError> {
    let role = filter
        .role
        .as_deref()
        .map(str::trim)
        .filter(|role| !role.is_empty());
    Ok(Json(db::list_personnel(&state.pool, role).await?))
}

pub async fn get(
    State(state): State<SharedState>,
    _auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<PersonnelRecord>, ApiError> {
    Ok(Json(db::get_personnel(&state.pool, id).await?))
}

pub async fn create(
    State(state): State<SharedState>,
    _auth: AuthUser,
    ApiJson(request): ApiJson<PersonnelRequest>,
) -> Result<(StatusCode, Json<PersonnelRecord>), ApiError> {
    let insert = request.into_insert()?;
    let record = db::insert_personnel(&state.pool, &insert).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update(
    State(state): State<SharedState>,
    _auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<PersonnelRequest>,
) -> Result<Json<PersonnelRecord>, ApiError> {
    let changes = request.into_changes()?;
    Ok(Json(db::update_personnel(&state.pool, id, &changes).await?))
}

pub async fn delete(
    State(state): State<SharedState>,
    _auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    db::delete_personnel(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn held_skills(
    State(state): State<SharedState>,
    _auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Vec<HeldSkillRecord>>, ApiError> {
    Ok(Json(db::list_skills_for_personnel(&state.pool, id).await?))
}
