use axum::{Json, extract::State, http::StatusCode};

use sm_common::Skill;
use sm_common::api::skill::SkillRequest;
use sm_common::db;

use crate::SharedState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};

pub async fn list(
    State(state): State<SharedState>,
    _auth: AuthUser,
) -> Result<Json<Vec<Skill>>, ApiError> {
    Ok(Json(db::list_skills(&state.pool).await?))
}

pub async fn get(
    State(state): State<SharedState>,
    _auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Skill>, ApiError> {
    Ok(Json(db::get_skill(&state.pool, id).await?))
}

pub async fn create(
    State(state): State<SharedState>,
    _auth: AuthUser,
    ApiJson(request): ApiJson<SkillRequest>,
) -> Result<(StatusCode, Json<Skill>), ApiError> {
    let insert = request.into_insert()?;
    let skill = db::insert_skill(&state.pool, &insert).await?;
    Ok((StatusCode::CREATED, Json(skill)))
}

pub async fn update(
    State(state): State<SharedState>,
    _auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<SkillRequest>,
) -> Result<Json<Skill>, ApiError> {
    let update = request.into_insert()?;
    Ok(Json(db::update_skill(&state.pool, id, &update).await?))
}

pub async fn delete(
    State(state): State<SharedState>,
    _auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    db::delete_skill(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
