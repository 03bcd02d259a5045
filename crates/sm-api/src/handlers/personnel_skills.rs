use axum::{Json, extract::State, http::StatusCode};

use sm_common::api::personnel_skill::{
    AssignSkillRequest, PersonnelSkillRecord, ProficiencyUpdateRequest,
};
use sm_common::db;

use crate::SharedState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};

pub async fn list(
    State(state): State<SharedState>,
    _auth: AuthUser,
) -> Result<Json<Vec<PersonnelSkillRecord>>, ApiError> {
    Ok(Json(db::list_personnel_skills(&state.pool).await?))
}

pub async fn assign(
    State(state): State<SharedState>,
    _auth: AuthUser,
    ApiJson(request): ApiJson<AssignSkillRequest>,
) -> Result<(StatusCode, Json<PersonnelSkillRecord>), ApiError> {
    let insert = request.into_insert()?;
    let record = db::assign_personnel_skill(&state.pool, &insert).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_proficiency(
    State(state): State<SharedState>,
    _auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<ProficiencyUpdateRequest>,
) -> Result<Json<PersonnelSkillRecord>, ApiError> {
    let level = request.into_level()?;
    Ok(Json(
        db::update_personnel_skill_proficiency(&state.pool, id, level).await?,
    ))
}

pub async fn delete(
    State(state): State<SharedState>,
    _auth: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    db::delete_personnel_skill(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
