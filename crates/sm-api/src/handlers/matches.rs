use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::info;

use sm_common::api::match_response::MatchResponse;
use sm_common::db::fetch_match_snapshot;
use sm_common::matching::MatchResult;
use sm_metrics::record_match_request;

use crate::SharedState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::{ApiPath, ApiQuery};
use crate::handlers::pagination::{Page, PageParams};

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct MatchQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub min_score: Option<i64>,
}

/// Validated view over the ranked list. Never affects scores or order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchWindow {
    pub page: Page,
    pub min_score: u8,
}

impl MatchQuery {
    pub fn validate(self) -> Result<MatchWindow, ApiError> {
        let page = PageParams {
            limit: self.limit,
            offset: self.offset,
        }
        .validate()?;

        let min_score = match self.min_score {
            None => 0,
            Some(score @ 0..=100) => score as u8,
            Some(_) => {
                return Err(ApiError::BadRequest(
                    "min_score must be between 0 and 100".into(),
                ));
            }
        };

        Ok(MatchWindow { page, min_score })
    }
}

impl MatchWindow {
    pub fn apply(&self, ranked: Vec<MatchResult>) -> Vec<MatchResponse> {
        self.page
            .slice(
                ranked
                    .into_iter()
                    .filter(|result| result.match_score_percent >= self.min_score),
            )
            .map(MatchResponse::from)
            .collect()
    }
}

/// `GET /api/projects/{id}/match` and `GET /api/match/{project_id}`.
///
/// 404 when the project does not exist; `[]` when it has no requirements or
/// nobody matches.
pub async fn project_matches(
    State(state): State<SharedState>,
    _auth: AuthUser,
    ApiPath(project_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<MatchQuery>,
) -> Result<Json<Vec<MatchResponse>>, ApiError> {
    let window = query.validate()?;

    let snapshot = match fetch_match_snapshot(&state.pool, project_id).await {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => {
            record_match_request("not_found", None);
            return Err(ApiError::NotFound(format!("project not found: {project_id}")));
        }
        Err(err) => {
            record_match_request("error", None);
            return Err(err.into());
        }
    };

    let ranked = match snapshot.rank() {
        Ok(ranked) => ranked,
        Err(err) => {
            record_match_request("integrity_error", None);
            return Err(err.into());
        }
    };

    record_match_request("ok", Some(ranked.len()));
    info!(
        project_id,
        requirements = snapshot.requirements.len(),
        roster = snapshot.roster.len(),
        ranked = ranked.len(),
        "ranked personnel for project"
    );

    Ok(Json(window.apply(ranked)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: i64, score: u8) -> MatchResult {
        MatchResult {
            personnel_id: id,
            name: format!("person-{id}"),
            matched_skill_count: 1,
            total_required_skill_count: 1,
            match_score_percent: score,
            matched_skill_names: vec!["Rust".into()],
        }
    }

    #[test]
    fn query_defaults_and_bounds() {
        let window = MatchQuery::default().validate().unwrap();
        assert_eq!(window.page, Page { limit: None, offset: 0 });
        assert_eq!(window.min_score, 0);

        let bad = MatchQuery {
            min_score: Some(101),
            ..Default::default()
        };
        assert!(bad.validate().is_err());

        let bad = MatchQuery {
            limit: Some(0),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn window_filters_then_pages_without_reordering() {
        let ranked = vec![result(1, 100), result(2, 67), result(3, 50), result(4, 33)];
        let window = MatchQuery {
            limit: Some(2),
            offset: Some(1),
            min_score: Some(40),
        }
        .validate()
        .unwrap();

        let ids: Vec<i64> = window.apply(ranked).iter().map(|r| r.personnel_id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn default_window_returns_every_ranked_person() {
        let ranked: Vec<MatchResult> = (1..=60).map(|id| result(id, 100)).collect();
        let window = MatchQuery::default().validate().unwrap();
        assert_eq!(window.apply(ranked).len(), 60);
    }

    #[test]
    fn offset_past_end_yields_empty_list() {
        let window = MatchQuery {
            offset: Some(10),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert!(window.apply(vec![result(1, 100)]).is_empty());
    }
}
