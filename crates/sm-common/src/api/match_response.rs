use serde::Serialize;

use crate::matching::MatchResult;

/// JSON shape of one recommendation returned by the match endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    pub personnel_id: i64,
    pub name: String,
    pub matched_skill_count: usize,
    pub total_required_skill_count: usize,
    pub match_score_percent: u8,
    pub matched_skill_names: Vec<String>,
}

impl From<MatchResult> for MatchResponse {
    fn from(value: MatchResult) -> Self {
        Self {
            personnel_id: value.personnel_id,
            name: value.name,
            matched_skill_count: value.matched_skill_count,
            total_required_skill_count: value.total_required_skill_count,
            match_score_percent: value.match_score_percent,
            matched_skill_names: value.matched_skill_names,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_keys() {
        let response = MatchResponse::from(MatchResult {
            personnel_id: 3,
            name: "Finn".into(),
            matched_skill_count: 2,
            total_required_skill_count: 2,
            match_score_percent: 100,
            matched_skill_names: vec!["Rust".into(), "SQL".into()],
        });

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "personnelId": 3,
                "name": "Finn",
                "matchedSkillCount": 2,
                "totalRequiredSkillCount": 2,
                "matchScorePercent": 100,
                "matchedSkillNames": ["Rust", "SQL"],
            })
        );
    }
}
