//! Requests rejected at the HTTP boundary never reach the database, so these
//! run against a pool that cannot connect.

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let app = sm_api::create_router(sm_api::test_state());
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn personnel_create_rejects_bad_email() {
    let (status, json) = send(json_request(
        "POST",
        "/api/personnel",
        json!({ "name": "Alice", "email": "not-an-email" }),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "bad_request");
    assert_eq!(json["message"], "invalid email format");
    assert!(json.get("request_id").is_some());
}

#[tokio::test]
async fn personnel_update_requires_a_field() {
    let (status, json) = send(json_request("PUT", "/api/personnel/1", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["message"].as_str().unwrap().contains("at least one field"));
}

#[tokio::test]
async fn skill_create_requires_category() {
    let (status, json) = send(json_request(
        "POST",
        "/api/skills",
        json!({ "name": "Rust" }),
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "category is required");
}

#[tokio::test]
async fn assignment_rejects_unknown_proficiency() {
    let (status, json) = send(json_request(
        "POST",
        "/api/personnel-skills",
        json!({ "personnelId": 1, "skillId": 2, "proficiency": "Guru" }),
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["message"].as_str().unwrap().contains("proficiency"));
}

#[tokio::test]
async fn project_rejects_duplicate_requirements() {
    let (status, _) = send(json_request(
        "POST",
        "/api/projects",
        json!({
            "name": "Portal",
            "skills": [
                { "skill_id": 1, "min_level": "Advanced" },
                { "skill_id": 1 }
            ]
        }),
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_json_is_a_json_error() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/skills")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let (status, json) = send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "bad_request");
}

#[tokio::test]
async fn non_numeric_ids_are_rejected() {
    for uri in ["/api/personnel/abc", "/api/projects/abc/match", "/api/match/abc"] {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, json) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(json["code"], "bad_request", "{uri}");
    }
}

#[tokio::test]
async fn match_query_bounds_are_enforced() {
    for query in ["limit=0", "limit=201", "offset=-1", "min_score=101", "limit=abc"] {
        let uri = format!("/api/projects/1/match?{query}");
        let request = Request::builder().uri(&uri).body(Body::empty()).unwrap();
        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    }
}
