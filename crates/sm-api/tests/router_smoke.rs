use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use sm_api::auth::{AuthConfig, AuthMode};
use tower::ServiceExt;

#[tokio::test]
async fn livez_is_healthy_and_unknown_routes_are_404() {
    let app = sm_api::create_router(sm_api::test_state());

    let livez = app
        .clone()
        .oneshot(Request::builder().uri("/livez").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(livez.status(), StatusCode::OK);

    let missing = app
        .oneshot(Request::builder().uri("/api/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn api_key_mode_rejects_missing_key() {
    let state = sm_api::test_state_with_auth(AuthConfig {
        mode: AuthMode::ApiKey,
        api_key: Some("test-key".into()),
        jwt_secret: None,
    });
    let app = sm_api::create_router(state);

    for uri in ["/api/personnel", "/api/skills", "/api/projects/1/match", "/api/match/1"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }

    let wrong_key = app
        .oneshot(
            Request::builder()
                .uri("/api/personnel-skills")
                .header("x-api-key", "other")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(wrong_key.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let app = sm_api::create_router(sm_api::test_state());

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/projects")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
}
