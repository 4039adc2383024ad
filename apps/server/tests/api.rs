use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use goaltracker_ai::{CompletionConfig, FakeCompletionClient};
use goaltracker_server::{api::app_router, build_state_with_client, config::Config};
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

async fn test_app(client: FakeCompletionClient) -> (Router, TempDir) {
    test_app_with_timeouts(client, Duration::from_secs(10), Duration::from_secs(30)).await
}

async fn test_app_with_timeouts(
    client: FakeCompletionClient,
    request_timeout: Duration,
    ai_timeout: Duration,
) -> (Router, TempDir) {
    let tmp = tempdir().unwrap();
    let config = Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: tmp.path().join("test.db").to_string_lossy().to_string(),
        cors_allow: vec!["*".to_string()],
        request_timeout,
        ai: CompletionConfig::default().with_timeout(ai_timeout),
    };
    let state = build_state_with_client(&config, Arc::new(client))
        .await
        .unwrap();
    (app_router(state, &config), tmp)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn create_goal(app: &Router, category: &str, description: &str) -> Value {
    let (status, goal) = send(
        app,
        "POST",
        "/api/v1/goals",
        Some(json!({
            "category": category,
            "description": description,
            "targetDate": "2030-01-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    goal
}

#[tokio::test]
async fn healthz_works() {
    let (app, _tmp) = test_app(FakeCompletionClient::responding("")).await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn goal_lifecycle() {
    let (app, _tmp) = test_app(FakeCompletionClient::responding("")).await;
    let goal = create_goal(&app, "Fitness", "Run a 10K").await;
    let id = goal["id"].as_str().unwrap().to_string();

    let (status, goals) = send(&app, "GET", "/api/v1/goals", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(goals.as_array().unwrap().len(), 1);
    assert_eq!(goals[0]["progress"], json!(0.0));

    let mut changed = goal.clone();
    changed["description"] = json!("Run a half marathon");
    let (status, updated) = send(&app, "PUT", "/api/v1/goals", Some(changed)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["description"], "Run a half marathon");

    let (status, _) = send(&app, "DELETE", &format!("/api/v1/goals/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "GET", &format!("/api/v1/goals/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn invalid_goal_is_rejected() {
    let (app, _tmp) = test_app(FakeCompletionClient::responding("")).await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/goals",
        Some(json!({
            "category": "x".repeat(51),
            "description": "Too long a category",
            "targetDate": "2030-01-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn recording_progress_uses_synthesis() {
    let client = FakeCompletionClient::responding(
        r#"{"percentage": 137, "analysis": "Exceeded expectations"}"#,
    );
    let (app, _tmp) = test_app(client.clone()).await;
    let goal = create_goal(&app, "Fitness", "Run a 10K").await;
    let uri = format!("/api/v1/goals/{}/progress", goal["id"].as_str().unwrap());

    let (status, update) = send(
        &app,
        "POST",
        &uri,
        Some(json!({ "updateText": "Completed a 5K training run this week" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(update["progressValue"], json!(100.0));
    assert_eq!(update["analysis"], "Exceeded expectations");
    assert!(client.prompts()[0].contains("Run a 10K"));

    let (status, history) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 1);

    let (_, goals) = send(&app, "GET", "/api/v1/goals", None).await;
    assert_eq!(goals[0]["progress"], json!(100.0));
}

#[tokio::test]
async fn provider_outage_still_records_progress() {
    let (app, _tmp) = test_app(FakeCompletionClient::failing("503")).await;
    let goal = create_goal(&app, "Fitness", "Run a 10K").await;
    let uri = format!("/api/v1/goals/{}/progress", goal["id"].as_str().unwrap());

    let (status, update) = send(
        &app,
        "POST",
        &uri,
        Some(json!({ "updateText": "Went for a jog" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(update["progressValue"], json!(0.0));
    assert_eq!(update["analysis"], "Unable to analyze progress");
}

#[tokio::test]
async fn slow_provider_does_not_drop_progress_update() {
    // Request and provider timeouts configured equal; the update must still land.
    let timeout = Duration::from_millis(300);
    let client = FakeCompletionClient::hanging().with_timeout(timeout);
    let (app, _tmp) = test_app_with_timeouts(client, timeout, timeout).await;
    let goal = create_goal(&app, "Fitness", "Run a 10K").await;
    let uri = format!("/api/v1/goals/{}/progress", goal["id"].as_str().unwrap());

    let (status, update) = send(
        &app,
        "POST",
        &uri,
        Some(json!({ "updateText": "Ran 8K without stopping" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(update["progressValue"], json!(0.0));
    assert_eq!(update["analysis"], "Unable to analyze progress");

    let (_, history) = send(&app, "GET", &uri, None).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["updateText"], "Ran 8K without stopping");
}

#[tokio::test]
async fn empty_progress_text_is_rejected() {
    let (app, _tmp) = test_app(FakeCompletionClient::responding("")).await;
    let goal = create_goal(&app, "Fitness", "Run a 10K").await;
    let uri = format!("/api/v1/goals/{}/progress", goal["id"].as_str().unwrap());

    let (status, _) = send(&app, "POST", &uri, Some(json!({ "updateText": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn progress_for_unknown_goal_is_not_found() {
    let (app, _tmp) = test_app(FakeCompletionClient::responding("")).await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/goals/missing/progress",
        Some(json!({ "updateText": "Did things" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn suggestions_start_with_starters_then_use_goals() {
    let client = FakeCompletionClient::responding("1. Jog twice a week\n2. Stretch daily");
    let (app, _tmp) = test_app(client.clone()).await;

    let (status, body) = send(&app, "GET", "/api/v1/suggestions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["suggestions"].as_array().unwrap().len(), 3);
    assert_eq!(client.call_count(), 0);

    create_goal(&app, "Fitness", "Run a 10K").await;
    let (_, body) = send(&app, "GET", "/api/v1/suggestions", None).await;
    let suggestions = body["suggestions"].as_array().unwrap();
    assert_eq!(suggestions.len(), 3);
    assert_eq!(suggestions[0], "Jog twice a week");
    assert_eq!(suggestions[1], "Stretch daily");
    assert_eq!(
        suggestions[2],
        "For your Fitness goal: Break down 'Run a 10K' into weekly milestones"
    );
    assert_eq!(client.call_count(), 1);
}
