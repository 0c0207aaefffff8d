use crate::e2e::helpers;

use helpers::{TestContext, TestSetup};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use staffchat_backend::domain::chat::LlmError;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_ok_for_health_check(ctx: &TestContext) {
    let response = ctx.client.get("/health").await.unwrap();

    response.assert_status(StatusCode::OK);

    // Liveness endpoint returns plain text
    let body = String::from_utf8(response.body_bytes.clone()).unwrap();
    assert_eq!(body, "OK");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_healthy_dependencies(ctx: &TestContext) {
    let response = ctx.client.get("/api/health").await.unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.body.as_ref().unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["openai"], "connected");
    assert_eq!(body["services"]["search"], "connected");
    assert_eq!(body["services"]["speech"], "configured");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);
    assert!(body.get("timestamp").is_some());
}

#[tokio::test]
async fn it_should_answer_503_when_search_is_down() {
    let ctx = TestContext::start(TestSetup::search_failing()).await;

    let response = ctx.client.get("/api/health").await.unwrap();

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["services"]["openai"], "connected");
    assert_eq!(body["services"]["search"], "error");
}

#[tokio::test]
async fn it_should_answer_503_when_the_model_is_down() {
    let ctx = TestContext::start(TestSetup::llm_failing(LlmError::Unavailable(
        "connection refused".to_string(),
    )))
    .await;

    let response = ctx.client.get("/api/health").await.unwrap();

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body.as_ref().unwrap()["services"]["openai"], "error");
}

#[tokio::test]
async fn it_should_stay_healthy_without_speech() {
    let ctx = TestContext::start(TestSetup::without_speech()).await;

    let response = ctx.client.get("/api/health").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.body.as_ref().unwrap()["services"]["speech"],
        "not_configured"
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_issue_session_cookies_on_health_checks(ctx: &TestContext) {
    let response = ctx.client.get("/health").await.unwrap();
    assert!(response.header("set-cookie").is_none());
}
