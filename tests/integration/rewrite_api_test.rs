// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{completion_sse, create_test_app, TestApp};
use axum::http::StatusCode;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

const ARTICLE_URL: &str = "https://mp.weixin.qq.com/s/abc";

/// 把 SSE 响应体拆成 `data` 行的 JSON
fn parse_events(body: &str) -> Vec<Value> {
    body.lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|data| serde_json::from_str(data.trim()).unwrap())
        .collect()
}

async fn mount_article(app: &TestApp, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/api/article"))
        .and(query_param("url", ARTICLE_URL))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"title": "T", "html": "<p>orig</p><script>alert(1)</script>"}
        })))
        .expect(expected_calls)
        .mount(&app.upstream)
        .await;
}

async fn mount_completion(app: &TestApp, deltas: &[&str]) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(completion_sse(deltas)),
        )
        .mount(&app.upstream)
        .await;
}

async fn create_content(app: &TestApp, url: Option<&str>) -> String {
    let response = app
        .server
        .post("/v1/contents")
        .json(&json!({"title": "T", "url": url}))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["id"].as_str().unwrap().to_string()
}

async fn create_task(app: &TestApp, content_id: &str) -> String {
    let response = app
        .server
        .post("/v1/rewrite/tasks")
        .json(&json!({"contentId": content_id}))
        .await;
    response.assert_status(StatusCode::CREATED);
    let task = response.json::<Value>();
    assert_eq!(task["status"], "pending");
    task["id"].as_str().unwrap().to_string()
}

async fn run(app: &TestApp, task_id: &str, content_id: &str) -> Vec<Value> {
    let response = app
        .server
        .post(&format!("/v1/rewrite/tasks/{}/run", task_id))
        .json(&json!({"taskId": task_id, "contentId": content_id}))
        .await;
    response.assert_status_ok();
    parse_events(&response.text())
}

#[tokio::test]
async fn test_health_and_version() {
    let app = create_test_app().await;

    let response = app.server.get("/health").await;
    response.assert_status_ok();
    response.assert_text("OK");

    app.server
        .get("/v1/version")
        .await
        .assert_text(env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_full_rewrite_flow_over_sse() {
    let app = create_test_app().await;
    mount_article(&app, 1).await;
    mount_completion(
        &app,
        &["{\"title\":", "\"T2\",", "\"content\":", "\"<p>new</p>\"}"],
    )
    .await;

    let content_id = create_content(&app, Some(ARTICLE_URL)).await;
    let task_id = create_task(&app, &content_id).await;

    let events = run(&app, &task_id, &content_id).await;
    let kinds: Vec<&str> = events.iter().map(|e| e["type"].as_str().unwrap()).collect();
    assert_eq!(kinds.first(), Some(&"start"));
    assert!(kinds.contains(&"status"));
    assert_eq!(kinds.last(), Some(&"complete"));

    let complete = events.last().unwrap();
    assert_eq!(complete["status"], "completed");
    assert_eq!(complete["result"]["title"], "T2");
    assert_eq!(complete["result"]["contentHtml"], "<p>new</p>");
    assert_eq!(complete["result"]["version"], 1);

    let detail = app
        .server
        .get(&format!("/v1/rewrite/tasks/{}", task_id))
        .await
        .json::<Value>();
    assert_eq!(detail["task"]["status"], "completed");
    assert_eq!(detail["results"].as_array().unwrap().len(), 1);

    // the sanitized source reached the model
    let requests = app.upstream.received_requests().await.unwrap();
    let completion = requests
        .iter()
        .find(|r| r.url.path() == "/chat/completions")
        .unwrap();
    let body: Value = serde_json::from_slice(&completion.body).unwrap();
    let prompt = body["messages"][1]["content"].as_str().unwrap();
    assert!(prompt.contains("<p>orig</p>"));
    assert!(!prompt.contains("alert(1)"));
}

#[tokio::test]
async fn test_regenerate_reuses_cached_source() {
    let app = create_test_app().await;
    mount_article(&app, 1).await;
    mount_completion(&app, &["{\"title\":\"T2\",\"content\":\"<p>new</p>\"}"]).await;

    let content_id = create_content(&app, Some(ARTICLE_URL)).await;
    let task_id = create_task(&app, &content_id).await;

    run(&app, &task_id, &content_id).await;
    let events = run(&app, &task_id, &content_id).await;
    assert_eq!(events.last().unwrap()["result"]["version"], 2);

    let tasks = app
        .server
        .get(&format!("/v1/contents/{}/rewrite-tasks", content_id))
        .await
        .json::<Value>();
    assert_eq!(tasks.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_edit_result_keeps_generated_html() {
    let app = create_test_app().await;
    mount_article(&app, 1).await;
    mount_completion(&app, &["{\"title\":\"T2\",\"content\":\"<p>new</p>\"}"]).await;

    let content_id = create_content(&app, Some(ARTICLE_URL)).await;
    let task_id = create_task(&app, &content_id).await;
    let events = run(&app, &task_id, &content_id).await;
    let result_id = events.last().unwrap()["result"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .server
        .patch(&format!("/v1/rewrite/results/{}", result_id))
        .json(&json!({"editedContentHtml": "<p>mine</p>"}))
        .await;
    response.assert_status_ok();
    let edited = response.json::<Value>();
    assert_eq!(edited["isEdited"], true);
    assert_eq!(edited["editedContentHtml"], "<p>mine</p>");
    assert_eq!(edited["contentHtml"], "<p>new</p>");

    app.server
        .patch(&format!("/v1/rewrite/results/{}", uuid::Uuid::new_v4()))
        .json(&json!({"editedContentHtml": "<p>mine</p>"}))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unsupported_source_fails_task() {
    let app = create_test_app().await;
    mount_article(&app, 0).await;

    let content_id = create_content(&app, Some("https://example.com/post/1")).await;
    let task_id = create_task(&app, &content_id).await;

    let events = run(&app, &task_id, &content_id).await;
    let last = events.last().unwrap();
    assert_eq!(last["type"], "error");
    assert!(last["error"].as_str().unwrap().contains("example.com"));

    let detail = app
        .server
        .get(&format!("/v1/rewrite/tasks/{}", task_id))
        .await
        .json::<Value>();
    assert_eq!(detail["task"]["status"], "failed");
    assert!(detail["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_rejected_completion_reports_error_event() {
    let app = create_test_app().await;
    mount_article(&app, 1).await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&app.upstream)
        .await;

    let content_id = create_content(&app, Some(ARTICLE_URL)).await;
    let task_id = create_task(&app, &content_id).await;

    let events = run(&app, &task_id, &content_id).await;
    let last = events.last().unwrap();
    assert_eq!(last["type"], "error");
    assert_eq!(last["status"], "failed");
    assert!(last["error"].as_str().unwrap().contains("401"));
}

#[tokio::test]
async fn test_request_errors_map_to_status_codes() {
    let app = create_test_app().await;

    app.server
        .get(&format!("/v1/rewrite/tasks/{}", uuid::Uuid::new_v4()))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    app.server
        .post("/v1/rewrite/tasks")
        .json(&json!({"contentId": uuid::Uuid::new_v4()}))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    app.server
        .post("/v1/contents")
        .json(&json!({"title": ""}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let content_id = create_content(&app, Some(ARTICLE_URL)).await;
    let task_id = create_task(&app, &content_id).await;
    app.server
        .post(&format!("/v1/rewrite/tasks/{}/run", uuid::Uuid::new_v4()))
        .json(&json!({"taskId": task_id, "contentId": content_id}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}
