// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::completion_sse;
use futures::StreamExt;
use rewritrs::domain::services::llm_service::LLMService;
use rewritrs::utils::errors::RewriteError;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_streams_deltas_from_chat_completions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({"model": "gpt-4o-mini", "stream": true})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(completion_sse(&["{\"title\":", "\"T2\"}"])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let service = LLMService::new_with_config("test-key".to_string(), server.uri());
    let deltas: Vec<String> = service
        .stream_completion("gpt-4o-mini", "system", "user")
        .await
        .unwrap()
        .map(|d| d.unwrap())
        .collect()
        .await;

    assert_eq!(deltas.concat(), "{\"title\":\"T2\"}");
}

#[tokio::test]
async fn test_sends_system_and_user_messages() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [
                {"role": "system", "content": "系统提示"},
                {"role": "user", "content": "改写这篇文章"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(completion_sse(&["ok"])))
        .expect(1)
        .mount(&server)
        .await;

    let service = LLMService::new_with_config("k".to_string(), format!("{}/", server.uri()));
    let stream = service
        .stream_completion("gpt-4o-mini", "系统提示", "改写这篇文章")
        .await
        .unwrap();
    assert_eq!(stream.count().await, 1);
}

#[tokio::test]
async fn test_rejected_request_is_upstream_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let service = LLMService::new_with_config("bad".to_string(), server.uri());
    let err = match service.stream_completion("gpt-4o-mini", "s", "u").await {
        Err(e) => e,
        Ok(_) => panic!("expected the request to be rejected"),
    };

    match err {
        RewriteError::UpstreamUnavailable(msg) => {
            assert!(msg.contains("401"));
            assert!(msg.contains("invalid api key"));
        }
        other => panic!("unexpected error {:?}", other),
    }
}
