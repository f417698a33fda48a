// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use rewritrs::config::settings::FetcherSettings;
use rewritrs::domain::services::article_fetcher::ArticleFetcher;
use rewritrs::infrastructure::services::article_fetcher_impl::HttpArticleFetcher;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARTICLE_URL: &str = "https://mp.weixin.qq.com/s/abc";

fn fetcher(server: &MockServer, api_key: Option<&str>) -> HttpArticleFetcher {
    HttpArticleFetcher::new(&FetcherSettings {
        base_url: format!("{}/api/article", server.uri()),
        api_key: api_key.map(str::to_string),
        timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn test_fetches_wrapped_article_with_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/article"))
        .and(query_param("url", ARTICLE_URL))
        .and(header("x-api-key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"title": "T", "html": "<p>orig</p>", "author": "作者"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let article = fetcher(&server, Some("secret")).fetch(ARTICLE_URL).await.unwrap();

    assert_eq!(article.title, "T");
    assert_eq!(article.html, "<p>orig</p>");
    assert_eq!(article.author.as_deref(), Some("作者"));
}

#[tokio::test]
async fn test_accepts_bare_body_with_content_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/article"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"title": "T", "content": "<p>orig</p>"})),
        )
        .mount(&server)
        .await;

    let article = fetcher(&server, None).fetch(ARTICLE_URL).await.unwrap();

    assert_eq!(article.html, "<p>orig</p>");
    assert!(article.author.is_none());
}

#[tokio::test]
async fn test_error_status_and_empty_content_fail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/article"))
        .and(query_param("url", ARTICLE_URL))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream down"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/article"))
        .and(query_param("url", "https://mp.weixin.qq.com/s/empty"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"title": "T", "html": "  "})))
        .mount(&server)
        .await;

    let client = fetcher(&server, None);
    let err = client.fetch(ARTICLE_URL).await.unwrap_err();
    assert!(err.to_string().contains("502"));

    assert!(client.fetch("https://mp.weixin.qq.com/s/empty").await.is_err());
}
