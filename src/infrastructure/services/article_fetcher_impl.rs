// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::FetcherSettings;
use crate::domain::services::article_fetcher::{ArticleFetcher, FetchedArticle};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// 抓取服务的响应，可能直接是文章，也可能包在 `data` 字段里
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FetchResponse {
    Wrapped { data: FetchedArticle },
    Bare(FetchedArticle),
}

impl FetchResponse {
    fn into_article(self) -> FetchedArticle {
        match self {
            FetchResponse::Wrapped { data } => data,
            FetchResponse::Bare(article) => article,
        }
    }
}

/// 基于 HTTP 的原文抓取服务客户端
///
/// 请求 `GET {base_url}?url=<文章链接>`，配置了密钥时附带 `X-Api-Key` 头
pub struct HttpArticleFetcher {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpArticleFetcher {
    pub fn new(settings: &FetcherSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build article fetcher client")?;

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
        })
    }
}

#[async_trait]
impl ArticleFetcher for HttpArticleFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedArticle> {
        let mut request = self.client.get(&self.base_url).query(&[("url", url)]);
        if let Some(key) = &self.api_key {
            request = request.header("X-Api-Key", key);
        }

        let response = request
            .send()
            .await
            .context("Failed to reach article fetcher")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("article fetcher returned {}: {}", status, body));
        }

        let article = response
            .json::<FetchResponse>()
            .await
            .context("Invalid article fetcher response")?
            .into_article();

        if article.html.trim().is_empty() {
            return Err(anyhow!("article fetcher returned empty content"));
        }

        debug!(
            "Fetched article \"{}\" ({} bytes)",
            article.title,
            article.html.len()
        );
        Ok(article)
    }
}
