// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// 抓取服务返回的原文
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchedArticle {
    pub title: String,
    #[serde(alias = "content")]
    pub html: String,
    #[serde(default)]
    pub author: Option<String>,
}

/// 原文抓取服务特质
///
/// 只在原文缓存未命中时调用
#[async_trait]
pub trait ArticleFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedArticle>;
}
