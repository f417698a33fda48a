// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::counter;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::models::original_source::OriginalSource;
use crate::domain::repositories::original_source_repository::OriginalSourceRepository;
use crate::domain::services::article_fetcher::ArticleFetcher;
use crate::utils::errors::RewriteError;
use crate::utils::html_sanitizer::sanitize_html;
use crate::utils::url_utils::SourceAllowList;

/// 可用于改写的原文
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSource {
    pub title: String,
    pub html: String,
}

impl From<OriginalSource> for ResolvedSource {
    fn from(source: OriginalSource) -> Self {
        Self {
            title: source.title,
            html: source.html,
        }
    }
}

/// 原文解析服务
///
/// 先查缓存，未命中时校验链接白名单、调用抓取服务、清理 HTML 后写入缓存。
/// 每个素材最多缓存一份原文
pub struct SourceService {
    repository: Arc<dyn OriginalSourceRepository>,
    fetcher: Arc<dyn ArticleFetcher>,
    allow_list: SourceAllowList,
}

impl SourceService {
    pub fn new(
        repository: Arc<dyn OriginalSourceRepository>,
        fetcher: Arc<dyn ArticleFetcher>,
        allow_list: SourceAllowList,
    ) -> Self {
        Self {
            repository,
            fetcher,
            allow_list,
        }
    }

    /// 获取素材的原文
    ///
    /// # 参数
    /// * `content_id` - 素材ID
    /// * `url` - 素材的原文链接，可能缺失
    ///
    /// # 错误
    /// * 链接缺失或抓取失败时返回 `SourceUnavailable`
    /// * 链接不在白名单内时返回 `UnsupportedSource`，不发起网络请求
    pub async fn resolve_source(
        &self,
        content_id: Uuid,
        url: Option<&str>,
    ) -> Result<ResolvedSource, RewriteError> {
        if let Some(cached) = self.repository.find_by_content_id(content_id).await? {
            debug!("Original source cache hit for content {}", content_id);
            counter!("rewrite_source_cache_total", "outcome" => "hit").increment(1);
            return Ok(cached.into());
        }
        counter!("rewrite_source_cache_total", "outcome" => "miss").increment(1);

        let url = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| RewriteError::SourceUnavailable("素材缺少原文链接".to_string()))?;

        if !self.allow_list.permits(url) {
            return Err(RewriteError::UnsupportedSource(url.to_string()));
        }

        info!("Fetching original article for content {}: {}", content_id, url);
        let article = self
            .fetcher
            .fetch(url)
            .await
            .map_err(|e| RewriteError::SourceUnavailable(format!("{:#}", e)))?;

        let source = OriginalSource::new(
            content_id,
            article.title,
            sanitize_html(&article.html),
            article.author,
            url.to_string(),
        );

        // a concurrent run may have cached the same content first
        if !self.repository.insert_if_absent(&source).await? {
            warn!(
                "Original source for content {} was cached concurrently, keeping existing row",
                content_id
            );
        }

        Ok(source.into())
    }
}
