// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::SourceSettings;
use url::Url;

/// 原文来源白名单
///
/// 只有指定发布平台的文章路径才允许抓取
#[derive(Debug, Clone)]
pub struct SourceAllowList {
    hosts: Vec<String>,
    path_prefix: String,
}

impl SourceAllowList {
    pub fn new(hosts: Vec<String>, path_prefix: impl Into<String>) -> Self {
        Self {
            hosts: hosts.into_iter().map(|h| h.to_ascii_lowercase()).collect(),
            path_prefix: path_prefix.into(),
        }
    }

    /// 判断链接是否来自受支持的平台
    ///
    /// 要求 http/https 协议、域名完全匹配，且路径以配置的前缀开头
    pub fn permits(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url.trim()) else {
            return false;
        };

        if !matches!(parsed.scheme(), "http" | "https") {
            return false;
        }

        let Some(host) = parsed.host_str() else {
            return false;
        };
        let host = host.to_ascii_lowercase();

        self.hosts.iter().any(|h| *h == host) && parsed.path().starts_with(&self.path_prefix)
    }
}

impl From<&SourceSettings> for SourceAllowList {
    fn from(settings: &SourceSettings) -> Self {
        Self::new(
            settings.allowed_hosts.clone(),
            settings.article_path_prefix.clone(),
        )
    }
}
