// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 原文缓存实体
///
/// 每个素材最多一条，首次抓取成功时写入，此后不再修改。
/// 存在即权威，命中时不再访问抓取服务
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginalSource {
    pub id: Uuid,
    /// 所属素材ID，唯一
    pub content_id: Uuid,
    pub title: String,
    /// 已清理的原文 HTML
    pub html: String,
    pub author: Option<String>,
    /// 抓取时使用的链接
    pub source_url: String,
    pub created_at: DateTime<Utc>,
}

impl OriginalSource {
    pub fn new(
        content_id: Uuid,
        title: String,
        html: String,
        author: Option<String>,
        source_url: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            content_id,
            title,
            html,
            author,
            source_url,
            created_at: Utc::now(),
        }
    }
}
