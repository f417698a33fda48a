// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 素材实体
///
/// 用户收藏的一条待改写内容，由采集侧创建，改写引擎只读取它
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// 素材唯一标识符
    pub id: Uuid,
    /// 素材标题
    pub title: String,
    /// 原文链接，可能缺失
    pub url: Option<String>,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl ContentItem {
    pub fn new(title: impl Into<String>, url: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            url,
            created_at: Utc::now(),
        }
    }
}
