// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 改写结果实体
///
/// 任务的一次输出。`version` 在同一任务内从 1 开始严格递增且唯一；
/// `content_html` 写入后不可变，用户编辑写入 `edited_content_html`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteResult {
    pub id: Uuid,
    pub task_id: Uuid,
    /// 版本号
    pub version: i32,
    pub title: String,
    /// 模型生成的 HTML 正文
    pub content_html: String,
    /// 从正文中提取的纯文本
    pub content_text: String,
    /// 是否被用户编辑过
    pub is_edited: bool,
    /// 用户编辑后的 HTML
    pub edited_content_html: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RewriteResult {
    pub fn new(
        task_id: Uuid,
        version: i32,
        title: String,
        content_html: String,
        content_text: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            task_id,
            version,
            title,
            content_html,
            content_text,
            is_edited: false,
            edited_content_html: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 记录一次用户编辑，原始 `content_html` 保持不变
    pub fn apply_edit(&mut self, edited_html: String) {
        self.is_edited = true;
        self.edited_content_html = Some(edited_html);
        self.updated_at = Utc::now();
    }

    /// 当前应展示的正文：编辑过则取编辑稿
    pub fn display_html(&self) -> &str {
        self.edited_content_html
            .as_deref()
            .unwrap_or(&self.content_html)
    }
}
