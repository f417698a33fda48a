// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::rewrite_result::RewriteResult;
use crate::domain::models::rewrite_task::RewriteTaskStatus;
use serde::Serialize;

/// 推送给订阅方的改写进度事件
///
/// 序列化后为 `{"type": "...", ...}`，每种类型只携带自己的字段。
/// 一次运行中依次为 start、若干 status/progress/content、恰好一个 complete 或 error
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RewriteEvent {
    Start {
        message: String,
    },
    Status {
        status: RewriteTaskStatus,
        message: String,
    },
    Progress {
        message: String,
    },
    Content {
        content: String,
    },
    Complete {
        status: RewriteTaskStatus,
        result: RewriteResult,
    },
    Error {
        status: RewriteTaskStatus,
        error: String,
    },
}

impl RewriteEvent {
    pub fn start(message: impl Into<String>) -> Self {
        RewriteEvent::Start {
            message: message.into(),
        }
    }

    pub fn processing(message: impl Into<String>) -> Self {
        RewriteEvent::Status {
            status: RewriteTaskStatus::Processing,
            message: message.into(),
        }
    }

    pub fn progress(message: impl Into<String>) -> Self {
        RewriteEvent::Progress {
            message: message.into(),
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        RewriteEvent::Content {
            content: content.into(),
        }
    }

    pub fn complete(result: RewriteResult) -> Self {
        RewriteEvent::Complete {
            status: RewriteTaskStatus::Completed,
            result,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        RewriteEvent::Error {
            status: RewriteTaskStatus::Failed,
            error: error.into(),
        }
    }

    /// 事件类型名，与序列化后的 `type` 字段一致
    pub fn kind(&self) -> &'static str {
        match self {
            RewriteEvent::Start { .. } => "start",
            RewriteEvent::Status { .. } => "status",
            RewriteEvent::Progress { .. } => "progress",
            RewriteEvent::Content { .. } => "content",
            RewriteEvent::Complete { .. } => "complete",
            RewriteEvent::Error { .. } => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RewriteEvent::Complete { .. } | RewriteEvent::Error { .. }
        )
    }
}
