// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// 改写任务实体
///
/// 一次把素材原文改写成新文章的执行尝试。任务只由改写引擎修改，
/// 从不删除；同一素材可以有多个相互独立的任务。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteTask {
    /// 任务唯一标识符
    pub id: Uuid,
    /// 关联的素材ID
    pub content_id: Uuid,
    /// 使用的模型名称
    pub ai_model: String,
    /// 提示词模板，包含 `{{title}}` / `{{content}}` 占位符
    pub prompt_template: String,
    /// 任务状态
    pub status: RewriteTaskStatus,
    /// 失败原因，仅在 failed 状态下有值
    pub error_message: Option<String>,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 最近一次开始执行的时间
    pub started_at: Option<DateTime<Utc>>,
    /// 最近一次到达终态的时间
    pub completed_at: Option<DateTime<Utc>>,
    /// 更新时间
    pub updated_at: DateTime<Utc>,
}

/// 任务状态枚举
///
/// 状态转换遵循以下流程：
/// Pending → Processing → Completed/Failed
///
/// Completed 的任务可以重新生成（回到 Processing 并追加新版本），
/// Failed 是终态，重试需要创建新任务
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RewriteTaskStatus {
    /// 已创建，等待执行
    #[default]
    Pending,
    /// 执行中
    Processing,
    /// 已完成
    Completed,
    /// 已失败
    Failed,
}

impl fmt::Display for RewriteTaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RewriteTaskStatus::Pending => write!(f, "pending"),
            RewriteTaskStatus::Processing => write!(f, "processing"),
            RewriteTaskStatus::Completed => write!(f, "completed"),
            RewriteTaskStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for RewriteTaskStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RewriteTaskStatus::Pending),
            "processing" => Ok(RewriteTaskStatus::Processing),
            "completed" => Ok(RewriteTaskStatus::Completed),
            "failed" => Ok(RewriteTaskStatus::Failed),
            _ => Err(()),
        }
    }
}

/// 领域错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// 无效的状态转换
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        from: RewriteTaskStatus,
        to: RewriteTaskStatus,
    },
}

impl RewriteTask {
    /// 创建一个新的 pending 任务
    pub fn new(content_id: Uuid, ai_model: String, prompt_template: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            content_id,
            ai_model,
            prompt_template,
            status: RewriteTaskStatus::Pending,
            error_message: None,
            created_at: now,
            started_at: None,
            completed_at: None,
            updated_at: now,
        }
    }

    /// 开始执行
    ///
    /// Pending、Processing（上次运行异常中断）和 Completed（重新生成）
    /// 都可以进入 Processing；Failed 不可以
    pub fn start(mut self) -> Result<Self, DomainError> {
        match self.status {
            RewriteTaskStatus::Pending
            | RewriteTaskStatus::Processing
            | RewriteTaskStatus::Completed => {
                let now = Utc::now();
                self.status = RewriteTaskStatus::Processing;
                self.error_message = None;
                self.started_at = Some(now);
                self.completed_at = None;
                self.updated_at = now;
                Ok(self)
            }
            from => Err(DomainError::InvalidStateTransition {
                from,
                to: RewriteTaskStatus::Processing,
            }),
        }
    }

    /// 完成任务
    pub fn complete(mut self) -> Result<Self, DomainError> {
        match self.status {
            RewriteTaskStatus::Processing => {
                let now = Utc::now();
                self.status = RewriteTaskStatus::Completed;
                self.completed_at = Some(now);
                self.updated_at = now;
                Ok(self)
            }
            from => Err(DomainError::InvalidStateTransition {
                from,
                to: RewriteTaskStatus::Completed,
            }),
        }
    }

    /// 标记任务失败并记录原因
    pub fn fail(mut self, message: impl Into<String>) -> Result<Self, DomainError> {
        match self.status {
            RewriteTaskStatus::Pending | RewriteTaskStatus::Processing => {
                let now = Utc::now();
                self.status = RewriteTaskStatus::Failed;
                self.error_message = Some(message.into());
                self.completed_at = Some(now);
                self.updated_at = now;
                Ok(self)
            }
            from => Err(DomainError::InvalidStateTransition {
                from,
                to: RewriteTaskStatus::Failed,
            }),
        }
    }

    /// 是否处于终态
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            RewriteTaskStatus::Completed | RewriteTaskStatus::Failed
        )
    }
}
