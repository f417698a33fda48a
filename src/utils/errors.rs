// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::rewrite_task_repository::RepositoryError;
use thiserror::Error;
use uuid::Uuid;

/// 改写流程错误类型
///
/// 运行过程中的所有错误都会在引擎边界被转换为任务的 failed 状态和一条 error 事件，
/// Display 输出即为写入任务 `error_message` 的可读文本
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RewriteError {
    /// 原文链接不属于受支持的发布平台，不换链接无法重试
    #[error("不支持的原文来源: {0}")]
    UnsupportedSource(String),

    /// 原文抓取失败，可重试
    #[error("原文获取失败: {0}")]
    SourceUnavailable(String),

    /// 模型服务拒绝了初始请求（鉴权、额度、参数错误等）
    #[error("模型服务不可用: {0}")]
    UpstreamUnavailable(String),

    /// 提取器彻底失败，正常情况下不会出现
    #[error("改写结果无法解析: {0}")]
    UnparseableResult(String),

    #[error("存储错误: {0}")]
    Storage(String),

    #[error("任务不存在: {0}")]
    TaskNotFound(Uuid),

    #[error("内容不存在: {0}")]
    ContentNotFound(Uuid),

    #[error("改写结果不存在: {0}")]
    ResultNotFound(Uuid),

    /// 同一任务已有运行中的改写
    #[error("任务正在处理中: {0}")]
    AlreadyProcessing(Uuid),

    #[error("任务状态不允许此操作: {0}")]
    InvalidStateTransition(String),

    #[error("参数错误: {0}")]
    Validation(String),
}

impl RewriteError {
    /// 判断错误是否可以通过重新发起任务恢复
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RewriteError::SourceUnavailable(_)
                | RewriteError::UpstreamUnavailable(_)
                | RewriteError::Storage(_)
                | RewriteError::AlreadyProcessing(_)
        )
    }

    /// 错误类别，用于日志和指标标签
    pub fn category(&self) -> &'static str {
        match self {
            RewriteError::UnsupportedSource(_) => "unsupported_source",
            RewriteError::SourceUnavailable(_) => "source_unavailable",
            RewriteError::UpstreamUnavailable(_) => "upstream_unavailable",
            RewriteError::UnparseableResult(_) => "unparseable_result",
            RewriteError::Storage(_) => "storage",
            RewriteError::TaskNotFound(_)
            | RewriteError::ContentNotFound(_)
            | RewriteError::ResultNotFound(_) => "not_found",
            RewriteError::AlreadyProcessing(_) => "already_processing",
            RewriteError::InvalidStateTransition(_) => "invalid_state",
            RewriteError::Validation(_) => "validation",
        }
    }
}

impl From<RepositoryError> for RewriteError {
    fn from(err: RepositoryError) -> Self {
        RewriteError::Storage(err.to_string())
    }
}
