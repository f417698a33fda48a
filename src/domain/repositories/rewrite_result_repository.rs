// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::rewrite_result::RewriteResult;
use crate::domain::repositories::rewrite_task_repository::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 改写结果仓库特质
#[async_trait]
pub trait RewriteResultRepository: Send + Sync {
    /// 当前任务的最大版本号，没有结果时为 None
    async fn max_version(&self, task_id: Uuid) -> Result<Option<i32>, RepositoryError>;
    /// 插入新版本
    async fn insert(&self, result: &RewriteResult) -> Result<RewriteResult, RepositoryError>;
    /// 查找任务的所有结果，按版本升序
    async fn find_by_task_id(&self, task_id: Uuid) -> Result<Vec<RewriteResult>, RepositoryError>;
    /// 根据ID查找结果
    async fn find_by_id(&self, id: Uuid) -> Result<Option<RewriteResult>, RepositoryError>;
    /// 保存用户编辑，只写编辑相关字段，不触碰 content_html
    async fn save_edit(&self, result: &RewriteResult) -> Result<RewriteResult, RepositoryError>;
}
