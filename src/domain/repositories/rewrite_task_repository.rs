// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::rewrite_task::RewriteTask;
use async_trait::async_trait;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use uuid::Uuid;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
    /// 违反唯一约束
    #[error("Record already exists")]
    AlreadyExists,
}

impl RepositoryError {
    /// 把唯一约束冲突从一般数据库错误中区分出来
    pub fn from_insert(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => RepositoryError::AlreadyExists,
            _ => RepositoryError::Database(err),
        }
    }
}

/// 改写任务仓库特质
///
/// 任务只追加不删除
#[async_trait]
pub trait RewriteTaskRepository: Send + Sync {
    /// 创建新任务
    async fn create(&self, task: &RewriteTask) -> Result<RewriteTask, RepositoryError>;
    /// 根据ID查找任务
    async fn find_by_id(&self, id: Uuid) -> Result<Option<RewriteTask>, RepositoryError>;
    /// 更新任务状态及时间戳
    async fn update(&self, task: &RewriteTask) -> Result<RewriteTask, RepositoryError>;
    /// 查找素材的所有任务，按创建时间倒序
    async fn find_by_content_id(
        &self,
        content_id: Uuid,
    ) -> Result<Vec<RewriteTask>, RepositoryError>;
}
