// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::original_source::OriginalSource;
use crate::domain::repositories::rewrite_task_repository::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 原文缓存仓库特质
#[async_trait]
pub trait OriginalSourceRepository: Send + Sync {
    /// 根据素材ID查找缓存的原文
    async fn find_by_content_id(
        &self,
        content_id: Uuid,
    ) -> Result<Option<OriginalSource>, RepositoryError>;

    /// 幂等插入
    ///
    /// 返回 `true` 表示本次写入；`false` 表示该素材已有缓存（并发抓取时的正常情况）
    async fn insert_if_absent(&self, source: &OriginalSource) -> Result<bool, RepositoryError>;
}
