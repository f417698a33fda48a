// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::content_item::ContentItem;
use crate::domain::repositories::rewrite_task_repository::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 素材仓库特质
#[async_trait]
pub trait ContentItemRepository: Send + Sync {
    /// 根据ID查找素材
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ContentItem>, RepositoryError>;
    /// 创建素材
    async fn create(&self, item: &ContentItem) -> Result<ContentItem, RepositoryError>;
}
