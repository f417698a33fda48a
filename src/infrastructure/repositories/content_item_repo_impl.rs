// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::content_item::ContentItem;
use crate::domain::repositories::content_item_repository::ContentItemRepository;
use crate::domain::repositories::rewrite_task_repository::RepositoryError;
use crate::infrastructure::database::entities::content_item as content_item_entity;
use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use std::sync::Arc;
use uuid::Uuid;

/// 素材仓库实现
#[derive(Clone)]
pub struct ContentItemRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl ContentItemRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<content_item_entity::Model> for ContentItem {
    fn from(m: content_item_entity::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            url: m.url,
            created_at: m.created_at,
        }
    }
}

#[async_trait]
impl ContentItemRepository for ContentItemRepositoryImpl {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ContentItem>, RepositoryError> {
        let model = content_item_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn create(&self, item: &ContentItem) -> Result<ContentItem, RepositoryError> {
        let model = content_item_entity::ActiveModel {
            id: Set(item.id),
            title: Set(item.title.clone()),
            url: Set(item.url.clone()),
            created_at: Set(item.created_at),
        };

        let inserted = model
            .insert(self.db.as_ref())
            .await
            .map_err(RepositoryError::from_insert)?;
        Ok(inserted.into())
    }
}
