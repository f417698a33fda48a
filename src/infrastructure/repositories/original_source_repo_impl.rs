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

use crate::domain::models::original_source::OriginalSource;
use crate::domain::repositories::original_source_repository::OriginalSourceRepository;
use crate::domain::repositories::rewrite_task_repository::RepositoryError;
use crate::infrastructure::database::entities::original_source as original_source_entity;
use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use std::sync::Arc;
use uuid::Uuid;

/// 原文缓存仓库实现
pub struct OriginalSourceRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl OriginalSourceRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<original_source_entity::Model> for OriginalSource {
    fn from(m: original_source_entity::Model) -> Self {
        Self {
            id: m.id,
            content_id: m.content_id,
            title: m.title,
            html: m.html,
            author: m.author,
            source_url: m.source_url,
            created_at: m.created_at,
        }
    }
}

#[async_trait]
impl OriginalSourceRepository for OriginalSourceRepositoryImpl {
    async fn find_by_content_id(
        &self,
        content_id: Uuid,
    ) -> Result<Option<OriginalSource>, RepositoryError> {
        let model = original_source_entity::Entity::find()
            .filter(original_source_entity::Column::ContentId.eq(content_id))
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn insert_if_absent(&self, source: &OriginalSource) -> Result<bool, RepositoryError> {
        let active_model = original_source_entity::ActiveModel {
            id: Set(source.id),
            content_id: Set(source.content_id),
            title: Set(source.title.clone()),
            html: Set(source.html.clone()),
            author: Set(source.author.clone()),
            source_url: Set(source.source_url.clone()),
            created_at: Set(source.created_at),
        };

        let outcome = original_source_entity::Entity::insert(active_model)
            .on_conflict(
                OnConflict::column(original_source_entity::Column::ContentId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await;

        match outcome {
            Ok(rows) => Ok(rows > 0),
            Err(DbErr::RecordNotInserted) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
