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

use crate::domain::models::rewrite_result::RewriteResult;
use crate::domain::repositories::rewrite_result_repository::RewriteResultRepository;
use crate::domain::repositories::rewrite_task_repository::RepositoryError;
use crate::infrastructure::database::entities::rewrite_result as rewrite_result_entity;
use async_trait::async_trait;
use sea_orm::*;
use std::sync::Arc;
use uuid::Uuid;

/// 改写结果仓库实现
pub struct RewriteResultRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl RewriteResultRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<rewrite_result_entity::Model> for RewriteResult {
    fn from(m: rewrite_result_entity::Model) -> Self {
        Self {
            id: m.id,
            task_id: m.task_id,
            version: m.version,
            title: m.title,
            content_html: m.content_html,
            content_text: m.content_text,
            is_edited: m.is_edited,
            edited_content_html: m.edited_content_html,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[async_trait]
impl RewriteResultRepository for RewriteResultRepositoryImpl {
    async fn max_version(&self, task_id: Uuid) -> Result<Option<i32>, RepositoryError> {
        let max = rewrite_result_entity::Entity::find()
            .select_only()
            .column_as(rewrite_result_entity::Column::Version.max(), "max_version")
            .filter(rewrite_result_entity::Column::TaskId.eq(task_id))
            .into_tuple::<Option<i32>>()
            .one(self.db.as_ref())
            .await?;

        Ok(max.flatten())
    }

    async fn insert(&self, result: &RewriteResult) -> Result<RewriteResult, RepositoryError> {
        let active_model = rewrite_result_entity::ActiveModel {
            id: Set(result.id),
            task_id: Set(result.task_id),
            version: Set(result.version),
            title: Set(result.title.clone()),
            content_html: Set(result.content_html.clone()),
            content_text: Set(result.content_text.clone()),
            is_edited: Set(result.is_edited),
            edited_content_html: Set(result.edited_content_html.clone()),
            created_at: Set(result.created_at),
            updated_at: Set(result.updated_at),
        };

        // (task_id, version) is unique; a lost version race surfaces as AlreadyExists
        let inserted = active_model
            .insert(self.db.as_ref())
            .await
            .map_err(RepositoryError::from_insert)?;
        Ok(inserted.into())
    }

    async fn find_by_task_id(&self, task_id: Uuid) -> Result<Vec<RewriteResult>, RepositoryError> {
        let models = rewrite_result_entity::Entity::find()
            .filter(rewrite_result_entity::Column::TaskId.eq(task_id))
            .order_by_asc(rewrite_result_entity::Column::Version)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RewriteResult>, RepositoryError> {
        let model = rewrite_result_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn save_edit(&self, result: &RewriteResult) -> Result<RewriteResult, RepositoryError> {
        // content_html is left NotSet so the generated text is never overwritten
        let active_model = rewrite_result_entity::ActiveModel {
            id: Unchanged(result.id),
            is_edited: Set(result.is_edited),
            edited_content_html: Set(result.edited_content_html.clone()),
            updated_at: Set(result.updated_at),
            ..Default::default()
        };

        let updated = active_model
            .update(self.db.as_ref())
            .await
            .map_err(|e| match e {
                DbErr::RecordNotUpdated => RepositoryError::NotFound,
                e => RepositoryError::Database(e),
            })?;
        Ok(updated.into())
    }
}
