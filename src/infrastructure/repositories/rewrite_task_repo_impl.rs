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

use crate::domain::models::rewrite_task::RewriteTask;
use crate::domain::repositories::rewrite_task_repository::{
    RepositoryError, RewriteTaskRepository,
};
use crate::infrastructure::database::entities::rewrite_task as rewrite_task_entity;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// 改写任务仓库实现
///
/// 基于SeaORM实现的改写任务数据访问层
#[derive(Clone)]
pub struct RewriteTaskRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl RewriteTaskRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl TryFrom<rewrite_task_entity::Model> for RewriteTask {
    type Error = RepositoryError;

    fn try_from(model: rewrite_task_entity::Model) -> Result<Self, Self::Error> {
        let status = model.status.parse().map_err(|_| {
            warn!("Task {} has unknown status `{}`", model.id, model.status);
            RepositoryError::Database(DbErr::Type(format!(
                "unknown task status `{}`",
                model.status
            )))
        })?;

        Ok(Self {
            id: model.id,
            content_id: model.content_id,
            ai_model: model.ai_model,
            prompt_template: model.prompt_template,
            status,
            error_message: model.error_message,
            created_at: model.created_at,
            started_at: model.started_at,
            completed_at: model.completed_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<RewriteTask> for rewrite_task_entity::ActiveModel {
    fn from(task: RewriteTask) -> Self {
        Self {
            id: Set(task.id),
            content_id: Set(task.content_id),
            ai_model: Set(task.ai_model),
            prompt_template: Set(task.prompt_template),
            status: Set(task.status.to_string()),
            error_message: Set(task.error_message),
            created_at: Set(task.created_at),
            started_at: Set(task.started_at),
            completed_at: Set(task.completed_at),
            updated_at: Set(task.updated_at),
        }
    }
}

#[async_trait]
impl RewriteTaskRepository for RewriteTaskRepositoryImpl {
    async fn create(&self, task: &RewriteTask) -> Result<RewriteTask, RepositoryError> {
        let model: rewrite_task_entity::ActiveModel = task.clone().into();

        let inserted = model
            .insert(self.db.as_ref())
            .await
            .map_err(RepositoryError::from_insert)?;
        inserted.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RewriteTask>, RepositoryError> {
        let model = rewrite_task_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        model.map(RewriteTask::try_from).transpose()
    }

    async fn update(&self, task: &RewriteTask) -> Result<RewriteTask, RepositoryError> {
        let model: rewrite_task_entity::ActiveModel = task.clone().into();

        let updated_model = model.update(self.db.as_ref()).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => RepositoryError::NotFound,
            e => RepositoryError::Database(e),
        })?;
        updated_model.try_into()
    }

    async fn find_by_content_id(
        &self,
        content_id: Uuid,
    ) -> Result<Vec<RewriteTask>, RepositoryError> {
        let models = rewrite_task_entity::Entity::find()
            .filter(rewrite_task_entity::Column::ContentId.eq(content_id))
            .order_by_desc(rewrite_task_entity::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        models.into_iter().map(RewriteTask::try_from).collect()
    }
}
