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

use crate::{
    application::dto::rewrite_request::{
        CreateContentItemDto, CreateRewriteTaskDto, EditRewriteResultDto, RewriteTaskDetailDto,
    },
    config::settings::Settings,
    domain::{
        models::{
            content_item::ContentItem, rewrite_result::RewriteResult, rewrite_task::RewriteTask,
        },
        repositories::{
            content_item_repository::ContentItemRepository,
            rewrite_result_repository::RewriteResultRepository,
            rewrite_task_repository::RewriteTaskRepository,
        },
    },
    utils::errors::RewriteError,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// 创建任务时的默认模型和模板
#[derive(Debug, Clone)]
pub struct RewriteDefaults {
    pub ai_model: String,
    pub prompt_template: String,
}

impl RewriteDefaults {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            ai_model: settings.llm.default_model.clone(),
            prompt_template: settings.rewrite.default_prompt_template.clone(),
        }
    }
}

/// 改写任务用例
///
/// 处理运行之外的任务生命周期：登记素材、创建任务、查询详情、保存用户编辑
pub struct RewriteTaskUseCase {
    contents: Arc<dyn ContentItemRepository>,
    tasks: Arc<dyn RewriteTaskRepository>,
    results: Arc<dyn RewriteResultRepository>,
    defaults: RewriteDefaults,
}

impl RewriteTaskUseCase {
    pub fn new(
        contents: Arc<dyn ContentItemRepository>,
        tasks: Arc<dyn RewriteTaskRepository>,
        results: Arc<dyn RewriteResultRepository>,
        defaults: RewriteDefaults,
    ) -> Self {
        Self {
            contents,
            tasks,
            results,
            defaults,
        }
    }

    pub async fn create_content(
        &self,
        dto: CreateContentItemDto,
    ) -> Result<ContentItem, RewriteError> {
        dto.validate()
            .map_err(|e| RewriteError::Validation(e.to_string()))?;

        let item = ContentItem::new(dto.title, dto.url);
        Ok(self.contents.create(&item).await?)
    }

    /// 创建一个 pending 任务，此时不发起任何上游调用
    pub async fn create_task(&self, dto: CreateRewriteTaskDto) -> Result<RewriteTask, RewriteError> {
        dto.validate()
            .map_err(|e| RewriteError::Validation(e.to_string()))?;

        if self.contents.find_by_id(dto.content_id).await?.is_none() {
            return Err(RewriteError::ContentNotFound(dto.content_id));
        }

        let task = RewriteTask::new(
            dto.content_id,
            dto.ai_model.unwrap_or_else(|| self.defaults.ai_model.clone()),
            dto.prompt_template
                .unwrap_or_else(|| self.defaults.prompt_template.clone()),
        );
        let task = self.tasks.create(&task).await?;
        info!("Created rewrite task {} for content {}", task.id, task.content_id);
        Ok(task)
    }

    pub async fn task_detail(&self, task_id: Uuid) -> Result<RewriteTaskDetailDto, RewriteError> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(RewriteError::TaskNotFound(task_id))?;
        let results = self.results.find_by_task_id(task_id).await?;

        Ok(RewriteTaskDetailDto { task, results })
    }

    pub async fn list_tasks(&self, content_id: Uuid) -> Result<Vec<RewriteTask>, RewriteError> {
        Ok(self.tasks.find_by_content_id(content_id).await?)
    }

    /// 保存用户对某个版本的编辑，模型生成的 content_html 不变
    pub async fn edit_result(
        &self,
        result_id: Uuid,
        dto: EditRewriteResultDto,
    ) -> Result<RewriteResult, RewriteError> {
        dto.validate()
            .map_err(|e| RewriteError::Validation(e.to_string()))?;

        let mut result = self
            .results
            .find_by_id(result_id)
            .await?
            .ok_or(RewriteError::ResultNotFound(result_id))?;

        result.apply_edit(dto.edited_content_html);
        Ok(self.results.save_edit(&result).await?)
    }
}
