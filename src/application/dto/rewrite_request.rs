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
use crate::domain::models::rewrite_task::RewriteTask;
use crate::domain::services::rewrite_engine::RewriteRunRequest;
use crate::utils::errors::RewriteError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// 创建素材请求
#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateContentItemDto {
    #[validate(length(min = 1, max = 500, message = "Title cannot be empty"))]
    pub title: String,
    /// 原文链接
    #[validate(url)]
    pub url: Option<String>,
}

/// 创建改写任务请求
///
/// 未指定的模型和模板取配置中的默认值
#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRewriteTaskDto {
    pub content_id: Uuid,
    #[validate(length(min = 1, max = 100))]
    pub ai_model: Option<String>,
    #[validate(length(min = 1, max = 20000))]
    pub prompt_template: Option<String>,
}

/// 启动一次改写运行的请求
#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RunRewriteRequestDto {
    pub task_id: Uuid,
    pub content_id: Uuid,
    #[validate(length(max = 100))]
    pub ai_model: Option<String>,
    #[validate(length(max = 20000))]
    pub prompt_template: Option<String>,
}

impl RunRewriteRequestDto {
    /// 校验请求并与路径中的任务ID比对
    pub fn into_run_request(self, path_task_id: Uuid) -> Result<RewriteRunRequest, RewriteError> {
        self.validate()
            .map_err(|e| RewriteError::Validation(e.to_string()))?;

        if self.task_id != path_task_id {
            return Err(RewriteError::Validation(format!(
                "taskId {} does not match path {}",
                self.task_id, path_task_id
            )));
        }

        Ok(RewriteRunRequest {
            task_id: self.task_id,
            content_id: self.content_id,
            ai_model: self.ai_model,
            prompt_template: self.prompt_template,
        })
    }
}

/// 用户编辑改写结果的请求
#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EditRewriteResultDto {
    #[validate(length(min = 1, message = "Edited content cannot be empty"))]
    pub edited_content_html: String,
}

/// 任务详情：任务本身及按版本排序的全部结果
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteTaskDetailDto {
    pub task: RewriteTask,
    pub results: Vec<RewriteResult>,
}
