// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use futures::StreamExt;
use metrics::{counter, histogram};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::config::settings::Settings;
use crate::domain::models::rewrite_event::RewriteEvent;
use crate::domain::models::rewrite_result::RewriteResult;
use crate::domain::models::rewrite_task::RewriteTask;
use crate::domain::repositories::content_item_repository::ContentItemRepository;
use crate::domain::repositories::rewrite_result_repository::RewriteResultRepository;
use crate::domain::repositories::rewrite_task_repository::RewriteTaskRepository;
use crate::domain::services::event_emitter::EventEmitter;
use crate::domain::services::llm_service::ChatStreamClient;
use crate::domain::services::prompt_compiler::compile_prompt;
use crate::domain::services::result_extractor::ResultExtractor;
use crate::domain::services::source_service::SourceService;
use crate::domain::services::task_lock::{TaskLockGuard, TaskLockRegistry};
use crate::utils::errors::RewriteError;
use crate::utils::html_sanitizer::html_to_text;

/// 一次运行请求
#[derive(Debug, Clone, PartialEq)]
pub struct RewriteRunRequest {
    pub task_id: Uuid,
    pub content_id: Uuid,
    /// 非空时覆盖任务上记录的模型
    pub ai_model: Option<String>,
    /// 非空时覆盖任务上记录的提示词模板
    pub prompt_template: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RewriteEngineConfig {
    pub system_prompt: String,
    /// 每接收多少个增量发送一次 progress 事件，0 表示不发送
    pub progress_every: usize,
}

impl RewriteEngineConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            system_prompt: settings.llm.system_prompt.clone(),
            progress_every: settings.rewrite.progress_every,
        }
    }
}

/// 改写任务引擎
///
/// 驱动一次运行：加锁、进入 processing、解析原文、编译提示词、消费模型流、
/// 提取结果、写入新版本并完成任务。运行中的任何错误都在这里被转换为
/// failed 状态和一条 error 事件，不会让任务停留在 processing
pub struct RewriteEngine {
    tasks: Arc<dyn RewriteTaskRepository>,
    results: Arc<dyn RewriteResultRepository>,
    contents: Arc<dyn ContentItemRepository>,
    sources: SourceService,
    llm: Arc<dyn ChatStreamClient>,
    locks: TaskLockRegistry,
    config: RewriteEngineConfig,
}

impl RewriteEngine {
    pub fn new(
        tasks: Arc<dyn RewriteTaskRepository>,
        results: Arc<dyn RewriteResultRepository>,
        contents: Arc<dyn ContentItemRepository>,
        sources: SourceService,
        llm: Arc<dyn ChatStreamClient>,
        config: RewriteEngineConfig,
    ) -> Self {
        Self {
            tasks,
            results,
            contents,
            sources,
            llm,
            locks: TaskLockRegistry::new(),
            config,
        }
    }

    pub fn locks(&self) -> &TaskLockRegistry {
        &self.locks
    }

    /// 在后台执行一次运行，返回事件接收端
    ///
    /// 运行与接收端的生命周期无关：接收端被丢弃后运行仍会走到终态并持久化
    pub fn spawn_run(self: Arc<Self>, request: RewriteRunRequest) -> UnboundedReceiver<RewriteEvent> {
        let (mut emitter, rx) = EventEmitter::channel();
        tokio::spawn(async move {
            let _ = self.run(request, &mut emitter).await;
        });
        rx
    }

    /// 执行一次运行
    ///
    /// 事件顺序为 start、status、若干 progress/content、恰好一个 complete 或 error。
    /// 在进入 processing 之前失败（锁被占用、任务不存在、状态不允许等）不会修改任务
    #[instrument(skip(self, request, events), fields(task_id = %request.task_id, content_id = %request.content_id))]
    pub async fn run(
        &self,
        request: RewriteRunRequest,
        events: &mut EventEmitter,
    ) -> Result<RewriteResult, RewriteError> {
        counter!("rewrite_runs_total").increment(1);
        let started = Instant::now();
        events.emit(RewriteEvent::start("开始改写任务"));

        let outcome = match self.begin(&request).await {
            Ok((guard, task)) => {
                events.emit(RewriteEvent::processing("任务处理中"));
                let outcome = self.execute(task.clone(), events).await;
                if let Err(e) = &outcome {
                    self.record_failure(task, e).await;
                }
                drop(guard);
                outcome
            }
            Err(e) => Err(e),
        };

        histogram!("rewrite_run_duration_seconds").record(started.elapsed().as_secs_f64());
        match &outcome {
            Ok(result) => {
                counter!("rewrite_runs_completed_total").increment(1);
                info!("Rewrite completed with version {}", result.version);
                events.emit(RewriteEvent::complete(result.clone()));
            }
            Err(e) => {
                counter!("rewrite_runs_failed_total", "category" => e.category()).increment(1);
                warn!("Rewrite failed ({}): {}", e.category(), e);
                events.emit(RewriteEvent::error(e.to_string()));
            }
        }
        outcome
    }

    /// 加锁并把任务推进到 processing
    async fn begin(
        &self,
        request: &RewriteRunRequest,
    ) -> Result<(TaskLockGuard, RewriteTask), RewriteError> {
        let guard = self
            .locks
            .try_acquire(request.task_id)
            .ok_or(RewriteError::AlreadyProcessing(request.task_id))?;

        let mut task = self
            .tasks
            .find_by_id(request.task_id)
            .await?
            .ok_or(RewriteError::TaskNotFound(request.task_id))?;

        if task.content_id != request.content_id {
            return Err(RewriteError::Validation(format!(
                "任务 {} 不属于内容 {}",
                task.id, request.content_id
            )));
        }

        if let Some(model) = non_empty(request.ai_model.as_deref()) {
            task.ai_model = model.to_string();
        }
        if let Some(template) = non_empty(request.prompt_template.as_deref()) {
            task.prompt_template = template.to_string();
        }

        let task = task
            .start()
            .map_err(|e| RewriteError::InvalidStateTransition(e.to_string()))?;
        let task = self.tasks.update(&task).await?;
        Ok((guard, task))
    }

    async fn execute(
        &self,
        task: RewriteTask,
        events: &mut EventEmitter,
    ) -> Result<RewriteResult, RewriteError> {
        let content = self
            .contents
            .find_by_id(task.content_id)
            .await?
            .ok_or(RewriteError::ContentNotFound(task.content_id))?;

        events.emit(RewriteEvent::progress("正在获取原文"));
        let source = self
            .sources
            .resolve_source(content.id, content.url.as_deref())
            .await?;

        let prompt = compile_prompt(&task.prompt_template, &source.title, &source.html);
        events.emit(RewriteEvent::progress("正在调用模型生成内容"));
        let mut deltas = self
            .llm
            .stream_completion(&task.ai_model, &self.config.system_prompt, &prompt)
            .await?;

        let extractor = ResultExtractor::new(source.title.clone());
        let mut buffer = String::new();
        let mut received = 0usize;
        let mut last_preview: Option<String> = None;

        while let Some(delta) = deltas.next().await {
            let delta = match delta {
                Ok(delta) => delta,
                Err(e) => {
                    // keep what was accumulated as the final candidate
                    warn!("Model stream ended early after {} deltas: {}", received, e);
                    break;
                }
            };
            buffer.push_str(&delta);
            received += 1;

            if self.config.progress_every > 0 && received % self.config.progress_every == 0 {
                events.emit(RewriteEvent::progress(format!("已接收 {} 个片段", received)));
            }

            if delta.contains('}') {
                if let Some(preview) = extractor.preview(&buffer) {
                    if last_preview.as_deref() != Some(preview.as_str()) {
                        events.emit(RewriteEvent::content(preview.clone()));
                        last_preview = Some(preview);
                    }
                }
            }
        }
        debug!("Model stream finished: {} deltas, {} bytes", received, buffer.len());

        let extraction = extractor.finish(&buffer);
        counter!("rewrite_extraction_strategy_total", "strategy" => extraction.strategy.as_str())
            .increment(1);
        debug!("Result extracted via {} strategy", extraction.strategy.as_str());

        let version = self.results.max_version(task.id).await?.unwrap_or(0) + 1;
        let record = extraction.record;
        let text = html_to_text(&record.content);
        let result = RewriteResult::new(task.id, version, record.title, record.content, text);
        let result = self.results.insert(&result).await?;

        let task = task
            .complete()
            .map_err(|e| RewriteError::InvalidStateTransition(e.to_string()))?;
        self.tasks.update(&task).await?;

        Ok(result)
    }

    /// 尽力把任务写为 failed；写入本身失败只记录日志
    async fn record_failure(&self, task: RewriteTask, err: &RewriteError) {
        match task.fail(err.to_string()) {
            Ok(failed) => {
                if let Err(e) = self.tasks.update(&failed).await {
                    error!("Failed to record failure for task {}: {}", failed.id, e);
                }
            }
            Err(e) => error!("Cannot mark task as failed: {}", e),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
