// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::rewrite_request::{
    CreateContentItemDto, CreateRewriteTaskDto, EditRewriteResultDto, RunRewriteRequestDto,
};
use crate::application::use_cases::rewrite_task_use_case::RewriteTaskUseCase;
use crate::domain::models::rewrite_event::RewriteEvent;
use crate::domain::services::rewrite_engine::RewriteEngine;
use crate::presentation::errors::AppError;
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    Json,
};
use futures::stream::{self, Stream};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;
use uuid::Uuid;

/// 登记一条素材
pub async fn create_content(
    Extension(use_case): Extension<Arc<RewriteTaskUseCase>>,
    Json(payload): Json<CreateContentItemDto>,
) -> Result<impl IntoResponse, AppError> {
    let item = use_case.create_content(payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// 列出素材下的全部改写任务，最新的在前
pub async fn list_content_tasks(
    Extension(use_case): Extension<Arc<RewriteTaskUseCase>>,
    Path(content_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let tasks = use_case.list_tasks(content_id).await?;
    Ok(Json(tasks))
}

/// 创建改写任务
pub async fn create_task(
    Extension(use_case): Extension<Arc<RewriteTaskUseCase>>,
    Json(payload): Json<CreateRewriteTaskDto>,
) -> Result<impl IntoResponse, AppError> {
    let task = use_case.create_task(payload).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// 查询任务详情及其全部版本
pub async fn get_task(
    Extension(use_case): Extension<Arc<RewriteTaskUseCase>>,
    Path(task_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = use_case.task_detail(task_id).await?;
    Ok(Json(detail))
}

/// 启动一次改写运行，以 SSE 推送事件
///
/// 运行在后台任务中执行，客户端断开不会中止运行
pub async fn run_task(
    Extension(engine): Extension<Arc<RewriteEngine>>,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<RunRewriteRequestDto>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, AppError> {
    let request = payload.into_run_request(task_id)?;
    info!("Starting rewrite run for task {}", task_id);

    let events = engine.spawn_run(request);
    Ok(Sse::new(event_stream(events)).keep_alive(KeepAlive::default()))
}

/// 保存用户编辑
pub async fn edit_result(
    Extension(use_case): Extension<Arc<RewriteTaskUseCase>>,
    Path(result_id): Path<Uuid>,
    Json(payload): Json<EditRewriteResultDto>,
) -> Result<impl IntoResponse, AppError> {
    let result = use_case.edit_result(result_id, payload).await?;
    Ok(Json(result))
}

/// 事件接收端转为 SSE 流，`event` 字段为事件类型，`data` 为事件 JSON
fn event_stream(
    events: UnboundedReceiver<RewriteEvent>,
) -> impl Stream<Item = Result<Event, axum::Error>> {
    stream::unfold(events, |mut events| async move {
        let event = events.recv().await?;
        let sse = Event::default().event(event.kind()).json_data(&event);
        Some((sse, events))
    })
}
