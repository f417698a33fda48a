// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::use_cases::rewrite_task_use_case::RewriteTaskUseCase;
use crate::domain::services::rewrite_engine::RewriteEngine;
use crate::presentation::handlers::rewrite_handler;
use axum::{
    extract::Extension,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// 创建应用路由
///
/// # 参数
///
/// * `engine` - 改写引擎，供运行端点使用
/// * `use_case` - 任务用例，供其余端点使用
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes(engine: Arc<RewriteEngine>, use_case: Arc<RewriteTaskUseCase>) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let rewrite_routes = Router::new()
        .route("/v1/contents", post(rewrite_handler::create_content))
        .route(
            "/v1/contents/{id}/rewrite-tasks",
            get(rewrite_handler::list_content_tasks),
        )
        .route("/v1/rewrite/tasks", post(rewrite_handler::create_task))
        .route("/v1/rewrite/tasks/{id}", get(rewrite_handler::get_task))
        .route("/v1/rewrite/tasks/{id}/run", post(rewrite_handler::run_task))
        .route(
            "/v1/rewrite/results/{id}",
            patch(rewrite_handler::edit_result),
        );

    Router::new()
        .merge(public_routes)
        .merge(rewrite_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(Extension(engine))
                .layer(Extension(use_case)),
        )
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
