// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum_test::TestServer;
use migration::{Migrator, MigratorTrait};
use rewritrs::application::use_cases::rewrite_task_use_case::{
    RewriteDefaults, RewriteTaskUseCase,
};
use rewritrs::config::settings::{DatabaseSettings, Settings};
use rewritrs::domain::services::llm_service::LLMService;
use rewritrs::domain::services::rewrite_engine::{RewriteEngine, RewriteEngineConfig};
use rewritrs::domain::services::source_service::SourceService;
use rewritrs::infrastructure::database::connection;
use rewritrs::infrastructure::repositories::content_item_repo_impl::ContentItemRepositoryImpl;
use rewritrs::infrastructure::repositories::original_source_repo_impl::OriginalSourceRepositoryImpl;
use rewritrs::infrastructure::repositories::rewrite_result_repo_impl::RewriteResultRepositoryImpl;
use rewritrs::infrastructure::repositories::rewrite_task_repo_impl::RewriteTaskRepositoryImpl;
use rewritrs::infrastructure::services::article_fetcher_impl::HttpArticleFetcher;
use rewritrs::presentation::routes;
use rewritrs::utils::url_utils::SourceAllowList;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use wiremock::MockServer;

/// 内存 SQLite 数据库，已执行迁移
pub async fn setup_db() -> Arc<DatabaseConnection> {
    let settings = DatabaseSettings {
        url: "sqlite::memory:".to_string(),
        max_connections: Some(1),
        min_connections: Some(1),
        connect_timeout: Some(5),
        idle_timeout: None,
    };
    let db = connection::create_pool(&settings)
        .await
        .expect("failed to open sqlite");
    Migrator::up(&db, None).await.expect("failed to migrate");
    Arc::new(db)
}

#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub db_pool: Arc<DatabaseConnection>,
    /// 同时充当原文抓取服务和模型服务
    pub upstream: MockServer,
}

/// 用内存数据库和 wiremock 上游组装完整应用
pub async fn create_test_app() -> TestApp {
    let upstream = MockServer::start().await;
    let db = setup_db().await;

    let mut settings = Settings::defaults().expect("default settings");
    settings.llm.api_key = Some("test-key".to_string());
    settings.llm.api_base_url = upstream.uri();
    settings.fetcher.base_url = format!("{}/api/article", upstream.uri());
    settings.fetcher.timeout_secs = 5;

    let content_repo = Arc::new(ContentItemRepositoryImpl::new(db.clone()));
    let source_repo = Arc::new(OriginalSourceRepositoryImpl::new(db.clone()));
    let task_repo = Arc::new(RewriteTaskRepositoryImpl::new(db.clone()));
    let result_repo = Arc::new(RewriteResultRepositoryImpl::new(db.clone()));

    let fetcher = Arc::new(HttpArticleFetcher::new(&settings.fetcher).expect("fetcher"));
    let source_service =
        SourceService::new(source_repo, fetcher, SourceAllowList::from(&settings.source));

    let engine = Arc::new(RewriteEngine::new(
        task_repo.clone(),
        result_repo.clone(),
        content_repo.clone(),
        source_service,
        Arc::new(LLMService::new(&settings.llm)),
        RewriteEngineConfig::from_settings(&settings),
    ));
    let use_case = Arc::new(RewriteTaskUseCase::new(
        content_repo,
        task_repo,
        result_repo,
        RewriteDefaults::from_settings(&settings),
    ));

    let server = TestServer::new(routes::routes(engine, use_case)).expect("test server");

    TestApp {
        server,
        db_pool: db,
        upstream,
    }
}

/// 把若干增量编码为对话补全的 SSE 响应体
pub fn completion_sse(deltas: &[&str]) -> String {
    let mut body = String::new();
    for delta in deltas {
        let chunk = serde_json::json!({"choices": [{"index": 0, "delta": {"content": delta}}]});
        body.push_str(&format!("data: {}\n\n", chunk));
    }
    body.push_str("data: [DONE]\n\n");
    body
}
