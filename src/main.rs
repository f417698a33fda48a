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

use rewritrs::application::use_cases::rewrite_task_use_case::{
    RewriteDefaults, RewriteTaskUseCase,
};
use rewritrs::config::settings::Settings;
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
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use migration::{Migrator, MigratorTrait};
use rewritrs::utils::telemetry;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting rewritrs...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");
    if settings.llm.api_key.is_none() {
        warn!("llm.api_key is not configured, every rewrite run will fail upstream");
    }

    rewritrs::infrastructure::metrics::init_metrics(&settings.metrics);

    // 3. Connect to database
    let db = connection::create_pool(&settings.database).await?;
    let db = Arc::new(db);
    info!("Database connection established");

    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Initialize components
    let content_repo = Arc::new(ContentItemRepositoryImpl::new(db.clone()));
    let source_repo = Arc::new(OriginalSourceRepositoryImpl::new(db.clone()));
    let task_repo = Arc::new(RewriteTaskRepositoryImpl::new(db.clone()));
    let result_repo = Arc::new(RewriteResultRepositoryImpl::new(db.clone()));

    let fetcher = Arc::new(HttpArticleFetcher::new(&settings.fetcher)?);
    let source_service = SourceService::new(
        source_repo,
        fetcher,
        SourceAllowList::from(&settings.source),
    );
    let llm = Arc::new(LLMService::new(&settings.llm));

    let engine = Arc::new(RewriteEngine::new(
        task_repo.clone(),
        result_repo.clone(),
        content_repo.clone(),
        source_service,
        llm,
        RewriteEngineConfig::from_settings(&settings),
    ));
    let use_case = Arc::new(RewriteTaskUseCase::new(
        content_repo,
        task_repo,
        result_repo,
        RewriteDefaults::from_settings(&settings),
    ));

    // 5. Start HTTP server
    let app = routes::routes(engine, use_case);
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
