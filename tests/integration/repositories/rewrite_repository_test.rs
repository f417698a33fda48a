// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::super::helpers::setup_db;
use rewritrs::domain::models::content_item::ContentItem;
use rewritrs::domain::models::original_source::OriginalSource;
use rewritrs::domain::models::rewrite_result::RewriteResult;
use rewritrs::domain::models::rewrite_task::{RewriteTask, RewriteTaskStatus};
use rewritrs::domain::repositories::content_item_repository::ContentItemRepository;
use rewritrs::domain::repositories::original_source_repository::OriginalSourceRepository;
use rewritrs::domain::repositories::rewrite_result_repository::RewriteResultRepository;
use rewritrs::domain::repositories::rewrite_task_repository::{
    RepositoryError, RewriteTaskRepository,
};
use rewritrs::infrastructure::database::entities::rewrite_task as rewrite_task_entity;
use rewritrs::infrastructure::repositories::content_item_repo_impl::ContentItemRepositoryImpl;
use rewritrs::infrastructure::repositories::original_source_repo_impl::OriginalSourceRepositoryImpl;
use rewritrs::infrastructure::repositories::rewrite_result_repo_impl::RewriteResultRepositoryImpl;
use rewritrs::infrastructure::repositories::rewrite_task_repo_impl::RewriteTaskRepositoryImpl;
use sea_orm::{ActiveModelTrait, Set, Unchanged};
use uuid::Uuid;

#[tokio::test]
async fn test_content_item_round_trip() {
    let db = setup_db().await;
    let repo = ContentItemRepositoryImpl::new(db);

    let item = ContentItem::new("T", Some("https://mp.weixin.qq.com/s/abc".to_string()));
    repo.create(&item).await.unwrap();

    let found = repo.find_by_id(item.id).await.unwrap().unwrap();
    assert_eq!(found.title, "T");
    assert_eq!(found.url, item.url);
    assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_source_insert_is_idempotent_per_content() {
    let db = setup_db().await;
    let repo = OriginalSourceRepositoryImpl::new(db);
    let content_id = Uuid::new_v4();

    let first = OriginalSource::new(
        content_id,
        "T".to_string(),
        "<p>first</p>".to_string(),
        Some("作者".to_string()),
        "https://mp.weixin.qq.com/s/abc".to_string(),
    );
    let second = OriginalSource::new(
        content_id,
        "T".to_string(),
        "<p>second</p>".to_string(),
        None,
        "https://mp.weixin.qq.com/s/abc".to_string(),
    );

    assert!(repo.insert_if_absent(&first).await.unwrap());
    assert!(!repo.insert_if_absent(&second).await.unwrap());

    let cached = repo.find_by_content_id(content_id).await.unwrap().unwrap();
    assert_eq!(cached.html, "<p>first</p>");
    assert_eq!(cached.author.as_deref(), Some("作者"));
}

#[tokio::test]
async fn test_task_update_persists_state_machine_fields() {
    let db = setup_db().await;
    let repo = RewriteTaskRepositoryImpl::new(db);
    let task = RewriteTask::new(
        Uuid::new_v4(),
        "gpt-4o-mini".to_string(),
        "{{title}}".to_string(),
    );
    repo.create(&task).await.unwrap();

    let failed = task.start().unwrap().fail("模型服务不可用: 401").unwrap();
    repo.update(&failed).await.unwrap();

    let found = repo.find_by_id(failed.id).await.unwrap().unwrap();
    assert_eq!(found.status, RewriteTaskStatus::Failed);
    assert_eq!(found.error_message.as_deref(), Some("模型服务不可用: 401"));
    assert!(found.started_at.is_some());
    assert!(found.completed_at.is_some());
}

#[tokio::test]
async fn test_update_of_missing_task_is_not_found() {
    let db = setup_db().await;
    let repo = RewriteTaskRepositoryImpl::new(db);
    let task = RewriteTask::new(Uuid::new_v4(), "m".to_string(), "t".to_string());

    let err = repo.update(&task).await.unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound));
}

#[tokio::test]
async fn test_unknown_stored_status_is_an_error() {
    let db = setup_db().await;
    let repo = RewriteTaskRepositoryImpl::new(db.clone());
    let task = RewriteTask::new(Uuid::new_v4(), "m".to_string(), "t".to_string());
    repo.create(&task).await.unwrap();

    rewrite_task_entity::ActiveModel {
        id: Unchanged(task.id),
        status: Set("archived".to_string()),
        ..Default::default()
    }
    .update(db.as_ref())
    .await
    .unwrap();

    let err = repo.find_by_id(task.id).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Database(_)));
    assert!(err.to_string().contains("archived"));
    assert!(repo.find_by_content_id(task.content_id).await.is_err());
}

#[tokio::test]
async fn test_tasks_listed_by_content() {
    let db = setup_db().await;
    let repo = RewriteTaskRepositoryImpl::new(db);
    let content_id = Uuid::new_v4();

    for _ in 0..2 {
        let task = RewriteTask::new(content_id, "m".to_string(), "t".to_string());
        repo.create(&task).await.unwrap();
    }
    let other = RewriteTask::new(Uuid::new_v4(), "m".to_string(), "t".to_string());
    repo.create(&other).await.unwrap();

    let tasks = repo.find_by_content_id(content_id).await.unwrap();
    assert_eq!(tasks.len(), 2);
    assert!(tasks.iter().all(|t| t.content_id == content_id));
}

#[tokio::test]
async fn test_versions_and_edits() {
    let db = setup_db().await;
    let repo = RewriteResultRepositoryImpl::new(db);
    let task_id = Uuid::new_v4();

    assert_eq!(repo.max_version(task_id).await.unwrap(), None);

    for version in 1..=2 {
        let result = RewriteResult::new(
            task_id,
            version,
            format!("v{}", version),
            format!("<p>{}</p>", version),
            version.to_string(),
        );
        repo.insert(&result).await.unwrap();
    }
    assert_eq!(repo.max_version(task_id).await.unwrap(), Some(2));
    assert_eq!(repo.max_version(Uuid::new_v4()).await.unwrap(), None);

    let duplicate = RewriteResult::new(task_id, 2, "dup".into(), "<p>d</p>".into(), "d".into());
    assert!(repo.insert(&duplicate).await.is_err());

    let results = repo.find_by_task_id(task_id).await.unwrap();
    assert_eq!(
        results.iter().map(|r| r.version).collect::<Vec<_>>(),
        vec![1, 2]
    );

    let mut first = results[0].clone();
    first.apply_edit("<p>edited</p>".to_string());
    let saved = repo.save_edit(&first).await.unwrap();
    assert!(saved.is_edited);
    assert_eq!(saved.edited_content_html.as_deref(), Some("<p>edited</p>"));
    assert_eq!(saved.content_html, "<p>1</p>");

    let reloaded = repo.find_by_id(first.id).await.unwrap().unwrap();
    assert_eq!(reloaded.content_html, "<p>1</p>");
    assert_eq!(reloaded.display_html(), "<p>edited</p>");
}
