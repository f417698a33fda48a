// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use rewritrs::domain::models::rewrite_task::{DomainError, RewriteTask, RewriteTaskStatus};
use uuid::Uuid;

fn new_task() -> RewriteTask {
    RewriteTask::new(
        Uuid::new_v4(),
        "gpt-4o-mini".to_string(),
        "{{title}}\n{{content}}".to_string(),
    )
}

#[test]
fn test_task_lifecycle_happy_path() {
    // Given: 新创建的任务
    let task = new_task();
    assert_eq!(task.status, RewriteTaskStatus::Pending);
    assert!(task.started_at.is_none());

    // When: 开始执行
    let task = task.start().unwrap();
    assert_eq!(task.status, RewriteTaskStatus::Processing);
    assert!(task.started_at.is_some());
    assert!(!task.is_terminal());

    // Then: 完成
    let task = task.complete().unwrap();
    assert_eq!(task.status, RewriteTaskStatus::Completed);
    assert!(task.completed_at.is_some());
    assert!(task.is_terminal());
}

#[test]
fn test_failure_records_message() {
    let task = new_task().start().unwrap().fail("原文获取失败: timeout").unwrap();

    assert_eq!(task.status, RewriteTaskStatus::Failed);
    assert_eq!(task.error_message.as_deref(), Some("原文获取失败: timeout"));
    assert!(task.completed_at.is_some());
}

#[test]
fn test_completed_task_can_regenerate() {
    let task = new_task().start().unwrap().complete().unwrap();

    let task = task.start().unwrap();
    assert_eq!(task.status, RewriteTaskStatus::Processing);
    assert!(task.completed_at.is_none());
    assert!(task.error_message.is_none());
}

#[test]
fn test_interrupted_processing_task_is_resumable() {
    let task = new_task().start().unwrap();
    assert!(task.start().is_ok());
}

#[test]
fn test_failed_task_is_terminal() {
    let task = new_task().start().unwrap().fail("boom").unwrap();

    assert_eq!(
        task.clone().start().unwrap_err(),
        DomainError::InvalidStateTransition {
            from: RewriteTaskStatus::Failed,
            to: RewriteTaskStatus::Processing,
        }
    );
    assert!(task.clone().complete().is_err());
    assert!(task.fail("again").is_err());
}

#[test]
fn test_pending_task_cannot_complete_directly() {
    assert!(new_task().complete().is_err());
}

#[test]
fn test_status_round_trips_through_strings() {
    for status in [
        RewriteTaskStatus::Pending,
        RewriteTaskStatus::Processing,
        RewriteTaskStatus::Completed,
        RewriteTaskStatus::Failed,
    ] {
        assert_eq!(status.to_string().parse::<RewriteTaskStatus>(), Ok(status));
    }
    assert!("queued".parse::<RewriteTaskStatus>().is_err());
}

#[test]
fn test_task_serializes_camel_case() {
    let value = serde_json::to_value(new_task()).unwrap();
    assert_eq!(value["status"], "pending");
    assert_eq!(value["aiModel"], "gpt-4o-mini");
    assert!(value.get("promptTemplate").is_some());
    assert!(value["errorMessage"].is_null());
}
