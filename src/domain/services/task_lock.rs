// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// 进程内的任务运行锁
///
/// 保证同一个任务同一时刻只有一次运行。锁随 [`TaskLockGuard`] 释放，
/// 运行无论以何种方式结束（包括 panic）都会归还
#[derive(Debug, Clone, Default)]
pub struct TaskLockRegistry {
    inner: Arc<DashMap<Uuid, ()>>,
}

impl TaskLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 尝试获取任务锁，已被占用时返回 None
    pub fn try_acquire(&self, task_id: Uuid) -> Option<TaskLockGuard> {
        match self.inner.entry(task_id) {
            Entry::Occupied(_) => None,
            Entry::Vacant(entry) => {
                entry.insert(());
                Some(TaskLockGuard {
                    registry: self.inner.clone(),
                    task_id,
                })
            }
        }
    }

    pub fn is_locked(&self, task_id: Uuid) -> bool {
        self.inner.contains_key(&task_id)
    }
}

/// 持有期间任务处于锁定状态
#[derive(Debug)]
pub struct TaskLockGuard {
    registry: Arc<DashMap<Uuid, ()>>,
    task_id: Uuid,
}

impl Drop for TaskLockGuard {
    fn drop(&mut self) {
        self.registry.remove(&self.task_id);
    }
}
