// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 包含素材、原文缓存、改写任务、改写结果和进度事件
pub mod content_item;
pub mod original_source;
pub mod rewrite_event;
pub mod rewrite_result;
pub mod rewrite_task;
