// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据库实体模块
///
/// 使用SeaORM框架定义数据库表对应的实体结构
pub mod content_item;
pub mod original_source;
pub mod rewrite_result;
pub mod rewrite_task;
