// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的仓库接口，遵循依赖倒置原则。
/// 具体实现由基础设施层基于 SeaORM 提供。
///
/// 包含的仓库接口：
/// - 素材仓库（content_item_repository）：只读访问采集侧的素材
/// - 原文缓存仓库（original_source_repository）：一次写入的原文缓存
/// - 改写任务仓库（rewrite_task_repository）：任务生命周期
/// - 改写结果仓库（rewrite_result_repository）：按版本追加的结果
pub mod content_item_repository;
pub mod original_source_repository;
pub mod rewrite_result_repository;
pub mod rewrite_task_repository;
