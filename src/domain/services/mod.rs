// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 原文抓取（article_fetcher）：抓取服务的抽象
/// - 事件发送（event_emitter）：单次运行的有序事件通道
/// - 模型流式客户端（llm_service）：对话补全流到文本增量
/// - 提示词编译（prompt_compiler）：占位符替换
/// - 结果提取（result_extractor）：从不可靠的模型输出中恢复文章
/// - 改写引擎（rewrite_engine）：任务状态机与运行编排
/// - 原文解析（source_service）：缓存、白名单、清理
/// - 任务锁（task_lock）：同一任务同时只允许一次运行
pub mod article_fetcher;
pub mod event_emitter;
pub mod llm_service;
pub mod prompt_compiler;
pub mod result_extractor;
pub mod rewrite_engine;
pub mod source_service;
pub mod task_lock;
