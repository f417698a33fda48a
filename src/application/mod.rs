// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含应用程序的用例实现和数据传输对象，
/// 将HTTP层的请求转换为领域操作
pub mod dto;
pub mod use_cases;
