// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// SSE 行缓冲器
///
/// 网络分块可能在任意字节处切断，包括一行的中间或一个多字节 UTF-8 字符的中间。
/// 缓冲器只吐出以 `\n` 结束的完整行，未结束的尾部保留到下一个分块
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    pending: Vec<u8>,
}

/// 一行 SSE 数据的解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseFrame {
    /// `data:` 行的负载
    Data(String),
    /// `data: [DONE]` 结束标记
    Done,
    /// 空行、注释、`event:`/`id:` 等无需处理的行
    Skip,
}

impl SseLineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个分块，返回其中所有已完整的行（不含换行符）
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.pending[start..].iter().position(|b| *b == b'\n') {
            let end = start + offset;
            lines.push(Self::decode(&self.pending[start..end]));
            start = end + 1;
        }
        self.pending.drain(..start);
        lines
    }

    /// 流结束时取出剩余的未完成行
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.pending);
        Some(Self::decode(&rest))
    }

    fn decode(bytes: &[u8]) -> String {
        let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
        String::from_utf8_lossy(bytes).into_owned()
    }
}

/// 解析一行 SSE 文本
pub fn parse_sse_line(line: &str) -> SseFrame {
    let Some(payload) = line.strip_prefix("data:") else {
        return SseFrame::Skip;
    };
    let payload = payload.trim();
    if payload.is_empty() {
        SseFrame::Skip
    } else if payload == "[DONE]" {
        SseFrame::Done
    } else {
        SseFrame::Data(payload.to_string())
    }
}
