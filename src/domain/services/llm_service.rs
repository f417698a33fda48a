// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt};
use serde_json::{json, Value};
use std::collections::VecDeque;
use tracing::{debug, warn};

use crate::config::settings::LlmSettings;
use crate::utils::errors::RewriteError;
use crate::utils::sse::{parse_sse_line, SseFrame, SseLineBuffer};

/// 模型输出的增量文本流
///
/// 单次、不可重启。流中途出错时产生一个 `Err` 后结束，
/// 调用方应把已累积的文本当作最终候选继续提取
pub type DeltaStream = BoxStream<'static, Result<String, RewriteError>>;

#[async_trait]
pub trait ChatStreamClient: Send + Sync {
    /// 打开一个流式对话补全请求
    ///
    /// 初始响应非 2xx 时返回 `UpstreamUnavailable`
    async fn stream_completion(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<DeltaStream, RewriteError>;
}

/// LLM服务 - 以流式方式调用 OpenAI 兼容的对话补全接口
///
/// # 配置
///
/// 来自 `Settings.llm`：
/// - `api_key` - LLM API密钥
/// - `api_base_url` - LLM API基础URL
/// - `temperature` - 采样温度
pub struct LLMService {
    client: reqwest::Client,
    api_key: Option<String>,
    api_base_url: String,
    temperature: f32,
}

#[async_trait]
impl ChatStreamClient for LLMService {
    async fn stream_completion(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<DeltaStream, RewriteError> {
        LLMService::stream_completion(self, model, system_prompt, user_prompt).await
    }
}

impl LLMService {
    pub fn new(settings: &LlmSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: settings.api_key.clone(),
            api_base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            temperature: settings.temperature,
        }
    }

    pub fn new_with_config(api_key: String, api_base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: Some(api_key),
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            temperature: 0.7,
        }
    }

    /// 发起流式补全请求
    ///
    /// # 参数
    /// * `model` - 模型名称
    /// * `system_prompt` - 系统提示词
    /// * `user_prompt` - 已编译的用户提示词
    ///
    /// # 错误
    /// * API密钥未配置、请求发送失败或返回非 2xx 时返回 `UpstreamUnavailable`
    pub async fn stream_completion(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<DeltaStream, RewriteError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| RewriteError::UpstreamUnavailable("LLM API key not configured".into()))?;

        let request_body = json!({
            "model": model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt }
            ],
            "temperature": self.temperature,
            "stream": true
        });

        let url = format!("{}/chat/completions", self.api_base_url);
        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                RewriteError::UpstreamUnavailable(format!(
                    "Failed to send request to LLM API: {}",
                    e
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(RewriteError::UpstreamUnavailable(format!(
                "LLM API returned error: {} - {}",
                status, error_text
            )));
        }

        Ok(delta_stream(response.bytes_stream().boxed()))
    }
}

struct DeltaState {
    bytes: BoxStream<'static, reqwest::Result<Bytes>>,
    lines: SseLineBuffer,
    pending: VecDeque<String>,
    finished: bool,
}

impl DeltaState {
    fn absorb(&mut self, line: &str) {
        if self.finished {
            return;
        }
        match parse_sse_line(line) {
            SseFrame::Data(payload) => match serde_json::from_str::<Value>(&payload) {
                Ok(chunk) => {
                    if let Some(delta) = chunk["choices"][0]["delta"]["content"].as_str() {
                        if !delta.is_empty() {
                            self.pending.push_back(delta.to_string());
                        }
                    }
                }
                Err(e) => debug!("Skipping malformed stream chunk: {}", e),
            },
            SseFrame::Done => self.finished = true,
            SseFrame::Skip => {}
        }
    }
}

/// 把 SSE 字节流转换为文本增量流
pub fn delta_stream(bytes: BoxStream<'static, reqwest::Result<Bytes>>) -> DeltaStream {
    let state = DeltaState {
        bytes,
        lines: SseLineBuffer::new(),
        pending: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(delta) = state.pending.pop_front() {
                return Some((Ok(delta), state));
            }
            if state.finished {
                return None;
            }
            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    for line in state.lines.push(&chunk) {
                        state.absorb(&line);
                    }
                }
                Some(Err(e)) => {
                    warn!("LLM stream interrupted: {}", e);
                    state.finished = true;
                    return Some((
                        Err(RewriteError::UpstreamUnavailable(format!(
                            "stream interrupted: {}",
                            e
                        ))),
                        state,
                    ));
                }
                None => {
                    if let Some(rest) = state.lines.finish() {
                        state.absorb(&rest);
                    }
                    state.finished = true;
                }
            }
        }
    })
    .boxed()
}
