// Copyright 2026 Muvon Un Limited
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use async_trait::async_trait;
use futures::StreamExt;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tracing::debug;

use super::{ChatModel, ChatRequest, InferenceParams, StreamEvent};
use crate::config::LlmConfig;
use crate::error::CollaboratorError;

/// OpenAI-compatible chat completions client
pub struct OpenAiClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    params: InferenceParams,
}

impl OpenAiClient {
    pub fn new(client: reqwest::Client, config: &LlmConfig, api_key: String) -> Self {
        Self {
            client,
            endpoint: config.resolved_endpoint(),
            model: config.model.clone(),
            api_key,
            params: InferenceParams::from(config),
        }
    }

    pub(crate) fn build_request_body(&self, request: &ChatRequest, stream: bool) -> Value {
        let mut messages = vec![json!({ "role": "system", "content": request.system })];
        messages.extend(request.history.iter().map(|m| {
            json!({
                "role": m.role.to_string(),
                "content": m.content
            })
        }));
        messages.push(json!({ "role": "user", "content": request.user_turn() }));

        json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": self.params.max_tokens,
            "temperature": self.params.temperature,
            "top_p": self.params.top_p,
            "stream": stream
        })
    }

    async fn send(&self, body: Value) -> Result<reqwest::Response, CollaboratorError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.endpoint))
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .map_err(CollaboratorError::from_reqwest)?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body_text = response
                .text()
                .await
                .map_err(CollaboratorError::from_reqwest)?;
            return Err(CollaboratorError::from_status(status, &body_text));
        }
        Ok(response)
    }
}

/// One parsed server-sent event line
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum SseLine {
    Delta(String),
    Done,
    Skip,
}

pub(crate) fn parse_sse_line(line: &str) -> Result<SseLine, CollaboratorError> {
    let Some(data) = line.trim().strip_prefix("data:") else {
        // Comments, event names and blank keep-alive lines
        return Ok(SseLine::Skip);
    };
    let data = data.trim();
    if data == "[DONE]" {
        return Ok(SseLine::Done);
    }

    let value: Value = serde_json::from_str(data)
        .map_err(|e| CollaboratorError::Malformed(format!("invalid stream chunk: {}", e)))?;
    match value
        .pointer("/choices/0/delta/content")
        .and_then(Value::as_str)
    {
        Some(text) if !text.is_empty() => Ok(SseLine::Delta(text.to_string())),
        _ => Ok(SseLine::Skip),
    }
}

/// Splits a raw byte stream into complete lines. Bytes are held until a
/// newline arrives, so multi-byte characters split across chunks stay intact.
#[derive(Debug, Default)]
pub(crate) struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub(crate) fn push(&mut self, chunk: &[u8]) {
        self.pending.extend_from_slice(chunk);
    }

    /// Next complete line, without its terminator
    pub(crate) fn next_line(&mut self) -> Option<Result<String, CollaboratorError>> {
        let end = self.pending.iter().position(|&b| b == b'\n')?;
        let line: Vec<u8> = self.pending.drain(..=end).collect();
        Some(std::str::from_utf8(&line[..end]).map(str::to_string).map_err(|e| {
            CollaboratorError::Malformed(format!("invalid UTF-8 in stream: {}", e))
        }))
    }
}

pub(crate) fn parse_completion_response(body: &str) -> Result<String, CollaboratorError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| CollaboratorError::Malformed(format!("invalid JSON: {}", e)))?;
    value
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| CollaboratorError::Malformed("missing choices[0].message.content".into()))
}

#[async_trait]
impl ChatModel for OpenAiClient {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, CollaboratorError> {
        debug!(model = %self.model, "Sending chat completion request");
        let response = self.send(self.build_request_body(request, false)).await?;
        let body_text = response
            .text()
            .await
            .map_err(CollaboratorError::from_reqwest)?;
        parse_completion_response(&body_text)
    }

    async fn complete_streaming(
        &self,
        request: &ChatRequest,
        tx: &mpsc::Sender<StreamEvent>,
    ) -> Result<String, CollaboratorError> {
        debug!(model = %self.model, "Sending streaming chat completion request");
        let response = self.send(self.build_request_body(request, true)).await?;

        let mut stream = response.bytes_stream();
        let mut lines = LineBuffer::default();
        let mut accumulated = String::new();

        'read: while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(CollaboratorError::from_reqwest)?;
            lines.push(&chunk);

            while let Some(line) = lines.next_line() {
                match parse_sse_line(&line?)? {
                    SseLine::Delta(text) => {
                        accumulated.push_str(&text);
                        let _ = tx.send(StreamEvent::Delta(text)).await;
                    }
                    SseLine::Done => break 'read,
                    SseLine::Skip => {}
                }
            }
        }

        let _ = tx.send(StreamEvent::End).await;

        if accumulated.is_empty() {
            return Err(CollaboratorError::Malformed("stream ended without text".into()));
        }
        Ok(accumulated)
    }
}
