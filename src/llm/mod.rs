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

//! Hosted language model boundary.
//!
//! The rest of the crate only sees [`ChatModel`]: a request goes in, the full
//! reply text comes out. Streaming is an optional side channel.

pub mod bedrock;
pub mod openai;
pub mod retry;

#[cfg(test)]
pub mod testing;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::config::{LlmConfig, Provider};
use crate::error::{CollaboratorError, ConfigError};
use crate::memory::Message;

pub use retry::{complete_with_retry, RetryPolicy};

/// Everything the model sees for one turn
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub system: String,
    /// Earlier turns, oldest first, not including `message`
    pub history: Vec<Message>,
    /// Catalog lookup results for this turn
    pub context: Option<String>,
    pub message: String,
}

impl ChatRequest {
    /// Text of the final user turn: the message, followed by catalog context
    pub fn user_turn(&self) -> String {
        match &self.context {
            Some(context) => format!(
                "{}\n\nInformación de la base de datos:\n{}",
                self.message, context
            ),
            None => self.message.clone(),
        }
    }
}

/// Incremental reply notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Delta(String),
    /// A failed attempt is being retried; discard text received so far
    Restart,
    End,
}

#[async_trait]
pub trait ChatModel: Send + Sync {
    fn model_id(&self) -> &str;

    async fn complete(&self, request: &ChatRequest) -> Result<String, CollaboratorError>;

    /// Stream the reply through `tx` and return the full text.
    /// Providers without native streaming deliver the reply as one delta.
    async fn complete_streaming(
        &self,
        request: &ChatRequest,
        tx: &mpsc::Sender<StreamEvent>,
    ) -> Result<String, CollaboratorError> {
        let text = self.complete(request).await?;
        let _ = tx.send(StreamEvent::Delta(text.clone())).await;
        let _ = tx.send(StreamEvent::End).await;
        Ok(text)
    }
}

/// Sampling parameters shared by providers
#[derive(Debug, Clone, Copy)]
pub struct InferenceParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl From<&LlmConfig> for InferenceParams {
    fn from(config: &LlmConfig) -> Self {
        Self {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            top_p: config.top_p,
        }
    }
}

/// Build a `reqwest::Client` with separate connect and read timeouts
pub fn build_http_client(config: &LlmConfig) -> Result<reqwest::Client, ConfigError> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .read_timeout(Duration::from_secs(config.read_timeout_secs))
        .user_agent(concat!("autoparts/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ConfigError::HttpClient(e.to_string()))
}

/// Create the configured model client. Fails when the credential is missing.
pub fn build_model(config: &LlmConfig) -> Result<Arc<dyn ChatModel>, ConfigError> {
    let api_key = config.api_key()?;
    let client = build_http_client(config)?;

    Ok(match config.provider {
        Provider::Bedrock => Arc::new(bedrock::BedrockClient::new(client, config, api_key)),
        Provider::OpenAi => Arc::new(openai::OpenAiClient::new(client, config, api_key)),
    })
}
