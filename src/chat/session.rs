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

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::prompt::{format_search_context, DEFAULT_SYSTEM_PROMPT, FALLBACK_MESSAGE};
use super::stats::{ConversationExport, ExportedMessage, ModelInfo, SessionStats, StatsSnapshot};
use crate::catalog::{detect_identifier, search_source, CatalogStore, Column, SearchResponse};
use crate::config::Config;
use crate::error::ChatError;
use crate::llm::{complete_with_retry, ChatModel, ChatRequest, RetryPolicy, StreamEvent};
use crate::memory::types::estimate_tokens;
use crate::memory::{ConversationMemory, Message, Role};

/// Per-session settings, usually taken from [`Config`]
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Catalog source searched when a message names a part
    pub source_name: String,
    pub system_prompt: String,
    pub window_size: usize,
    pub context_results: usize,
    pub region: String,
    pub retry: RetryPolicy,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            source_name: "base_autopartes_dummy.csv".to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            window_size: crate::memory::window::DEFAULT_WINDOW_SIZE,
            context_results: 5,
            region: "us-east-2".to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            source_name: config.catalog.file_name.clone(),
            system_prompt: config.system_prompt(),
            window_size: config.memory.window_size,
            context_results: config.catalog.context_results,
            region: config.llm.region.clone(),
            retry: RetryPolicy::from(&config.llm),
        }
    }
}

/// Outcome of one chat turn. Failures are reported here, never raised.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResult {
    pub response: String,
    /// Seconds spent on the turn
    pub processing_time: f64,
    pub timestamp: DateTime<Utc>,
    pub user_input: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Part identifier detected in the input
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchResponse>,
}

/// One conversation with the parts assistant.
///
/// Holds the bounded message window and session counters. Turns take
/// `&mut self`, so a session serves one conversation at a time; the catalog
/// store and model client are shared.
pub struct ChatSession {
    id: Uuid,
    store: Arc<CatalogStore>,
    model: Arc<dyn ChatModel>,
    memory: ConversationMemory,
    stats: SessionStats,
    settings: SessionSettings,
}

impl ChatSession {
    pub fn new(
        store: Arc<CatalogStore>,
        model: Arc<dyn ChatModel>,
        settings: SessionSettings,
    ) -> Self {
        let id = Uuid::new_v4();
        debug!(
            session = %id,
            model = model.model_id(),
            window = settings.window_size,
            "Opening chat session"
        );
        Self {
            id,
            store,
            model,
            memory: ConversationMemory::new(settings.window_size),
            stats: SessionStats::default(),
            settings,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn chat(&mut self, input: &str) -> ChatResult {
        self.chat_streaming(input, None).await
    }

    /// Run one turn, forwarding reply text to `stream` as it arrives.
    /// The returned result is the same with or without a stream.
    pub async fn chat_streaming(
        &mut self,
        input: &str,
        stream: Option<&mpsc::Sender<StreamEvent>>,
    ) -> ChatResult {
        let started = Instant::now();

        self.memory.append(Role::User, input, None);
        let mut history = self.memory.history();
        history.pop();

        let identifier = detect_identifier(input);
        let search = identifier.as_deref().map(|id| {
            info!(session = %self.id, identifier = id, "Searching catalog for detected part");
            search_source(&self.store, &self.settings.source_name, id, &Column::ALL)
        });

        let outcome = self.respond(input, history, search.as_ref(), stream).await;
        let timestamp = Utc::now();
        let processing_time = started.elapsed().as_secs_f64();

        match outcome {
            Ok(reply) => {
                let tokens = estimate_tokens(input) + estimate_tokens(&reply);
                self.memory.append(Role::Assistant, reply.clone(), Some(timestamp));
                self.stats.record_turn(tokens, timestamp);
                debug!(
                    session = %self.id,
                    tokens,
                    processing_time,
                    window = self.memory.len(),
                    "Chat turn completed"
                );

                ChatResult {
                    response: reply,
                    processing_time,
                    timestamp,
                    user_input: input.to_string(),
                    success: true,
                    error: None,
                    identifier,
                    search,
                }
            }
            Err(e) => {
                warn!(session = %self.id, error = %e, "Chat turn failed");
                ChatResult {
                    response: FALLBACK_MESSAGE.to_string(),
                    processing_time,
                    timestamp,
                    user_input: input.to_string(),
                    success: false,
                    error: Some(e.to_string()),
                    identifier,
                    search,
                }
            }
        }
    }

    async fn respond(
        &self,
        input: &str,
        history: Vec<Message>,
        search: Option<&SearchResponse>,
        stream: Option<&mpsc::Sender<StreamEvent>>,
    ) -> Result<String, ChatError> {
        let context = match search {
            Some(response) => {
                if let Some(error) = &response.error {
                    return Err(ChatError::Search(error.clone()));
                }
                Some(format_search_context(response, self.settings.context_results))
            }
            None => None,
        };

        let request = ChatRequest {
            system: self.settings.system_prompt.clone(),
            history,
            context,
            message: input.to_string(),
        };

        let reply =
            complete_with_retry(self.model.as_ref(), &request, &self.settings.retry, stream)
                .await?;
        Ok(reply)
    }

    /// Forget the conversation and restart the counters
    pub fn clear(&mut self) {
        self.memory.clear();
        self.stats = SessionStats::default();
        info!(session = %self.id, "Conversation cleared");
    }

    pub fn history(&self) -> Vec<Message> {
        self.memory.history()
    }

    pub fn model_info(&self) -> ModelInfo {
        ModelInfo {
            model_id: self.model.model_id().to_string(),
            region: self.settings.region.clone(),
            memory_size: self.memory.capacity(),
        }
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot(self.model_info(), Utc::now())
    }

    pub fn export(&self) -> ConversationExport {
        ConversationExport {
            conversation: self
                .memory
                .history()
                .iter()
                .map(ExportedMessage::from)
                .collect(),
            stats: self.stats(),
            export_timestamp: Utc::now(),
        }
    }
}
