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
use serde::{Deserialize, Serialize};

use crate::memory::{Message, Role};

/// Running counters for one chat session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStats {
    pub total_messages: usize,
    pub total_tokens_estimated: usize,
    pub session_start: DateTime<Utc>,
    pub last_interaction: Option<DateTime<Utc>>,
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::starting_at(Utc::now())
    }
}

impl SessionStats {
    pub fn starting_at(session_start: DateTime<Utc>) -> Self {
        Self {
            total_messages: 0,
            total_tokens_estimated: 0,
            session_start,
            last_interaction: None,
        }
    }

    /// Count one completed turn
    pub fn record_turn(&mut self, tokens: usize, at: DateTime<Utc>) {
        self.total_messages += 1;
        self.total_tokens_estimated += tokens;
        self.last_interaction = Some(at);
    }

    pub fn snapshot(&self, model_info: ModelInfo, now: DateTime<Utc>) -> StatsSnapshot {
        let seconds = (now - self.session_start).num_milliseconds().max(0) as f64 / 1000.0;
        StatsSnapshot {
            total_messages: self.total_messages,
            total_tokens_estimated: self.total_tokens_estimated,
            session_start: self.session_start,
            last_interaction: self.last_interaction,
            session_duration_minutes: (seconds / 60.0 * 100.0).round() / 100.0,
            avg_tokens_per_message: self.total_tokens_estimated as f64
                / self.total_messages.max(1) as f64,
            model_info,
        }
    }
}

/// Which model and window a session runs with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_id: String,
    pub region: String,
    pub memory_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_messages: usize,
    pub total_tokens_estimated: usize,
    pub session_start: DateTime<Utc>,
    pub last_interaction: Option<DateTime<Utc>>,
    pub session_duration_minutes: f64,
    pub avg_tokens_per_message: f64,
    pub model_info: ModelInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&Message> for ExportedMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
            timestamp: message.timestamp,
        }
    }
}

/// Saved copy of a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationExport {
    pub conversation: Vec<ExportedMessage>,
    pub stats: StatsSnapshot,
    pub export_timestamp: DateTime<Utc>,
}

impl ConversationExport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
