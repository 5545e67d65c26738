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
use std::collections::VecDeque;

use super::types::{Message, Role};

pub const DEFAULT_WINDOW_SIZE: usize = 10;

/// Conversation log holding only the most recent `capacity` messages.
/// When full, appending evicts the oldest message first.
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    messages: VecDeque<Message>,
    capacity: usize,
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}

impl ConversationMemory {
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn append(
        &mut self,
        role: Role,
        content: impl Into<String>,
        timestamp: Option<DateTime<Utc>>,
    ) {
        let message = Message {
            role,
            content: content.into(),
            timestamp: timestamp.unwrap_or_else(Utc::now),
        };

        while self.messages.len() >= self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    /// Owned copy of the log, oldest first
    pub fn history(&self) -> Vec<Message> {
        self.messages.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
