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

use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::catalog::CatalogStore;
use crate::chat::{ChatSession, SessionSettings};
use crate::llm::ChatModel;

/// Open chat sessions keyed by session id. Every session shares the
/// catalog store and model client.
pub struct SessionRegistry {
    store: Arc<CatalogStore>,
    model: Arc<dyn ChatModel>,
    settings: SessionSettings,
    sessions: HashMap<Uuid, ChatSession>,
}

impl SessionRegistry {
    pub fn new(
        store: Arc<CatalogStore>,
        model: Arc<dyn ChatModel>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            store,
            model,
            settings,
            sessions: HashMap::new(),
        }
    }

    pub fn store(&self) -> &Arc<CatalogStore> {
        &self.store
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn open(&mut self) -> Uuid {
        let session = ChatSession::new(
            Arc::clone(&self.store),
            Arc::clone(&self.model),
            self.settings.clone(),
        );
        let id = session.id();
        self.sessions.insert(id, session);
        info!(session = %id, open = self.sessions.len(), "Session opened");
        id
    }

    /// Returns false when no such session was open
    pub fn close(&mut self, id: &str) -> bool {
        let removed = Uuid::parse_str(id)
            .ok()
            .and_then(|id| self.sessions.remove(&id))
            .is_some();
        if removed {
            info!(session = id, open = self.sessions.len(), "Session closed");
        }
        removed
    }

    pub fn get(&self, id: &str) -> Option<&ChatSession> {
        Uuid::parse_str(id).ok().and_then(|id| self.sessions.get(&id))
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut ChatSession> {
        Uuid::parse_str(id)
            .ok()
            .and_then(|id| self.sessions.get_mut(&id))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }
}
