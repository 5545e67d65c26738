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
use serde_json::{json, Value};
use tracing::debug;

use super::{ChatModel, ChatRequest, InferenceParams};
use crate::config::LlmConfig;
use crate::error::CollaboratorError;
use crate::memory::Role;

/// Amazon Bedrock Converse API client using bearer-token auth
pub struct BedrockClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    params: InferenceParams,
}

impl BedrockClient {
    pub fn new(client: reqwest::Client, config: &LlmConfig, api_key: String) -> Self {
        Self {
            client,
            endpoint: config.resolved_endpoint(),
            model: config.model.clone(),
            api_key,
            params: InferenceParams::from(config),
        }
    }

    fn url(&self) -> String {
        // Model ids such as "us.amazon.nova-lite-v1:0" carry a colon
        format!(
            "{}/model/{}/converse",
            self.endpoint,
            self.model.replace(':', "%3A")
        )
    }

    pub(crate) fn build_request_body(&self, request: &ChatRequest) -> Value {
        let messages: Vec<Value> = normalize_turns(request)
            .into_iter()
            .map(|(role, text)| {
                json!({
                    "role": role.to_string(),
                    "content": [{ "text": text }]
                })
            })
            .collect();

        json!({
            "system": [{ "text": request.system }],
            "messages": messages,
            "inferenceConfig": {
                "maxTokens": self.params.max_tokens,
                "temperature": self.params.temperature,
                "topP": self.params.top_p
            }
        })
    }
}

/// Converse requires the conversation to open with a user turn and to
/// alternate roles. Leading assistant turns are dropped and consecutive
/// turns of the same role are merged.
pub(crate) fn normalize_turns(request: &ChatRequest) -> Vec<(Role, String)> {
    let mut turns: Vec<(Role, String)> = Vec::new();
    let history = request
        .history
        .iter()
        .map(|m| (m.role, m.content.clone()))
        .skip_while(|(role, _)| *role == Role::Assistant);

    for (role, text) in history.chain(std::iter::once((Role::User, request.user_turn()))) {
        match turns.last_mut() {
            Some((last_role, last_text)) if *last_role == role => {
                last_text.push_str("\n\n");
                last_text.push_str(&text);
            }
            _ => turns.push((role, text)),
        }
    }

    turns
}

/// Concatenated text blocks of `output.message.content`
pub(crate) fn parse_converse_response(body: &str) -> Result<String, CollaboratorError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| CollaboratorError::Malformed(format!("invalid JSON: {}", e)))?;

    let blocks = value
        .pointer("/output/message/content")
        .and_then(Value::as_array)
        .ok_or_else(|| CollaboratorError::Malformed("missing output.message.content".into()))?;

    let text: String = blocks
        .iter()
        .filter_map(|block| block.get("text").and_then(Value::as_str))
        .collect();

    if text.is_empty() {
        return Err(CollaboratorError::Malformed(
            "response contained no text blocks".into(),
        ));
    }
    Ok(text)
}

#[async_trait]
impl ChatModel for BedrockClient {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, CollaboratorError> {
        let body = self.build_request_body(request);
        debug!(model = %self.model, turns = request.history.len() + 1, "Sending Converse request");

        let response = self
            .client
            .post(self.url())
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .body(body.to_string())
            .send()
            .await
            .map_err(CollaboratorError::from_reqwest)?;

        let status = response.status().as_u16();
        let body_text = response
            .text()
            .await
            .map_err(CollaboratorError::from_reqwest)?;

        if !(200..300).contains(&status) {
            return Err(CollaboratorError::from_status(status, &body_text));
        }

        parse_converse_response(&body_text)
    }
}
