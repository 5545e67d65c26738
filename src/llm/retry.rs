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

use std::time::Duration;
use tokio::sync::mpsc;
use tracing::warn;

use super::{ChatModel, ChatRequest, StreamEvent};
use crate::config::LlmConfig;
use crate::error::CollaboratorError;

/// Bounded retry for transient model failures
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero behaves as one.
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            backoff: Duration::from_millis(500),
        }
    }
}

impl From<&LlmConfig> for RetryPolicy {
    fn from(config: &LlmConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }
}

/// Call the model, retrying transient errors up to the policy's attempt
/// budget. The last error is returned once attempts run out.
pub async fn complete_with_retry(
    model: &dyn ChatModel,
    request: &ChatRequest,
    policy: &RetryPolicy,
    stream: Option<&mpsc::Sender<StreamEvent>>,
) -> Result<String, CollaboratorError> {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        let result = match stream {
            Some(tx) => model.complete_streaming(request, tx).await,
            None => model.complete(request).await,
        };

        match result {
            Ok(text) => return Ok(text),
            Err(e) if e.is_transient() && attempt < max_attempts => {
                warn!(
                    model = model.model_id(),
                    attempt,
                    max_attempts,
                    error = %e,
                    "Model call failed, retrying"
                );
                if let Some(tx) = stream {
                    let _ = tx.send(StreamEvent::Restart).await;
                }
                tokio::time::sleep(policy.backoff).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
