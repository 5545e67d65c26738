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

#[cfg(test)]
mod tests {
    use super::super::prompt::FALLBACK_MESSAGE;
    use super::super::session::{ChatSession, SessionSettings};
    use crate::catalog::fixtures::sample_assets;
    use crate::catalog::types::MatchKind;
    use crate::catalog::CatalogStore;
    use crate::error::CollaboratorError;
    use crate::llm::testing::ScriptedModel;
    use crate::llm::{ChatModel, RetryPolicy, StreamEvent};
    use crate::memory::Role;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn settings() -> SessionSettings {
        SessionSettings {
            retry: RetryPolicy {
                max_attempts: 2,
                backoff: Duration::ZERO,
            },
            ..SessionSettings::default()
        }
    }

    fn session_with(
        assets: &std::path::Path,
        model: &Arc<ScriptedModel>,
        settings: SessionSettings,
    ) -> ChatSession {
        let store = Arc::new(CatalogStore::new(assets));
        let model: Arc<dyn ChatModel> = model.clone();
        ChatSession::new(store, model, settings)
    }

    #[tokio::test]
    async fn test_part_lookup_end_to_end() {
        let assets = sample_assets();
        let model = Arc::new(ScriptedModel::new(vec![Ok(
            "El radiador PZ0003 es para Chevrolet Aveo 2022.".to_string(),
        )]));
        let mut session = session_with(assets.path(), &model, settings());

        let result = session.chat("Busco la pieza PZ0003").await;

        assert!(result.success);
        assert!(result.error.is_none());
        assert_eq!(result.identifier.as_deref(), Some("PZ0003"));
        assert_eq!(result.user_input, "Busco la pieza PZ0003");
        assert_eq!(
            result.response,
            "El radiador PZ0003 es para Chevrolet Aveo 2022."
        );

        let search = result.search.expect("search performed");
        assert_eq!(search.total_matches, 1);
        assert_eq!(search.results[0].match_type, MatchKind::Exact);
        assert_eq!(search.results[0].record.name, "Radiador");

        let requests = model.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].history.is_empty());
        let context = requests[0].context.as_deref().unwrap();
        assert!(context.contains("Nombre de Pieza: Radiador"));
        assert!(context.contains("Marca de Auto: Chevrolet"));

        let history = session.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[1].role, Role::Assistant);

        let stats = session.stats();
        assert_eq!(stats.total_messages, 1);
        assert!(stats.total_tokens_estimated > 0);
        assert!(stats.last_interaction.is_some());
    }

    #[tokio::test]
    async fn test_timeout_exhausts_retry_budget() {
        let assets = sample_assets();
        let model = Arc::new(ScriptedModel::timing_out(2));
        let mut session = session_with(assets.path(), &model, settings());

        let result = session.chat("hola, ¿qué tal?").await;

        assert!(!result.success);
        assert_eq!(result.response, FALLBACK_MESSAGE);
        assert!(result.error.as_deref().unwrap().contains("timed out"));
        assert_eq!(model.calls(), 2);

        // The user's message is kept, no reply is recorded
        let history = session.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[0].content, "hola, ¿qué tal?");
        assert_eq!(session.stats().total_messages, 0);
    }

    #[tokio::test]
    async fn test_missing_catalog_fails_turn() {
        let empty = tempfile::tempdir().unwrap();
        let model = Arc::new(ScriptedModel::new(vec![Ok("unused".to_string())]));
        let mut session = session_with(empty.path(), &model, settings());

        let result = session.chat("necesito la pieza PZ0003").await;

        assert!(!result.success);
        assert!(result.error.is_some());
        assert_eq!(model.calls(), 0);
        let search = result.search.unwrap();
        assert_eq!(search.total_matches, 0);
        assert!(search.error.is_some());
        assert_eq!(session.history().len(), 1);
    }

    #[tokio::test]
    async fn test_plain_message_skips_catalog() {
        let empty = tempfile::tempdir().unwrap();
        let model = Arc::new(ScriptedModel::new(vec![Ok("¡Hola!".to_string())]));
        let mut session = session_with(empty.path(), &model, settings());

        let result = session.chat("hola").await;

        assert!(result.success);
        assert!(result.identifier.is_none());
        assert!(result.search.is_none());
        assert!(model.requests()[0].context.is_none());
    }

    #[tokio::test]
    async fn test_history_excludes_current_message() {
        let assets = sample_assets();
        let model = Arc::new(ScriptedModel::new(vec![
            Ok("primera".to_string()),
            Ok("segunda".to_string()),
        ]));
        let mut session = session_with(assets.path(), &model, settings());

        session.chat("hola").await;
        session.chat("¿tienes frenos?").await;

        let requests = model.requests();
        let history: Vec<&str> = requests[1]
            .history
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(history, vec!["hola", "primera"]);
        assert_eq!(requests[1].message, "¿tienes frenos?");
    }

    #[tokio::test]
    async fn test_window_bounds_history() {
        let assets = sample_assets();
        let model = Arc::new(ScriptedModel::new(
            (0..4).map(|i| Ok(format!("respuesta {}", i))).collect(),
        ));
        let mut session = session_with(
            assets.path(),
            &model,
            SessionSettings {
                window_size: 5,
                ..settings()
            },
        );

        for i in 0..4 {
            assert!(session.chat(&format!("mensaje {}", i)).await.success);
        }

        let history = session.history();
        assert_eq!(history.len(), 5);
        assert_eq!(history[0].content, "respuesta 1");
        assert_eq!(history[4].content, "respuesta 3");
    }

    #[tokio::test]
    async fn test_clear_resets_history_and_counters() {
        let assets = sample_assets();
        let model = Arc::new(ScriptedModel::new(vec![Ok("hola".to_string())]));
        let mut session = session_with(assets.path(), &model, settings());

        session.chat("hola").await;
        let before = session.stats();
        assert_eq!(before.total_messages, 1);

        session.clear();

        let after = session.stats();
        assert!(session.history().is_empty());
        assert_eq!(after.total_messages, 0);
        assert_eq!(after.total_tokens_estimated, 0);
        assert!(after.last_interaction.is_none());
        assert!(after.session_start >= before.session_start);
    }

    #[tokio::test]
    async fn test_streaming_matches_plain_result() {
        let assets = sample_assets();
        let model = Arc::new(ScriptedModel::new(vec![Ok("respuesta".to_string())]));
        let mut session = session_with(assets.path(), &model, settings());
        let (tx, mut rx) = mpsc::channel(8);

        let result = session.chat_streaming("hola", Some(&tx)).await;
        drop(tx);

        assert!(result.success);
        assert_eq!(result.response, "respuesta");
        assert_eq!(
            rx.recv().await,
            Some(StreamEvent::Delta("respuesta".to_string()))
        );
        assert_eq!(rx.recv().await, Some(StreamEvent::End));
    }

    #[tokio::test]
    async fn test_permanent_error_not_retried() {
        let assets = sample_assets();
        let model = Arc::new(ScriptedModel::new(vec![Err(CollaboratorError::Http {
            status: 403,
            body: "forbidden".to_string(),
        })]));
        let mut session = session_with(assets.path(), &model, settings());

        let result = session.chat("hola").await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("403"));
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_export_contains_conversation_and_stats() {
        let assets = sample_assets();
        let model = Arc::new(ScriptedModel::new(vec![Ok("con gusto".to_string())]));
        let mut session = session_with(assets.path(), &model, settings());
        session.chat("ayúdame").await;

        let export = session.export();
        assert_eq!(export.conversation.len(), 2);
        assert_eq!(export.conversation[1].content, "con gusto");
        assert_eq!(export.stats.total_messages, 1);
        assert_eq!(export.stats.model_info.model_id, "scripted");
        assert_eq!(export.stats.model_info.memory_size, 10);

        let json: serde_json::Value = serde_json::from_str(&export.to_json().unwrap()).unwrap();
        assert_eq!(json["conversation"][0]["role"], "user");
    }
}
