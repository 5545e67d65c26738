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
    use super::super::types::{estimate_tokens, Role};
    use super::super::window::{ConversationMemory, DEFAULT_WINDOW_SIZE};
    use chrono::{Duration, Utc};

    fn contents(memory: &ConversationMemory) -> Vec<String> {
        memory.history().into_iter().map(|m| m.content).collect()
    }

    #[test]
    fn test_default_window() {
        let memory = ConversationMemory::default();
        assert_eq!(memory.capacity(), DEFAULT_WINDOW_SIZE);
        assert_eq!(memory.len(), 0);
    }

    #[test]
    fn test_capacity_two_evicts_oldest() {
        let mut memory = ConversationMemory::new(2);
        memory.append(Role::User, "user1", None);
        memory.append(Role::Assistant, "assistant1", None);
        memory.append(Role::User, "user2", None);

        let history = memory.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::Assistant);
        assert_eq!(history[0].content, "assistant1");
        assert_eq!(history[1].role, Role::User);
        assert_eq!(history[1].content, "user2");
    }

    #[test]
    fn test_never_exceeds_capacity() {
        for capacity in [1, 3, 5, 10] {
            let mut memory = ConversationMemory::new(capacity);
            for i in 0..25 {
                memory.append(Role::User, format!("m{}", i), None);
                assert!(memory.len() <= capacity);
            }
            // FIFO: the survivors are the last `capacity` messages in order
            let expected: Vec<String> = (25 - capacity..25).map(|i| format!("m{}", i)).collect();
            assert_eq!(contents(&memory), expected);
        }
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let mut memory = ConversationMemory::new(0);
        memory.append(Role::User, "a", None);
        memory.append(Role::User, "b", None);
        assert_eq!(contents(&memory), vec!["b"]);
    }

    #[test]
    fn test_history_is_a_copy() {
        let mut memory = ConversationMemory::new(4);
        memory.append(Role::User, "hola", None);

        let mut history = memory.history();
        history[0].content.push_str(" modificado");
        history.clear();

        assert_eq!(contents(&memory), vec!["hola"]);
    }

    #[test]
    fn test_explicit_timestamp_kept() {
        let mut memory = ConversationMemory::new(4);
        let when = Utc::now() - Duration::hours(3);
        memory.append(Role::User, "antes", Some(when));
        memory.append(Role::Assistant, "ahora", None);

        let history = memory.history();
        assert_eq!(history[0].timestamp, when);
        assert!(history[1].timestamp > when);
    }

    #[test]
    fn test_clear_empties_log() {
        let mut memory = ConversationMemory::new(3);
        memory.append(Role::User, "a", None);
        memory.append(Role::Assistant, "b", None);
        memory.clear();

        assert_eq!(memory.len(), 0);
        assert!(memory.history().is_empty());
        assert_eq!(memory.capacity(), 3);
    }

    #[test]
    fn test_token_estimate_counts_words() {
        assert_eq!(estimate_tokens("busca la  pieza\nPZ0003"), 4);
        assert_eq!(estimate_tokens("   "), 0);
    }
}
