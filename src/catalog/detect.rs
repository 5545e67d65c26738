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

use regex::Regex;
use std::sync::LazyLock;

/// Words that mark a message as a parts lookup
const TRIGGER_KEYWORDS: [&str; 7] = [
    "pieza",
    "parte",
    "componente",
    "buscar",
    "encontrar",
    "número",
    "código",
];

/// Identifier shapes, tried in priority order against the uppercased text
static IDENTIFIER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b[A-Z0-9]+-[A-Z0-9]+\b", // ABC-123
        r"\b[A-Z]{2,4}\d{3,6}\b",   // PZ0003, ABCD1234
        r"\b\d{4,8}\b",             // 123456
        r"\b[A-Z]\d{3,6}\b",        // A12345
    ]
    .iter()
    .map(|p| Regex::new(p).expect("identifier pattern"))
    .collect()
});

/// Extract a part identifier from a chat message.
///
/// Only messages containing a trigger keyword are scanned. The first pattern
/// with any match wins, and within it the leftmost match.
pub fn detect_identifier(message: &str) -> Option<String> {
    let lowered = message.to_lowercase();
    if !TRIGGER_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        return None;
    }

    let upper = message.to_uppercase();
    IDENTIFIER_PATTERNS
        .iter()
        .find_map(|pattern| pattern.find(&upper))
        .map(|m| m.as_str().to_string())
}
