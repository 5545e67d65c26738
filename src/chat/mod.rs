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

//! Chat orchestration: detect a part in the user's message, look it up in the
//! catalog, and ask the model with the conversation window as context.

pub mod formatting;
pub mod prompt;
pub mod session;
pub mod stats;

mod session_tests;

pub use session::{ChatResult, ChatSession, SessionSettings};
