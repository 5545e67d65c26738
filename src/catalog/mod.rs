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

pub mod detect;
pub mod filter;
pub mod formatting;
pub mod search;
pub mod store;
pub mod types;

mod search_tests;

pub use detect::detect_identifier;
pub use filter::{distinct_values, CatalogFilter, PriceBand};
pub use search::search_source;
pub use store::CatalogStore;
pub use types::{Column, SearchResponse};
