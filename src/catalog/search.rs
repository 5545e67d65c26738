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

use std::collections::HashSet;
use tracing::{debug, warn};

use super::store::CatalogStore;
use super::types::{Catalog, Column, MatchKind, PartRecord, SearchResponse, SearchResult};

/// Search the catalog for a free-text query.
///
/// Each column is scanned for exact (case-insensitive equality) and partial
/// (case-insensitive substring) matches. A column with at least one exact
/// match contributes no partial matches. Results are then deduplicated by
/// full row content, keeping the first occurrence.
pub fn search(catalog: &Catalog, query: &str, columns: &[Column]) -> SearchResponse {
    let needle = normalize(query);
    if needle.is_empty() {
        return SearchResponse::new(query, Vec::new());
    }

    let mut matches = Vec::new();
    for &column in columns {
        let mut exact = Vec::new();
        let mut partial = Vec::new();

        for record in &catalog.records {
            let value = column.value(record);
            let haystack = value.to_uppercase();
            if haystack == needle {
                exact.push(hit(MatchKind::Exact, column, &value, record));
            } else if haystack.contains(&needle) {
                partial.push(hit(MatchKind::Partial, column, &value, record));
            }
        }

        if exact.is_empty() {
            matches.append(&mut partial);
        } else {
            matches.append(&mut exact);
        }
    }

    let results = dedup_by_row(matches);
    debug!(query, total = results.len(), "Catalog search finished");
    SearchResponse::new(query, results)
}

/// Load a catalog and search it. Never fails: a catalog that cannot be
/// loaded produces an empty response carrying the error text.
pub fn search_source(
    store: &CatalogStore,
    source_name: &str,
    query: &str,
    columns: &[Column],
) -> SearchResponse {
    match store.load(source_name) {
        Ok(catalog) => search(&catalog, query, columns),
        Err(e) => {
            warn!(source = source_name, error = %e, "Catalog search failed");
            SearchResponse::failed(query, e)
        }
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_uppercase()
}

fn hit(kind: MatchKind, column: Column, value: &str, record: &PartRecord) -> SearchResult {
    SearchResult {
        match_type: kind,
        matched_column: column,
        matched_value: value.to_string(),
        record: record.clone(),
    }
}

fn dedup_by_row(matches: Vec<SearchResult>) -> Vec<SearchResult> {
    let mut seen: HashSet<PartRecord> = HashSet::new();
    matches
        .into_iter()
        .filter(|m| seen.insert(m.record.clone()))
        .collect()
}
