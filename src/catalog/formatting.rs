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

use colored::Colorize;

use crate::catalog::types::{Catalog, Column, MatchKind, PartRecord, SearchResponse};

pub fn format_search_response(response: &SearchResponse) -> String {
    if let Some(error) = &response.error {
        return format!("{} {}", "Search failed:".red().bold(), error);
    }
    if response.results.is_empty() {
        return format!("No parts found for '{}'", response.query);
    }

    let mut output = String::new();
    output.push_str(
        &format!(
            "{} match(es) for '{}'",
            response.total_matches, response.query
        )
        .bold()
        .to_string(),
    );
    output.push('\n');

    for result in &response.results {
        output.push_str(&"━".repeat(60));
        output.push('\n');

        let kind = match result.match_type {
            MatchKind::Exact => "exact".green().bold(),
            MatchKind::Partial => "partial".yellow(),
        };
        output.push_str(&format!(
            "{} {} in {} = {}\n",
            result.record.id.blue().bold(),
            kind,
            result.matched_column.label().cyan(),
            truncate_chars(&result.matched_value, 60)
        ));
        output.push_str(&format_record(&result.record));
    }

    output
}

/// Labeled field block, one line per column
pub fn format_record(record: &PartRecord) -> String {
    let mut output = String::new();
    for column in Column::ALL {
        let value = match column {
            Column::Compatibility => record.compatibility_list().join(", "),
            _ => column.value(record).into_owned(),
        };
        output.push_str(&format!(
            "  {:<22} {}\n",
            format!("{}:", column.label()).bright_black(),
            value
        ));
    }
    output
}

pub fn format_records_table(records: &[&PartRecord]) -> String {
    if records.is_empty() {
        return "No parts match the filter".to_string();
    }

    let mut output = String::new();
    output.push_str(
        &format!(
            "{:<8} {:<26} {:<12} {:<12} {:<6} {:>10} {}\n",
            "ID", "Part", "Brand", "Model", "Year", "Price", "Condition"
        )
        .bold()
        .to_string(),
    );
    output.push_str(&"─".repeat(90));
    output.push('\n');

    for record in records {
        output.push_str(&format!(
            "{:<8} {:<26} {:<12} {:<12} {:<6} {:>10} {}\n",
            record.id,
            fit(&record.name, 26),
            fit(&record.brand, 12),
            fit(&record.model, 12),
            record.year,
            record.price,
            record.condition
        ));
    }

    output.push_str(&format!("\n{} part(s)\n", records.len()));
    output
}

pub fn format_catalog_info(catalog: &Catalog) -> String {
    let mut output = String::new();
    output.push_str(&"Catalog".bold().to_string());
    output.push('\n');
    output.push_str(&format!("Source: {}\n", catalog.source_name));
    output.push_str(&format!("Rows: {}\n", catalog.len()));
    output.push_str(&format!("Fingerprint: {}\n", catalog.fingerprint));

    let prices: Vec<f64> = catalog
        .records
        .iter()
        .filter_map(|r| r.price_value())
        .collect();
    if !prices.is_empty() {
        let min = prices.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = prices.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        output.push_str(&format!("Price range: {:.2} - {:.2} MXN\n", min, max));
    }

    output
}

pub fn format_facets(column: Column, values: &[String]) -> String {
    let mut output = String::new();
    output.push_str(&format!("{} ({})", column.label(), values.len()).bold().to_string());
    output.push('\n');
    for value in values {
        output.push_str(&format!("  {}\n", value));
    }
    output
}

fn fit(input: &str, width: usize) -> String {
    if input.chars().count() > width {
        format!("{}…", truncate_chars(input, width - 1))
    } else {
        input.to_string()
    }
}

fn truncate_chars(input: &str, max_chars: usize) -> String {
    input.chars().take(max_chars).collect()
}
