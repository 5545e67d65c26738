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

use anyhow::{bail, Context, Result};
use serde_json::json;

use crate::catalog::formatting::{
    format_catalog_info, format_facets, format_record, format_records_table,
    format_search_response,
};
use crate::catalog::store::write_csv;
use crate::catalog::{
    detect_identifier, distinct_values, search_source, CatalogFilter, CatalogStore, Column,
};
use crate::cli::CatalogCommand;
use crate::config::Config;

pub fn execute(config: &Config, command: CatalogCommand) -> Result<()> {
    let store = CatalogStore::new(&config.catalog.assets_path);
    let default_source = &config.catalog.file_name;

    match command {
        CatalogCommand::Search {
            query,
            columns,
            source,
            format,
        } => {
            let source = source.as_deref().unwrap_or(default_source);
            let columns = if columns.is_empty() {
                Column::ALL.to_vec()
            } else {
                columns
            };

            let response = search_source(&store, source, &query, &columns);
            match format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&response)?),
                "text" => println!("{}", format_search_response(&response)),
                other => bail!("Unsupported format '{}' (expected text or json)", other),
            }

            if let Some(error) = response.error {
                bail!("Search failed: {}", error);
            }
        }

        CatalogCommand::Filter {
            brand,
            model,
            part_name,
            price,
            source,
            format,
        } => {
            let source = source.as_deref().unwrap_or(default_source);
            let catalog = store
                .load(source)
                .with_context(|| format!("Failed to load catalog '{}'", source))?;

            let filter = CatalogFilter {
                brands: brand,
                models: model,
                part_names: part_name,
                price,
            };
            let records = filter.apply(&catalog);

            match format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&records)?),
                "csv" => write_csv(std::io::stdout().lock(), records.iter().copied())?,
                "text" => print!("{}", format_records_table(&records)),
                other => bail!(
                    "Unsupported format '{}' (expected text, json or csv)",
                    other
                ),
            }
        }

        CatalogCommand::Get { id, source, format } => {
            let source = source.as_deref().unwrap_or(default_source);
            let catalog = store
                .load(source)
                .with_context(|| format!("Failed to load catalog '{}'", source))?;
            let record = catalog
                .find_by_id(&id)
                .ok_or_else(|| anyhow::anyhow!("No part with identifier '{}'", id))?;

            match format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(record)?),
                "text" => print!("{}", format_record(record)),
                other => bail!("Unsupported format '{}' (expected text or json)", other),
            }
        }

        CatalogCommand::Facets {
            column,
            source,
            format,
        } => {
            let source = source.as_deref().unwrap_or(default_source);
            let catalog = store
                .load(source)
                .with_context(|| format!("Failed to load catalog '{}'", source))?;
            let values = distinct_values(&catalog, column);

            match format.as_str() {
                "json" => println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "column": column.label(),
                        "values": values
                    }))?
                ),
                "text" => print!("{}", format_facets(column, &values)),
                other => bail!("Unsupported format '{}' (expected text or json)", other),
            }
        }

        CatalogCommand::Info { source, format } => {
            let source = source.as_deref().unwrap_or(default_source);
            let catalog = store
                .load(source)
                .with_context(|| format!("Failed to load catalog '{}'", source))?;

            match format.as_str() {
                "json" => println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "source": catalog.source_name,
                        "rows": catalog.len(),
                        "fingerprint": catalog.fingerprint,
                        "path": store.assets_path().join(source),
                    }))?
                ),
                "text" => print!("{}", format_catalog_info(&catalog)),
                other => bail!("Unsupported format '{}' (expected text or json)", other),
            }
        }
    }

    Ok(())
}

pub fn detect(message: &str, format: &str) -> Result<()> {
    let identifier = detect_identifier(message);

    match format {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&json!({ "identifier": identifier }))?
        ),
        "text" => match identifier {
            Some(id) => println!("{}", id),
            None => println!("No part identifier detected"),
        },
        other => bail!("Unsupported format '{}' (expected text or json)", other),
    }

    Ok(())
}
