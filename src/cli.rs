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

use clap::{Parser, Subcommand};

use crate::catalog::{Column, PriceBand};

#[derive(Parser, Debug)]
#[command(name = "autoparts")]
#[command(version)]
#[command(about = "Automotive parts catalog search and conversational parts assistant", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse and search the parts catalog
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },

    /// Show the part identifier detected in a message, if any
    Detect {
        /// Message to inspect
        message: String,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Chat with the parts assistant (interactive unless --message is given)
    Chat {
        /// Send a single message and exit
        #[arg(short, long)]
        message: Option<String>,

        /// Print the reply as it is generated
        #[arg(long)]
        stream: bool,

        /// Model provider region (overrides config)
        #[arg(long)]
        region: Option<String>,

        /// Model identifier (overrides config)
        #[arg(long)]
        model: Option<String>,

        /// Number of messages kept in the conversation window (5-50)
        #[arg(long)]
        memory_size: Option<usize>,

        /// Custom system prompt (overrides config)
        #[arg(long)]
        system_prompt: Option<String>,

        /// Output format for --message: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Start the JSON-RPC session server on stdio
    Serve {
        /// Enable debug logging to the log file
        #[arg(long)]
        debug: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum CatalogCommand {
    /// Search every column (or selected ones) for a value
    Search {
        /// Text to look for: an identifier, brand, model, part name...
        query: String,

        /// Restrict the search to these columns (comma-separated)
        #[arg(short, long, value_enum, value_delimiter = ',')]
        columns: Vec<Column>,

        /// Catalog file under the assets directory (defaults to config)
        #[arg(short, long)]
        source: Option<String>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List parts matching brand, model, part name and price filters
    Filter {
        /// Vehicle brands to include (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        brand: Vec<String>,

        /// Vehicle models to include (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        model: Vec<String>,

        /// Part names to include (comma-separated)
        #[arg(short = 'n', long, value_delimiter = ',')]
        part_name: Vec<String>,

        /// Price band in MXN
        #[arg(short, long, value_enum, default_value_t = PriceBand::All)]
        price: PriceBand,

        /// Catalog file under the assets directory (defaults to config)
        #[arg(short, long)]
        source: Option<String>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show one part by its identifier
    Get {
        /// Part identifier, case-insensitive
        id: String,

        /// Catalog file under the assets directory (defaults to config)
        #[arg(short, long)]
        source: Option<String>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List the distinct values of a column
    Facets {
        /// Column to list
        #[arg(value_enum)]
        column: Column,

        /// Catalog file under the assets directory (defaults to config)
        #[arg(short, long)]
        source: Option<String>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show catalog summary information
    Info {
        /// Catalog file under the assets directory (defaults to config)
        #[arg(short, long)]
        source: Option<String>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter_command() {
        let cli = Cli::try_parse_from([
            "autoparts",
            "catalog",
            "filter",
            "--brand",
            "Nissan,Mazda",
            "--price",
            "100-200",
            "-f",
            "csv",
        ])
        .unwrap();

        match cli.command {
            Commands::Catalog {
                command:
                    CatalogCommand::Filter {
                        brand,
                        price,
                        format,
                        ..
                    },
            } => {
                assert_eq!(brand, vec!["Nissan", "Mazda"]);
                assert_eq!(price, PriceBand::From100To200);
                assert_eq!(format, "csv");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_search_columns() {
        let cli = Cli::try_parse_from([
            "autoparts",
            "catalog",
            "search",
            "aveo",
            "--columns",
            "model,compatibility",
        ])
        .unwrap();

        match cli.command {
            Commands::Catalog {
                command: CatalogCommand::Search { query, columns, .. },
            } => {
                assert_eq!(query, "aveo");
                assert_eq!(columns, vec![Column::Model, Column::Compatibility]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
