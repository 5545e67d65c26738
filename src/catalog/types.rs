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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Physical state of a part as listed in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Condition {
    New,
    Used,
    Refurbished,
    /// Any label the catalog uses that we do not recognize, kept verbatim
    Other(String),
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::New => write!(f, "Nuevo"),
            Condition::Used => write!(f, "Usado"),
            Condition::Refurbished => write!(f, "Reconstruido"),
            Condition::Other(label) => write!(f, "{}", label),
        }
    }
}

impl From<String> for Condition {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Nuevo" => Condition::New,
            "Usado" => Condition::Used,
            "Reconstruido" => Condition::Refurbished,
            _ => Condition::Other(s),
        }
    }
}

impl From<Condition> for String {
    fn from(condition: Condition) -> Self {
        condition.to_string()
    }
}

/// One row of the parts catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartRecord {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Nombre de Pieza")]
    pub name: String,
    #[serde(rename = "Marca de Auto")]
    pub brand: String,
    #[serde(rename = "Modelo")]
    pub model: String,
    #[serde(rename = "Año")]
    pub year: u16,
    #[serde(rename = "Dimensiones")]
    pub dimensions: String,
    #[serde(rename = "Fabricante")]
    pub manufacturer: String,
    /// Kept as written in the source so it round-trips exactly
    #[serde(rename = "Precio (MXN)")]
    pub price: String,
    #[serde(rename = "Descripción")]
    pub description: String,
    #[serde(rename = "Compatibilidad Extra")]
    pub extra_compatibility: String,
    #[serde(rename = "Estado")]
    pub condition: Condition,
}

impl PartRecord {
    /// Numeric price, if the price cell parses as a decimal number.
    /// Thousands separators are ignored.
    pub fn price_value(&self) -> Option<f64> {
        self.price.trim().replace(',', "").parse().ok()
    }

    /// Extra compatible models as a list
    pub fn compatibility_list(&self) -> Vec<&str> {
        self.extra_compatibility
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Catalog columns in file order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Id,
    Name,
    Brand,
    Model,
    Year,
    Dimensions,
    Manufacturer,
    Price,
    Description,
    Compatibility,
    Condition,
}

impl Column {
    pub const ALL: [Column; 11] = [
        Column::Id,
        Column::Name,
        Column::Brand,
        Column::Model,
        Column::Year,
        Column::Dimensions,
        Column::Manufacturer,
        Column::Price,
        Column::Description,
        Column::Compatibility,
        Column::Condition,
    ];

    /// Header label used in the CSV source
    pub fn label(self) -> &'static str {
        match self {
            Column::Id => "ID",
            Column::Name => "Nombre de Pieza",
            Column::Brand => "Marca de Auto",
            Column::Model => "Modelo",
            Column::Year => "Año",
            Column::Dimensions => "Dimensiones",
            Column::Manufacturer => "Fabricante",
            Column::Price => "Precio (MXN)",
            Column::Description => "Descripción",
            Column::Compatibility => "Compatibilidad Extra",
            Column::Condition => "Estado",
        }
    }

    /// Cell text of this column for a record
    pub fn value(self, record: &PartRecord) -> Cow<'_, str> {
        match self {
            Column::Id => Cow::Borrowed(&record.id),
            Column::Name => Cow::Borrowed(&record.name),
            Column::Brand => Cow::Borrowed(&record.brand),
            Column::Model => Cow::Borrowed(&record.model),
            Column::Year => Cow::Owned(record.year.to_string()),
            Column::Dimensions => Cow::Borrowed(&record.dimensions),
            Column::Manufacturer => Cow::Borrowed(&record.manufacturer),
            Column::Price => Cow::Borrowed(&record.price),
            Column::Description => Cow::Borrowed(&record.description),
            Column::Compatibility => Cow::Borrowed(&record.extra_compatibility),
            Column::Condition => Cow::Owned(record.condition.to_string()),
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// An immutable, loaded catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Name the catalog was loaded under
    pub source_name: String,
    /// SHA-256 of the source bytes, hex encoded
    pub fingerprint: String,
    pub records: Vec<PartRecord>,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&PartRecord> {
        self.records.iter().find(|r| r.id.eq_ignore_ascii_case(id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Exact,
    Partial,
}

impl std::fmt::Display for MatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchKind::Exact => write!(f, "exact"),
            MatchKind::Partial => write!(f, "partial"),
        }
    }
}

/// A single matching row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub match_type: MatchKind,
    pub matched_column: Column,
    pub matched_value: String,
    pub record: PartRecord,
}

/// Outcome of a catalog search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub total_matches: usize,
    pub results: Vec<SearchResult>,
    pub timestamp: DateTime<Utc>,
    /// Set when the search could not run; results are then empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    pub fn new(query: &str, results: Vec<SearchResult>) -> Self {
        Self {
            query: query.to_string(),
            total_matches: results.len(),
            results,
            timestamp: Utc::now(),
            error: None,
        }
    }

    pub fn failed(query: &str, error: impl std::fmt::Display) -> Self {
        Self {
            query: query.to_string(),
            total_matches: 0,
            results: Vec::new(),
            timestamp: Utc::now(),
            error: Some(error.to_string()),
        }
    }
}
