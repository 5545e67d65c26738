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

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::types::{Catalog, Column, PartRecord};

/// Price bands offered by the catalog browser (MXN)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PriceBand {
    #[default]
    All,
    /// Below 100
    #[value(name = "under-100")]
    #[serde(rename = "under-100")]
    Under100,
    /// 100 to 200 inclusive
    #[value(name = "100-200")]
    #[serde(rename = "100-200")]
    From100To200,
    /// Above 200
    #[value(name = "over-200")]
    #[serde(rename = "over-200")]
    Over200,
}

impl PriceBand {
    /// Whether a price falls in this band. Rows without a numeric price only
    /// pass the `All` band.
    pub fn contains(self, price: Option<f64>) -> bool {
        match (self, price) {
            (PriceBand::All, _) => true,
            (_, None) => false,
            (PriceBand::Under100, Some(p)) => p < 100.0,
            (PriceBand::From100To200, Some(p)) => (100.0..=200.0).contains(&p),
            (PriceBand::Over200, Some(p)) => p > 200.0,
        }
    }
}

/// Multi-select catalog filter. Empty selections do not constrain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogFilter {
    pub brands: Vec<String>,
    pub models: Vec<String>,
    pub part_names: Vec<String>,
    pub price: PriceBand,
}

impl CatalogFilter {
    pub fn matches(&self, record: &PartRecord) -> bool {
        selected(&self.brands, &record.brand)
            && selected(&self.models, &record.model)
            && selected(&self.part_names, &record.name)
            && self.price.contains(record.price_value())
    }

    /// Rows passing the filter, in catalog order
    pub fn apply<'a>(&self, catalog: &'a Catalog) -> Vec<&'a PartRecord> {
        catalog.records.iter().filter(|r| self.matches(r)).collect()
    }
}

fn selected(choices: &[String], value: &str) -> bool {
    choices.is_empty() || choices.iter().any(|c| c == value)
}

/// Distinct values of a column, sorted
pub fn distinct_values(catalog: &Catalog, column: Column) -> Vec<String> {
    catalog
        .records
        .iter()
        .map(|r| column.value(r).into_owned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
