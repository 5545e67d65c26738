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

use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

use super::types::{Catalog, Column, PartRecord};
use crate::error::CatalogError;

/// Read-only catalog cache keyed by source file name.
///
/// Entries are never evicted. Two sessions racing on the first load of the
/// same source may both parse it; the second insert replaces an equal value.
pub struct CatalogStore {
    assets_path: PathBuf,
    cache: RwLock<HashMap<String, Arc<Catalog>>>,
}

impl CatalogStore {
    pub fn new(assets_path: impl Into<PathBuf>) -> Self {
        Self {
            assets_path: assets_path.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn assets_path(&self) -> &Path {
        &self.assets_path
    }

    /// Load a catalog from the assets directory, or return the cached copy
    pub fn load(&self, source_name: &str) -> Result<Arc<Catalog>, CatalogError> {
        if let Some(catalog) = self
            .cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(source_name)
        {
            debug!(source = source_name, "Using cached catalog");
            return Ok(Arc::clone(catalog));
        }

        let path = self.assets_path.join(source_name);
        if !path.is_file() {
            return Err(CatalogError::NotFound(path));
        }

        info!(path = %path.display(), "Loading catalog");
        let bytes = std::fs::read(&path)?;
        let catalog = Arc::new(parse_catalog(source_name, &bytes)?);

        info!(
            source = source_name,
            rows = catalog.len(),
            fingerprint = %&catalog.fingerprint[..12],
            "Catalog loaded"
        );

        self.cache
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(source_name.to_string(), Arc::clone(&catalog));

        Ok(catalog)
    }
}

/// Parse CSV bytes into a catalog, enforcing the header layout and unique IDs
pub fn parse_catalog(source_name: &str, bytes: &[u8]) -> Result<Catalog, CatalogError> {
    let parse_error = |line: Option<u64>, message: String| CatalogError::Parse {
        source_name: source_name.to_string(),
        line,
        message,
    };

    let mut reader = csv::Reader::from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| parse_error(e.position().map(|p| p.line()), e.to_string()))?
        .clone();
    for column in Column::ALL {
        if !headers.iter().any(|h| h == column.label()) {
            return Err(parse_error(
                Some(1),
                format!("missing column '{}'", column.label()),
            ));
        }
    }

    let mut records = Vec::new();
    let mut seen_ids = HashSet::new();
    for row in reader.deserialize::<PartRecord>() {
        let record =
            row.map_err(|e| parse_error(e.position().map(|p| p.line()), e.to_string()))?;
        if !seen_ids.insert(record.id.clone()) {
            return Err(parse_error(
                None,
                format!("duplicate identifier '{}'", record.id),
            ));
        }
        records.push(record);
    }

    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let fingerprint = hex::encode(hasher.finalize());

    Ok(Catalog {
        source_name: source_name.to_string(),
        fingerprint,
        records,
    })
}

/// Write records as CSV with the catalog header row
pub fn write_csv<'a, W, I>(writer: W, records: I) -> Result<(), CatalogError>
where
    W: Write,
    I: IntoIterator<Item = &'a PartRecord>,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    writer
        .write_record(Column::ALL.iter().map(|c| c.label()))
        .map_err(csv_write_error)?;
    for record in records {
        writer.serialize(record).map_err(csv_write_error)?;
    }
    writer.flush()?;
    Ok(())
}

fn csv_write_error(err: csv::Error) -> CatalogError {
    match err.into_kind() {
        csv::ErrorKind::Io(io) => CatalogError::Io(io),
        other => CatalogError::Io(std::io::Error::other(format!("{:?}", other))),
    }
}
