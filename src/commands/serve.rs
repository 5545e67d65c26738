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

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::catalog::CatalogStore;
use crate::chat::SessionSettings;
use crate::config::Config;
use crate::llm::build_model;
use crate::rpc::logging::init_server_logging;
use crate::rpc::{RpcServer, SessionRegistry};

pub async fn execute(config: &Config, debug: bool) -> Result<()> {
    init_server_logging(debug)?;

    let model = build_model(&config.llm)?;
    let store = Arc::new(CatalogStore::new(&config.catalog.assets_path));

    // Fail at startup rather than on the first lookup
    let catalog = store.load(&config.catalog.file_name)?;
    info!(
        source = %catalog.source_name,
        rows = catalog.len(),
        model = model.model_id(),
        "Starting RPC server"
    );

    let registry = SessionRegistry::new(store, model, SessionSettings::from(config));
    let mut server = RpcServer::new(registry);
    server.run().await
}
