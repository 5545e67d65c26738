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

pub mod catalog;
pub mod chat;
pub mod serve;

use anyhow::Result;

use crate::cli::Commands;
use crate::config::Config;

pub async fn execute(config: &Config, command: Commands) -> Result<()> {
    match command {
        Commands::Catalog { command } => catalog::execute(config, command),
        Commands::Detect { message, format } => catalog::detect(&message, &format),
        Commands::Chat {
            message,
            stream,
            region,
            model,
            memory_size,
            system_prompt,
            format,
        } => {
            let options = chat::ChatOptions {
                message,
                stream,
                region,
                model,
                memory_size,
                system_prompt,
                format,
            };
            chat::execute(config, options).await
        }
        Commands::Serve { debug } => serve::execute(config, debug).await,
    }
}
