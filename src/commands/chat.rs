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
use colored::Colorize;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{stdin, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::info;

use crate::catalog::CatalogStore;
use crate::chat::formatting::{format_history, format_reply, format_stats};
use crate::chat::{ChatResult, ChatSession, SessionSettings};
use crate::config::Config;
use crate::llm::{build_model, StreamEvent};

/// Flags of the `chat` command
pub struct ChatOptions {
    pub message: Option<String>,
    pub stream: bool,
    pub region: Option<String>,
    pub model: Option<String>,
    pub memory_size: Option<usize>,
    pub system_prompt: Option<String>,
    pub format: String,
}

pub async fn execute(config: &Config, options: ChatOptions) -> Result<()> {
    let mut config = config.clone();
    if let Some(region) = options.region {
        config.llm.region = region;
    }
    if let Some(model) = options.model {
        config.llm.model = model;
    }
    if let Some(memory_size) = options.memory_size {
        config.memory.window_size = memory_size;
    }
    if options.system_prompt.is_some() {
        config.prompt.system_prompt = options.system_prompt;
    }
    config.validate()?;

    let model = build_model(&config.llm)?;
    let store = Arc::new(CatalogStore::new(&config.catalog.assets_path));
    let mut session = ChatSession::new(store, model, SessionSettings::from(&config));

    match options.message {
        Some(message) => one_shot(&mut session, &message, options.stream, &options.format).await,
        None => repl(&mut session, options.stream).await,
    }
}

async fn one_shot(
    session: &mut ChatSession,
    message: &str,
    stream: bool,
    format: &str,
) -> Result<()> {
    let json = match format {
        "json" => true,
        "text" => false,
        other => bail!("Unsupported format '{}' (expected text or json)", other),
    };

    let result = run_turn(session, message, stream && !json).await;
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if !(stream && result.success) {
        println!("{}", format_reply(&result));
    }

    if !result.success {
        bail!(
            "Chat turn failed: {}",
            result.error.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(())
}

async fn repl(session: &mut ChatSession, stream: bool) -> Result<()> {
    let info = session.model_info();
    println!(
        "{} {} ({}, ventana de {} mensajes)",
        "Asistente de autopartes".bold(),
        info.model_id.cyan(),
        info.region,
        info.memory_size
    );
    println!(
        "{}",
        "Comandos: /clear /stats /export /history /exit".bright_black()
    );

    let mut lines = BufReader::new(stdin()).lines();
    loop {
        print!("{} ", "Tú:".blue().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "/exit" | "/quit" => break,
            "/clear" => {
                session.clear();
                println!("{}", "Conversación reiniciada".green());
            }
            "/stats" => print!("{}", format_stats(&session.stats())),
            "/history" => print!("{}", format_history(&session.history())),
            "/export" => {
                let path = export(session)?;
                println!("Conversación exportada a {}", path.display());
            }
            _ if input.starts_with('/') => {
                println!("{} {}", "Comando desconocido:".yellow(), input);
            }
            _ => {
                if stream {
                    print!("{} ", "Asistente:".green().bold());
                    std::io::stdout().flush()?;
                }
                let result = run_turn(session, input, stream).await;
                if stream && result.success {
                    println!(
                        "{}",
                        format!("({:.2}s)", result.processing_time).bright_black()
                    );
                } else {
                    if !stream {
                        print!("{} ", "Asistente:".green().bold());
                    }
                    println!("{}", format_reply(&result));
                }
                println!();
            }
        }
    }

    Ok(())
}

/// Run one turn, printing reply text as it streams when asked to
async fn run_turn(session: &mut ChatSession, input: &str, stream: bool) -> ChatResult {
    if !stream {
        return session.chat(input).await;
    }

    let (tx, mut rx) = mpsc::channel(64);
    let turn = async move {
        let result = session.chat_streaming(input, Some(&tx)).await;
        drop(tx);
        result
    };
    let printer = async move {
        let mut stdout = std::io::stdout();
        while let Some(event) = rx.recv().await {
            match event {
                StreamEvent::Delta(text) => {
                    let _ = write!(stdout, "{}", text);
                    let _ = stdout.flush();
                }
                StreamEvent::Restart => {
                    let _ = writeln!(stdout, "\n{}", "(reintentando…)".yellow());
                }
                StreamEvent::End => {
                    let _ = writeln!(stdout);
                }
            }
        }
    };

    let (result, ()) = tokio::join!(turn, printer);
    result
}

fn export(session: &ChatSession) -> Result<std::path::PathBuf> {
    let export = session.export();
    let file_name = format!(
        "conversation_{}.json",
        export.export_timestamp.format("%Y%m%d_%H%M%S")
    );
    let path = crate::storage::get_exports_dir()?.join(file_name);

    std::fs::write(&path, export.to_json()?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "Conversation exported");
    Ok(path)
}
