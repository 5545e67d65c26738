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

use super::session::ChatResult;
use super::stats::StatsSnapshot;
use crate::memory::{Message, Role};

pub fn format_reply(result: &ChatResult) -> String {
    let mut output = String::new();

    if let Some(identifier) = &result.identifier {
        let matches = result.search.as_ref().map_or(0, |s| s.total_matches);
        output.push_str(
            &format!("[pieza {} · {} coincidencia(s)]", identifier, matches)
                .bright_black()
                .to_string(),
        );
        output.push('\n');
    }

    if result.success {
        output.push_str(&result.response);
    } else {
        output.push_str(&result.response.yellow().to_string());
        if let Some(error) = &result.error {
            output.push('\n');
            output.push_str(&format!("{} {}", "Error:".red().bold(), error));
        }
    }

    output.push('\n');
    output.push_str(
        &format!("({:.2}s)", result.processing_time)
            .bright_black()
            .to_string(),
    );
    output
}

pub fn format_stats(stats: &StatsSnapshot) -> String {
    let last = stats
        .last_interaction
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());

    let mut output = String::new();
    output.push_str(&"Session statistics".bold().to_string());
    output.push('\n');
    output.push_str(&"━".repeat(40));
    output.push('\n');
    output.push_str(&format!("Messages:          {}\n", stats.total_messages));
    output.push_str(&format!(
        "Estimated tokens:  {}\n",
        stats.total_tokens_estimated
    ));
    output.push_str(&format!(
        "Avg tokens/msg:    {:.1}\n",
        stats.avg_tokens_per_message
    ));
    output.push_str(&format!(
        "Duration:          {:.2} min\n",
        stats.session_duration_minutes
    ));
    output.push_str(&format!("Last interaction:  {}\n", last));
    output.push_str(&format!(
        "Model:             {} ({})\n",
        stats.model_info.model_id, stats.model_info.region
    ));
    output.push_str(&format!(
        "Memory window:     {} messages\n",
        stats.model_info.memory_size
    ));
    output
}

pub fn format_history(messages: &[Message]) -> String {
    if messages.is_empty() {
        return "No messages yet".to_string();
    }

    let mut output = String::new();
    for message in messages {
        let who = match message.role {
            Role::User => "Tú".blue().bold(),
            Role::Assistant => "Asistente".green().bold(),
        };
        output.push_str(&format!(
            "{} {}\n{}\n\n",
            who,
            message.timestamp.format("%H:%M:%S").to_string().bright_black(),
            message.content
        ));
    }
    output
}
