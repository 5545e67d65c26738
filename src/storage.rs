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
use std::fs;
use std::path::PathBuf;

/// Get the system-wide storage directory for autoparts
/// Following XDG Base Directory specification on Unix-like systems
/// and proper conventions on other systems
pub fn get_system_storage_dir() -> Result<PathBuf> {
    let base_dir = if cfg!(target_os = "macos") {
        // macOS: ~/.local/share/autoparts
        dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
            .join(".local")
            .join("share")
            .join("autoparts")
    } else if cfg!(target_os = "windows") {
        // Windows: %APPDATA%/autoparts
        dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Unable to determine data directory"))?
            .join("autoparts")
    } else {
        // Linux and other Unix-like: ~/.local/share/autoparts or $XDG_DATA_HOME/autoparts
        if let Ok(xdg_data_home) = std::env::var("XDG_DATA_HOME") {
            PathBuf::from(xdg_data_home).join("autoparts")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".local")
                .join("share")
                .join("autoparts")
        }
    };

    // Create directory if it doesn't exist
    if !base_dir.exists() {
        fs::create_dir_all(&base_dir)?;
    }

    Ok(base_dir)
}

/// Get the system config file path
/// Stored directly under ~/.local/share/autoparts/ on all systems
pub fn get_system_config_path() -> Result<PathBuf> {
    let system_dir = get_system_storage_dir()?;
    Ok(system_dir.join("config.toml"))
}

/// Directory for rotated server logs
pub fn get_logs_dir() -> Result<PathBuf> {
    let dir = get_system_storage_dir()?.join("logs");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Directory where exported conversations are written
pub fn get_exports_dir() -> Result<PathBuf> {
    let dir = get_system_storage_dir()?.join("exports");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}
