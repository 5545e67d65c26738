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

use std::path::PathBuf;

/// Failures while loading a catalog source.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The source file does not exist under the assets directory.
    #[error("catalog source not found: {}", .0.display())]
    NotFound(PathBuf),
    /// The tabular data is malformed.
    #[error("malformed catalog '{source_name}'{}: {message}", line_suffix(.line))]
    Parse {
        source_name: String,
        line: Option<u64>,
        message: String,
    },
    #[error("io error reading catalog: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures talking to the hosted language model.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CollaboratorError {
    #[error("model request timed out: {0}")]
    Timeout(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("rate limited by model provider: {0}")]
    RateLimited(String),
    #[error("model provider returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("malformed model response: {0}")]
    Malformed(String),
}

impl CollaboratorError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            CollaboratorError::Timeout(_)
            | CollaboratorError::Transport(_)
            | CollaboratorError::RateLimited(_) => true,
            CollaboratorError::Http { status, .. } => *status >= 500,
            CollaboratorError::Malformed(_) => false,
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CollaboratorError::Timeout(err.to_string())
        } else {
            CollaboratorError::Transport(err.to_string())
        }
    }

    /// Map a non-success HTTP status to an error.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            429 => CollaboratorError::RateLimited(body.to_string()),
            408 => CollaboratorError::Timeout(body.to_string()),
            _ => CollaboratorError::Http {
                status,
                body: body.to_string(),
            },
        }
    }
}

/// Missing or invalid configuration. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing credential: environment variable {0} is not set")]
    MissingCredential(String),
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: u64,
        max: u64,
        value: u64,
    },
    #[error("unsupported region '{0}' (expected one of: {1})")]
    UnsupportedRegion(String, String),
    #[error("unsupported model provider '{0}' (expected bedrock or openai)")]
    UnsupportedProvider(String),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

fn line_suffix(line: &Option<u64>) -> String {
    line.map(|l| format!(" at line {}", l)).unwrap_or_default()
}

/// A failed chat turn, recorded in the returned result.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("catalog search failed: {0}")]
    Search(String),
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(CollaboratorError::Timeout("read".into()).is_transient());
        assert!(CollaboratorError::Transport("reset".into()).is_transient());
        assert!(CollaboratorError::from_status(429, "slow down").is_transient());
        assert!(CollaboratorError::from_status(503, "unavailable").is_transient());
        assert!(!CollaboratorError::from_status(400, "bad request").is_transient());
        assert!(!CollaboratorError::from_status(403, "denied").is_transient());
        assert!(!CollaboratorError::Malformed("no text".into()).is_transient());
    }

    #[test]
    fn test_parse_error_display_includes_line() {
        let err = CatalogError::Parse {
            source_name: "parts.csv".into(),
            line: Some(4),
            message: "invalid year".into(),
        };
        assert_eq!(
            err.to_string(),
            "malformed catalog 'parts.csv' at line 4: invalid year"
        );

        let err = CatalogError::Parse {
            source_name: "parts.csv".into(),
            line: None,
            message: "missing column".into(),
        };
        assert_eq!(err.to_string(), "malformed catalog 'parts.csv': missing column");
    }
}
