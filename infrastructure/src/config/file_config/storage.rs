//! Storage configuration from TOML (`[storage]` and `[logging]` sections)

use consensus_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where proposals, votes and settings are kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Lost when the process exits
    Memory,
    /// JSON snapshot file
    Json(PathBuf),
}

/// Raw storage configuration from TOML
///
/// # Example
///
/// ```toml
/// [storage]
/// backend = "json"                  # "memory" or "json"
/// path = "./party-consensus.json"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    pub backend: String,
    pub path: Option<String>,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            path: None,
        }
    }
}

impl FileStorageConfig {
    /// Resolve the backend; `json` without a path uses the platform data dir
    pub fn parse_backend(&self) -> (StorageBackend, Vec<ConfigIssue>) {
        match self.backend.to_lowercase().as_str() {
            "memory" => (StorageBackend::Memory, vec![]),
            "json" => match self.path.as_ref().map(PathBuf::from).or_else(default_state_path) {
                Some(path) => (StorageBackend::Json(path), vec![]),
                None => {
                    let issue = ConfigIssue::error(
                        ConfigIssueCode::MissingValue {
                            field: "storage.path".to_string(),
                        },
                        "storage.path: json backend needs a path, falling back to 'memory'",
                    );
                    (StorageBackend::Memory, vec![issue])
                }
            },
            _ => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "storage.backend".to_string(),
                        value: self.backend.clone(),
                        valid_values: vec!["memory".to_string(), "json".to_string()],
                    },
                    format!(
                        "storage.backend: unknown value '{}', falling back to 'memory'",
                        self.backend
                    ),
                );
                (StorageBackend::Memory, vec![issue])
            }
        }
    }
}

fn default_state_path() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("party-consensus").join("state.json"))
}

/// Raw logging configuration from TOML
///
/// ```toml
/// [logging]
/// decision_log = "./decisions.jsonl"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL decision log; disabled when unset
    pub decision_log: Option<String>,
}

impl FileLoggingConfig {
    pub fn decision_log_path(&self) -> Option<PathBuf> {
        self.decision_log.as_ref().map(PathBuf::from)
    }
}
