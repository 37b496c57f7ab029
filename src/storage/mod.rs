//! Filesystem storage for player records and computed results.
//!
//! Layout under the data directory:
//! - `input/<scope>.jsonl`: player records (raw counters)
//! - `output/<scope>.standings.jsonl`: ranked entries

mod jsonl;

pub use jsonl::*;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{path}:{line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn input_dir(&self) -> PathBuf {
        self.data_dir.join("input")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.data_dir.join("output")
    }

    /// Player records for a scope.
    pub fn records_path(&self, scope: &str) -> PathBuf {
        self.input_dir().join(format!("{}.jsonl", scope))
    }

    pub fn standings_path(&self, scope: &str) -> PathBuf {
        self.output_dir().join(format!("{}.standings.jsonl", scope))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
