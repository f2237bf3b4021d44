use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::utils::ConfigError;

/// Settings for a [`WorkerPool`](crate::WorkerPool) and its callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of worker threads sharing the queue
    pub worker_count: usize,
    /// Worker threads are named `<prefix>-<id>`
    pub thread_name_prefix: String,
    /// Initial allocation of the queue
    pub queue_capacity: usize,
    /// How long a caller waits for a reply before giving up
    pub reply_timeout_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            worker_count: 2,
            thread_name_prefix: "image-worker".to_string(),
            queue_capacity: 100,
            reply_timeout_ms: 30_000,
        }
    }
}

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count == 0 {
            return Err(ConfigError::invalid("worker_count must be at least 1"));
        }
        if self.thread_name_prefix.trim().is_empty() {
            return Err(ConfigError::invalid("thread_name_prefix cannot be empty"));
        }
        Ok(())
    }

    pub fn reply_timeout(&self) -> Duration {
        Duration::from_millis(self.reply_timeout_ms)
    }
}
