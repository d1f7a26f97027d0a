//! Error types for bekind

use std::fmt::Display;
use std::path::PathBuf;

/// bekind Result type
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid install type: {0}")]
    InvalidInstallType(String),

    #[error("profile directory not found: {} (available profiles: {})", path.display(), available.join(", "))]
    ProfileNotFound {
        path: PathBuf,
        available: Vec<String>,
    },

    #[error("no config files found in profile directory: {}", path.display())]
    NoProfileFiles { path: PathBuf },

    #[error("no nodes found for cluster {cluster}")]
    NoNodes { cluster: String },

    #[error("unsupported manifest scheme in {0}: only http://, https://, and file:// are supported")]
    UnsupportedScheme(String),

    #[error("timeout waiting for {0}")]
    Timeout(String),

    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("command failed: {message}")]
    CommandFailed { message: String },
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }

    pub fn command_failed(message: impl Into<String>) -> Self {
        Error::CommandFailed {
            message: message.into(),
        }
    }
}

/// Convert any displayable error into [`Error::CommandFailed`].
pub trait CommandErrorExt<T> {
    fn cmd_err(self) -> Result<T>;
}

impl<T, E: Display> CommandErrorExt<T> for std::result::Result<T, E> {
    fn cmd_err(self) -> Result<T> {
        self.map_err(|e| Error::command_failed(e.to_string()))
    }
}
