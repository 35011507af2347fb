use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_RENAME_POSTFIX: &str = "_copy";
pub const DEFAULT_DIRECTORY_MODE: u32 = 0o775;

/// What a recursive copy does when one of its items fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Record the failure in the report and keep going.
    #[default]
    Continue,
    /// Stop at the first failed item and return its error.
    Abort,
}

/// Collision handling shared by file and directory copy/move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyOptions {
    pub overwrite: bool,
    pub rename: bool,
    pub postfix: String,
    pub error_policy: ErrorPolicy,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            overwrite: false,
            rename: true,
            postfix: DEFAULT_RENAME_POSTFIX.to_string(),
            error_policy: ErrorPolicy::Continue,
        }
    }
}

impl CopyOptions {
    pub fn overwriting() -> Self {
        Self {
            overwrite: true,
            rename: false,
            ..Self::default()
        }
    }

    pub fn with_postfix(mut self, postfix: impl Into<String>) -> Self {
        self.postfix = postfix.into();
        self
    }
}

/// How `create_directory` treats a path that already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExistingPolicy {
    #[default]
    Fail,
    Accept,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateOptions {
    /// Unix permission bits, still subject to the process umask.
    pub mode: u32,
    pub recursive: bool,
    pub existing: ExistingPolicy,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            mode: DEFAULT_DIRECTORY_MODE,
            recursive: true,
            existing: ExistingPolicy::Fail,
        }
    }
}

/// Rooted context for file parsing: enables relative paths and URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseContext {
    pub base_path: Option<PathBuf>,
    pub base_host: Option<String>,
}

impl ParseContext {
    pub fn rooted(base_path: impl Into<PathBuf>, base_host: Option<String>) -> Self {
        Self {
            base_path: Some(base_path.into()),
            base_host,
        }
    }
}
