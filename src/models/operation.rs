use serde::Serialize;
use std::path::PathBuf;

/// Step of a recursive copy that failed for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    /// Reading a source entry or copying a file's bytes.
    Copy,
    /// Creating or reusing the destination directory for a subdirectory.
    CreateDir,
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Copy => write!(f, "copy"),
            Self::CreateDir => write!(f, "create_dir"),
        }
    }
}

/// A single item a best-effort operation could not complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    pub operation: OperationType,
    pub path: PathBuf,
    pub message: String,
}

/// Outcome of a recursive directory copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CopyReport {
    /// Directory the source was copied into (the resolved name).
    pub destination: PathBuf,
    pub copied_files: usize,
    pub copied_directories: usize,
    pub failures: Vec<ItemFailure>,
}

impl CopyReport {
    pub fn new(destination: PathBuf) -> Self {
        Self {
            destination,
            ..Self::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn merge(&mut self, nested: CopyReport) {
        self.copied_files += nested.copied_files;
        self.copied_directories += nested.copied_directories;
        self.failures.extend(nested.failures);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateOutcome {
    Created,
    AlreadyExisted,
}
