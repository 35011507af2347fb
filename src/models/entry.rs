use serde::{Deserialize, Serialize};
use std::path::Path;

use super::directory::Directory;
use super::file::File;

/// Either entity kind produced by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Entry {
    Directory(Directory),
    File(File),
}

impl Entry {
    pub fn name(&self) -> &str {
        match self {
            Self::Directory(d) => d.name(),
            Self::File(f) => f.name(),
        }
    }

    pub fn path_name(&self) -> &Path {
        match self {
            Self::Directory(d) => d.path_name(),
            Self::File(f) => f.path_name(),
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory(_))
    }

    pub fn as_directory(&self) -> Option<&Directory> {
        match self {
            Self::Directory(d) => Some(d),
            Self::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&File> {
        match self {
            Self::File(f) => Some(f),
            Self::Directory(_) => None,
        }
    }

    pub fn into_directory(self) -> Option<Directory> {
        match self {
            Self::Directory(d) => Some(d),
            Self::File(_) => None,
        }
    }

    pub fn into_file(self) -> Option<File> {
        match self {
            Self::File(f) => Some(f),
            Self::Directory(_) => None,
        }
    }
}

/// Filter applied to a recursive listing. Never changes the order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListMode {
    #[default]
    All,
    FilesOnly,
    DirectoriesOnly,
}

impl ListMode {
    pub fn accepts(self, is_directory: bool) -> bool {
        match self {
            Self::All => true,
            Self::FilesOnly => !is_directory,
            Self::DirectoriesOnly => is_directory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_mode_filters() {
        assert!(ListMode::All.accepts(true));
        assert!(ListMode::All.accepts(false));
        assert!(ListMode::FilesOnly.accepts(false));
        assert!(!ListMode::FilesOnly.accepts(true));
        assert!(ListMode::DirectoriesOnly.accepts(true));
        assert!(!ListMode::DirectoriesOnly.accepts(false));
    }

    #[test]
    fn test_list_mode_deserializes_snake_case() {
        let mode: ListMode = serde_json::from_str("\"files_only\"").unwrap();
        assert_eq!(mode, ListMode::FilesOnly);
    }
}
