use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum DirError {
    #[error("path does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("not a file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("destination already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("unknown {target} attribute: {name}")]
    UnknownAttribute { target: &'static str, name: String },

    #[error("invalid name: {0}")]
    InvalidName(String),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("removal stopped at {} after {removed} item(s): {source}", failed.display())]
    PartialFailure {
        failed: PathBuf,
        removed: usize,
        #[source]
        source: Box<DirError>,
    },

    #[error("directory is not empty: {}", .0.display())]
    NotEmpty(PathBuf),

    #[error(
        "cannot place {} inside itself at {}",
        source_path.display(),
        destination.display()
    )]
    DestinationInsideSource {
        source_path: PathBuf,
        destination: PathBuf,
    },

    #[error(
        "copy of {} left {failures} item(s) behind, source kept",
        source_path.display()
    )]
    IncompleteCopy { source_path: PathBuf, failures: usize },

    #[error(
        "copied {} to {} but could not remove the source: {cause}",
        source_path.display(),
        destination.display()
    )]
    InconsistentMove {
        source_path: PathBuf,
        destination: PathBuf,
        cause: Box<DirError>,
    },
}

impl DirError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Maps a raw I/O error onto the taxonomy, keeping `NotFound` distinct.
    pub fn from_io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.as_ref().to_path_buf()),
            _ => Self::io(path, source),
        }
    }
}

impl Serialize for DirError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
