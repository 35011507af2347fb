pub mod directory;
pub mod entry;
pub mod file;
pub mod operation;
pub mod options;
pub mod search;
pub mod tree;

use std::path::{Path, PathBuf};

const SIZE_UNITS: &[(u64, &str)] = &[
    (1 << 40, "TB"),
    (1 << 30, "GB"),
    (1 << 20, "MB"),
    (1 << 10, "kB"),
    (1, "B"),
];

/// Identity fields read once from the filesystem for either entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Stat {
    pub name: String,
    pub path: PathBuf,
    pub path_name: PathBuf,
    pub real_path: Option<PathBuf>,
    pub owner: u32,
    pub permissions: u32,
    pub access_time: i64,
    pub modification_time: i64,
    pub change_time: i64,
    pub writable: bool,
    pub readable: bool,
}

/// Renders `size` with the largest unit not exceeding it, e.g. `3 MB`.
pub fn human_size(size: u64) -> Option<String> {
    SIZE_UNITS
        .iter()
        .find(|(unit, _)| size >= *unit)
        .map(|(unit, abbreviation)| {
            let scaled = (size as f64 / *unit as f64).round() as u64;
            format!("{scaled} {abbreviation}")
        })
}

/// MD5 of the path text. Identifies a location, not its content.
pub(crate) fn identity_hash(path_name: &Path) -> String {
    format!("{:x}", md5::compute(path_name.to_string_lossy().as_bytes()))
}
