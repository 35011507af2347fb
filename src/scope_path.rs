//! Pure path composition. Nothing in here touches the filesystem.

use std::path::{Path, PathBuf, MAIN_SEPARATOR_STR};

/// Joins segments with the platform separator, verbatim.
pub fn join_path<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(MAIN_SEPARATOR_STR)
}

/// Concatenates `items` and appends `.extension` when one is given.
pub fn join_name<S: AsRef<str>>(extension: Option<&str>, items: &[S]) -> String {
    let name: String = items.iter().map(AsRef::as_ref).collect();
    match extension {
        Some(ext) if !ext.is_empty() => format!("{name}.{ext}"),
        _ => name,
    }
}

/// Strips a leading `base` from `path` as plain text. Paths that do not
/// start with `base` come back unchanged.
pub fn strip_base(path: &str, base: &str) -> String {
    path.strip_prefix(base).unwrap_or(path).to_string()
}

/// `host` + `/` + `relative`, with slashes collapsed at the seam.
pub fn join_url(host: &str, relative: &str) -> String {
    let relative = relative.replace('\\', "/");
    format!(
        "{}/{}",
        host.trim_end_matches('/'),
        relative.trim_start_matches('/')
    )
}

pub fn file_name_string(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

pub fn parent_path(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}
