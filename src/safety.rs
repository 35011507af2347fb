use crate::error::DirError;
use std::path::Path;

const FORBIDDEN_NAMES: &[&str] = &[".", ".."];

/// A bare entry name: non-empty, no separators, not a dot pseudo-entry.
pub fn validate_name(name: &str) -> Result<(), DirError> {
    if name.is_empty() {
        return Err(DirError::InvalidName("name is empty".to_string()));
    }

    if FORBIDDEN_NAMES.contains(&name) {
        return Err(DirError::InvalidName(format!(
            "name is a reserved entry: {name}"
        )));
    }

    if name.contains(['/', '\\', '\0']) {
        return Err(DirError::InvalidName(format!(
            "name contains a path separator: {name}"
        )));
    }

    Ok(())
}

/// The postfix loop only terminates if every step lengthens the candidate.
pub fn validate_postfix(postfix: &str, rename: bool) -> Result<(), DirError> {
    if !rename {
        return Ok(());
    }
    if postfix.is_empty() {
        return Err(DirError::InvalidName(
            "rename postfix must not be empty".to_string(),
        ));
    }
    validate_name(postfix)
}

pub fn validate_path(path: &Path) -> Result<(), DirError> {
    if path.as_os_str().is_empty() {
        return Err(DirError::InvalidName("path is empty".to_string()));
    }
    Ok(())
}
