use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DirError;
use crate::models::options::CopyOptions;
use crate::safety::{validate_name, validate_postfix};
use crate::scope_path::join_name;

/// Anything at `path`, including a dangling link, occupies the name.
pub(crate) fn occupied(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Both paths name the same filesystem object, hard links included.
#[cfg(unix)]
pub(crate) fn same_entry(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
pub(crate) fn same_entry(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Picks the destination path for `base` (+ `extension`) inside `dest_dir`.
///
/// With `rename` set, `postfix` is appended to the base name until the
/// candidate is free. The result may still exist when renaming is off; that
/// is only allowed with `overwrite`, otherwise `AlreadyExists` is returned
/// and nothing has been touched.
pub fn resolve(
    dest_dir: &Path,
    base: &str,
    extension: Option<&str>,
    options: &CopyOptions,
) -> Result<PathBuf, DirError> {
    validate_name(base)?;
    validate_postfix(&options.postfix, options.rename)?;

    let mut candidate_name = base.to_string();
    let mut candidate = dest_dir.join(join_name(extension, &[&candidate_name]));

    while options.rename && occupied(&candidate) {
        candidate_name.push_str(&options.postfix);
        candidate = dest_dir.join(join_name(extension, &[&candidate_name]));
    }

    if occupied(&candidate) && !options.overwrite {
        return Err(DirError::AlreadyExists(candidate));
    }

    Ok(candidate)
}

/// Splits a file name the way the parser does: `archive.tar.gz` is
/// `("archive.tar", Some("gz"))`, `Makefile` has no extension.
pub(crate) fn split_file_name(path: &Path) -> Option<(String, Option<String>)> {
    let name = path.file_name()?.to_string_lossy().to_string();
    match path.extension() {
        Some(ext) => {
            let ext = ext.to_string_lossy().to_string();
            let base = name
                .strip_suffix(&format!(".{ext}"))
                .unwrap_or(&name)
                .to_string();
            Some((base, Some(ext)))
        }
        None => Some((name, None)),
    }
}
