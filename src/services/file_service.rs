use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DirError;
use crate::models::options::CopyOptions;
use crate::safety::{validate_name, validate_path};
use crate::scope_path::{join_name, parent_path};
use crate::services::collision_service::{occupied, resolve, same_entry, split_file_name};
use crate::services::traverse_service::require_directory;

/// Replaces the whole content of `path`, creating the file if needed.
pub fn write_file(path: &Path, content: impl AsRef<[u8]>) -> Result<(), DirError> {
    validate_path(path)?;
    fs::write(path, content).map_err(|err| DirError::from_io(path, err))?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

pub fn remove_file(path: &Path) -> Result<(), DirError> {
    validate_path(path)?;
    if !occupied(path) {
        return Err(DirError::NotFound(path.to_path_buf()));
    }
    if path.is_dir() && !path.is_symlink() {
        return Err(DirError::NotAFile(path.to_path_buf()));
    }

    fs::remove_file(path).map_err(|err| DirError::from_io(path, err))?;
    log::debug!("removed {}", path.display());
    Ok(())
}

fn require_file(path: &Path) -> Result<(), DirError> {
    let metadata = fs::metadata(path).map_err(|err| DirError::from_io(path, err))?;
    if !metadata.is_file() {
        return Err(DirError::NotAFile(path.to_path_buf()));
    }
    Ok(())
}

/// Copies `source` into `dest_dir`, resolving name collisions per `options`.
/// Returns the path that was written.
pub fn copy_file(
    source: &Path,
    dest_dir: &Path,
    options: &CopyOptions,
) -> Result<PathBuf, DirError> {
    validate_path(source)?;
    validate_path(dest_dir)?;
    require_file(source)?;
    require_directory(dest_dir)?;

    let (base, extension) = split_file_name(source)
        .ok_or_else(|| DirError::InvalidName(source.to_string_lossy().to_string()))?;
    let destination = resolve(dest_dir, &base, extension.as_deref(), options)?;
    // Copying a file onto itself truncates it.
    if same_entry(source, &destination) {
        return Err(DirError::AlreadyExists(destination));
    }

    fs::copy(source, &destination).map_err(|err| DirError::io(&destination, err))?;
    log::debug!("copied {} to {}", source.display(), destination.display());
    Ok(destination)
}

/// Renames in place, keeping the extension. Never overwrites.
pub fn rename_file(path: &Path, new_name: &str) -> Result<PathBuf, DirError> {
    validate_path(path)?;
    validate_name(new_name)?;
    require_file(path)?;

    let extension = path.extension().map(|e| e.to_string_lossy().to_string());
    let destination = parent_path(path).join(join_name(extension.as_deref(), &[new_name]));
    if occupied(&destination) {
        return Err(DirError::AlreadyExists(destination));
    }

    fs::rename(path, &destination).map_err(|err| DirError::io(path, err))?;
    log::debug!("renamed {} to {}", path.display(), destination.display());
    Ok(destination)
}

/// Copy, then remove the source.
///
/// A failed copy leaves the source untouched. A failed removal after a
/// successful copy leaves two files and is reported as `InconsistentMove`.
pub fn move_file(
    source: &Path,
    dest_dir: &Path,
    options: &CopyOptions,
) -> Result<PathBuf, DirError> {
    let destination = copy_file(source, dest_dir, options)?;

    if let Err(err) = remove_file(source) {
        log::warn!(
            "moved {} to {} but the source is still in place: {err}",
            source.display(),
            destination.display()
        );
        return Err(DirError::InconsistentMove {
            source_path: source.to_path_buf(),
            destination,
            cause: Box::new(err),
        });
    }
    Ok(destination)
}

/// Creates an empty, uniquely named file `<prefix><uuid>` inside `dir`.
pub fn create_temporary_file(dir: &Path, prefix: &str) -> Result<PathBuf, DirError> {
    validate_path(dir)?;
    require_directory(dir)?;

    let name = format!("{prefix}{}", uuid::Uuid::new_v4().simple());
    validate_name(&name)?;
    let path = dir.join(name);

    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|err| DirError::io(&path, err))?;
    log::debug!("created temporary file {}", path.display());
    Ok(path)
}
