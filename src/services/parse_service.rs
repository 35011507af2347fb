use std::fs;
use std::path::Path;

use crate::error::DirError;
use crate::models::directory::{Directory, Totals};
use crate::models::entry::Entry;
use crate::models::file::File;
use crate::models::options::ParseContext;
use crate::models::Stat;
use crate::safety::validate_path;
use crate::scope_path::{file_name_string, parent_path};
use crate::services::traverse_service;

/// Parses whatever lives at `path`.
///
/// Directories come back with their subtree aggregates filled in. Dangling
/// links and special files (sockets, FIFOs, devices) yield `Ok(None)`.
pub fn parse_path(path: &Path, context: &ParseContext) -> Result<Option<Entry>, DirError> {
    validate_path(path)?;

    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            if path.symlink_metadata().is_ok() {
                log::trace!("skipping dangling link {}", path.display());
                return Ok(None);
            }
            return Err(DirError::NotFound(path.to_path_buf()));
        }
        Err(err) => return Err(DirError::io(path, err)),
    };

    if metadata.is_dir() {
        let totals = traverse_service::scan(path)?.totals();
        return Ok(Some(Entry::Directory(directory_from_metadata(
            path, &metadata, totals,
        ))));
    }

    if metadata.is_file() {
        return Ok(Some(Entry::File(file_from_metadata(
            path, &metadata, context,
        ))));
    }

    log::trace!("skipping special entry {}", path.display());
    Ok(None)
}

pub fn parse_directory(path: &Path) -> Result<Directory, DirError> {
    parse_path(path, &ParseContext::default())?
        .and_then(Entry::into_directory)
        .ok_or_else(|| DirError::NotADirectory(path.to_path_buf()))
}

pub fn parse_file(path: &Path, context: &ParseContext) -> Result<File, DirError> {
    parse_path(path, context)?
        .and_then(Entry::into_file)
        .ok_or_else(|| DirError::NotAFile(path.to_path_buf()))
}

pub(crate) fn directory_from_metadata(
    path: &Path,
    metadata: &fs::Metadata,
    totals: Totals,
) -> Directory {
    Directory::new(read_stat(path, metadata), totals)
}

pub(crate) fn file_from_metadata(
    path: &Path,
    metadata: &fs::Metadata,
    context: &ParseContext,
) -> File {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();
    let mime_type = mime_guess::from_path(path).first().map(|m| m.to_string());

    File::new(
        read_stat(path, metadata),
        extension,
        metadata.len(),
        mime_type,
        context
            .base_path
            .as_ref()
            .map(|p| p.to_string_lossy().to_string()),
        context.base_host.clone(),
    )
}

fn read_stat(path: &Path, metadata: &fs::Metadata) -> Stat {
    let (access_time, modification_time, change_time) = timestamps(metadata);

    Stat {
        name: file_name_string(path),
        path: parent_path(path),
        path_name: path.to_path_buf(),
        real_path: path.canonicalize().ok(),
        owner: owner(metadata),
        permissions: permissions(metadata),
        access_time,
        modification_time,
        change_time,
        writable: is_writable(path, metadata),
        readable: is_readable(path),
    }
}

#[cfg(unix)]
fn timestamps(metadata: &fs::Metadata) -> (i64, i64, i64) {
    use std::os::unix::fs::MetadataExt;
    (metadata.atime(), metadata.mtime(), metadata.ctime())
}

#[cfg(not(unix))]
fn timestamps(metadata: &fs::Metadata) -> (i64, i64, i64) {
    let epoch = |t: std::io::Result<std::time::SystemTime>| {
        t.ok()
            .map(|t| chrono::DateTime::<chrono::Utc>::from(t).timestamp())
            .unwrap_or(0)
    };
    (
        epoch(metadata.accessed()),
        epoch(metadata.modified()),
        epoch(metadata.created()),
    )
}

#[cfg(unix)]
fn owner(metadata: &fs::Metadata) -> u32 {
    use std::os::unix::fs::MetadataExt;
    metadata.uid()
}

#[cfg(not(unix))]
fn owner(_metadata: &fs::Metadata) -> u32 {
    0
}

#[cfg(unix)]
fn permissions(metadata: &fs::Metadata) -> u32 {
    use std::os::unix::fs::MetadataExt;
    metadata.mode()
}

#[cfg(not(unix))]
fn permissions(metadata: &fs::Metadata) -> u32 {
    match (metadata.is_dir(), metadata.permissions().readonly()) {
        (true, true) => 0o555,
        (true, false) => 0o777,
        (false, true) => 0o444,
        (false, false) => 0o666,
    }
}

/// access(2) against the effective user, like the shell's `test -r`.
#[cfg(unix)]
fn access(path: &Path, mode: libc::c_int) -> bool {
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = std::ffi::CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    unsafe { libc::access(c_path.as_ptr(), mode) == 0 }
}

#[cfg(unix)]
fn is_readable(path: &Path) -> bool {
    access(path, libc::R_OK)
}

#[cfg(unix)]
fn is_writable(path: &Path, _metadata: &fs::Metadata) -> bool {
    access(path, libc::W_OK)
}

#[cfg(not(unix))]
fn is_readable(_path: &Path) -> bool {
    true
}

#[cfg(not(unix))]
fn is_writable(_path: &Path, metadata: &fs::Metadata) -> bool {
    !metadata.permissions().readonly()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "hello world").unwrap();

        let file = parse_file(&path, &ParseContext::default()).unwrap();

        assert_eq!(file.name(), "notes.txt");
        assert_eq!(file.extension(), "txt");
        assert_eq!(file.name_without_extension(), Some("notes"));
        assert_eq!(file.size(), 11);
        assert_eq!(file.mime_type(), Some("text/plain"));
        assert_eq!(file.path(), dir.path());
        assert_eq!(file.path_name(), path.as_path());
        assert!(file.is_readable());
        assert!(file.modification_time() > 0);
        assert!(file.relative_path().is_none());
    }

    #[test]
    fn test_parse_file_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("LICENSE");
        fs::write(&path, "MIT").unwrap();

        let file = parse_file(&path, &ParseContext::default()).unwrap();

        assert_eq!(file.extension(), "");
        assert_eq!(file.name_without_extension(), None);
    }

    #[test]
    fn test_parse_file_in_rooted_context() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        fs::create_dir_all(root.join("img")).unwrap();
        fs::write(root.join("img").join("a.png"), [0u8; 4]).unwrap();

        let context = ParseContext::rooted(&root, Some("https://cdn.test/".to_string()));
        let file = parse_file(&root.join("img").join("a.png"), &context).unwrap();

        let expected = format!("{}img{}a.png", std::path::MAIN_SEPARATOR, std::path::MAIN_SEPARATOR);
        assert_eq!(file.relative_path().as_deref(), Some(expected.as_str()));
        assert_eq!(file.url().as_deref(), Some("https://cdn.test/img/a.png"));
    }

    #[test]
    fn test_parse_directory_aggregates_subtree() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("one.txt"), "one").unwrap();
        fs::create_dir_all(root.join("path").join("two")).unwrap();
        fs::write(root.join("path").join("two").join("two.txt"), "two!").unwrap();

        let parsed = parse_directory(root).unwrap();

        assert_eq!(parsed.files_counter(), 2);
        assert_eq!(parsed.directories_counter(), 2);
        assert_eq!(parsed.summary_counter(), 4);
        assert_eq!(parsed.summary_size(), 7);
        assert_eq!(parsed.human_summary_size().as_deref(), Some("7 B"));
    }

    #[test]
    fn test_parse_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let result = parse_path(&dir.path().join("nope"), &ParseContext::default());
        assert!(matches!(result, Err(DirError::NotFound(_))));
    }

    #[test]
    fn test_parse_kind_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "a").unwrap();

        assert!(matches!(parse_directory(&path), Err(DirError::NotADirectory(_))));
        assert!(matches!(
            parse_file(dir.path(), &ParseContext::default()),
            Err(DirError::NotAFile(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_link_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("dangling");
        std::os::unix::fs::symlink(dir.path().join("missing"), &link).unwrap();

        assert_eq!(parse_path(&link, &ParseContext::default()).unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_unix_identity_fields() {
        use std::os::unix::fs::{MetadataExt, PermissionsExt};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mode.txt");
        fs::write(&path, "x").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        let file = parse_file(&path, &ParseContext::default()).unwrap();
        let metadata = fs::metadata(&path).unwrap();

        assert_eq!(file.owner(), metadata.uid());
        assert_eq!(file.permissions() & 0o777, 0o640);
        assert_eq!(file.change_time(), metadata.ctime());
    }
}
