use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::DirError;
use crate::models::entry::Entry;
use crate::models::operation::{CopyReport, CreateOutcome, ItemFailure, OperationType};
use crate::models::options::{CopyOptions, CreateOptions, ErrorPolicy, ExistingPolicy, ParseContext};
use crate::models::tree::TreeNode;
use crate::safety::{validate_name, validate_path};
use crate::scope_path::{file_name_string, parent_path};
use crate::services::collision_service::{occupied, resolve, same_entry};
use crate::services::file_service::{copy_file, rename_file};
use crate::services::parse_service::directory_from_metadata;
use crate::services::traverse_service::{
    immediate_children, require_directory, scan, Child, Snapshot,
};

pub fn create_directory(path: &Path, options: &CreateOptions) -> Result<CreateOutcome, DirError> {
    validate_path(path)?;

    if occupied(path) {
        if path.is_dir() && options.existing == ExistingPolicy::Accept {
            log::trace!("directory already present: {}", path.display());
            return Ok(CreateOutcome::AlreadyExisted);
        }
        return Err(DirError::AlreadyExists(path.to_path_buf()));
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(options.recursive);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(options.mode);
    }

    builder
        .create(path)
        .map_err(|err| DirError::from_io(path, err))?;
    log::debug!("created directory {}", path.display());
    Ok(CreateOutcome::Created)
}

/// Rejects links so a recursive removal never runs through one.
fn require_real_directory(path: &Path) -> Result<(), DirError> {
    let metadata = fs::symlink_metadata(path).map_err(|err| DirError::from_io(path, err))?;
    if !metadata.is_dir() {
        return Err(DirError::NotADirectory(path.to_path_buf()));
    }
    Ok(())
}

/// Everything below `path` in pre-order, links and special files included.
fn full_listing(path: &Path) -> Result<Vec<walkdir::DirEntry>, DirError> {
    let mut items = Vec::new();
    for item in WalkDir::new(path)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let item = item.map_err(|err| {
            let failed = err.path().unwrap_or(path).to_path_buf();
            DirError::from_io(failed, std::io::Error::from(err))
        })?;
        items.push(item);
    }
    Ok(items)
}

fn remove_item(item: &walkdir::DirEntry) -> Result<(), DirError> {
    let path = item.path();
    let result = if item.file_type().is_dir() {
        fs::remove_dir(path)
    } else {
        // Directory links on Windows go through rmdir.
        fs::remove_file(path).or_else(|err| {
            if item.path_is_symlink() {
                fs::remove_dir(path)
            } else {
                Err(err)
            }
        })
    };
    result.map_err(|err| DirError::from_io(path, err))
}

/// Removes a directory.
///
/// Without `recursive` only an empty directory is removed; anything else
/// fails before touching the disk. With `recursive` the full listing is
/// removed deepest-first, stopping at the first failure, and the directory
/// itself goes last.
pub fn remove_directory(path: &Path, recursive: bool) -> Result<(), DirError> {
    validate_path(path)?;
    require_real_directory(path)?;

    let mut items = full_listing(path)?;

    if !recursive {
        if !items.is_empty() {
            return Err(DirError::NotEmpty(path.to_path_buf()));
        }
        fs::remove_dir(path).map_err(|err| DirError::from_io(path, err))?;
        log::debug!("removed directory {}", path.display());
        return Ok(());
    }

    items.reverse();
    let mut removed = 0;
    for item in &items {
        if let Err(err) = remove_item(item) {
            return Err(DirError::PartialFailure {
                failed: item.path().to_path_buf(),
                removed,
                source: Box::new(err),
            });
        }
        removed += 1;
    }

    fs::remove_dir(path).map_err(|err| DirError::PartialFailure {
        failed: path.to_path_buf(),
        removed,
        source: Box::new(DirError::io(path, err)),
    })?;
    log::debug!("removed directory {} and {removed} item(s)", path.display());
    Ok(())
}

/// Renames in place. Never overwrites a sibling.
pub fn rename_directory(path: &Path, new_name: &str) -> Result<PathBuf, DirError> {
    validate_path(path)?;
    validate_name(new_name)?;
    require_directory(path)?;

    let destination = parent_path(path).join(new_name);
    if occupied(&destination) {
        return Err(DirError::AlreadyExists(destination));
    }

    fs::rename(path, &destination).map_err(|err| DirError::io(path, err))?;
    log::debug!("renamed {} to {}", path.display(), destination.display());
    Ok(destination)
}

/// Renames a file (keeping its extension) or a directory.
pub fn rename_entry(path: &Path, new_name: &str) -> Result<PathBuf, DirError> {
    validate_path(path)?;
    let metadata = fs::metadata(path).map_err(|err| DirError::from_io(path, err))?;
    if metadata.is_dir() {
        rename_directory(path, new_name)
    } else {
        rename_file(path, new_name)
    }
}

fn ensure_outside(source: &Path, dest_dir: &Path) -> Result<(), DirError> {
    let real_source = source.canonicalize().map_err(|err| DirError::from_io(source, err))?;
    let real_dest = dest_dir
        .canonicalize()
        .map_err(|err| DirError::from_io(dest_dir, err))?;
    if real_dest.starts_with(&real_source) {
        return Err(DirError::DestinationInsideSource {
            source_path: source.to_path_buf(),
            destination: dest_dir.to_path_buf(),
        });
    }
    Ok(())
}

/// Copies `source` into `dest_dir` under a name picked by the collision
/// rules, then its files, then each subdirectory in turn.
///
/// Per-item failures follow `options.error_policy`; with `Continue` they end
/// up in the returned report.
pub fn copy_directory(
    source: &Path,
    dest_dir: &Path,
    options: &CopyOptions,
) -> Result<CopyReport, DirError> {
    validate_path(source)?;
    validate_path(dest_dir)?;
    require_directory(source)?;
    require_directory(dest_dir)?;
    ensure_outside(source, dest_dir)?;

    // Listed before the destination exists, so the copy never sees itself.
    let children = immediate_children(source)?;
    let destination = open_destination(source, dest_dir, options)?;
    let real = source
        .canonicalize()
        .map_err(|err| DirError::from_io(source, err))?;

    let mut stack = Vec::new();
    copy_contents(&children, real, destination, options, &mut stack)
}

/// Resolves the directory `source` is copied into and creates it, or
/// reuses an existing one when overwriting.
fn open_destination(
    source: &Path,
    dest_dir: &Path,
    options: &CopyOptions,
) -> Result<PathBuf, DirError> {
    let destination = resolve(dest_dir, &file_name_string(source), None, options)?;

    if occupied(&destination) {
        if same_entry(source, &destination) {
            return Err(DirError::DestinationInsideSource {
                source_path: source.to_path_buf(),
                destination,
            });
        }
        require_directory(&destination)?;
    } else {
        fs::create_dir(&destination).map_err(|err| DirError::from_io(&destination, err))?;
        log::debug!("created directory {}", destination.display());
    }
    Ok(destination)
}

/// Copies already listed `children` into `destination`: files first, then
/// each subdirectory in turn.
///
/// `stack` holds the real paths of the source directories being copied, so
/// a link back to one of them is not followed again.
fn copy_contents(
    children: &[Child],
    real_source: PathBuf,
    destination: PathBuf,
    options: &CopyOptions,
    stack: &mut Vec<PathBuf>,
) -> Result<CopyReport, DirError> {
    let mut report = CopyReport::new(destination.clone());
    report.copied_directories += 1;
    stack.push(real_source);

    for child in children.iter().filter(|child| !child.metadata.is_dir()) {
        match copy_file(&child.path, &destination, options) {
            Ok(_) => report.copied_files += 1,
            Err(err) => record_failure(&mut report, options, OperationType::Copy, &child.path, err)?,
        }
    }

    for child in children.iter().filter(|child| child.metadata.is_dir()) {
        let real = match child.path.canonicalize() {
            Ok(real) => real,
            Err(err) => {
                let err = DirError::from_io(&child.path, err);
                record_failure(&mut report, options, OperationType::Copy, &child.path, err)?;
                continue;
            }
        };
        if stack.contains(&real) {
            log::warn!("not following link cycle at {}", child.path.display());
            continue;
        }

        let nested_children = match immediate_children(&child.path) {
            Ok(children) => children,
            Err(err) => {
                record_failure(&mut report, options, OperationType::Copy, &child.path, err)?;
                continue;
            }
        };
        let nested_destination = match open_destination(&child.path, &destination, options) {
            Ok(path) => path,
            Err(err) => {
                record_failure(&mut report, options, OperationType::CreateDir, &child.path, err)?;
                continue;
            }
        };

        let nested = copy_contents(&nested_children, real, nested_destination, options, stack)?;
        report.merge(nested);
    }

    stack.pop();
    Ok(report)
}

fn record_failure(
    report: &mut CopyReport,
    options: &CopyOptions,
    operation: OperationType,
    path: &Path,
    err: DirError,
) -> Result<(), DirError> {
    match options.error_policy {
        ErrorPolicy::Abort => Err(err),
        ErrorPolicy::Continue => {
            log::warn!("{operation} failed for {}: {err}", path.display());
            report.failures.push(ItemFailure {
                operation,
                path: path.to_path_buf(),
                message: err.to_string(),
            });
            Ok(())
        }
    }
}

/// Copy, then recursive removal of the source.
///
/// The source is only removed after a complete copy.
pub fn move_directory(
    source: &Path,
    dest_dir: &Path,
    options: &CopyOptions,
) -> Result<CopyReport, DirError> {
    let report = copy_directory(source, dest_dir, options)?;

    if !report.is_complete() {
        log::warn!(
            "keeping {}: {} item(s) were not copied",
            source.display(),
            report.failures.len()
        );
        return Err(DirError::IncompleteCopy {
            source_path: source.to_path_buf(),
            failures: report.failures.len(),
        });
    }

    if same_entry(source, &report.destination) {
        return Err(DirError::DestinationInsideSource {
            source_path: source.to_path_buf(),
            destination: report.destination,
        });
    }

    if let Err(err) = remove_directory(source, true) {
        log::warn!(
            "moved {} to {} but the source is still in place: {err}",
            source.display(),
            report.destination.display()
        );
        return Err(DirError::InconsistentMove {
            source_path: source.to_path_buf(),
            destination: report.destination,
            cause: Box::new(err),
        });
    }
    Ok(report)
}

/// Nested view of `dir`: subdirectories first, each with its children, then
/// files. With `include_root` the result is a single node for `dir` itself.
pub fn tree(
    dir: &Path,
    include_root: bool,
    context: &ParseContext,
) -> Result<Vec<TreeNode>, DirError> {
    validate_path(dir)?;
    let snapshot = scan(dir)?;
    let nodes = tree_level(&snapshot, None, context);

    if !include_root {
        return Ok(nodes);
    }

    let metadata = fs::metadata(dir).map_err(|err| DirError::from_io(dir, err))?;
    let root = directory_from_metadata(dir, &metadata, snapshot.totals());
    Ok(vec![TreeNode::branch(Entry::Directory(root), nodes)])
}

fn tree_level(snapshot: &Snapshot, parent: Option<usize>, context: &ParseContext) -> Vec<TreeNode> {
    let children = snapshot.children(parent);

    let directories = children
        .iter()
        .filter(|&&index| snapshot.node(index).is_dir())
        .map(|&index| {
            TreeNode::branch(
                snapshot.entry(index, context),
                tree_level(snapshot, Some(index), context),
            )
        });
    let files = children
        .iter()
        .filter(|&&index| !snapshot.node(index).is_dir())
        .map(|&index| TreeNode::leaf(snapshot.entry(index, context)));

    directories.chain(files).collect()
}
