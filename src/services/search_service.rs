use std::path::Path;

use regex::Regex;

use crate::error::DirError;
use crate::models::directory::Directory;
use crate::models::file::File;
use crate::models::options::ParseContext;
use crate::models::search::{DirectoryAttribute, FileAttribute, OneMatch};
use crate::safety::validate_path;
use crate::services::traverse_service::{scan, Snapshot};

/// Attribute searched when the caller does not name one.
pub const DEFAULT_ATTRIBUTE: &str = "name";

fn is_match(value: Option<String>, regex: &Regex) -> bool {
    value.is_some_and(|value| regex.is_match(&value))
}

/// Matches among the immediate children of `parent` come first, then the
/// results of each subdirectory in child order.
fn collect<T>(
    snapshot: &Snapshot,
    parent: Option<usize>,
    directories: bool,
    pick: &dyn Fn(usize) -> Option<T>,
    found: &mut Vec<T>,
) {
    let children = snapshot.children(parent);

    found.extend(
        children
            .iter()
            .filter(|&&index| snapshot.node(index).is_dir() == directories)
            .filter_map(|&index| pick(index)),
    );

    for &index in children
        .iter()
        .filter(|&&index| snapshot.node(index).is_dir())
    {
        collect(snapshot, Some(index), directories, pick, found);
    }
}

/// Files anywhere below `dir` whose `attribute` matches `pattern`.
pub fn find_files_by_pattern(
    dir: &Path,
    pattern: &str,
    attribute: &str,
    context: &ParseContext,
) -> Result<Vec<File>, DirError> {
    let attribute: FileAttribute = attribute.parse()?;
    let regex = Regex::new(pattern)?;
    validate_path(dir)?;
    let snapshot = scan(dir)?;

    let pick = |index: usize| {
        snapshot
            .entry(index, context)
            .into_file()
            .filter(|file| is_match(attribute.value(file), &regex))
    };

    let mut found = Vec::new();
    collect(&snapshot, None, false, &pick, &mut found);
    log::debug!(
        "{} file(s) under {} match {pattern}",
        found.len(),
        dir.display()
    );
    Ok(found)
}

/// Directories anywhere below `dir` whose `attribute` matches `pattern`.
pub fn find_directories_by_pattern(
    dir: &Path,
    pattern: &str,
    attribute: &str,
) -> Result<Vec<Directory>, DirError> {
    let attribute: DirectoryAttribute = attribute.parse()?;
    let regex = Regex::new(pattern)?;
    validate_path(dir)?;
    let snapshot = scan(dir)?;
    let context = ParseContext::default();

    let pick = |index: usize| {
        snapshot
            .entry(index, &context)
            .into_directory()
            .filter(|directory| is_match(attribute.value(directory), &regex))
    };

    let mut found = Vec::new();
    collect(&snapshot, None, true, &pick, &mut found);
    log::debug!(
        "{} directory(ies) under {} match {pattern}",
        found.len(),
        dir.display()
    );
    Ok(found)
}

pub fn find_one_file_by_pattern(
    dir: &Path,
    pattern: &str,
    attribute: &str,
    context: &ParseContext,
) -> Result<OneMatch<File>, DirError> {
    find_files_by_pattern(dir, pattern, attribute, context).map(OneMatch::from_matches)
}

pub fn find_one_directory_by_pattern(
    dir: &Path,
    pattern: &str,
    attribute: &str,
) -> Result<OneMatch<Directory>, DirError> {
    find_directories_by_pattern(dir, pattern, attribute).map(OneMatch::from_matches)
}
