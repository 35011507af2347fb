use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::DirError;
use crate::models::directory::{Directory, Totals};
use crate::models::entry::{Entry, ListMode};
use crate::models::file::File;
use crate::models::options::ParseContext;
use crate::services::parse_service::{directory_from_metadata, file_from_metadata};

/// One walked entry, before it becomes a typed entity.
pub(crate) struct Node {
    pub path: PathBuf,
    /// Metadata with symlinks followed.
    pub metadata: fs::Metadata,
    /// Symlink to a directory or file; never descended into.
    pub linked: bool,
    /// Subtree aggregates. Zero for files.
    pub totals: Totals,
    parent: Option<usize>,
    children: Vec<usize>,
}

impl Node {
    pub fn is_dir(&self) -> bool {
        self.metadata.is_dir()
    }
}

/// A pre-order walk of one subtree with aggregates folded bottom-up once.
pub(crate) struct Snapshot {
    nodes: Vec<Node>,
    top: Vec<usize>,
    totals: Totals,
}

impl Snapshot {
    pub fn totals(&self) -> Totals {
        self.totals
    }

    /// Every node in pre-order: parents before their descendants.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    /// Immediate children of `parent`, or of the walk root when `None`.
    pub fn children(&self, parent: Option<usize>) -> &[usize] {
        match parent {
            Some(index) => &self.nodes[index].children,
            None => &self.top,
        }
    }

    pub fn entry(&self, index: usize, context: &ParseContext) -> Entry {
        let node = &self.nodes[index];
        if node.is_dir() {
            Entry::Directory(directory_from_metadata(
                &node.path,
                &node.metadata,
                node.totals,
            ))
        } else {
            Entry::File(file_from_metadata(&node.path, &node.metadata, context))
        }
    }
}

/// Walks `root` once and computes aggregates for every directory in it.
pub(crate) fn scan(root: &Path) -> Result<Snapshot, DirError> {
    let mut visiting: Vec<PathBuf> = root.canonicalize().into_iter().collect();
    scan_guarded(root, &mut visiting)
}

/// `visiting` holds the real paths of linked directories currently being
/// expanded, so a link pointing back up the tree cannot recurse forever.
fn scan_guarded(root: &Path, visiting: &mut Vec<PathBuf>) -> Result<Snapshot, DirError> {
    require_directory(root)?;

    let mut nodes: Vec<Node> = Vec::new();
    let mut top: Vec<usize> = Vec::new();
    // ancestors[d - 1] is the node for the directory at depth d on the
    // current branch, `None` when that directory was skipped.
    let mut ancestors: Vec<Option<usize>> = Vec::new();

    for item in WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let item = match item {
            Ok(item) => item,
            Err(err) => {
                log::warn!("skipping unreadable entry under {}: {err}", root.display());
                continue;
            }
        };

        let depth = item.depth();
        ancestors.truncate(depth - 1);
        let parent = match depth {
            1 => None,
            _ => match ancestors.get(depth - 2).copied().flatten() {
                Some(index) => Some(index),
                None => {
                    push_skipped(&mut ancestors, &item);
                    continue;
                }
            },
        };

        let linked = item.path_is_symlink();
        let metadata = if linked {
            fs::metadata(item.path())
        } else {
            item.metadata().map_err(std::io::Error::from)
        };
        let metadata = match metadata {
            Ok(metadata) => metadata,
            Err(err) => {
                log::trace!("skipping {}: {err}", item.path().display());
                push_skipped(&mut ancestors, &item);
                continue;
            }
        };

        if !metadata.is_dir() && !metadata.is_file() {
            log::trace!("skipping special entry {}", item.path().display());
            continue;
        }

        let totals = if linked && metadata.is_dir() {
            linked_totals(item.path(), visiting)
        } else {
            Totals::default()
        };

        let index = nodes.len();
        let is_dir = metadata.is_dir();
        nodes.push(Node {
            path: item.path().to_path_buf(),
            metadata,
            linked,
            totals,
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(p) => nodes[p].children.push(index),
            None => top.push(index),
        }
        if is_dir {
            ancestors.push(Some(index));
        }
    }

    let mut root_totals = Totals::default();
    for index in (0..nodes.len()).rev() {
        let node = &nodes[index];
        // A link counts as one entry; its target's contents belong to the
        // target, not to the directory holding the link.
        let contribution = if node.linked {
            Totals::default()
        } else {
            node.totals
        };
        let is_dir = node.is_dir();
        let size = if is_dir { 0 } else { node.metadata.len() };
        let parent = node.parent;

        match parent {
            Some(parent) => nodes[parent].totals.absorb(&contribution, is_dir, size),
            None => root_totals.absorb(&contribution, is_dir, size),
        }
    }

    Ok(Snapshot {
        nodes,
        top,
        totals: root_totals,
    })
}

fn push_skipped(ancestors: &mut Vec<Option<usize>>, item: &walkdir::DirEntry) {
    if item.file_type().is_dir() {
        ancestors.push(None);
    }
}

fn linked_totals(path: &Path, visiting: &mut Vec<PathBuf>) -> Totals {
    let Ok(real) = path.canonicalize() else {
        return Totals::default();
    };
    if visiting.contains(&real) {
        log::warn!("symlink cycle at {}, not expanding", path.display());
        return Totals::default();
    }

    visiting.push(real);
    let totals = scan_guarded(path, visiting)
        .map(|snapshot| snapshot.totals())
        .unwrap_or_default();
    visiting.pop();
    totals
}

pub(crate) fn require_directory(path: &Path) -> Result<(), DirError> {
    let metadata = fs::metadata(path).map_err(|err| DirError::from_io(path, err))?;
    if !metadata.is_dir() {
        return Err(DirError::NotADirectory(path.to_path_buf()));
    }
    Ok(())
}

/// Pre-order listing of everything below `root`, filtered by `mode`.
pub fn list(root: &Path, mode: ListMode) -> Result<Vec<Entry>, DirError> {
    let snapshot = scan(root)?;
    let context = ParseContext::default();

    Ok((0..snapshot.nodes().len())
        .filter(|&index| mode.accepts(snapshot.node(index).is_dir()))
        .map(|index| snapshot.entry(index, &context))
        .collect())
}

/// Immediate subdirectories of `path`, each with its own subtree aggregates.
pub fn directories(path: &Path) -> Result<Vec<Directory>, DirError> {
    let snapshot = scan(path)?;
    let context = ParseContext::default();

    Ok(snapshot
        .children(None)
        .iter()
        .filter(|&&index| snapshot.node(index).is_dir())
        .filter_map(|&index| snapshot.entry(index, &context).into_directory())
        .collect())
}

/// Immediate files of `path`. Does not look below the first level.
pub fn files(path: &Path, context: &ParseContext) -> Result<Vec<File>, DirError> {
    Ok(immediate_children(path)?
        .into_iter()
        .filter(|child| !child.metadata.is_dir())
        .map(|child| file_from_metadata(&child.path, &child.metadata, context))
        .collect())
}

/// A first-level child without aggregates, for operations that only need
/// names and kinds.
pub(crate) struct Child {
    pub path: PathBuf,
    pub metadata: fs::Metadata,
}

pub(crate) fn immediate_children(path: &Path) -> Result<Vec<Child>, DirError> {
    require_directory(path)?;

    let mut children = Vec::new();
    for item in WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let item = item.map_err(|err| {
            let io = std::io::Error::from(err);
            DirError::from_io(path, io)
        })?;
        match fs::metadata(item.path()) {
            Ok(metadata) if metadata.is_dir() || metadata.is_file() => children.push(Child {
                path: item.path().to_path_buf(),
                metadata,
            }),
            Ok(_) => log::trace!("skipping special entry {}", item.path().display()),
            Err(err) => log::trace!("skipping {}: {err}", item.path().display()),
        }
    }
    Ok(children)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// root/one.txt, root/path/two/two.txt
    fn structure() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("one.txt"), "one").unwrap();
        fs::create_dir_all(dir.path().join("path").join("two")).unwrap();
        fs::write(dir.path().join("path").join("two").join("two.txt"), "two").unwrap();
        dir
    }

    fn path_names(entries: &[Entry]) -> Vec<PathBuf> {
        entries.iter().map(|e| e.path_name().to_path_buf()).collect()
    }

    #[test]
    fn test_list_all_is_pre_order() {
        let dir = structure();
        let root = dir.path();

        let entries = list(root, ListMode::All).unwrap();

        assert_eq!(
            path_names(&entries),
            vec![
                root.join("one.txt"),
                root.join("path"),
                root.join("path").join("two"),
                root.join("path").join("two").join("two.txt"),
            ]
        );
    }

    #[test]
    fn test_list_files_only() {
        let dir = structure();
        let root = dir.path();

        let entries = list(root, ListMode::FilesOnly).unwrap();

        assert_eq!(
            path_names(&entries),
            vec![
                root.join("one.txt"),
                root.join("path").join("two").join("two.txt"),
            ]
        );
    }

    #[test]
    fn test_list_directories_only() {
        let dir = structure();
        let root = dir.path();

        let entries = list(root, ListMode::DirectoriesOnly).unwrap();

        assert_eq!(
            path_names(&entries),
            vec![root.join("path"), root.join("path").join("two")]
        );
    }

    #[test]
    fn test_listed_directories_carry_subtree_counts() {
        let dir = structure();
        let entries = list(dir.path(), ListMode::DirectoriesOnly).unwrap();

        let path = entries[0].as_directory().unwrap();
        assert_eq!(path.directories_counter(), 1);
        assert_eq!(path.files_counter(), 1);
        assert_eq!(path.summary_size(), 3);

        let two = entries[1].as_directory().unwrap();
        assert_eq!(two.directories_counter(), 0);
        assert_eq!(two.files_counter(), 1);
    }

    #[test]
    fn test_counters_match_listing_for_every_directory() {
        let dir = structure();
        fs::create_dir_all(dir.path().join("path").join("empty")).unwrap();
        fs::write(dir.path().join("path").join("three.md"), "# three").unwrap();

        let mut directories = list(dir.path(), ListMode::DirectoriesOnly).unwrap();
        directories.push(Entry::Directory(
            crate::services::parse_service::parse_directory(dir.path()).unwrap(),
        ));

        for entry in directories {
            let directory = entry.as_directory().unwrap();
            let listing = list(directory.path_name(), ListMode::All).unwrap();
            let files = listing.iter().filter(|e| !e.is_directory()).count() as u64;
            let dirs = listing.iter().filter(|e| e.is_directory()).count() as u64;
            let size: u64 = listing
                .iter()
                .filter_map(Entry::as_file)
                .map(File::size)
                .sum();

            assert_eq!(directory.files_counter(), files);
            assert_eq!(directory.directories_counter(), dirs);
            assert_eq!(directory.summary_counter(), listing.len() as u64);
            assert_eq!(directory.summary_size(), size);
        }
    }

    #[test]
    fn test_immediate_directories_and_files() {
        let dir = structure();
        let root = dir.path();

        let dirs = directories(root).unwrap();
        assert_eq!(dirs.len(), 1);
        assert_eq!(dirs[0].path_name(), root.join("path"));
        assert_eq!(dirs[0].summary_counter(), 2);

        let found = files(root, &ParseContext::default()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path_name(), root.join("one.txt"));
    }

    #[test]
    fn test_list_rejects_files_and_missing_paths() {
        let dir = structure();
        assert!(matches!(
            list(&dir.path().join("one.txt"), ListMode::All),
            Err(DirError::NotADirectory(_))
        ));
        assert!(matches!(
            list(&dir.path().join("missing"), ListMode::All),
            Err(DirError::NotFound(_))
        ));
    }

    #[test]
    fn test_empty_directory_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list(dir.path(), ListMode::All).unwrap().is_empty());
        assert_eq!(scan(dir.path()).unwrap().totals(), Totals::default());
    }

    #[cfg(unix)]
    #[test]
    fn test_linked_directory_is_not_descended() {
        let dir = structure();
        let root = dir.path();
        std::os::unix::fs::symlink(root.join("path"), root.join("alias")).unwrap();

        let entries = list(root, ListMode::All).unwrap();
        let names: Vec<&str> = entries.iter().map(Entry::name).collect();
        assert_eq!(names, vec!["alias", "one.txt", "path", "two", "two.txt"]);

        let alias = entries[0].as_directory().unwrap();
        assert_eq!(alias.summary_counter(), 2);

        let totals = scan(root).unwrap().totals();
        assert_eq!(totals.directories, 3);
        assert_eq!(totals.files, 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_link_cycle_terminates() {
        let dir = structure();
        let root = dir.path();
        std::os::unix::fs::symlink(root, root.join("path").join("back")).unwrap();

        let snapshot = scan(root).unwrap();
        assert_eq!(snapshot.nodes().len(), 5);
    }
}
