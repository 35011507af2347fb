use serde::{Serialize, Serializer};
use std::path::Path;

use super::{human_size, identity_hash, Stat};

/// Subtree aggregates for one directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub directories: u64,
    pub files: u64,
    pub size: u64,
}

impl Totals {
    /// Folds a child's own totals plus the child itself into `self`.
    pub(crate) fn absorb(&mut self, child: &Totals, child_is_dir: bool, child_size: u64) {
        self.directories += child.directories;
        self.files += child.files;
        self.size += child.size;
        if child_is_dir {
            self.directories += 1;
        } else {
            self.files += 1;
            self.size += child_size;
        }
    }
}

/// A directory as it was when parsed. Counters cover the whole subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    stat: Stat,
    totals: Totals,
}

impl Directory {
    pub(crate) fn new(stat: Stat, totals: Totals) -> Self {
        Self { stat, totals }
    }

    pub fn name(&self) -> &str {
        &self.stat.name
    }

    /// Parent directory.
    pub fn path(&self) -> &Path {
        &self.stat.path
    }

    pub fn path_name(&self) -> &Path {
        &self.stat.path_name
    }

    pub fn real_path(&self) -> Option<&Path> {
        self.stat.real_path.as_deref()
    }

    pub fn owner(&self) -> u32 {
        self.stat.owner
    }

    pub fn permissions(&self) -> u32 {
        self.stat.permissions
    }

    pub fn access_time(&self) -> i64 {
        self.stat.access_time
    }

    pub fn modification_time(&self) -> i64 {
        self.stat.modification_time
    }

    pub fn change_time(&self) -> i64 {
        self.stat.change_time
    }

    pub fn is_writable(&self) -> bool {
        self.stat.writable
    }

    pub fn is_readable(&self) -> bool {
        self.stat.readable
    }

    pub fn directories_counter(&self) -> u64 {
        self.totals.directories
    }

    pub fn files_counter(&self) -> u64 {
        self.totals.files
    }

    pub fn summary_counter(&self) -> u64 {
        self.totals.files + self.totals.directories
    }

    pub fn summary_size(&self) -> u64 {
        self.totals.size
    }

    pub fn human_summary_size(&self) -> Option<String> {
        human_size(self.totals.size)
    }

    pub fn hash(&self) -> String {
        identity_hash(&self.stat.path_name)
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DirectoryView<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    name: &'a str,
    owner: u32,
    permissions: u32,
    access_time: i64,
    modification_time: i64,
    change_time: i64,
    is_writable: bool,
    is_readable: bool,
    directories_counter: u64,
    files_counter: u64,
    summary_counter: u64,
    summary_size: u64,
    human_summary_size: Option<String>,
    hash: String,
}

impl Serialize for Directory {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        DirectoryView {
            kind: "directory",
            name: self.name(),
            owner: self.owner(),
            permissions: self.permissions(),
            access_time: self.access_time(),
            modification_time: self.modification_time(),
            change_time: self.change_time(),
            is_writable: self.is_writable(),
            is_readable: self.is_readable(),
            directories_counter: self.directories_counter(),
            files_counter: self.files_counter(),
            summary_counter: self.summary_counter(),
            summary_size: self.summary_size(),
            human_summary_size: self.human_summary_size(),
            hash: self.hash(),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::PathBuf;

    pub(crate) fn stat(path_name: &str) -> Stat {
        let path_name = PathBuf::from(path_name);
        Stat {
            name: crate::scope_path::file_name_string(&path_name),
            path: crate::scope_path::parent_path(&path_name),
            real_path: Some(path_name.clone()),
            path_name,
            owner: 1000,
            permissions: 0o40755,
            access_time: 1_700_000_000,
            modification_time: 1_700_000_100,
            change_time: 1_700_000_200,
            writable: true,
            readable: true,
        }
    }

    #[test]
    fn test_absorb_counts_child_and_its_subtree() {
        let mut parent = Totals::default();
        let nested = Totals {
            directories: 1,
            files: 2,
            size: 30,
        };
        parent.absorb(&nested, true, 0);
        parent.absorb(&Totals::default(), false, 12);

        assert_eq!(
            parent,
            Totals {
                directories: 2,
                files: 3,
                size: 42,
            }
        );
    }

    #[test]
    fn test_summary_counter_is_sum() {
        let dir = Directory::new(
            stat("/srv/data"),
            Totals {
                directories: 3,
                files: 4,
                size: 2048,
            },
        );
        assert_eq!(dir.summary_counter(), 7);
        assert_eq!(dir.human_summary_size().as_deref(), Some("2 kB"));
        assert_eq!(dir.name(), "data");
        assert_eq!(dir.path(), Path::new("/srv"));
    }

    #[test]
    fn test_serialized_shape() {
        let dir = Directory::new(stat("/srv/data"), Totals::default());
        let json = serde_json::to_value(&dir).unwrap();

        assert_eq!(json["type"], "directory");
        assert_eq!(json["name"], "data");
        assert_eq!(json["isWritable"], true);
        assert_eq!(json["summaryCounter"], 0);
        assert!(json["humanSummarySize"].is_null());
        assert_eq!(json["hash"].as_str().unwrap().len(), 32);

        let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys.len(), 15);
        assert!(!keys.contains(&"path"));
    }
}
