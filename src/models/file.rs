use serde::{Serialize, Serializer};
use std::path::Path;

use super::{human_size, identity_hash, Stat};
use crate::scope_path::{join_url, strip_base};

/// A regular file as it was when parsed.
///
/// `base_path` and `base_host` are only set when the file was parsed in a
/// rooted context; they drive [`File::relative_path`] and [`File::url`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    stat: Stat,
    extension: String,
    size: u64,
    mime_type: Option<String>,
    base_path: Option<String>,
    base_host: Option<String>,
}

impl File {
    pub(crate) fn new(
        stat: Stat,
        extension: String,
        size: u64,
        mime_type: Option<String>,
        base_path: Option<String>,
        base_host: Option<String>,
    ) -> Self {
        Self {
            stat,
            extension,
            size,
            mime_type,
            base_path,
            base_host,
        }
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

    /// Empty when the name carries no extension.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn name_without_extension(&self) -> Option<&str> {
        if self.extension.is_empty() {
            return None;
        }
        let suffix = format!(".{}", self.extension);
        Some(self.name().strip_suffix(&suffix).unwrap_or(self.name()))
    }

    pub fn base_path(&self) -> Option<&str> {
        self.base_path.as_deref()
    }

    pub fn base_host(&self) -> Option<&str> {
        self.base_host.as_deref()
    }

    pub fn relative_path(&self) -> Option<String> {
        let base = self.base_path.as_deref()?;
        let real = self.real_path()?;
        Some(strip_base(&real.to_string_lossy(), base))
    }

    pub fn url(&self) -> Option<String> {
        let host = self.base_host.as_deref()?;
        let relative = self.relative_path()?;
        Some(join_url(host, &relative))
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

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn human_size(&self) -> Option<String> {
        human_size(self.size)
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    pub fn hash(&self) -> String {
        identity_hash(&self.stat.path_name)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FileView<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    name: &'a str,
    name_without_extension: Option<&'a str>,
    extension: &'a str,
    relative_path: Option<String>,
    owner: u32,
    permissions: u32,
    access_time: i64,
    modification_time: i64,
    change_time: i64,
    is_writable: bool,
    is_readable: bool,
    size: u64,
    human_size: Option<String>,
    mime_type: Option<&'a str>,
    hash: String,
    url: Option<String>,
}

impl Serialize for File {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        FileView {
            kind: "file",
            name: self.name(),
            name_without_extension: self.name_without_extension(),
            extension: self.extension(),
            relative_path: self.relative_path(),
            owner: self.owner(),
            permissions: self.permissions(),
            access_time: self.access_time(),
            modification_time: self.modification_time(),
            change_time: self.change_time(),
            is_writable: self.is_writable(),
            is_readable: self.is_readable(),
            size: self.size(),
            human_size: self.human_size(),
            mime_type: self.mime_type(),
            hash: self.hash(),
            url: self.url(),
        }
        .serialize(serializer)
    }
}
