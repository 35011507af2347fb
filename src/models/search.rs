use std::str::FromStr;

use super::directory::Directory;
use super::file::File;
use crate::error::DirError;

/// Result of a lookup that expects a single match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OneMatch<T> {
    Found(T),
    NotFound,
    /// More than one entity matched; carries the match count.
    Ambiguous(usize),
}

impl<T> OneMatch<T> {
    pub(crate) fn from_matches(mut matches: Vec<T>) -> Self {
        match matches.len() {
            0 => Self::NotFound,
            1 => matches.pop().map_or(Self::NotFound, Self::Found),
            n => Self::Ambiguous(n),
        }
    }

    /// Collapses "none" and "too many" into `None`.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Found(item) => Some(item),
            Self::NotFound | Self::Ambiguous(_) => None,
        }
    }
}

/// Lower-cases and drops `_` so `pathName`, `path_name` and `PATHNAME` agree.
fn attribute_key(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAttribute {
    Name,
    NameWithoutExtension,
    Extension,
    Path,
    PathName,
    RealPath,
    RelativePath,
    Url,
    BasePath,
    BaseHost,
    Owner,
    Permissions,
    AccessTime,
    ModificationTime,
    ChangeTime,
    Size,
    HumanSize,
    MimeType,
    Hash,
}

impl FromStr for FileAttribute {
    type Err = DirError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let attribute = match attribute_key(s).as_str() {
            "name" => Self::Name,
            "namewithoutextension" => Self::NameWithoutExtension,
            "extension" => Self::Extension,
            "path" => Self::Path,
            "pathname" => Self::PathName,
            "realpath" => Self::RealPath,
            "relativepath" => Self::RelativePath,
            "url" => Self::Url,
            "basepath" => Self::BasePath,
            "basehost" => Self::BaseHost,
            "owner" => Self::Owner,
            "permissions" => Self::Permissions,
            "accesstime" => Self::AccessTime,
            "modificationtime" => Self::ModificationTime,
            "changetime" => Self::ChangeTime,
            "size" => Self::Size,
            "humansize" => Self::HumanSize,
            "mimetype" => Self::MimeType,
            "hash" => Self::Hash,
            _ => {
                return Err(DirError::UnknownAttribute {
                    target: "file",
                    name: s.to_string(),
                })
            }
        };
        Ok(attribute)
    }
}

impl FileAttribute {
    /// Text the pattern is matched against; `None` never matches.
    pub fn value(self, file: &File) -> Option<String> {
        match self {
            Self::Name => Some(file.name().to_string()),
            Self::NameWithoutExtension => file.name_without_extension().map(str::to_string),
            Self::Extension => Some(file.extension().to_string()),
            Self::Path => Some(file.path().to_string_lossy().to_string()),
            Self::PathName => Some(file.path_name().to_string_lossy().to_string()),
            Self::RealPath => file.real_path().map(|p| p.to_string_lossy().to_string()),
            Self::RelativePath => file.relative_path(),
            Self::Url => file.url(),
            Self::BasePath => file.base_path().map(str::to_string),
            Self::BaseHost => file.base_host().map(str::to_string),
            Self::Owner => Some(file.owner().to_string()),
            Self::Permissions => Some(file.permissions().to_string()),
            Self::AccessTime => Some(file.access_time().to_string()),
            Self::ModificationTime => Some(file.modification_time().to_string()),
            Self::ChangeTime => Some(file.change_time().to_string()),
            Self::Size => Some(file.size().to_string()),
            Self::HumanSize => file.human_size(),
            Self::MimeType => file.mime_type().map(str::to_string),
            Self::Hash => Some(file.hash()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryAttribute {
    Name,
    Path,
    PathName,
    RealPath,
    Owner,
    Permissions,
    AccessTime,
    ModificationTime,
    ChangeTime,
    DirectoriesCounter,
    FilesCounter,
    SummaryCounter,
    SummarySize,
    HumanSummarySize,
    Hash,
}

impl FromStr for DirectoryAttribute {
    type Err = DirError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let attribute = match attribute_key(s).as_str() {
            "name" => Self::Name,
            "path" => Self::Path,
            "pathname" => Self::PathName,
            "realpath" => Self::RealPath,
            "owner" => Self::Owner,
            "permissions" => Self::Permissions,
            "accesstime" => Self::AccessTime,
            "modificationtime" => Self::ModificationTime,
            "changetime" => Self::ChangeTime,
            "directoriescounter" => Self::DirectoriesCounter,
            "filescounter" => Self::FilesCounter,
            "summarycounter" => Self::SummaryCounter,
            "summarysize" => Self::SummarySize,
            "humansummarysize" => Self::HumanSummarySize,
            "hash" => Self::Hash,
            _ => {
                return Err(DirError::UnknownAttribute {
                    target: "directory",
                    name: s.to_string(),
                })
            }
        };
        Ok(attribute)
    }
}

impl DirectoryAttribute {
    pub fn value(self, directory: &Directory) -> Option<String> {
        match self {
            Self::Name => Some(directory.name().to_string()),
            Self::Path => Some(directory.path().to_string_lossy().to_string()),
            Self::PathName => Some(directory.path_name().to_string_lossy().to_string()),
            Self::RealPath => directory
                .real_path()
                .map(|p| p.to_string_lossy().to_string()),
            Self::Owner => Some(directory.owner().to_string()),
            Self::Permissions => Some(directory.permissions().to_string()),
            Self::AccessTime => Some(directory.access_time().to_string()),
            Self::ModificationTime => Some(directory.modification_time().to_string()),
            Self::ChangeTime => Some(directory.change_time().to_string()),
            Self::DirectoriesCounter => Some(directory.directories_counter().to_string()),
            Self::FilesCounter => Some(directory.files_counter().to_string()),
            Self::SummaryCounter => Some(directory.summary_counter().to_string()),
            Self::SummarySize => Some(directory.summary_size().to_string()),
            Self::HumanSummarySize => directory.human_summary_size(),
            Self::Hash => Some(directory.hash()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_names_are_case_and_underscore_insensitive() {
        assert_eq!("name".parse::<FileAttribute>().unwrap(), FileAttribute::Name);
        assert_eq!(
            "pathName".parse::<FileAttribute>().unwrap(),
            FileAttribute::PathName
        );
        assert_eq!(
            "path_name".parse::<FileAttribute>().unwrap(),
            FileAttribute::PathName
        );
        assert_eq!(
            "MimeType".parse::<FileAttribute>().unwrap(),
            FileAttribute::MimeType
        );
        assert_eq!(
            "files_counter".parse::<DirectoryAttribute>().unwrap(),
            DirectoryAttribute::FilesCounter
        );
    }

    #[test]
    fn test_unknown_attribute_is_typed_error() {
        let err = "colour".parse::<FileAttribute>().unwrap_err();
        assert!(matches!(
            err,
            DirError::UnknownAttribute { target: "file", ref name } if name == "colour"
        ));
    }

    #[test]
    fn test_file_only_attributes_rejected_for_directories() {
        assert!("extension".parse::<DirectoryAttribute>().is_err());
        assert!("mimeType".parse::<DirectoryAttribute>().is_err());
        assert!("summarySize".parse::<FileAttribute>().is_err());
    }

    #[test]
    fn test_one_match_collapses() {
        assert_eq!(OneMatch::from_matches(vec![7]), OneMatch::Found(7));
        assert_eq!(OneMatch::<i32>::from_matches(vec![]), OneMatch::NotFound);
        assert_eq!(OneMatch::from_matches(vec![1, 2]), OneMatch::Ambiguous(2));
        assert_eq!(OneMatch::from_matches(vec![1, 2]).into_option(), None);
        assert_eq!(OneMatch::from_matches(vec![3]).into_option(), Some(3));
    }
}
