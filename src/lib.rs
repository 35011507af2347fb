//! Filesystem metadata and manipulation: typed directory/file snapshots with
//! subtree aggregates, collision-aware copy/move/rename, recursive removal,
//! trees and attribute-pattern search.
//!
//! Everything is synchronous `std::fs`. Diagnostics go through the `log`
//! facade; installing a logger is left to the host.

pub mod error;
pub mod models;
pub mod roots;
pub mod safety;
pub mod scope_path;
pub mod services;

pub use error::DirError;
pub use models::directory::Directory;
pub use models::entry::{Entry, ListMode};
pub use models::file::File;
pub use models::operation::{CopyReport, CreateOutcome, ItemFailure, OperationType};
pub use models::options::{
    CopyOptions, CreateOptions, ErrorPolicy, ExistingPolicy, ParseContext,
};
pub use models::search::{DirectoryAttribute, FileAttribute, OneMatch};
pub use models::tree::TreeNode;
pub use roots::Roots;
