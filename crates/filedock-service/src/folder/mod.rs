//! Folder tree: hierarchical grouping of files within a disk.

pub mod service;
pub mod tree;

pub use service::{CreateFolderRequest, FolderService};
pub use tree::TreeService;
