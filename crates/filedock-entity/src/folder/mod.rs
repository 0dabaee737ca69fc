//! Folder domain entities.

pub mod model;
pub mod tree;

pub use model::{CreateFolder, Folder, validate_name};
pub use tree::{FolderNode, FolderTree};
