//! # filedock-service
//!
//! Registry services for FileDock. Each service orchestrates repositories,
//! the adapter registry and the event bus to implement one component:
//! disks, the folder tree, the file registry, and path/presentation
//! resolution.
//!
//! Services follow constructor injection; all dependencies are provided at
//! construction time as `Arc`s or cheap clones. [`FileDock`] wires the full
//! set from configuration.

pub mod context;
pub mod disk;
pub mod file;
pub mod folder;
pub mod presenter;
pub mod registry;

pub use context::UrlContext;
pub use disk::{CreateDiskRequest, DiskService, UpdateDiskRequest};
pub use file::{
    Entry, EntryResolver, EntryResolverRegistry, FileMetadataPatch, FileRegistry,
    RegisterFileRequest, ResolvedFile,
};
pub use folder::{CreateFolderRequest, FolderService, TreeService};
pub use presenter::{FilePresenter, ImageFit, ImageParams, Thumbnail};
pub use registry::FileDock;
