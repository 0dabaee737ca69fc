//! File registry: records of uploaded files and their relations.

pub mod entry;
pub mod inspect;
pub mod request;
pub mod resolved;
pub mod service;

pub use entry::{Entry, EntryResolver, EntryResolverRegistry};
pub use inspect::ContentInfo;
pub use request::{FileMetadataPatch, RegisterFileRequest};
pub use resolved::ResolvedFile;
pub use service::FileRegistry;
