//! File domain entities.

pub mod entry;
pub mod kind;
pub mod model;

pub use entry::EntryRef;
pub use kind::FileType;
pub use model::{CreateFile, File, storage_location};
