//! Core traits defined in `filedock-core` and implemented by other crates.

pub mod storage;

pub use storage::{DiskAdapter, StorageObjectMeta};
