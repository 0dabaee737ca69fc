//! # filedock-storage
//!
//! Disk adapters for FileDock. A disk names the adapter that holds its
//! bytes; the [`AdapterRegistry`] mounts adapters by name from
//! configuration, and the [`StorageReclaimer`] removes bytes after their
//! file records are deleted.

pub mod manager;
pub mod providers;
pub mod reclaimer;

pub use manager::AdapterRegistry;
pub use reclaimer::{LocationGuard, StorageReclaimer};
