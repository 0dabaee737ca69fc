//! # filedock-entity
//!
//! Domain entity models for FileDock. Structs here are either persisted
//! records (disks, folders, files) or value objects derived from them
//! (file type, entry references, folder trees).

pub mod disk;
pub mod file;
pub mod folder;
