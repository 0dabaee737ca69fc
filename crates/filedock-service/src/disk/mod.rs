//! Disk registry: named storage backends.

pub mod service;

pub use service::{CreateDiskRequest, DiskService, UpdateDiskRequest};
