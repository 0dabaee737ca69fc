//! Disk domain entities.

pub mod model;

pub use model::{CreateDisk, Disk, is_valid_slug};
