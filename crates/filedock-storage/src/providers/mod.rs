//! Disk adapter implementations.

pub mod local;
pub mod memory;

pub use local::LocalDiskAdapter;
pub use memory::MemoryDiskAdapter;
