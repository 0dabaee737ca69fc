//! # filedock-core
//!
//! Core crate for FileDock. Contains the disk adapter trait, configuration
//! schemas, typed identifiers, translatable values, domain events and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other FileDock crates.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
