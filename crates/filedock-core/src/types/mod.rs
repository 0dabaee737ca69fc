//! Core type definitions used across the FileDock workspace.

pub mod id;
pub mod translation;

pub use id::*;
pub use translation::Translations;
