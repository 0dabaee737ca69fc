//! # filedock-database
//!
//! Persistence boundary for FileDock. Defines the repository traits the
//! services depend on, a PostgreSQL implementation (sqlx) and an in-memory
//! store used for embedding and tests.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::Repositories;
