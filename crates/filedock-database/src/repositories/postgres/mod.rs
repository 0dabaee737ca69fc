//! PostgreSQL repositories backed by a shared sqlx pool.

mod disk;
mod file;
mod folder;

pub use disk::PgDiskRepository;
pub use file::PgFileRepository;
pub use folder::PgFolderRepository;

use filedock_core::error::{AppError, ErrorKind};

/// Map a sqlx error, turning constraint violations into validation errors.
fn map_db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        let violation = match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => Some(format!(
                "{context}: duplicate value violates {}",
                db.constraint().unwrap_or("a unique constraint")
            )),
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => Some(format!(
                "{context}: record is referenced or references a missing record ({})",
                db.constraint().unwrap_or("foreign key")
            )),
            sqlx::Error::Database(db) if db.is_check_violation() => Some(format!(
                "{context}: value rejected by {}",
                db.constraint().unwrap_or("a check constraint")
            )),
            _ => None,
        };
        match violation {
            Some(message) => AppError::with_source(ErrorKind::Validation, message, e),
            None => AppError::with_source(ErrorKind::Database, context, e),
        }
    }
}
