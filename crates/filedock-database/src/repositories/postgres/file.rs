//! File repository over the `files` table.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use filedock_core::error::AppError;
use filedock_core::result::AppResult;
use filedock_core::types::{DiskId, FileId, FolderId};
use filedock_entity::file::{CreateFile, EntryRef, File};

use super::map_db_error;
use crate::repositories::FileRepository;

#[derive(Debug, FromRow)]
struct FileRow {
    id: FileId,
    disk_id: DiskId,
    folder_id: Option<FolderId>,
    name: String,
    extension: String,
    mime_type: String,
    size_bytes: i64,
    hash: String,
    alt: Option<String>,
    description: Option<String>,
    keywords: Vec<String>,
    entry_type: Option<String>,
    entry_id: Option<String>,
    last_modified: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<FileRow> for File {
    fn from(row: FileRow) -> Self {
        Self {
            id: row.id,
            disk_id: row.disk_id,
            folder_id: row.folder_id,
            name: row.name,
            extension: row.extension,
            mime_type: row.mime_type,
            size_bytes: row.size_bytes,
            hash: row.hash,
            alt: row.alt,
            description: row.description,
            keywords: row.keywords,
            entry: EntryRef::from_parts(row.entry_type, row.entry_id),
            last_modified: row.last_modified,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL implementation of [`FileRepository`].
#[derive(Debug, Clone)]
pub struct PgFileRepository {
    pool: PgPool,
}

impl PgFileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileRepository for PgFileRepository {
    async fn find_by_id(&self, id: FileId) -> AppResult<Option<File>> {
        let row = sqlx::query_as::<_, FileRow>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error("Failed to find file"))?;
        Ok(row.map(File::from))
    }

    async fn find_by_name(
        &self,
        disk_id: DiskId,
        folder_id: Option<FolderId>,
        name: &str,
    ) -> AppResult<Option<File>> {
        let row = sqlx::query_as::<_, FileRow>(
            "SELECT * FROM files \
             WHERE disk_id = $1 AND folder_id IS NOT DISTINCT FROM $2 AND name = $3",
        )
        .bind(disk_id)
        .bind(folder_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("Failed to find file by name"))?;
        Ok(row.map(File::from))
    }

    async fn find_in_folder(
        &self,
        disk_id: DiskId,
        folder_id: Option<FolderId>,
    ) -> AppResult<Vec<File>> {
        let rows = sqlx::query_as::<_, FileRow>(
            "SELECT * FROM files \
             WHERE disk_id = $1 AND folder_id IS NOT DISTINCT FROM $2 ORDER BY name ASC",
        )
        .bind(disk_id)
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error("Failed to list files"))?;
        Ok(rows.into_iter().map(File::from).collect())
    }

    async fn find_by_entry(&self, entry: &EntryRef) -> AppResult<Vec<File>> {
        let rows = sqlx::query_as::<_, FileRow>(
            "SELECT * FROM files WHERE entry_type = $1 AND entry_id = $2 ORDER BY name ASC",
        )
        .bind(&entry.entity_type)
        .bind(&entry.entity_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error("Failed to list entry files"))?;
        Ok(rows.into_iter().map(File::from).collect())
    }

    async fn count_by_folder(&self, disk_id: DiskId) -> AppResult<HashMap<Option<FolderId>, u64>> {
        let rows = sqlx::query_as::<_, (Option<FolderId>, i64)>(
            "SELECT folder_id, COUNT(*) FROM files WHERE disk_id = $1 GROUP BY folder_id",
        )
        .bind(disk_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error("Failed to count files"))?;
        Ok(rows
            .into_iter()
            .map(|(folder_id, count)| (folder_id, count.max(0) as u64))
            .collect())
    }

    async fn create(&self, data: &CreateFile) -> AppResult<File> {
        let row = sqlx::query_as::<_, FileRow>(
            "INSERT INTO files (id, disk_id, folder_id, name, extension, mime_type, size_bytes, \
             hash, alt, description, keywords, entry_type, entry_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) RETURNING *",
        )
        .bind(FileId::new())
        .bind(data.disk_id)
        .bind(data.folder_id)
        .bind(&data.name)
        .bind(&data.extension)
        .bind(&data.mime_type)
        .bind(data.size_bytes)
        .bind(&data.hash)
        .bind(&data.alt)
        .bind(&data.description)
        .bind(&data.keywords)
        .bind(data.entry.as_ref().map(|e| e.entity_type.as_str()))
        .bind(data.entry.as_ref().map(|e| e.entity_id.as_str()))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error("Failed to create file"))?;
        Ok(row.into())
    }

    async fn update(&self, file: &File) -> AppResult<File> {
        let row = sqlx::query_as::<_, FileRow>(
            "UPDATE files SET folder_id = $2, name = $3, alt = $4, description = $5, \
             keywords = $6, entry_type = $7, entry_id = $8, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(file.id)
        .bind(file.folder_id)
        .bind(&file.name)
        .bind(&file.alt)
        .bind(&file.description)
        .bind(&file.keywords)
        .bind(file.entry.as_ref().map(|e| e.entity_type.as_str()))
        .bind(file.entry.as_ref().map(|e| e.entity_id.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("Failed to update file"))?
        .ok_or_else(|| AppError::not_found(format!("File {} not found", file.id)))?;
        Ok(row.into())
    }

    async fn delete(&self, id: FileId) -> AppResult<Option<File>> {
        let row = sqlx::query_as::<_, FileRow>("DELETE FROM files WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error("Failed to delete file"))?;
        Ok(row.map(File::from))
    }
}
