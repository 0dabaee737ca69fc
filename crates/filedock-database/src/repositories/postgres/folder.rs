//! Folder repository over the `folders` table.

use async_trait::async_trait;
use sqlx::PgPool;

use filedock_core::result::AppResult;
use filedock_core::types::{DiskId, FolderId};
use filedock_entity::folder::{CreateFolder, Folder};

use super::map_db_error;
use crate::repositories::FolderRepository;

/// PostgreSQL implementation of [`FolderRepository`].
#[derive(Debug, Clone)]
pub struct PgFolderRepository {
    pool: PgPool,
}

impl PgFolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FolderRepository for PgFolderRepository {
    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error("Failed to find folder"))
    }

    async fn find_by_path(&self, disk_id: DiskId, path: &str) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE disk_id = $1 AND path = $2")
            .bind(disk_id)
            .bind(path)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error("Failed to find folder by path"))
    }

    async fn find_roots(&self, disk_id: DiskId) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE disk_id = $1 AND parent_id IS NULL ORDER BY name ASC",
        )
        .bind(disk_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error("Failed to list root folders"))
    }

    async fn find_children(&self, parent_id: FolderId) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE parent_id = $1 ORDER BY name ASC",
        )
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error("Failed to list child folders"))
    }

    async fn find_by_disk(&self, disk_id: DiskId) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE disk_id = $1 ORDER BY path ASC")
            .bind(disk_id)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error("Failed to list disk folders"))
    }

    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (id, disk_id, parent_id, name, path, depth) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(FolderId::new())
        .bind(data.disk_id)
        .bind(data.parent_id)
        .bind(&data.name)
        .bind(&data.path)
        .bind(data.depth)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error("Failed to create folder"))
    }

    async fn delete(&self, id: FolderId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error("Failed to delete folder"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_children(&self, id: FolderId) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM folders WHERE parent_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error("Failed to count child folders"))?;
        Ok(count.max(0) as u64)
    }
}
