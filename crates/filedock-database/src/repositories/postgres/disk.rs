//! Disk repository over the `disks` and `disk_translations` tables.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use filedock_core::error::AppError;
use filedock_core::result::AppResult;
use filedock_core::types::{DiskId, Translations};
use filedock_entity::disk::{CreateDisk, Disk};

use super::map_db_error;
use crate::repositories::DiskRepository;

const DISK_COLUMNS: &str = "id, slug, adapter, created_at, updated_at";

#[derive(Debug, FromRow)]
struct DiskRow {
    id: DiskId,
    slug: String,
    adapter: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct TranslationRow {
    disk_id: DiskId,
    locale: String,
    name: Option<String>,
    description: Option<String>,
}

/// PostgreSQL implementation of [`DiskRepository`].
#[derive(Debug, Clone)]
pub struct PgDiskRepository {
    pool: PgPool,
}

impl PgDiskRepository {
    /// Create a new disk repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn attach_translations(&self, rows: Vec<DiskRow>) -> AppResult<Vec<Disk>> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id.into_uuid()).collect();
        let translations = sqlx::query_as::<_, TranslationRow>(
            "SELECT disk_id, locale, name, description FROM disk_translations \
             WHERE disk_id = ANY($1)",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error("Failed to load disk translations"))?;

        let mut by_disk: HashMap<DiskId, (Translations, Translations)> = HashMap::new();
        for row in translations {
            let (name, description) = by_disk.entry(row.disk_id).or_default();
            if let Some(value) = row.name {
                name.set(row.locale.clone(), value);
            }
            if let Some(value) = row.description {
                description.set(row.locale, value);
            }
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let (name, description) = by_disk.remove(&row.id).unwrap_or_default();
                Disk {
                    id: row.id,
                    slug: row.slug,
                    adapter: row.adapter,
                    name,
                    description,
                    created_at: row.created_at,
                    updated_at: row.updated_at,
                }
            })
            .collect())
    }

    async fn with_translations(&self, row: Option<DiskRow>) -> AppResult<Option<Disk>> {
        match row {
            Some(row) => Ok(self.attach_translations(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }
}

async fn write_translations(
    tx: &mut Transaction<'_, Postgres>,
    disk_id: DiskId,
    name: &Translations,
    description: &Translations,
) -> AppResult<()> {
    sqlx::query("DELETE FROM disk_translations WHERE disk_id = $1")
        .bind(disk_id)
        .execute(&mut **tx)
        .await
        .map_err(map_db_error("Failed to clear disk translations"))?;

    let mut locales: Vec<&str> = name.iter().map(|(l, _)| l).collect();
    locales.extend(description.iter().map(|(l, _)| l));
    locales.sort_unstable();
    locales.dedup();

    for locale in locales {
        sqlx::query(
            "INSERT INTO disk_translations (disk_id, locale, name, description) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(disk_id)
        .bind(locale)
        .bind(name.get_exact(locale))
        .bind(description.get_exact(locale))
        .execute(&mut **tx)
        .await
        .map_err(map_db_error("Failed to save disk translation"))?;
    }
    Ok(())
}

#[async_trait]
impl DiskRepository for PgDiskRepository {
    async fn find_by_id(&self, id: DiskId) -> AppResult<Option<Disk>> {
        let row = sqlx::query_as::<_, DiskRow>(&format!(
            "SELECT {DISK_COLUMNS} FROM disks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("Failed to find disk"))?;
        self.with_translations(row).await
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Disk>> {
        let row = sqlx::query_as::<_, DiskRow>(&format!(
            "SELECT {DISK_COLUMNS} FROM disks WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error("Failed to find disk by slug"))?;
        self.with_translations(row).await
    }

    async fn find_all(&self) -> AppResult<Vec<Disk>> {
        let rows = sqlx::query_as::<_, DiskRow>(&format!(
            "SELECT {DISK_COLUMNS} FROM disks ORDER BY slug ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error("Failed to list disks"))?;
        self.attach_translations(rows).await
    }

    async fn name_taken(
        &self,
        locale: &str,
        name: &str,
        exclude: Option<DiskId>,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM disk_translations \
             WHERE locale = $1 AND name = $2 AND ($3::uuid IS NULL OR disk_id <> $3))",
        )
        .bind(locale)
        .bind(name)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error("Failed to check disk name"))
    }

    async fn create(&self, data: &CreateDisk) -> AppResult<Disk> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(map_db_error("Failed to begin transaction"))?;

        let row = sqlx::query_as::<_, DiskRow>(&format!(
            "INSERT INTO disks (id, slug, adapter) VALUES ($1, $2, $3) RETURNING {DISK_COLUMNS}"
        ))
        .bind(DiskId::new())
        .bind(&data.slug)
        .bind(&data.adapter)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error("Failed to create disk"))?;

        write_translations(&mut tx, row.id, &data.name, &data.description).await?;
        tx.commit()
            .await
            .map_err(map_db_error("Failed to commit disk"))?;

        Ok(Disk {
            id: row.id,
            slug: row.slug,
            adapter: row.adapter,
            name: data.name.clone(),
            description: data.description.clone(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    async fn update(&self, disk: &Disk) -> AppResult<Disk> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(map_db_error("Failed to begin transaction"))?;

        let row = sqlx::query_as::<_, DiskRow>(&format!(
            "UPDATE disks SET updated_at = NOW() WHERE id = $1 RETURNING {DISK_COLUMNS}"
        ))
        .bind(disk.id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error("Failed to update disk"))?
        .ok_or_else(|| AppError::not_found(format!("Disk {} not found", disk.id)))?;

        write_translations(&mut tx, row.id, &disk.name, &disk.description).await?;
        tx.commit()
            .await
            .map_err(map_db_error("Failed to commit disk"))?;

        Ok(Disk {
            id: row.id,
            slug: row.slug,
            adapter: row.adapter,
            name: disk.name.clone(),
            description: disk.description.clone(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    async fn delete(&self, id: DiskId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM disks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error("Failed to delete disk"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn usage(&self, id: DiskId) -> AppResult<(u64, u64)> {
        let (folders, files) = sqlx::query_as::<_, (i64, i64)>(
            "SELECT (SELECT COUNT(*) FROM folders WHERE disk_id = $1), \
                    (SELECT COUNT(*) FROM files WHERE disk_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error("Failed to count disk usage"))?;
        Ok((folders.max(0) as u64, files.max(0) as u64))
    }
}
