//! Disk CRUD with slug, name and adapter validation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use validator::{Validate, ValidationError};

use filedock_core::config::DiskSeed;
use filedock_core::error::AppError;
use filedock_core::events::{DiskEvent, EventBus};
use filedock_core::result::AppResult;
use filedock_core::types::{DiskId, Translations};
use filedock_database::repositories::DiskRepository;
use filedock_entity::disk::{CreateDisk, Disk, is_valid_slug};
use filedock_storage::AdapterRegistry;

/// Request to create a new disk.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateDiskRequest {
    /// Display name per locale; at least one is required.
    #[validate(custom(function = "validate_has_translation"))]
    pub name: Translations,
    /// Unique slug.
    #[validate(
        length(min = 1, max = 64, message = "Disk slug must be 1-64 characters"),
        custom(function = "validate_slug")
    )]
    pub slug: String,
    /// Name of a mounted adapter.
    #[validate(length(min = 1, message = "Disk adapter is required"))]
    pub adapter: String,
    /// Optional description per locale.
    #[serde(default)]
    pub description: Translations,
}

impl CreateDiskRequest {
    /// Request with the name given in a single locale.
    pub fn new(
        locale: &str,
        name: impl Into<String>,
        slug: impl Into<String>,
        adapter: impl Into<String>,
    ) -> Self {
        Self {
            name: Translations::single(locale, name),
            slug: slug.into(),
            adapter: adapter.into(),
            description: Translations::new(),
        }
    }

    /// Attach a description in `locale`.
    pub fn with_description(mut self, locale: &str, description: impl Into<String>) -> Self {
        self.description.set(locale, description);
        self
    }
}

/// Request to update a disk's translatable fields. Slug and adapter are
/// fixed at creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDiskRequest {
    /// Name values merged per locale; blank values remove a locale.
    #[serde(default)]
    pub name: Option<Translations>,
    /// Description values merged per locale.
    #[serde(default)]
    pub description: Option<Translations>,
}

fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if is_valid_slug(slug) {
        Ok(())
    } else {
        let mut err = ValidationError::new("slug");
        err.message = Some(
            "Disk slug may only contain lowercase letters, digits, '-' and '_'".into(),
        );
        Err(err)
    }
}

fn validate_has_translation(name: &Translations) -> Result<(), ValidationError> {
    if name.is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("Disk name is required".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Manages disk records.
#[derive(Debug, Clone)]
pub struct DiskService {
    /// Disk repository.
    disk_repo: Arc<dyn DiskRepository>,
    /// Mounted adapters; a disk may only name one of these.
    adapters: AdapterRegistry,
    /// Event bus.
    events: EventBus,
}

impl DiskService {
    /// Creates a new disk service.
    pub fn new(
        disk_repo: Arc<dyn DiskRepository>,
        adapters: AdapterRegistry,
        events: EventBus,
    ) -> Self {
        Self {
            disk_repo,
            adapters,
            events,
        }
    }

    /// Creates a disk.
    pub async fn create_disk(&self, req: CreateDiskRequest) -> AppResult<Disk> {
        req.validate()?;

        if !self.adapters.contains(&req.adapter) {
            return Err(AppError::validation(format!(
                "Disk adapter '{}' is not mounted",
                req.adapter
            )));
        }

        if self.disk_repo.find_by_slug(&req.slug).await?.is_some() {
            return Err(AppError::validation(format!(
                "A disk with slug '{}' already exists",
                req.slug
            )));
        }
        self.ensure_names_free(&req.name, None).await?;

        let disk = self
            .disk_repo
            .create(&CreateDisk {
                slug: req.slug,
                adapter: req.adapter,
                name: req.name,
                description: req.description,
            })
            .await?;

        self.events.publish(DiskEvent::Created {
            disk_id: disk.id,
            slug: disk.slug.clone(),
            adapter: disk.adapter.clone(),
        });
        info!(disk_id = %disk.id, slug = %disk.slug, adapter = %disk.adapter, "Disk created");

        Ok(disk)
    }

    /// Gets a disk by slug.
    pub async fn get_disk(&self, slug: &str) -> AppResult<Disk> {
        self.disk_repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Disk '{slug}' not found")))
    }

    /// Gets a disk by ID.
    pub async fn get_disk_by_id(&self, id: DiskId) -> AppResult<Disk> {
        self.disk_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Disk {id} not found")))
    }

    /// Lists all disks ordered by slug.
    pub async fn list_disks(&self) -> AppResult<Vec<Disk>> {
        self.disk_repo.find_all().await
    }

    /// Merges new translations into a disk.
    pub async fn update_disk(&self, id: DiskId, req: UpdateDiskRequest) -> AppResult<Disk> {
        let mut disk = self.get_disk_by_id(id).await?;
        let mut changed_fields = Vec::new();

        if let Some(name) = &req.name {
            let mut merged = disk.name.clone();
            merged.merge(name);
            if merged.is_empty() {
                return Err(AppError::validation("Disk name is required"));
            }
            if merged != disk.name {
                self.ensure_names_free(&merged, Some(id)).await?;
                disk.name = merged;
                changed_fields.push("name".to_string());
            }
        }

        if let Some(description) = &req.description {
            let mut merged = disk.description.clone();
            merged.merge(description);
            if merged != disk.description {
                disk.description = merged;
                changed_fields.push("description".to_string());
            }
        }

        if changed_fields.is_empty() {
            return Ok(disk);
        }

        let disk = self.disk_repo.update(&disk).await?;
        info!(disk_id = %disk.id, fields = ?changed_fields, "Disk updated");
        self.events.publish(DiskEvent::Updated {
            disk_id: disk.id,
            changed_fields,
        });
        Ok(disk)
    }

    /// Deletes a disk that no folder or file references. Unknown IDs are a
    /// no-op.
    pub async fn delete_disk(&self, id: DiskId) -> AppResult<()> {
        let Some(disk) = self.disk_repo.find_by_id(id).await? else {
            return Ok(());
        };

        let (folders, files) = self.disk_repo.usage(id).await?;
        if folders > 0 || files > 0 {
            return Err(AppError::validation(format!(
                "Disk '{}' still holds {folders} folder(s) and {files} file(s)",
                disk.slug
            )));
        }

        if self.disk_repo.delete(id).await? {
            self.events.publish(DiskEvent::Deleted {
                disk_id: id,
                slug: disk.slug.clone(),
            });
            info!(disk_id = %id, slug = %disk.slug, "Disk deleted");
        }
        Ok(())
    }

    /// Creates the seeded disk unless a disk with its slug exists.
    pub async fn ensure_disk(&self, seed: &DiskSeed, locale: &str) -> AppResult<Disk> {
        if let Some(existing) = self.disk_repo.find_by_slug(&seed.slug).await? {
            return Ok(existing);
        }
        let mut req = CreateDiskRequest::new(locale, &seed.name, &seed.slug, &seed.adapter);
        if let Some(description) = &seed.description {
            req = req.with_description(locale, description);
        }
        self.create_disk(req).await
    }

    async fn ensure_names_free(&self, name: &Translations, exclude: Option<DiskId>) -> AppResult<()> {
        for (locale, value) in name.iter() {
            if self.disk_repo.name_taken(locale, value, exclude).await? {
                return Err(AppError::validation(format!(
                    "A disk named '{value}' already exists for locale '{locale}'"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filedock_core::error::ErrorKind;
    use filedock_database::repositories::MemoryStore;
    use filedock_storage::providers::MemoryDiskAdapter;

    fn service() -> DiskService {
        let adapters = AdapterRegistry::builder()
            .mount("local", Arc::new(MemoryDiskAdapter::new(None)))
            .build();
        DiskService::new(Arc::new(MemoryStore::new()), adapters, EventBus::default())
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let service = service();
        let disk = service
            .create_disk(CreateDiskRequest::new("en", "Local", "local", "local"))
            .await
            .unwrap();
        assert_eq!(service.get_disk("local").await.unwrap().id, disk.id);
        assert!(service.get_disk("nope").await.unwrap_err().is(ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let service = service();
        for req in [
            CreateDiskRequest::new("en", "Local", "Local Disk", "local"),
            CreateDiskRequest::new("en", "  ", "local", "local"),
            CreateDiskRequest::new("en", "Local", "local", ""),
            CreateDiskRequest::new("en", "Local", "local", "s3"),
        ] {
            let err = service.create_disk(req).await.unwrap_err();
            assert!(err.is(ErrorKind::Validation), "{err}");
        }
    }

    #[tokio::test]
    async fn test_update_merges_and_revalidates_names() {
        let service = service();
        let a = service
            .create_disk(CreateDiskRequest::new("en", "Alpha", "alpha", "local"))
            .await
            .unwrap();
        service
            .create_disk(CreateDiskRequest::new("en", "Beta", "beta", "local"))
            .await
            .unwrap();

        let updated = service
            .update_disk(
                a.id,
                UpdateDiskRequest {
                    name: Some(Translations::single("fr", "Alpha FR")),
                    description: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name.get_exact("en"), Some("Alpha"));
        assert_eq!(updated.name.get_exact("fr"), Some("Alpha FR"));

        let err = service
            .update_disk(
                a.id,
                UpdateDiskRequest {
                    name: Some(Translations::single("en", "Beta")),
                    description: None,
                },
            )
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Validation));
    }

    #[tokio::test]
    async fn test_delete_unknown_is_noop() {
        let service = service();
        service.delete_disk(DiskId::new()).await.unwrap();
    }

    #[tokio::test]
    async fn test_ensure_disk_is_idempotent() {
        let service = service();
        let seed = DiskSeed {
            name: "Local".into(),
            slug: "local".into(),
            adapter: "local".into(),
            description: Some("Default disk".into()),
        };
        let first = service.ensure_disk(&seed, "en").await.unwrap();
        let second = service.ensure_disk(&seed, "en").await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.display_description("en", "en"), Some("Default disk"));
        assert_eq!(service.list_disks().await.unwrap().len(), 1);
    }
}
