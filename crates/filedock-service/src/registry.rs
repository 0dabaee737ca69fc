//! The wired-up registry: repositories, adapters, event bus and services.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use filedock_core::config::AppConfig;
use filedock_core::events::EventBus;
use filedock_core::result::AppResult;
use filedock_database::repositories::Repositories;
use filedock_entity::disk::Disk;
use filedock_storage::{AdapterRegistry, StorageReclaimer};

use crate::context::UrlContext;
use crate::disk::DiskService;
use crate::file::{EntryResolverRegistry, FileRegistry, ResolvedFile};
use crate::folder::{FolderService, TreeService};
use crate::presenter::FilePresenter;

/// Shared handle to every service of one registry.
///
/// Cloning is cheap; all fields are reference counted.
#[derive(Debug, Clone)]
pub struct FileDock {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Default URL context built from the presentation config
    pub url_context: UrlContext,

    // ── Infrastructure ───────────────────────────────────────
    /// Repositories bound to the configured backend
    pub repositories: Repositories,
    /// Mounted disk adapters
    pub adapters: AdapterRegistry,
    /// Domain event bus
    pub events: EventBus,

    // ── Services ─────────────────────────────────────────────
    /// Disk records
    pub disks: Arc<DiskService>,
    /// Folder records
    pub folders: Arc<FolderService>,
    /// Folder trees and breadcrumbs
    pub tree: Arc<TreeService>,
    /// File records and content
    pub files: Arc<FileRegistry>,
}

impl FileDock {
    /// Wire services over existing infrastructure.
    pub fn new(
        config: AppConfig,
        repositories: Repositories,
        adapters: AdapterRegistry,
        events: EventBus,
    ) -> AppResult<Self> {
        let url_context = UrlContext::from_config(&config.presentation)?;

        let disks = DiskService::new(
            repositories.disks.clone(),
            adapters.clone(),
            events.clone(),
        );
        let folders = FolderService::new(
            repositories.folders.clone(),
            repositories.disks.clone(),
            repositories.files.clone(),
            events.clone(),
        );
        let tree = TreeService::new(
            repositories.folders.clone(),
            repositories.disks.clone(),
            repositories.files.clone(),
        );
        let files = FileRegistry::new(
            repositories.files.clone(),
            repositories.folders.clone(),
            repositories.disks.clone(),
            adapters.clone(),
            events.clone(),
            &config.storage,
        );

        Ok(Self {
            config: Arc::new(config),
            url_context,
            repositories,
            adapters,
            events,
            disks: Arc::new(disks),
            folders: Arc::new(folders),
            tree: Arc::new(tree),
            files: Arc::new(files),
        })
    }

    /// Build everything the configuration describes.
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        let repositories = Repositories::from_config(&config.database).await?;
        let adapters = AdapterRegistry::from_config(&config.storage).await?;
        let events = EventBus::new(config.events.buffer_size);

        info!(
            backend = ?config.database.backend,
            adapters = ?adapters.names(),
            "Registry infrastructure ready"
        );

        Self::new(config, repositories, adapters, events)
    }

    /// Replace the file registry's entry resolvers.
    pub fn with_entry_resolvers(mut self, entries: EntryResolverRegistry) -> Self {
        let files = (*self.files).clone().with_entry_resolvers(entries);
        self.files = Arc::new(files);
        self
    }

    /// Create every configured disk that does not exist yet.
    pub async fn provision_disks(&self) -> AppResult<Vec<Disk>> {
        let locale = &self.config.presentation.default_locale;
        let mut disks = Vec::with_capacity(self.config.disks.len());
        for seed in &self.config.disks {
            disks.push(self.disks.ensure_disk(seed, locale).await?);
        }
        Ok(disks)
    }

    /// Presenter for `resolved` using the configured display settings.
    pub fn presenter<'a>(
        &'a self,
        resolved: &'a ResolvedFile,
        ctx: &'a UrlContext,
    ) -> FilePresenter<'a> {
        FilePresenter::new(resolved, ctx, &self.adapters).with_config(&self.config.presentation)
    }

    /// A reclaimer over this registry's adapters that leaves locations
    /// taken over by live files alone.
    pub fn reclaimer(&self) -> StorageReclaimer {
        StorageReclaimer::new(self.adapters.clone()).with_guard(self.files.clone())
    }

    /// Subscribe a reclaimer to the event bus and run it in the background.
    pub fn spawn_reclaimer(&self, cancel: watch::Receiver<bool>) -> JoinHandle<()> {
        self.reclaimer().spawn(self.events.subscribe(), cancel)
    }
}
