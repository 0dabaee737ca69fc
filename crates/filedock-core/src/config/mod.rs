//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every section has defaults so an empty configuration yields a
//! working in-memory registry.

pub mod database;
pub mod events;
pub mod logging;
pub mod presentation;
pub mod storage;

use serde::{Deserialize, Serialize};

pub use self::database::{DatabaseBackend, DatabaseConfig};
pub use self::events::EventsConfig;
pub use self::logging::LoggingConfig;
pub use self::presentation::{PresentationConfig, SizeScale};
pub use self::storage::{AdapterConfig, AdapterDriver, DiskSeed, StorageConfig};

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Persistence settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Disk adapter settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// URL generation and display settings.
    #[serde(default)]
    pub presentation: PresentationConfig,
    /// Event bus settings.
    #[serde(default)]
    pub events: EventsConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Disks provisioned at bootstrap.
    #[serde(default)]
    pub disks: Vec<DiskSeed>,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `FILEDOCK__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config", env)
    }

    /// Load configuration from an explicit directory.
    pub fn load_from(dir: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("FILEDOCK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_directory_yields_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config =
            AppConfig::load_from(dir.path().to_str().expect("utf-8"), "test").expect("defaults");
        assert_eq!(config.database.backend, DatabaseBackend::Memory);
        assert_eq!(config.presentation.size_scale, SizeScale::Binary);
        assert!(config.disks.is_empty());
    }

    #[test]
    fn test_load_toml_overlay() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(
            dir.path().join("default.toml"),
            r#"
            [presentation]
            base_url = "https://cdn.example.com/app"
            size_scale = "digit_count"

            [storage.adapters.public]
            driver = "memory"
            public_url = "https://files.example.com"

            [[disks]]
            name = "Public"
            slug = "public"
            adapter = "public"
            "#,
        )
        .expect("write config");

        let config =
            AppConfig::load_from(dir.path().to_str().expect("utf-8"), "test").expect("load");
        assert_eq!(config.presentation.base_url, "https://cdn.example.com/app");
        assert_eq!(config.presentation.size_scale, SizeScale::DigitCount);
        let adapter = &config.storage.adapters["public"];
        assert_eq!(adapter.driver, AdapterDriver::Memory);
        assert_eq!(
            adapter.public_url.as_deref(),
            Some("https://files.example.com")
        );
        assert_eq!(config.disks.len(), 1);
        assert_eq!(config.disks[0].slug, "public");
    }
}
