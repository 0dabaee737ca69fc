//! FileDock provisioning tool.
//!
//! Loads configuration, connects the registry backend, mounts the
//! configured adapters, creates any seeded disks that do not exist yet and
//! reports adapter health.

use filedock_core::config::AppConfig;
use filedock_core::error::AppError;
use filedock_core::logging;
use filedock_service::FileDock;

#[tokio::main]
async fn main() {
    let env = std::env::var("FILEDOCK_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::init(&config.logging) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    if let Err(e) = run(config, &env).await {
        tracing::error!("Provisioning failed: {e}");
        std::process::exit(1);
    }
}

/// Provision disks and check adapters.
async fn run(config: AppConfig, env: &str) -> Result<(), AppError> {
    tracing::info!(env, "Starting FileDock v{}", env!("CARGO_PKG_VERSION"));

    let dock = FileDock::from_config(config).await?;

    let seeded = dock.provision_disks().await?;
    tracing::info!(count = seeded.len(), "Seeded disks ensured");

    let locale = &dock.url_context.locale;
    let fallback = &dock.url_context.fallback_locale;
    for disk in dock.disks.list_disks().await? {
        tracing::info!(
            slug = %disk.slug,
            adapter = %disk.adapter,
            name = disk.display_name(locale, fallback),
            "Disk available"
        );
    }

    let mut unhealthy = 0;
    for (name, healthy) in dock.adapters.health_check_all().await {
        if healthy {
            tracing::info!(adapter = %name, "Adapter healthy");
        } else {
            tracing::warn!(adapter = %name, "Adapter unhealthy");
            unhealthy += 1;
        }
    }

    if unhealthy > 0 {
        return Err(AppError::storage(format!(
            "{unhealthy} adapter(s) failed their health check"
        )));
    }

    tracing::info!("Provisioning complete");
    Ok(())
}
