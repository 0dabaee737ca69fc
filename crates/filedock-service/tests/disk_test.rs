//! Integration tests for disk records.

mod common;

use filedock_core::error::ErrorKind;
use filedock_core::types::Translations;
use filedock_service::{CreateDiskRequest, RegisterFileRequest, UpdateDiskRequest};

use common::TestDock;

#[tokio::test]
async fn test_slug_and_name_are_unique() {
    let t = TestDock::new().await;

    let err = t
        .dock
        .disks
        .create_disk(CreateDiskRequest::new("en", "Other", "local", "local"))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Validation));

    let err = t
        .dock
        .disks
        .create_disk(CreateDiskRequest::new("en", "Local", "local-2", "local"))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Validation));

    // same name in another locale is a different translation
    t.dock
        .disks
        .create_disk(CreateDiskRequest::new("fr", "Local", "local-fr", "local"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_unmounted_adapter_is_rejected() {
    let t = TestDock::new().await;
    let err = t
        .dock
        .disks
        .create_disk(CreateDiskRequest::new("en", "S3", "s3", "s3"))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Validation));
}

#[tokio::test]
async fn test_invalid_slug_is_rejected() {
    let t = TestDock::new().await;
    let err = t
        .dock
        .disks
        .create_disk(CreateDiskRequest::new("en", "Mine", "My Disk", "local"))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Validation));
}

#[tokio::test]
async fn test_translations_fall_back() {
    let t = TestDock::new().await;

    let disk = t
        .dock
        .disks
        .update_disk(
            t.disk.id,
            UpdateDiskRequest {
                name: Some(Translations::single("fr", "Disque local")),
                description: Some(Translations::single("en", "Default disk")),
            },
        )
        .await
        .unwrap();

    assert_eq!(disk.display_name("fr", "en"), "Disque local");
    assert_eq!(disk.display_name("de", "en"), "Local");
    assert_eq!(disk.display_description("fr", "en"), Some("Default disk"));
    assert_eq!(disk.slug, "local");
}

#[tokio::test]
async fn test_delete_blocked_while_files_exist() {
    let t = TestDock::new().await;
    let file = t
        .dock
        .files
        .register_file(RegisterFileRequest::new(t.disk.id, "a.txt", "hello"))
        .await
        .unwrap();

    let err = t.dock.disks.delete_disk(t.disk.id).await.unwrap_err();
    assert!(err.is(ErrorKind::Validation));

    t.dock.files.delete_file(file.id).await.unwrap();
    t.dock.disks.delete_disk(t.disk.id).await.unwrap();
    t.dock.disks.delete_disk(t.disk.id).await.unwrap();

    let err = t.dock.disks.get_disk("local").await.unwrap_err();
    assert!(err.is(ErrorKind::NotFound));
}

#[tokio::test]
async fn test_list_disks_orders_by_slug() {
    let t = TestDock::new().await;
    t.disk_on("Archive", "archive", "local").await;
    t.disk_on("Public", "public", "cdn").await;

    let slugs: Vec<_> = t
        .dock
        .disks
        .list_disks()
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.slug)
        .collect();
    assert_eq!(slugs, vec!["archive", "local", "public"]);
}
