//! Integration tests for file registration, updates and deletion.

mod common;

use std::time::Duration;

use filedock_core::error::ErrorKind;
use filedock_core::events::{EventPayload, FileEvent};
use filedock_core::traits::storage::DiskAdapter;
use filedock_entity::file::{EntryRef, FileType};
use filedock_service::{CreateFolderRequest, FileMetadataPatch, RegisterFileRequest};
use tokio::sync::watch;

use common::TestDock;

#[tokio::test]
async fn test_register_file_records_content_info() {
    let t = TestDock::new().await;

    let file = t
        .dock
        .files
        .register_file(RegisterFileRequest::new(t.disk.id, "a.txt", "hello"))
        .await
        .unwrap();

    assert_eq!(file.size_bytes, 5);
    assert_eq!(file.extension, "txt");
    assert_eq!(file.mime_type, "text/plain");
    assert_eq!(file.file_type(), FileType::Document);
    assert_eq!(
        file.hash,
        "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
    );
    assert_eq!(t.local.read_bytes("a.txt").await.unwrap(), "hello");
}

#[tokio::test]
async fn test_register_file_in_folder_and_resolve_location() {
    let t = TestDock::new().await;
    let docs = t
        .dock
        .folders
        .create_folder(CreateFolderRequest {
            disk_id: t.disk.id,
            parent_id: None,
            name: "docs".into(),
        })
        .await
        .unwrap();

    let file = t
        .dock
        .files
        .register_file(RegisterFileRequest::new(t.disk.id, "a.txt", "hello").in_folder(docs.id))
        .await
        .unwrap();
    assert!(t.local.exists("docs/a.txt").await.unwrap());

    let resolved = t
        .dock
        .files
        .resolve_location("local", "docs/a.txt")
        .await
        .unwrap();
    assert_eq!(resolved.file.id, file.id);
    assert_eq!(resolved.location(), "docs/a.txt");

    let (_, content) = t.dock.files.read_content(file.id).await.unwrap();
    assert_eq!(content, "hello");
}

#[tokio::test]
async fn test_register_rejects_duplicate_name_in_folder() {
    let t = TestDock::new().await;
    let files = &t.dock.files;

    files
        .register_file(RegisterFileRequest::new(t.disk.id, "a.txt", "one"))
        .await
        .unwrap();
    let err = files
        .register_file(RegisterFileRequest::new(t.disk.id, "a.txt", "two"))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Validation));
    assert_eq!(t.local.read_bytes("a.txt").await.unwrap(), "one");
}

#[tokio::test]
async fn test_register_rejects_folder_from_another_disk() {
    let t = TestDock::new().await;
    let other = t.disk_on("Archive", "archive", "local").await;
    let folder = t
        .dock
        .folders
        .create_folder(CreateFolderRequest {
            disk_id: other.id,
            parent_id: None,
            name: "old".into(),
        })
        .await
        .unwrap();

    let err = t
        .dock
        .files
        .register_file(RegisterFileRequest::new(t.disk.id, "a.txt", "hello").in_folder(folder.id))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Validation));
}

#[tokio::test]
async fn test_register_unknown_disk_is_not_found() {
    let t = TestDock::new().await;
    let err = t
        .dock
        .files
        .register_file(RegisterFileRequest::new(
            filedock_core::types::DiskId::new(),
            "a.txt",
            "hello",
        ))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::NotFound));
}

#[tokio::test]
async fn test_failed_write_removes_record() {
    let t = TestDock::new().await;
    let disk = t.disk_on("Flaky", "flaky", "flaky").await;
    t.flaky.fail(true);

    let err = t
        .dock
        .files
        .register_file(RegisterFileRequest::new(disk.id, "a.txt", "hello"))
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Storage));
    assert!(t.dock.files.list_files(disk.id, None).await.unwrap().is_empty());

    t.flaky.fail(false);
    t.dock
        .files
        .register_file(RegisterFileRequest::new(disk.id, "a.txt", "hello"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_immutable_patch_is_rejected() {
    let t = TestDock::new().await;
    let file = t
        .dock
        .files
        .register_file(RegisterFileRequest::new(t.disk.id, "a.txt", "hello"))
        .await
        .unwrap();

    let patch = FileMetadataPatch {
        name: Some("b.txt".into()),
        hash: Some("0".repeat(64)),
        size: Some(1),
        ..Default::default()
    };
    let err = t
        .dock
        .files
        .update_metadata(file.id, patch)
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Validation));

    let unchanged = t.dock.files.get_file(file.id).await.unwrap();
    assert_eq!(unchanged, file);
    assert!(t.local.exists("a.txt").await.unwrap());
}

#[tokio::test]
async fn test_rename_and_move_relocate_bytes() {
    let t = TestDock::new().await;
    let docs = t
        .dock
        .folders
        .create_folder(CreateFolderRequest {
            disk_id: t.disk.id,
            parent_id: None,
            name: "docs".into(),
        })
        .await
        .unwrap();
    let file = t
        .dock
        .files
        .register_file(RegisterFileRequest::new(t.disk.id, "a.txt", "hello"))
        .await
        .unwrap();

    let renamed = t
        .dock
        .files
        .update_metadata(
            file.id,
            FileMetadataPatch {
                name: Some("b.txt".into()),
                folder_id: Some(Some(docs.id)),
                keywords: Some(vec!["zeta".into(), "alpha".into(), " zeta ".into()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(renamed.name, "b.txt");
    assert_eq!(renamed.folder_id, Some(docs.id));
    assert_eq!(renamed.keywords, vec!["alpha", "zeta"]);
    assert_eq!(renamed.hash, file.hash);
    assert!(!t.local.exists("a.txt").await.unwrap());
    assert_eq!(t.local.read_bytes("docs/b.txt").await.unwrap(), "hello");

    let back = t
        .dock
        .files
        .update_metadata(
            file.id,
            FileMetadataPatch {
                folder_id: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(back.folder_id, None);
    assert!(t.local.exists("b.txt").await.unwrap());
}

#[tokio::test]
async fn test_failed_rename_restores_record() {
    let t = TestDock::new().await;
    let disk = t.disk_on("Flaky", "flaky", "flaky").await;
    let file = t
        .dock
        .files
        .register_file(RegisterFileRequest::new(disk.id, "a.txt", "hello"))
        .await
        .unwrap();

    t.flaky.fail(true);
    let err = t
        .dock
        .files
        .update_metadata(
            file.id,
            FileMetadataPatch {
                name: Some("b.txt".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Storage));
    assert_eq!(t.dock.files.get_file(file.id).await.unwrap().name, "a.txt");
}

#[tokio::test]
async fn test_metadata_only_update_keeps_bytes_in_place() {
    let t = TestDock::new().await;
    let file = t
        .dock
        .files
        .register_file(RegisterFileRequest::new(t.disk.id, "cat.png", "not really"))
        .await
        .unwrap();

    let updated = t
        .dock
        .files
        .update_metadata(
            file.id,
            FileMetadataPatch {
                alt: Some("A cat".into()),
                description: Some("   ".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.alt.as_deref(), Some("A cat"));
    assert_eq!(updated.description, None);
    assert!(t.local.exists("cat.png").await.unwrap());
}

#[tokio::test]
async fn test_delete_is_idempotent_and_announces_location() {
    let t = TestDock::new().await;
    let mut events = t.dock.events.subscribe();
    let file = t
        .dock
        .files
        .register_file(RegisterFileRequest::new(t.disk.id, "a.txt", "hello"))
        .await
        .unwrap();

    t.dock.files.delete_file(file.id).await.unwrap();
    t.dock.files.delete_file(file.id).await.unwrap();

    let err = t.dock.files.get_file(file.id).await.unwrap_err();
    assert!(err.is(ErrorKind::NotFound));

    let mut deletions = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let EventPayload::File(FileEvent::Deleted { location, adapter, .. }) = event.payload {
            deletions.push((adapter, location));
        }
    }
    assert_eq!(deletions, vec![("local".to_string(), "a.txt".to_string())]);
}

#[tokio::test]
async fn test_reclaimer_removes_bytes_after_delete() {
    let t = TestDock::new().await;
    let (cancel_tx, cancel_rx) = watch::channel(false);
    let handle = t.dock.spawn_reclaimer(cancel_rx);

    let file = t
        .dock
        .files
        .register_file(RegisterFileRequest::new(t.disk.id, "a.txt", "hello"))
        .await
        .unwrap();
    t.dock.files.delete_file(file.id).await.unwrap();

    let mut reclaimed = false;
    for _ in 0..50 {
        if !t.local.exists("a.txt").await.unwrap() {
            reclaimed = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(reclaimed);

    cancel_tx.send(true).unwrap();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_reclaimer_keeps_bytes_of_file_reusing_the_name() {
    let t = TestDock::new().await;
    let mut events = t.dock.events.subscribe();
    let files = &t.dock.files;

    let old = files
        .register_file(RegisterFileRequest::new(t.disk.id, "a.txt", "old"))
        .await
        .unwrap();
    files.delete_file(old.id).await.unwrap();
    let new = files
        .register_file(RegisterFileRequest::new(t.disk.id, "a.txt", "new"))
        .await
        .unwrap();

    let reclaimer = t.dock.reclaimer();
    while let Ok(event) = events.try_recv() {
        reclaimer.handle(&event).await.unwrap();
    }

    let (_, content) = files.read_content(new.id).await.unwrap();
    assert_eq!(content, "new");
}

#[tokio::test]
async fn test_reclaimer_keeps_bytes_of_file_renamed_onto_the_name() {
    let t = TestDock::new().await;
    let mut events = t.dock.events.subscribe();
    let files = &t.dock.files;

    let old = files
        .register_file(RegisterFileRequest::new(t.disk.id, "a.txt", "old"))
        .await
        .unwrap();
    let other = files
        .register_file(RegisterFileRequest::new(t.disk.id, "b.txt", "moved"))
        .await
        .unwrap();
    files.delete_file(old.id).await.unwrap();
    files
        .update_metadata(
            other.id,
            FileMetadataPatch {
                name: Some("a.txt".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let reclaimer = t.dock.reclaimer();
    while let Ok(event) = events.try_recv() {
        reclaimer.handle(&event).await.unwrap();
    }

    let (_, content) = files.read_content(other.id).await.unwrap();
    assert_eq!(content, "moved");
}

#[tokio::test]
async fn test_reclaimer_ignores_same_location_on_other_adapter() {
    let t = TestDock::new().await;
    let public = t.disk_on("Public", "public", "cdn").await;
    let mut events = t.dock.events.subscribe();
    let files = &t.dock.files;

    let local = files
        .register_file(RegisterFileRequest::new(t.disk.id, "a.txt", "local"))
        .await
        .unwrap();
    files
        .register_file(RegisterFileRequest::new(public.id, "a.txt", "public"))
        .await
        .unwrap();
    files.delete_file(local.id).await.unwrap();

    let reclaimer = t.dock.reclaimer();
    while let Ok(event) = events.try_recv() {
        reclaimer.handle(&event).await.unwrap();
    }

    assert!(!t.local.exists("a.txt").await.unwrap());
    assert!(t.cdn.exists("a.txt").await.unwrap());
}

#[tokio::test]
async fn test_attached_files_and_entry_lookup() {
    let t = TestDock::new().await;
    let post = EntryRef::new("posts", "42").unwrap();

    t.dock
        .files
        .register_file(RegisterFileRequest::new(t.disk.id, "b.txt", "b").attached_to(post.clone()))
        .await
        .unwrap();
    t.dock
        .files
        .register_file(RegisterFileRequest::new(t.disk.id, "a.txt", "a").attached_to(post.clone()))
        .await
        .unwrap();
    t.dock
        .files
        .register_file(RegisterFileRequest::new(t.disk.id, "c.txt", "c"))
        .await
        .unwrap();

    let attached = t.dock.files.attached_files(&post).await.unwrap();
    let names: Vec<_> = attached.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["a.txt", "b.txt"]);

    let err = t.dock.files.get_entry(&attached[0]).await.unwrap_err();
    assert!(err.is(ErrorKind::UnsupportedOperation));
}
