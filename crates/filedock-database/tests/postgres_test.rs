//! Repository tests against PostgreSQL.
//!
//! Set `DATABASE_URL` to a scratch database to run them; without it every
//! test returns early. Records use random slugs and names so runs can share
//! a database.

use uuid::Uuid;

use filedock_core::config::{DatabaseBackend, DatabaseConfig};
use filedock_core::error::ErrorKind;
use filedock_core::types::{DiskId, FolderId, Translations};
use filedock_database::{DatabasePool, Repositories};
use filedock_entity::disk::{CreateDisk, Disk};
use filedock_entity::file::{CreateFile, EntryRef, File};
use filedock_entity::folder::{CreateFolder, Folder};

async fn repos() -> Option<Repositories> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let config = DatabaseConfig {
        backend: DatabaseBackend::Postgres,
        url,
        ..DatabaseConfig::default()
    };
    let pool = DatabasePool::connect(&config)
        .await
        .expect("Failed to connect to test database");
    Some(Repositories::postgres(&pool))
}

fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", &Uuid::new_v4().simple().to_string()[..12])
}

async fn create_disk(repos: &Repositories, name: &str) -> Disk {
    repos
        .disks
        .create(&CreateDisk {
            slug: unique("disk"),
            adapter: "local".into(),
            name: Translations::single("en", name),
            description: Translations::new(),
        })
        .await
        .expect("create disk")
}

async fn create_folder(
    repos: &Repositories,
    disk_id: DiskId,
    parent: Option<&Folder>,
    name: &str,
) -> Result<Folder, filedock_core::AppError> {
    repos
        .folders
        .create(&CreateFolder {
            disk_id,
            parent_id: parent.map(|p| p.id),
            name: name.into(),
            path: match parent {
                Some(p) => p.child_path(name),
                None => format!("/{name}"),
            },
            depth: parent.map_or(0, |p| p.depth + 1),
        })
        .await
}

async fn create_file(
    repos: &Repositories,
    disk_id: DiskId,
    folder_id: Option<FolderId>,
    name: &str,
) -> Result<File, filedock_core::AppError> {
    repos
        .files
        .create(&CreateFile {
            disk_id,
            folder_id,
            name: name.into(),
            extension: "txt".into(),
            mime_type: "text/plain".into(),
            size_bytes: 5,
            hash: "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824".into(),
            alt: None,
            description: None,
            keywords: vec!["b".into(), "a".into()],
            entry: Some(EntryRef::new("posts", "42").expect("entry")),
        })
        .await
}

#[tokio::test]
async fn test_disk_slug_and_name_violations_are_validation() {
    let Some(repos) = repos().await else { return };
    let name = unique("Disk");
    let disk = create_disk(&repos, &name).await;

    let err = repos
        .disks
        .create(&CreateDisk {
            slug: disk.slug.clone(),
            adapter: "local".into(),
            name: Translations::single("en", unique("Other")),
            description: Translations::new(),
        })
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Validation));

    let err = repos
        .disks
        .create(&CreateDisk {
            slug: unique("disk"),
            adapter: "local".into(),
            name: Translations::single("en", &name),
            description: Translations::new(),
        })
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Validation));

    assert!(!repos.disks.name_taken("en", &name, Some(disk.id)).await.unwrap());
    assert!(repos.disks.name_taken("en", &name, None).await.unwrap());

    repos
        .disks
        .create(&CreateDisk {
            slug: unique("disk"),
            adapter: "local".into(),
            name: Translations::single("fr", &name),
            description: Translations::new(),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_rewrites_translations() {
    let Some(repos) = repos().await else { return };
    let name = unique("Disk");
    let mut disk = create_disk(&repos, &name).await;

    let renamed = unique("Renamed");
    disk.name = [("fr", renamed.as_str())].into_iter().collect();
    disk.description = Translations::single("en", "Scratch disk");
    repos.disks.update(&disk).await.unwrap();

    let stored = repos.disks.find_by_id(disk.id).await.unwrap().unwrap();
    assert_eq!(stored.name.get_exact("en"), None);
    assert_eq!(stored.name.get_exact("fr"), Some(renamed.as_str()));
    assert_eq!(stored.description.get_exact("en"), Some("Scratch disk"));
    assert!(!repos.disks.name_taken("en", &name, None).await.unwrap());

    let by_slug = repos.disks.find_by_slug(&disk.slug).await.unwrap().unwrap();
    assert_eq!(by_slug.id, disk.id);
}

#[tokio::test]
async fn test_folder_parent_must_share_disk() {
    let Some(repos) = repos().await else { return };
    let a = create_disk(&repos, &unique("A")).await;
    let b = create_disk(&repos, &unique("B")).await;

    let parent = create_folder(&repos, a.id, None, "docs").await.unwrap();
    let err = create_folder(&repos, b.id, Some(&parent), "child")
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Validation));

    let err = create_folder(&repos, a.id, None, "docs").await.unwrap_err();
    assert!(err.is(ErrorKind::Validation));

    let child = create_folder(&repos, a.id, Some(&parent), "2024").await.unwrap();
    assert_eq!(child.path, "/docs/2024");
    assert_eq!(repos.folders.count_children(parent.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_file_folder_must_share_disk() {
    let Some(repos) = repos().await else { return };
    let a = create_disk(&repos, &unique("A")).await;
    let b = create_disk(&repos, &unique("B")).await;
    let folder = create_folder(&repos, a.id, None, "docs").await.unwrap();

    let err = create_file(&repos, b.id, Some(folder.id), "a.txt")
        .await
        .unwrap_err();
    assert!(err.is(ErrorKind::Validation));
}

#[tokio::test]
async fn test_file_names_unique_per_folder_including_root() {
    let Some(repos) = repos().await else { return };
    let disk = create_disk(&repos, &unique("Disk")).await;
    let folder = create_folder(&repos, disk.id, None, "docs").await.unwrap();

    let root = create_file(&repos, disk.id, None, "a.txt").await.unwrap();
    let err = create_file(&repos, disk.id, None, "a.txt").await.unwrap_err();
    assert!(err.is(ErrorKind::Validation));

    let nested = create_file(&repos, disk.id, Some(folder.id), "a.txt")
        .await
        .unwrap();
    assert_ne!(root.id, nested.id);
    assert_eq!(nested.keywords, vec!["b", "a"]);

    let found = repos
        .files
        .find_by_name(disk.id, None, "a.txt")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, root.id);

    let counts = repos.files.count_by_folder(disk.id).await.unwrap();
    assert_eq!(counts.get(&None), Some(&1));
    assert_eq!(counts.get(&Some(folder.id)), Some(&1));

    let attached = repos
        .files
        .find_by_entry(&EntryRef::new("posts", "42").unwrap())
        .await
        .unwrap();
    assert!(attached.iter().any(|f| f.id == root.id));
}

#[tokio::test]
async fn test_disk_delete_restricted_while_referenced() {
    let Some(repos) = repos().await else { return };
    let disk = create_disk(&repos, &unique("Disk")).await;
    let file = create_file(&repos, disk.id, None, "a.txt").await.unwrap();

    assert_eq!(repos.disks.usage(disk.id).await.unwrap(), (0, 1));
    let err = repos.disks.delete(disk.id).await.unwrap_err();
    assert!(err.is(ErrorKind::Validation));

    let removed = repos.files.delete(file.id).await.unwrap();
    assert_eq!(removed.map(|f| f.id), Some(file.id));
    assert!(repos.files.delete(file.id).await.unwrap().is_none());

    assert!(repos.disks.delete(disk.id).await.unwrap());
    assert!(repos.disks.find_by_id(disk.id).await.unwrap().is_none());
}
