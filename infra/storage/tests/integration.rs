use autoani_storage::{Storage, StorageError};
use tempfile::TempDir;

async fn storage(temp: &TempDir) -> Storage {
    Storage::builder().root(temp.path().join("uploads")).connect().await.unwrap()
}

#[tokio::test]
async fn connect_creates_the_root() {
    let temp = TempDir::new().unwrap();
    let storage = storage(&temp).await;
    assert!(storage.root().is_dir());
}

#[tokio::test]
async fn connect_without_create_requires_existing_root() {
    let temp = TempDir::new().unwrap();
    let result =
        Storage::builder().root(temp.path().join("missing")).create(false).connect().await;
    assert!(matches!(result, Err(StorageError::Io { .. })));
}

#[tokio::test]
async fn path_traversal_is_blocked() {
    let temp = TempDir::new().unwrap();
    let storage = storage(&temp).await;

    assert!(storage.resolve("../etc/passwd").is_err());
    assert!(storage.resolve("foo/../../bar").is_err());
    assert!(storage.resolve("/etc/passwd").is_err());

    let vehicles = storage.folder("vehicles").unwrap();
    assert!(vehicles.resolve("../../escape.jpg").is_err());
}

#[tokio::test]
async fn write_read_delete_in_folder() {
    let temp = TempDir::new().unwrap();
    let storage = storage(&temp).await;
    let brands = storage.folder("brands").unwrap();

    brands.write("bmw.svg", b"<svg/>").await.unwrap();
    assert!(brands.exists("bmw.svg").unwrap());
    assert!(storage.exists("brands/bmw.svg").unwrap());
    assert_eq!(brands.read("bmw.svg").await.unwrap(), b"<svg/>");

    brands.delete("bmw.svg").await.unwrap();
    assert!(!brands.exists("bmw.svg").unwrap());
}

#[tokio::test]
async fn overwrite_replaces_content() {
    let temp = TempDir::new().unwrap();
    let storage = storage(&temp).await;

    storage.write("uploads/a.txt", b"first").await.unwrap();
    storage.write("uploads/a.txt", b"second").await.unwrap();

    assert_eq!(storage.read("uploads/a.txt").await.unwrap(), b"second");
}

#[tokio::test]
async fn folders_are_isolated() {
    let temp = TempDir::new().unwrap();
    let storage = storage(&temp).await;
    let a = storage.folder("vehicles").unwrap();
    let b = storage.folder("users").unwrap();

    a.write("photo.png", b"a").await.unwrap();
    b.write("photo.png", b"b").await.unwrap();

    assert_ne!(a.resolve("photo.png").unwrap(), b.resolve("photo.png").unwrap());
    assert_eq!(a.read("photo.png").await.unwrap(), b"a");
    assert_eq!(b.read("photo.png").await.unwrap(), b"b");
}

#[tokio::test]
async fn folder_names_are_validated() {
    let temp = TempDir::new().unwrap();
    let storage = storage(&temp).await;

    assert_eq!(storage.folder("Vehicles").unwrap().name(), "vehicles");
    assert!(matches!(storage.folder(""), Err(StorageError::InvalidFolder { .. })));
    assert!(matches!(storage.folder("../etc"), Err(StorageError::InvalidFolder { .. })));
    assert!(matches!(storage.folder("my-folder"), Err(StorageError::InvalidFolder { .. })));
}

#[tokio::test]
async fn ensure_creates_the_directory() {
    let temp = TempDir::new().unwrap();
    let storage = storage(&temp).await;
    let folder = storage.folder("documents").unwrap();

    folder.ensure().await.unwrap();
    assert!(storage.root().join("documents").is_dir());
}

#[tokio::test]
async fn missing_files_report_not_found() {
    let temp = TempDir::new().unwrap();
    let storage = storage(&temp).await;
    let folder = storage.folder("uploads").unwrap();

    assert!(matches!(folder.read("missing.bin").await, Err(StorageError::FileNotFound { .. })));
    assert!(matches!(folder.delete("missing.bin").await, Err(StorageError::FileNotFound { .. })));
}
