use autoani_database::Database;
use autoani_domain::config::ApiConfig;
use autoani_domain::events::{ActivityKind, CatalogEvent};
use autoani_events::{EventBus, EventReceiverExt};
use autoani_kernel::pagination::PageRequest;
use autoani_media::model::{IncomingFile, MediaChanges, MediaFilter, MediaKind, MediaSort, UploadMeta};
use autoani_media::{Media, MediaError};
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    db: Database,
    events: EventBus,
    media: Media,
}

async fn fixture(name: &str) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ApiConfig::default();
    config.storage.uploads_dir = dir.path().join("uploads");
    config.media.max_upload_bytes = 1024;

    let db = Database::builder().url("mem://").session("test", name).init().await.unwrap();
    let events = EventBus::new();
    let slice = autoani_media::init(&config, &db, &events).await.unwrap();
    let media = slice.downcast::<Media>().unwrap().clone();

    Fixture { _dir: dir, db, events, media }
}

fn file(name: &str, mimetype: &str, bytes: &[u8]) -> IncomingFile {
    IncomingFile { original_name: name.to_owned(), mimetype: mimetype.to_owned(), bytes: bytes.to_vec() }
}

fn page() -> PageRequest {
    PageRequest::parse(None, None, 24, 100).unwrap()
}

#[tokio::test]
async fn init_creates_well_known_folders() {
    let fx = fixture("folders").await;
    for folder in ["vehicles", "brands", "users", "uploads"] {
        assert!(fx.media.storage.root().join(folder).is_dir(), "{folder} missing");
    }

    let folders = fx.media.repo.folders().await.unwrap();
    assert_eq!(folders.len(), 4);
    assert!(folders.iter().all(|f| f.count == 0));
}

#[tokio::test]
async fn upload_stores_files_and_records() {
    let fx = fixture("upload").await;
    let mut events = fx.events.subscribe::<CatalogEvent>().unwrap();

    let meta = UploadMeta {
        folder: Some("vehicles".into()),
        tags: Some("front, bmw".into()),
        title: Some("BMW X5 front".into()),
        ..UploadMeta::default()
    };
    let stored = fx
        .media
        .upload(vec![file("x5-front.JPG", "image/jpeg", b"jpeg"), file("brochure.pdf", "application/pdf", b"%PDF")], meta)
        .await
        .unwrap();

    assert_eq!(stored.len(), 2);
    let photo = &stored[0];
    assert_eq!(photo.kind, MediaKind::Image);
    assert_eq!(photo.folder, "vehicles");
    assert!(photo.filename.ends_with(".jpg"));
    assert_eq!(photo.url, format!("/uploads/vehicles/{}", photo.filename));
    assert_eq!(photo.tags, ["front", "bmw"]);
    assert_eq!(stored[1].kind, MediaKind::Document);

    let (record, bytes) = fx.media.open("vehicles", &photo.filename).await.unwrap();
    assert_eq!(record.id, photo.id);
    assert_eq!(bytes, b"jpeg");

    let event = events.recv_event().await.unwrap();
    assert_eq!(event.kind, ActivityKind::MediaUploaded);
    assert_eq!(event.subject_id, photo.id);

    let folders = fx.media.repo.folders().await.unwrap();
    let vehicles = folders.iter().find(|f| f.name == "vehicles").unwrap();
    assert_eq!(vehicles.count, 2);
}

#[tokio::test]
async fn rejects_disallowed_and_oversized_files_before_writing() {
    let fx = fixture("reject").await;

    let err = fx.media.upload(Vec::new(), UploadMeta::default()).await.unwrap_err();
    assert!(matches!(err, MediaError::Rejected { .. }));

    let err = fx
        .media
        .upload(
            vec![file("ok.png", "image/png", b"png"), file("run.sh", "text/x-shellscript", b"#!")],
            UploadMeta::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, MediaError::Rejected { .. }));

    let err = fx
        .media
        .upload(vec![file("big.png", "image/png", &[0; 2048])], UploadMeta::default())
        .await
        .unwrap_err();
    assert!(matches!(err, MediaError::TooLarge { .. }));

    let err = fx
        .media
        .upload(vec![file("ok.png", "image/png", b"png")], UploadMeta { folder: Some("../etc".into()), ..UploadMeta::default() })
        .await
        .unwrap_err();
    assert!(matches!(err, MediaError::Storage { .. }));

    assert_eq!(fx.media.repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn list_filters_by_type_folder_and_search() {
    let fx = fixture("list").await;
    let meta = |folder: &str, title: &str| UploadMeta {
        folder: Some(folder.into()),
        title: Some(title.into()),
        ..UploadMeta::default()
    };

    fx.media.upload(vec![file("a.png", "image/png", b"aaaa")], meta("vehicles", "Audi A8 rear")).await.unwrap();
    fx.media.upload(vec![file("b.mp4", "video/mp4", b"bb")], meta("vehicles", "Walkaround")).await.unwrap();
    fx.media.upload(vec![file("c.png", "image/png", b"c")], meta("brands", "Audi logo")).await.unwrap();

    let filter = MediaFilter { kind: Some(MediaKind::Image), ..MediaFilter::default() };
    let (_, total) = fx.media.repo.list(&filter, page()).await.unwrap();
    assert_eq!(total, 2);

    let filter = MediaFilter { folder: Some("vehicles".into()), sort: MediaSort::Size, ..MediaFilter::default() };
    let (files, total) = fx.media.repo.list(&filter, page()).await.unwrap();
    assert_eq!(total, 2);
    assert_eq!(files[0].original_name, "a.png");

    let filter = MediaFilter { search: Some("audi".into()), ..MediaFilter::default() };
    let (_, total) = fx.media.repo.list(&filter, page()).await.unwrap();
    assert_eq!(total, 2);
}

#[tokio::test]
async fn moving_to_another_folder_relocates_the_file() {
    let fx = fixture("move").await;
    let stored = fx.media.upload(vec![file("logo.png", "image/png", b"logo")], UploadMeta::default()).await.unwrap();
    let original = &stored[0];
    assert_eq!(original.folder, "uploads");

    let changes = MediaChanges {
        folder: Some("brands".into()),
        alt: Some(Some("Logo".into())),
        ..MediaChanges::default()
    };
    let moved = fx.media.update(&original.id, changes).await.unwrap();
    assert_eq!(moved.folder, "brands");
    assert_eq!(moved.url, format!("/uploads/brands/{}", moved.filename));
    assert_eq!(moved.alt.as_deref(), Some("Logo"));

    let root = fx.media.storage.root();
    assert!(root.join("brands").join(&moved.filename).is_file());
    assert!(!root.join("uploads").join(&moved.filename).exists());

    let err = fx.media.open("uploads", &moved.filename).await.unwrap_err();
    assert!(matches!(err, MediaError::NotFound { .. }));
}

#[tokio::test]
async fn remove_deletes_file_and_record() {
    let fx = fixture("remove").await;
    let stored = fx.media.upload(vec![file("a.png", "image/png", b"a")], UploadMeta::default()).await.unwrap();
    let target = &stored[0];

    fx.media.remove(&target.id).await.unwrap();
    assert!(!fx.media.storage.root().join("uploads").join(&target.filename).exists());
    assert!(fx.media.repo.find(&target.id).await.unwrap().is_none());

    let err = fx.media.remove(&target.id).await.unwrap_err();
    assert!(matches!(err, MediaError::NotFound { .. }));
}

#[tokio::test]
async fn failed_move_keeps_the_original_file_only() {
    let fx = fixture("move_fails").await;
    let stored = fx.media.upload(vec![file("logo.png", "image/png", b"logo")], UploadMeta::default()).await.unwrap();
    let original = &stored[0];

    fx.db
        .query("DEFINE FIELD OVERWRITE folder ON media TYPE string ASSERT $value != 'brands'")
        .await
        .unwrap()
        .check()
        .unwrap();

    let changes = MediaChanges { folder: Some("brands".into()), ..MediaChanges::default() };
    let err = fx.media.update(&original.id, changes).await.unwrap_err();
    assert!(matches!(err, MediaError::Database { .. }));

    let root = fx.media.storage.root();
    assert!(root.join("uploads").join(&original.filename).is_file());
    assert!(!root.join("brands").join(&original.filename).exists());
    assert_eq!(fx.media.repo.get(&original.id).await.unwrap().folder, "uploads");
}

#[tokio::test]
async fn failed_record_delete_keeps_the_file() {
    let fx = fixture("remove_fails").await;
    let stored = fx.media.upload(vec![file("a.png", "image/png", b"a")], UploadMeta::default()).await.unwrap();
    let target = &stored[0];

    fx.db
        .query("DEFINE EVENT OVERWRITE media_locked ON media WHEN $event = 'DELETE' THEN { THROW 'media is locked' }")
        .await
        .unwrap()
        .check()
        .unwrap();

    assert!(fx.media.remove(&target.id).await.is_err());

    let (record, bytes) = fx.media.open("uploads", &target.filename).await.unwrap();
    assert_eq!(record.id, target.id);
    assert_eq!(bytes, b"a");
}
