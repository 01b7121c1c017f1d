use autoani::domain::config::ApiConfig;
use autoani_database::Database;
use autoani_events::EventBus;

#[tokio::test]
async fn demo_mode_seeds_an_empty_catalog_once() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ApiConfig::default();
    config.storage.uploads_dir = dir.path().to_path_buf();
    config.demo.enabled = true;

    let db = Database::builder().url("mem://").session("test", "bootstrap").init().await.unwrap();
    let events = EventBus::new();

    let slices = autoani::init(&config, &db, &events).await.unwrap();
    assert_eq!(slices.len(), 6);

    assert_eq!(autoani::seed_demo(&db).await.unwrap(), (0, 0));
}

#[tokio::test]
async fn router_documents_every_slice() {
    let (_, api) = autoani::router().split_for_parts();
    let paths: Vec<&str> = api.paths.paths.keys().map(String::as_str).collect();

    for expected in [
        "/health",
        "/api/vehicles",
        "/api/brands/slug/{slug}",
        "/api/media/{id}",
        "/uploads/{folder}/{filename}",
        "/api/contact/newsletter",
        "/api/i18n/{lang}",
        "/api/stats/dashboard",
        "/api/auth/login",
    ] {
        assert!(paths.contains(&expected), "{expected} missing from {paths:?}");
    }
    assert!(autoani::features::is_enabled("media"));
}
