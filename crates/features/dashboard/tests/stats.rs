use autoani_dashboard::{ActivityRecorder, StatsRepository};
use autoani_database::Database;
use autoani_domain::events::{ActivityKind, CatalogEvent};
use autoani_events::EventBus;
use chrono::{TimeZone, Utc};
use std::time::Duration;

async fn setup(name: &str) -> (Database, StatsRepository) {
    let db = Database::builder().url("mem://").session("test", name).init().await.unwrap();
    (db.clone(), StatsRepository::new(db))
}

#[tokio::test]
async fn empty_catalog_counts_zero() {
    let (_, repo) = setup("empty").await;

    let totals = repo.totals().await.unwrap();
    assert_eq!(totals.vehicles, 0);
    assert_eq!(totals.inquiries, 0);

    let conditions = repo.conditions().await.unwrap();
    assert_eq!(conditions.len(), 3);
    assert!(conditions.iter().all(|c| c.count == 0));
    assert!(repo.brands().await.unwrap().is_empty());
    assert!(repo.popular(5).await.unwrap().is_empty());
    assert_eq!((totals.views, totals.favorites), (0, 0));
}

#[tokio::test]
async fn totals_and_breakdowns_follow_the_catalog() {
    let (db, repo) = setup("totals").await;
    db.query(
        "CREATE vehicle CONTENT { key: 'v1', slug: 'a', brand: 'BMW', brand_lower: 'bmw', status: 'Available', condition: 'New', featured: true, views: 10, favorites: 1 };
        CREATE vehicle CONTENT { key: 'v2', slug: 'b', brand: 'BMW', brand_lower: 'bmw', status: 'Sold', condition: 'Used', featured: false, views: 3 };
        CREATE vehicle CONTENT { key: 'v3', slug: 'c', brand: 'Audi', brand_lower: 'audi', status: 'Reserved', condition: 'Used', featured: true, views: 1, favorites: 2 };
        CREATE brand CONTENT { key: 'b1', name: 'BMW' };
        CREATE inquiry CONTENT { key: 'i1' };",
    )
    .await
    .unwrap()
    .check()
    .unwrap();

    let totals = repo.totals().await.unwrap();
    assert_eq!(
        (totals.vehicles, totals.available, totals.sold, totals.reserved, totals.featured),
        (3, 1, 1, 1, 2)
    );
    assert_eq!((totals.brands, totals.media, totals.inquiries), (1, 0, 1));
    assert_eq!((totals.views, totals.favorites), (14, 3));

    let conditions = repo.conditions().await.unwrap();
    let counts: Vec<_> = conditions.iter().map(|c| (c.condition.as_str(), c.count)).collect();
    assert_eq!(counts, [("New", 1), ("Used", 2), ("Certified", 0)]);

    let brands = repo.brands().await.unwrap();
    assert_eq!(brands[0].brand, "BMW");
    assert_eq!(brands[0].count, 2);

    assert_eq!(repo.count("vehicle", Some("featured = true")).await.unwrap(), 2);
}

#[tokio::test]
async fn recorder_persists_catalog_events() {
    let (_, repo) = setup("recorder").await;
    let events = EventBus::new();
    let recorder = ActivityRecorder::spawn(repo.clone(), &events, 100).unwrap();
    assert!(recorder.is_running());

    events.publish(CatalogEvent::new(ActivityKind::VehicleAdded, "v1", "New vehicle added: BMW X5")).unwrap();
    events.publish(CatalogEvent::new(ActivityKind::BrandDeleted, "b1", "Brand deleted: Lada")).unwrap();

    let mut activity = Vec::new();
    for _ in 0..100 {
        activity = repo.recent_activity(10).await.unwrap();
        if activity.len() == 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(activity.len(), 2);
    let kinds: Vec<_> = activity.iter().map(|a| a.kind.as_str()).collect();
    assert!(kinds.contains(&"vehicle_added"));
    assert!(kinds.contains(&"brand_deleted"));
}

#[tokio::test]
async fn brand_stats_ignore_case() {
    let (db, repo) = setup("brand_case").await;
    db.query(
        "CREATE vehicle CONTENT { key: 'v1', slug: 'a', brand: 'BMW', brand_lower: 'bmw' };
        CREATE vehicle CONTENT { key: 'v2', slug: 'b', brand: 'BMW', brand_lower: 'bmw' };
        CREATE vehicle CONTENT { key: 'v3', slug: 'c', brand: 'bmw', brand_lower: 'bmw' };
        CREATE vehicle CONTENT { key: 'v4', slug: 'd', brand: 'Audi', brand_lower: 'audi' };",
    )
    .await
    .unwrap()
    .check()
    .unwrap();

    let brands = repo.brands().await.unwrap();
    let stats: Vec<_> = brands.iter().map(|b| (b.brand.as_str(), b.count)).collect();
    assert_eq!(stats, [("BMW", 3), ("Audi", 1)]);
}

#[tokio::test]
async fn popular_and_monthly_follow_engagement() {
    let (db, repo) = setup("engagement").await;
    let october = Utc.with_ymd_and_hms(2026, 10, 5, 12, 0, 0).unwrap().timestamp_millis();
    let august = Utc.with_ymd_and_hms(2026, 8, 20, 12, 0, 0).unwrap().timestamp_millis();
    let last_year = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap().timestamp_millis();
    db.query(
        "CREATE vehicle CONTENT { key: 'v1', slug: 'x5', title: 'BMW X5', created_at: $october, views: 40, favorites: 2 };
        CREATE vehicle CONTENT { key: 'v2', slug: 'q7', title: 'Audi Q7', created_at: $october, views: 40, favorites: 5 };
        CREATE vehicle CONTENT { key: 'v3', slug: 'c', title: 'Mercedes C', created_at: $august, views: 7, favorites: 0 };
        CREATE vehicle CONTENT { key: 'v4', slug: 'old', title: 'Lada', created_at: $last_year, views: 1, favorites: 0 };",
    )
    .bind(("october", october))
    .bind(("august", august))
    .bind(("last_year", last_year))
    .await
    .unwrap()
    .check()
    .unwrap();

    let popular = repo.popular(2).await.unwrap();
    let ids: Vec<_> = popular.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["v2", "v1"]);
    assert_eq!((popular[0].views, popular[0].favorites, popular[0].slug.as_str()), (40, 5, "q7"));

    let now = Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap();
    let monthly = repo.monthly(3, now).await.unwrap();
    let rows: Vec<_> = monthly.iter().map(|m| (m.month.as_str(), m.vehicles, m.views, m.favorites)).collect();
    assert_eq!(rows, [("2026-08", 1, 7, 0), ("2026-09", 0, 0, 0), ("2026-10", 2, 80, 7)]);
}

#[tokio::test]
async fn prune_keeps_the_newest_entries() {
    let (db, repo) = setup("prune").await;
    for ts in 1..=5_i64 {
        db.query("CREATE activity CONTENT { key: $key, kind: 'vehicle_added', description: '', subject_id: 'v', timestamp: $ts }")
            .bind(("key", format!("a{ts}")))
            .bind(("ts", ts))
            .await
            .unwrap()
            .check()
            .unwrap();
    }

    assert_eq!(repo.prune_activity(3).await.unwrap(), 2);
    assert_eq!(repo.prune_activity(3).await.unwrap(), 0);
    let left: Vec<_> = repo.recent_activity(10).await.unwrap().into_iter().map(|a| a.id).collect();
    assert_eq!(left, ["a5", "a4", "a3"]);
}

#[tokio::test]
async fn shutdown_flushes_queued_events() {
    let (_, repo) = setup("shutdown").await;
    let events = EventBus::new();
    let recorder = ActivityRecorder::spawn(repo.clone(), &events, 2).unwrap();

    for n in 0..3 {
        events.publish(CatalogEvent::new(ActivityKind::VehicleAdded, format!("v{n}"), "New vehicle added")).unwrap();
    }
    recorder.shutdown().await;

    assert!(!recorder.is_running());
    assert_eq!(repo.count("activity", None).await.unwrap(), 2);
    recorder.shutdown().await;
}
