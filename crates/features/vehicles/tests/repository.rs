use autoani_database::Database;
use autoani_kernel::pagination::PageRequest;
use autoani_vehicles::model::{Condition, VehicleFilter, VehicleSort, VehicleStatus};
use autoani_vehicles::{VehicleError, VehicleRepository, demo};

async fn repo(name: &str) -> VehicleRepository {
    let db = Database::builder().url("mem://").session("test", name).init().await.unwrap();
    VehicleRepository::new(db)
}

fn page(limit: u64) -> PageRequest {
    PageRequest::parse(None, i64::try_from(limit).ok(), 12, 50).unwrap()
}

#[tokio::test]
async fn slugs_are_unique_on_collision() {
    let repo = repo("slugs").await;
    let draft = demo::drafts().remove(1);

    let first = repo.create(draft.clone()).await.unwrap();
    let second = repo.create(draft.clone()).await.unwrap();
    let third = repo.create(draft).await.unwrap();

    assert_eq!(first.slug, "bmw-x5-m50i-xdrive");
    assert_eq!(second.slug, "bmw-x5-m50i-xdrive-1");
    assert_eq!(third.slug, "bmw-x5-m50i-xdrive-2");
    assert_eq!(first.id.len(), 12);

    let found = repo.find_by_slug("bmw-x5-m50i-xdrive-1").await.unwrap().unwrap();
    assert_eq!(found.id, second.id);
}

#[tokio::test]
async fn concurrent_creates_get_distinct_slugs() {
    let repo = repo("slug_race").await;
    let draft = demo::drafts().remove(1);

    let (a, b) = tokio::join!(repo.create(draft.clone()), repo.create(draft.clone()));
    let mut slugs = vec![a.unwrap().slug, b.unwrap().slug];
    slugs.sort();

    assert_eq!(slugs, ["bmw-x5-m50i-xdrive", "bmw-x5-m50i-xdrive-1"]);
    assert_eq!(repo.count().await.unwrap(), 2);
}

#[tokio::test]
async fn filters_combine_with_and() {
    let repo = repo("filters").await;
    assert_eq!(demo::seed(&repo).await.unwrap(), 3);
    assert_eq!(demo::seed(&repo).await.unwrap(), 0);

    let filter = VehicleFilter { brand: Some("bmw".into()), ..VehicleFilter::default() };
    let (vehicles, total) = repo.list(&filter, page(12)).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(vehicles[0].brand, "BMW");

    let filter = VehicleFilter {
        brand: Some("bmw".into()),
        condition: Some(Condition::New),
        ..VehicleFilter::default()
    };
    let (vehicles, total) = repo.list(&filter, page(12)).await.unwrap();
    assert_eq!(total, 0);
    assert!(vehicles.is_empty());

    let filter = VehicleFilter { search: Some("exceptional performance".into()), ..VehicleFilter::default() };
    let (_, total) = repo.list(&filter, page(12)).await.unwrap();
    assert_eq!(total, 1);

    let filter = VehicleFilter {
        price_from: Some(90_000.0),
        sort: VehicleSort::PriceAsc,
        ..VehicleFilter::default()
    };
    let (vehicles, total) = repo.list(&filter, page(12)).await.unwrap();
    assert_eq!(total, 2);
    assert!(vehicles[0].price <= vehicles[1].price);
}

#[tokio::test]
async fn pagination_reports_totals() {
    let repo = repo("paging").await;
    demo::seed(&repo).await.unwrap();

    let (vehicles, total) = repo.list(&VehicleFilter::default(), page(2)).await.unwrap();
    assert_eq!(total, 3);
    assert_eq!(vehicles.len(), 2);

    let second = PageRequest::parse(Some(2), Some(2), 12, 50).unwrap();
    let (vehicles, _) = repo.list(&VehicleFilter::default(), second).await.unwrap();
    assert_eq!(vehicles.len(), 1);
}

#[tokio::test]
async fn featured_excludes_unavailable() {
    let repo = repo("featured").await;
    demo::seed(&repo).await.unwrap();
    assert_eq!(repo.featured(6).await.unwrap().len(), 2);

    let featured = repo.featured(6).await.unwrap();
    let mut draft = demo::drafts().remove(0);
    draft.status = VehicleStatus::Sold;
    let target = featured.iter().find(|v| v.brand == "Mercedes-Benz").unwrap();
    repo.update(&target.id, draft).await.unwrap();

    let featured = repo.featured(6).await.unwrap();
    assert_eq!(featured.len(), 1);
    assert_eq!(featured[0].brand, "BMW");
}

#[tokio::test]
async fn update_regenerates_slug_only_when_title_changes() {
    let repo = repo("update").await;
    let created = repo.create(demo::drafts().remove(2)).await.unwrap();

    let mut draft = demo::drafts().remove(2);
    draft.price = 90_000.0;
    let updated = repo.update(&created.id, draft).await.unwrap();
    assert_eq!(updated.slug, created.slug);
    assert_eq!(updated.created_at, created.created_at);
    assert!((updated.price - 90_000.0).abs() < f64::EPSILON);

    let mut draft = demo::drafts().remove(2);
    draft.title = "Audi A8 L".to_owned();
    let renamed = repo.update(&created.id, draft).await.unwrap();
    assert_eq!(renamed.slug, "audi-a8-l");
}

#[tokio::test]
async fn related_and_delete() {
    let repo = repo("related").await;
    demo::seed(&repo).await.unwrap();

    let (all, _) = repo.list(&VehicleFilter::default(), page(12)).await.unwrap();
    let audi = all.iter().find(|v| v.brand == "Audi").unwrap();

    let related = repo.related(&audi.id, 4).await.unwrap();
    assert_eq!(related.len(), 1);
    assert_eq!(related[0].brand, "Mercedes-Benz");

    repo.delete(&audi.id).await.unwrap();
    assert!(matches!(repo.get(&audi.id).await, Err(VehicleError::NotFound { .. })));
    assert!(matches!(repo.delete(&audi.id).await, Err(VehicleError::NotFound { .. })));
    assert_eq!(repo.count().await.unwrap(), 2);
}

#[tokio::test]
async fn views_and_favorites_are_counted() {
    let repo = repo("engagement").await;
    let created = repo.create(demo::drafts().remove(1)).await.unwrap();
    assert_eq!((created.views, created.favorites), (0, 0));

    repo.view_by("key", &created.id).await.unwrap().unwrap();
    let viewed = repo.view_by("slug", &created.slug).await.unwrap().unwrap();
    assert_eq!(viewed.views, 2);
    assert!(repo.view_by("slug", "missing").await.unwrap().is_none());

    let liked = repo.favorite(&created.id, 1).await.unwrap();
    assert_eq!((liked.views, liked.favorites), (2, 1));
    repo.favorite(&created.id, -1).await.unwrap();
    let floor = repo.favorite(&created.id, -1).await.unwrap();
    assert_eq!(floor.favorites, 0);
    assert!(matches!(repo.favorite("missing", 1).await, Err(VehicleError::NotFound { .. })));

    let mut draft = demo::drafts().remove(1);
    draft.price = 1.0;
    let updated = repo.update(&created.id, draft).await.unwrap();
    assert_eq!((updated.views, updated.favorites), (2, 0));
}

#[tokio::test]
async fn sorts_by_engagement() {
    let repo = repo("engagement_sort").await;
    demo::seed(&repo).await.unwrap();
    let (all, _) = repo.list(&VehicleFilter::default(), page(12)).await.unwrap();
    let audi = all.iter().find(|v| v.brand == "Audi").unwrap();
    let bmw = all.iter().find(|v| v.brand == "BMW").unwrap();

    repo.view_by("key", &audi.id).await.unwrap();
    repo.view_by("key", &audi.id).await.unwrap();
    repo.view_by("key", &bmw.id).await.unwrap();
    repo.favorite(&bmw.id, 1).await.unwrap();

    let filter = VehicleFilter { sort: VehicleSort::MostViewed, ..VehicleFilter::default() };
    let (viewed, _) = repo.list(&filter, page(12)).await.unwrap();
    assert_eq!(viewed[0].id, audi.id);
    assert_eq!(viewed[1].id, bmw.id);

    let filter = VehicleFilter { sort: VehicleSort::MostFavorited, ..VehicleFilter::default() };
    let (favorited, _) = repo.list(&filter, page(12)).await.unwrap();
    assert_eq!(favorited[0].id, bmw.id);
}
