use autoani_database::Database;
use autoani_inquiries::InquiryRepository;
use autoani_inquiries::model::{InquiryDraft, InquiryType, Language, Subscription};
use autoani_kernel::pagination::PageRequest;

async fn repo(name: &str) -> InquiryRepository {
    let db = Database::builder().url("mem://").session("test", name).init().await.unwrap();
    InquiryRepository::new(db)
}

fn draft(subject: &str) -> InquiryDraft {
    InquiryDraft {
        name: "Drita Berisha".into(),
        email: "drita@example.com".into(),
        phone: Some("+383 44 123 456".into()),
        subject: subject.into(),
        message: "Can I book a test drive on Saturday?".into(),
        vehicle_id: None,
        inquiry_type: InquiryType::Vehicle,
    }
}

#[tokio::test]
async fn inquiries_are_listed_newest_first() {
    let repo = repo("inquiries").await;
    for subject in ["first", "second", "third"] {
        repo.create(draft(subject)).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let page = PageRequest::parse(Some(1), Some(2), 20, 100).unwrap();
    let (inquiries, total) = repo.list(page).await.unwrap();
    assert_eq!(total, 3);
    let subjects: Vec<_> = inquiries.iter().map(|i| i.subject.as_str()).collect();
    assert_eq!(subjects, ["third", "second"]);
    assert_eq!(inquiries[0].inquiry_type, InquiryType::Vehicle);
    assert_eq!(repo.count().await.unwrap(), 3);
}

#[tokio::test]
async fn subscribing_twice_keeps_one_subscriber() {
    let repo = repo("newsletter").await;
    let subscription = |language| Subscription { email: "reader@autoani.com".into(), language };

    assert!(repo.subscribe(subscription(Language::En)).await.unwrap());
    assert!(!repo.subscribe(subscription(Language::Sq)).await.unwrap());
    assert_eq!(repo.subscriber_count().await.unwrap(), 1);
}

#[tokio::test]
async fn concurrent_subscriptions_upsert_one_row() {
    let repo = repo("newsletter_race").await;
    let subscription = |language| Subscription { email: "race@autoani.com".into(), language };

    let (a, b) = tokio::join!(repo.subscribe(subscription(Language::En)), repo.subscribe(subscription(Language::Sq)));
    let (a, b) = (a.unwrap(), b.unwrap());

    assert!(a || b);
    assert_eq!(repo.subscriber_count().await.unwrap(), 1);
}
