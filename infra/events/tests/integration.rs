use autoani_events::{EventBus, EventBusError, EventReceiverExt};

#[derive(Clone, Debug, PartialEq, Eq)]
struct VehicleAdded(usize);

#[derive(Clone, Debug, PartialEq, Eq)]
struct BrandAdded(&'static str);

#[tokio::test]
async fn delivers_published_events() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe::<VehicleAdded>().unwrap();

    assert_eq!(bus.publish(VehicleAdded(42)).unwrap(), 1);

    let received = rx.recv_event().await.unwrap();
    assert_eq!(*received, VehicleAdded(42));
}

#[tokio::test]
async fn publishing_without_subscribers_is_not_an_error() {
    let bus = EventBus::new();
    assert_eq!(bus.publish(VehicleAdded(1)).unwrap(), 0);
    assert_eq!(bus.subscriber_count::<VehicleAdded>(), 0);
}

#[tokio::test]
async fn lagged_receiver_resumes_from_the_tail() {
    let bus = EventBus::new();
    let capacity = 2;
    let mut rx = bus.subscribe_with_capacity::<VehicleAdded>(capacity).unwrap();

    let total = 100;
    for i in 0..total {
        bus.publish(VehicleAdded(i)).unwrap();
    }

    let first = rx.recv_event().await.unwrap();
    assert!(first.0 >= total - capacity, "got {}", first.0);

    let second = rx.recv_event().await.unwrap();
    assert_eq!(second.0, first.0 + 1);
}

#[tokio::test]
async fn every_subscriber_gets_a_copy() {
    let bus = EventBus::new();
    let mut rx1 = bus.subscribe::<VehicleAdded>().unwrap();
    let mut rx2 = bus.subscribe::<VehicleAdded>().unwrap();
    assert_eq!(bus.subscriber_count::<VehicleAdded>(), 2);

    bus.publish(VehicleAdded(100)).unwrap();

    assert_eq!(rx1.recv_event().await.unwrap().0, 100);
    assert_eq!(rx2.recv_event().await.unwrap().0, 100);
}

#[tokio::test]
async fn event_types_are_isolated() {
    let bus = EventBus::new();
    let mut vehicles = bus.subscribe::<VehicleAdded>().unwrap();
    let mut brands = bus.subscribe::<BrandAdded>().unwrap();

    bus.publish(VehicleAdded(7)).unwrap();
    bus.publish(BrandAdded("Audi")).unwrap();

    assert_eq!(vehicles.recv_event().await.unwrap().0, 7);
    assert_eq!(brands.recv_event().await.unwrap().0, "Audi");
}

#[tokio::test]
async fn closed_bus_ends_the_stream() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe::<VehicleAdded>().unwrap();
    drop(bus);

    assert!(rx.recv_event().await.is_none());
}

#[test]
fn zero_capacity_is_rejected() {
    let bus = EventBus::new();
    let err = bus.subscribe_with_capacity::<VehicleAdded>(0).unwrap_err();
    assert!(matches!(err, EventBusError::InvalidCapacity { .. }));
}
