use autoani_vehicles::model::{
    BodyType, Condition, Currency, ImagePayload, VehicleListQuery, VehiclePayload, VehicleSort, VehicleStatus,
};

const YEAR: i64 = 2026;

fn payload() -> VehiclePayload {
    VehiclePayload {
        title: "  BMW X5 M50i xDrive ".to_owned(),
        brand: "BMW".to_owned(),
        model: "X5".to_owned(),
        year: Some(2023),
        price: Some(85_000.0),
        mileage: Some(12_000),
        transmission: "Automatic".to_owned(),
        fuel_type: "Petrol".to_owned(),
        body_type: "SUV".to_owned(),
        color: "Alpine White".to_owned(),
        engine_size: Some(4.4),
        horsepower: Some(523),
        description: "Dynamic and luxurious SUV.".to_owned(),
        features: vec!["Panoramic Roof".to_owned(), "   ".to_owned()],
        images: vec![ImagePayload {
            url: "https://cdn.example/x5.jpg".to_owned(),
            alt: "BMW X5".to_owned(),
            is_primary: true,
            order: 1,
        }],
        ..VehiclePayload::default()
    }
}

fn fields(payload: VehiclePayload) -> Vec<String> {
    payload.validate(YEAR).unwrap_err().into_iter().map(|e| e.field).collect()
}

#[test]
fn valid_payload_is_normalised_with_defaults() {
    let draft = payload().validate(YEAR).unwrap();

    assert_eq!(draft.title, "BMW X5 M50i xDrive");
    assert_eq!(draft.body_type, BodyType::Suv);
    assert_eq!(draft.currency, Currency::Eur);
    assert_eq!(draft.condition, Condition::Used);
    assert_eq!(draft.status, VehicleStatus::Available);
    assert_eq!(draft.features, ["Panoramic Roof"]);
}

#[test]
fn rejects_out_of_range_numbers() {
    let mut p = payload();
    p.year = Some(1899);
    p.price = Some(-1.0);
    p.mileage = Some(-5);
    p.engine_size = Some(10.5);
    p.horsepower = Some(0);
    assert_eq!(fields(p), ["year", "price", "mileage", "engineSize", "horsepower"]);

    let mut p = payload();
    p.year = Some(YEAR + 3);
    assert_eq!(fields(p), ["year"]);

    let mut p = payload();
    p.year = Some(YEAR + 2);
    p.price = Some(0.0);
    assert!(p.validate(YEAR).is_ok());
}

#[test]
fn reports_every_missing_field() {
    let errors = VehiclePayload::default().validate(YEAR).unwrap_err();
    let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();

    for field in [
        "title", "brand", "model", "color", "description", "year", "price", "mileage",
        "engineSize", "horsepower", "transmission", "fuelType", "bodyType",
    ] {
        assert!(fields.contains(&field), "missing error for {field}");
    }
    assert!(errors.iter().any(|e| e.message == "Title is required"));
}

#[test]
fn rejects_unknown_enums_and_long_text() {
    let mut p = payload();
    p.transmission = "Robot".to_owned();
    p.status = Some("Gone".to_owned());
    p.title = "x".repeat(201);
    p.seo_title = Some("y".repeat(61));
    p.images[0].alt = String::new();

    let fields = fields(p);
    assert!(fields.contains(&"title".to_owned()));
    assert!(fields.contains(&"transmission".to_owned()));
    assert!(fields.contains(&"status".to_owned()));
    assert!(fields.contains(&"seoTitle".to_owned()));
    assert!(fields.contains(&"images[0].alt".to_owned()));
}

#[test]
fn list_query_parses_filters() {
    let query = VehicleListQuery {
        brand: Some(" BMW ".to_owned()),
        condition: Some("Used".to_owned()),
        sort: Some("price-desc".to_owned()),
        ..VehicleListQuery::default()
    };
    let filter = query.filter().unwrap();

    assert_eq!(filter.brand.as_deref(), Some("bmw"));
    assert_eq!(filter.condition, Some(Condition::Used));
    assert_eq!(filter.sort, VehicleSort::PriceDesc);

    let bad = VehicleListQuery {
        sort: Some("cheapest".to_owned()),
        price_from: Some(-1.0),
        ..VehicleListQuery::default()
    };
    let errors = bad.filter().unwrap_err();
    assert_eq!(errors.len(), 2);

    let popular = VehicleListQuery { sort: Some("most-viewed".to_owned()), ..VehicleListQuery::default() };
    assert_eq!(popular.filter().unwrap().sort, VehicleSort::MostViewed);
}

#[test]
fn enums_use_storefront_spelling() {
    assert_eq!(serde_json::to_value(VehicleStatus::ComingSoon).unwrap(), "Coming Soon");
    assert_eq!(serde_json::to_value(BodyType::Suv).unwrap(), "SUV");
    assert_eq!(serde_json::to_value(Currency::Usd).unwrap(), "USD");
    assert_eq!("CVT".parse::<autoani_vehicles::model::Transmission>().ok().map(|t| t.to_string()), Some("CVT".to_owned()));
}
