//! Sample inventory for demo deployments.

use crate::error::VehicleError;
use crate::model::{BodyType, Condition, Currency, FuelType, Transmission, VehicleDraft, VehicleImage, VehicleStatus};
use crate::repository::VehicleRepository;
use tracing::info;

struct Sample {
    title: &'static str,
    brand: &'static str,
    model: &'static str,
    year: i64,
    price: f64,
    mileage: i64,
    body_type: BodyType,
    color: &'static str,
    engine_size: f64,
    horsepower: i64,
    description: &'static str,
    features: [&'static str; 6],
    image: (&'static str, &'static str),
    featured: bool,
    seo: (&'static str, &'static str, [&'static str; 5]),
}

const SAMPLES: [Sample; 3] = [
    Sample {
        title: "Mercedes-Benz S-Class S63 AMG",
        brand: "Mercedes-Benz",
        model: "S-Class",
        year: 2024,
        price: 120_000.0,
        mileage: 5000,
        body_type: BodyType::Sedan,
        color: "Black",
        engine_size: 4.0,
        horsepower: 630,
        description: "Luxury sedan with exceptional performance and comfort. This pristine S63 AMG combines elegant design with powerful performance.",
        features: ["Leather Seats", "Navigation System", "Sunroof", "Bluetooth", "Premium Sound", "Heated Seats"],
        image: ("https://images.unsplash.com/photo-1618843479313-40f8afb4b4d8?w=800", "Mercedes S63 AMG Front View"),
        featured: true,
        seo: (
            "Mercedes-Benz S63 AMG - Luxury Sedan for Sale",
            "Premium Mercedes-Benz S63 AMG with 630hp. Luxury sedan with exceptional performance.",
            ["Mercedes", "S63", "AMG", "luxury", "sedan"],
        ),
    },
    Sample {
        title: "BMW X5 M50i xDrive",
        brand: "BMW",
        model: "X5",
        year: 2023,
        price: 85_000.0,
        mileage: 12_000,
        body_type: BodyType::Suv,
        color: "Alpine White",
        engine_size: 4.4,
        horsepower: 523,
        description: "Dynamic and luxurious SUV perfect for both city driving and adventure. Features BMW's latest technology and premium comfort.",
        features: ["All-Wheel Drive", "Panoramic Roof", "Premium Audio", "Navigation", "Heated Seats", "Wireless Charging"],
        image: ("https://images.unsplash.com/photo-1555215695-3004980ad54e?w=800", "BMW X5 Front View"),
        featured: true,
        seo: (
            "BMW X5 M50i xDrive - Premium SUV for Sale",
            "Powerful BMW X5 M50i with xDrive all-wheel drive system. Perfect luxury SUV.",
            ["BMW", "X5", "M50i", "SUV", "xDrive"],
        ),
    },
    Sample {
        title: "Audi A8 60 TFSI quattro",
        brand: "Audi",
        model: "A8",
        year: 2024,
        price: 95_000.0,
        mileage: 8000,
        body_type: BodyType::Sedan,
        color: "Phantom Black",
        engine_size: 4.0,
        horsepower: 460,
        description: "Executive luxury sedan with cutting-edge technology and supreme comfort. The flagship of Audi's luxury lineup.",
        features: ["quattro AWD", "Virtual Cockpit", "Matrix LED", "Massage Seats", "Bang & Olufsen", "Adaptive Suspension"],
        image: ("https://images.unsplash.com/photo-1606664515524-ed2f786a0bd6?w=800", "Audi A8 Front View"),
        featured: false,
        seo: (
            "Audi A8 60 TFSI quattro - Executive Luxury Sedan",
            "Premium Audi A8 with TFSI engine and quattro all-wheel drive. Executive luxury redefined.",
            ["Audi", "A8", "TFSI", "quattro", "luxury"],
        ),
    },
];

/// The sample vehicles as validated drafts.
#[must_use]
pub fn drafts() -> Vec<VehicleDraft> {
    SAMPLES
        .iter()
        .map(|s| VehicleDraft {
            title: s.title.to_owned(),
            brand: s.brand.to_owned(),
            model: s.model.to_owned(),
            year: s.year,
            price: s.price,
            currency: Currency::Eur,
            mileage: s.mileage,
            transmission: Transmission::Automatic,
            fuel_type: FuelType::Petrol,
            body_type: s.body_type,
            condition: Condition::Used,
            color: s.color.to_owned(),
            engine_size: s.engine_size,
            horsepower: s.horsepower,
            description: s.description.to_owned(),
            features: s.features.iter().map(|f| (*f).to_owned()).collect(),
            images: vec![VehicleImage {
                url: s.image.0.to_owned(),
                alt: s.image.1.to_owned(),
                is_primary: true,
                order: 1,
            }],
            status: VehicleStatus::Available,
            featured: s.featured,
            seo_title: Some(s.seo.0.to_owned()),
            seo_description: Some(s.seo.1.to_owned()),
            seo_keywords: s.seo.2.iter().map(|k| (*k).to_owned()).collect(),
        })
        .collect()
}

/// Inserts the samples when the inventory is empty. Returns how many were added.
///
/// # Errors
/// Propagates repository failures.
pub async fn seed(repo: &VehicleRepository) -> Result<usize, VehicleError> {
    if repo.count().await? > 0 {
        return Ok(0);
    }

    let drafts = drafts();
    let added = drafts.len();
    for draft in drafts {
        repo.create(draft).await?;
    }

    info!(added, "Seeded demo vehicles");
    Ok(added)
}
