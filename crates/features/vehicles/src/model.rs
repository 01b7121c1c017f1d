//! Wire types of the vehicle API and the validation that turns a payload into a draft.

use autoani_derive::api_model;
use autoani_kernel::validation::{FieldError, ValidateRange, Validator};
use chrono::{DateTime, Utc};
use strum::VariantNames;
use strum_macros::{AsRefStr, Display, EnumString, VariantNames};
use utoipa::IntoParams;

pub const TITLE_MAX: usize = 200;
pub const BRAND_MAX: usize = 50;
pub const MODEL_MAX: usize = 100;
pub const COLOR_MAX: usize = 50;
pub const DESCRIPTION_MAX: usize = 2000;
pub const FEATURE_MAX: usize = 100;
pub const SEO_TITLE_MAX: usize = 60;
pub const SEO_DESCRIPTION_MAX: usize = 160;
pub const MIN_YEAR: i64 = 1900;

#[api_model(rename_all = "UPPERCASE")]
#[derive(Clone, Copy, PartialEq, Eq, Default, Display, EnumString, AsRefStr, VariantNames)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Eur,
    Usd,
}

#[api_model]
#[derive(Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr, VariantNames)]
pub enum Transmission {
    Manual,
    Automatic,
    #[serde(rename = "CVT")]
    #[strum(serialize = "CVT")]
    Cvt,
}

#[api_model]
#[derive(Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr, VariantNames)]
pub enum FuelType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
}

#[api_model]
#[derive(Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr, VariantNames)]
pub enum BodyType {
    Sedan,
    #[serde(rename = "SUV")]
    #[strum(serialize = "SUV")]
    Suv,
    Hatchback,
    Coupe,
    Convertible,
    Wagon,
    Pickup,
}

#[api_model]
#[derive(Clone, Copy, PartialEq, Eq, Default, Display, EnumString, AsRefStr, VariantNames)]
pub enum Condition {
    New,
    #[default]
    Used,
    Certified,
}

#[api_model]
#[derive(Clone, Copy, PartialEq, Eq, Default, Display, EnumString, AsRefStr, VariantNames)]
pub enum VehicleStatus {
    #[default]
    Available,
    Sold,
    Reserved,
    #[serde(rename = "Coming Soon")]
    #[strum(serialize = "Coming Soon")]
    ComingSoon,
}

/// Listing order accepted by `GET /api/vehicles?sort=`.
#[api_model(rename_all = "kebab-case")]
#[derive(Clone, Copy, PartialEq, Eq, Default, Display, EnumString, AsRefStr, VariantNames)]
#[strum(serialize_all = "kebab-case")]
pub enum VehicleSort {
    #[default]
    Newest,
    Updated,
    PriceAsc,
    PriceDesc,
    YearAsc,
    YearDesc,
    MileageAsc,
    MostViewed,
    MostFavorited,
}

impl VehicleSort {
    /// `ORDER BY` clause; ties fall back to the newest record.
    #[must_use]
    pub const fn order_by(self) -> &'static str {
        match self {
            Self::Newest => "created_at DESC",
            Self::Updated => "updated_at DESC",
            Self::PriceAsc => "price ASC, created_at DESC",
            Self::PriceDesc => "price DESC, created_at DESC",
            Self::YearAsc => "year ASC, created_at DESC",
            Self::YearDesc => "year DESC, created_at DESC",
            Self::MileageAsc => "mileage ASC, created_at DESC",
            Self::MostViewed => "views DESC, created_at DESC",
            Self::MostFavorited => "favorites DESC, created_at DESC",
        }
    }
}

#[api_model]
#[derive(Clone, PartialEq)]
pub struct VehicleImage {
    pub url: String,
    pub alt: String,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub order: i64,
}

/// A vehicle as returned by the API. `id` is the opaque record key.
#[api_model]
#[derive(Clone, PartialEq)]
pub struct Vehicle {
    pub id: String,
    pub title: String,
    pub brand: String,
    pub model: String,
    pub year: i64,
    pub price: f64,
    pub currency: Currency,
    pub mileage: i64,
    pub transmission: Transmission,
    pub fuel_type: FuelType,
    pub body_type: BodyType,
    pub condition: Condition,
    pub color: String,
    pub engine_size: f64,
    pub horsepower: i64,
    pub description: String,
    pub features: Vec<String>,
    pub images: Vec<VehicleImage>,
    pub status: VehicleStatus,
    pub featured: bool,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo_description: Option<String>,
    pub seo_keywords: Vec<String>,
    /// Detail page views.
    pub views: i64,
    pub favorites: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Engagement counters returned by the favorite endpoints.
#[api_model]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct VehicleEngagement {
    pub views: i64,
    pub favorites: i64,
}

#[api_model]
#[derive(Clone, Default)]
#[serde(default)]
pub struct ImagePayload {
    pub url: String,
    pub alt: String,
    pub is_primary: bool,
    pub order: i64,
}

/// Body of `POST /api/vehicles` and `PUT /api/vehicles/{id}`.
///
/// Everything is optional at the JSON level so that a single request reports
/// every missing or invalid field at once.
#[api_model]
#[derive(Clone, Default)]
#[serde(default)]
pub struct VehiclePayload {
    pub title: String,
    pub brand: String,
    pub model: String,
    pub year: Option<i64>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub mileage: Option<i64>,
    pub transmission: String,
    pub fuel_type: String,
    pub body_type: String,
    pub condition: Option<String>,
    pub color: String,
    pub engine_size: Option<f64>,
    pub horsepower: Option<i64>,
    pub description: String,
    pub features: Vec<String>,
    pub images: Vec<ImagePayload>,
    pub status: Option<String>,
    pub featured: bool,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub seo_keywords: Vec<String>,
}

/// A validated, normalised vehicle without identity or timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleDraft {
    pub title: String,
    pub brand: String,
    pub model: String,
    pub year: i64,
    pub price: f64,
    pub currency: Currency,
    pub mileage: i64,
    pub transmission: Transmission,
    pub fuel_type: FuelType,
    pub body_type: BodyType,
    pub condition: Condition,
    pub color: String,
    pub engine_size: f64,
    pub horsepower: i64,
    pub description: String,
    pub features: Vec<String>,
    pub images: Vec<VehicleImage>,
    pub status: VehicleStatus,
    pub featured: bool,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub seo_keywords: Vec<String>,
}

impl VehiclePayload {
    /// Validates every field against the catalog rules for `current_year`.
    ///
    /// # Errors
    /// Returns all field errors found, never just the first one.
    pub fn validate(self, current_year: i64) -> Result<VehicleDraft, Vec<FieldError>> {
        let mut v = Validator::new();

        let title = v.required("title", "Title", &self.title, TITLE_MAX);
        let brand = v.required("brand", "Brand", &self.brand, BRAND_MAX);
        let model = v.required("model", "Model", &self.model, MODEL_MAX);
        let color = v.required("color", "Color", &self.color, COLOR_MAX);
        let description = v.required("description", "Description", &self.description, DESCRIPTION_MAX);

        let year = number(&mut v, ("year", "Year"), self.year, Some(MIN_YEAR), Some(current_year + 2));
        let price = number(&mut v, ("price", "Price"), self.price, Some(0.0), None);
        if !price.is_finite() {
            v.push("price", "Price must be a number");
        }
        let mileage = number(&mut v, ("mileage", "Mileage"), self.mileage, Some(0), None);
        let engine_size =
            number(&mut v, ("engineSize", "Engine size"), self.engine_size, Some(0.1), Some(10.0));
        let horsepower = number(&mut v, ("horsepower", "Horsepower"), self.horsepower, Some(1), None);

        let transmission =
            v.choice("transmission", "Transmission", &self.transmission, Transmission::VARIANTS);
        let fuel_type = v.choice("fuelType", "Fuel type", &self.fuel_type, FuelType::VARIANTS);
        let body_type = v.choice("bodyType", "Body type", &self.body_type, BodyType::VARIANTS);
        let currency = optional_choice(&mut v, "currency", "Currency", self.currency.as_deref());
        let condition = optional_choice(&mut v, "condition", "Condition", self.condition.as_deref());
        let status = optional_choice(&mut v, "status", "Status", self.status.as_deref());

        let features = v.list("features", "Feature", &self.features, FEATURE_MAX);
        let seo_keywords = v.list("seoKeywords", "SEO keyword", &self.seo_keywords, FEATURE_MAX);
        let seo_title = v.optional("seoTitle", "SEO title", self.seo_title.as_deref(), SEO_TITLE_MAX);
        let seo_description = v.optional(
            "seoDescription",
            "SEO description",
            self.seo_description.as_deref(),
            SEO_DESCRIPTION_MAX,
        );

        let images = self
            .images
            .iter()
            .enumerate()
            .map(|(idx, image)| VehicleImage {
                url: v.required(&format!("images[{idx}].url"), "Image URL", &image.url, usize::MAX),
                alt: v.required(&format!("images[{idx}].alt"), "Image alt text", &image.alt, 200),
                is_primary: image.is_primary,
                order: image.order,
            })
            .collect();

        v.finish()?;

        match (transmission, fuel_type, body_type, currency, condition, status) {
            (Some(transmission), Some(fuel_type), Some(body_type), Some(currency), Some(condition), Some(status)) => {
                Ok(VehicleDraft {
                    title,
                    brand,
                    model,
                    year,
                    price,
                    currency,
                    mileage,
                    transmission,
                    fuel_type,
                    body_type,
                    condition,
                    color,
                    engine_size,
                    horsepower,
                    description,
                    features,
                    images,
                    status,
                    featured: self.featured,
                    seo_title,
                    seo_description,
                    seo_keywords,
                })
            },
            _ => Err(vec![FieldError::new("payload", "Invalid vehicle")]),
        }
    }
}

/// Required number within bounds; a missing value is reported and yields `T::default()`.
fn number<T>(v: &mut Validator, (field, label): (&str, &str), value: Option<T>, min: Option<T>, max: Option<T>) -> T
where
    T: ValidateRange<T> + std::fmt::Display + Copy + Default,
{
    match value {
        Some(value) => {
            v.range(field, label, value, min, max);
            value
        },
        None => {
            v.push(field, format!("{label} is required"));
            T::default()
        },
    }
}

/// Absent means the enum's default; present but unknown is an error.
fn optional_choice<E>(v: &mut Validator, field: &str, label: &str, value: Option<&str>) -> Option<E>
where
    E: Default + VariantNames + std::str::FromStr,
{
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        None => Some(E::default()),
        Some(raw) => v.choice(field, label, raw, E::VARIANTS),
    }
}

/// Query string of `GET /api/vehicles`.
#[api_model(deny_unknown_fields = false)]
#[derive(Default, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(default)]
pub struct VehicleListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Case-insensitive substring of the brand.
    pub brand: Option<String>,
    pub model: Option<String>,
    /// Case-insensitive substring of title, brand, model or description.
    pub search: Option<String>,
    pub year_from: Option<i64>,
    pub year_to: Option<i64>,
    pub price_from: Option<f64>,
    pub price_to: Option<f64>,
    pub mileage_from: Option<i64>,
    pub mileage_to: Option<i64>,
    pub transmission: Option<String>,
    pub fuel_type: Option<String>,
    pub body_type: Option<String>,
    pub condition: Option<String>,
    pub status: Option<String>,
    pub featured: Option<bool>,
    /// `newest` (default), `updated`, `price-asc`, `price-desc`, `year-asc`, `year-desc`, `mileage-asc`,
    /// `most-viewed`, `most-favorited`.
    pub sort: Option<String>,
}

/// Validated listing filters. Every present filter narrows the result (AND).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleFilter {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub search: Option<String>,
    pub year_from: Option<i64>,
    pub year_to: Option<i64>,
    pub price_from: Option<f64>,
    pub price_to: Option<f64>,
    pub mileage_from: Option<i64>,
    pub mileage_to: Option<i64>,
    pub transmission: Option<Transmission>,
    pub fuel_type: Option<FuelType>,
    pub body_type: Option<BodyType>,
    pub condition: Option<Condition>,
    pub status: Option<VehicleStatus>,
    pub featured: Option<bool>,
    pub sort: VehicleSort,
}

impl VehicleListQuery {
    /// # Errors
    /// Returns field errors for negative ranges or unknown enum values.
    pub fn filter(&self) -> Result<VehicleFilter, Vec<FieldError>> {
        let mut v = Validator::new();

        for (field, label, value) in [
            ("yearFrom", "Year from", self.year_from),
            ("yearTo", "Year to", self.year_to),
            ("mileageFrom", "Mileage from", self.mileage_from),
            ("mileageTo", "Mileage to", self.mileage_to),
        ] {
            if let Some(value) = value {
                v.range(field, label, value, Some(0), None);
            }
        }
        for (field, label, value) in
            [("priceFrom", "Price from", self.price_from), ("priceTo", "Price to", self.price_to)]
        {
            if let Some(value) = value {
                v.range(field, label, value, Some(0.0), None);
            }
        }

        let filter = VehicleFilter {
            brand: lowered(self.brand.as_deref()),
            model: lowered(self.model.as_deref()),
            search: lowered(self.search.as_deref()),
            year_from: self.year_from,
            year_to: self.year_to,
            price_from: self.price_from,
            price_to: self.price_to,
            mileage_from: self.mileage_from,
            mileage_to: self.mileage_to,
            transmission: filter_choice(&mut v, "transmission", "Transmission", self.transmission.as_deref()),
            fuel_type: filter_choice(&mut v, "fuelType", "Fuel type", self.fuel_type.as_deref()),
            body_type: filter_choice(&mut v, "bodyType", "Body type", self.body_type.as_deref()),
            condition: filter_choice(&mut v, "condition", "Condition", self.condition.as_deref()),
            status: filter_choice(&mut v, "status", "Status", self.status.as_deref()),
            featured: self.featured,
            sort: optional_choice(&mut v, "sort", "Sort", self.sort.as_deref()).unwrap_or_default(),
        };

        v.finish().map(|()| filter)
    }
}

fn lowered(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|s| !s.is_empty()).map(str::to_lowercase)
}

fn filter_choice<E>(v: &mut Validator, field: &str, label: &str, value: Option<&str>) -> Option<E>
where
    E: VariantNames + std::str::FromStr,
{
    let raw = value.map(str::trim).filter(|s| !s.is_empty())?;
    v.choice(field, label, raw, E::VARIANTS)
}

/// Query string of the `featured` and `related` listings.
#[api_model(deny_unknown_fields = false)]
#[derive(Default, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(default)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}
