use crate::error::{VehicleError, VehicleErrorExt};
use crate::model::{Vehicle, VehicleDraft, VehicleEngagement, VehicleFilter, VehicleImage};
use autoani_database::{Database, is_unique_violation};
use autoani_kernel::pagination::PageRequest;
use autoani_kernel::safe_nanoid;
use autoani_kernel::slug::{slugify, unique_slug};
use chrono::{DateTime, Utc};
use fxhash::FxHashSet;
use std::str::FromStr;
use surrealdb::types::SurrealValue;
use tracing::{debug, instrument};

#[derive(Debug, Clone, SurrealValue)]
struct ImageRecord {
    url: String,
    alt: String,
    is_primary: bool,
    order: i64,
}

/// Stored shape of a vehicle. Enums are kept as their wire strings.
#[derive(Debug, Clone, SurrealValue)]
struct VehicleRecord {
    key: String,
    title: String,
    brand: String,
    brand_lower: String,
    model: String,
    year: i64,
    price: f64,
    currency: String,
    mileage: i64,
    transmission: String,
    fuel_type: String,
    body_type: String,
    condition: String,
    color: String,
    engine_size: f64,
    horsepower: i64,
    description: String,
    features: Vec<String>,
    images: Vec<ImageRecord>,
    status: String,
    featured: bool,
    slug: String,
    seo_title: Option<String>,
    seo_description: Option<String>,
    seo_keywords: Vec<String>,
    search_text: String,
    views: i64,
    favorites: i64,
    created_at: i64,
    updated_at: i64,
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: i64,
}

#[derive(Debug, SurrealValue)]
struct EngagementRow {
    views: i64,
    favorites: i64,
}

impl VehicleRecord {
    fn new(key: String, slug: String, draft: VehicleDraft, created_at: i64, updated_at: i64) -> Self {
        let search_text = format!(
            "{} {} {} {}",
            draft.title, draft.brand, draft.model, draft.description
        )
        .to_lowercase();

        Self {
            key,
            brand_lower: draft.brand.to_lowercase(),
            title: draft.title,
            brand: draft.brand,
            model: draft.model,
            year: draft.year,
            price: draft.price,
            currency: draft.currency.to_string(),
            mileage: draft.mileage,
            transmission: draft.transmission.to_string(),
            fuel_type: draft.fuel_type.to_string(),
            body_type: draft.body_type.to_string(),
            condition: draft.condition.to_string(),
            color: draft.color,
            engine_size: draft.engine_size,
            horsepower: draft.horsepower,
            description: draft.description,
            features: draft.features,
            images: draft
                .images
                .into_iter()
                .map(|i| ImageRecord { url: i.url, alt: i.alt, is_primary: i.is_primary, order: i.order })
                .collect(),
            status: draft.status.to_string(),
            featured: draft.featured,
            slug,
            seo_title: draft.seo_title,
            seo_description: draft.seo_description,
            seo_keywords: draft.seo_keywords,
            search_text,
            views: 0,
            favorites: 0,
            created_at,
            updated_at,
        }
    }

    const fn with_engagement(mut self, views: i64, favorites: i64) -> Self {
        self.views = views;
        self.favorites = favorites;
        self
    }
}

impl TryFrom<VehicleRecord> for Vehicle {
    type Error = VehicleError;

    fn try_from(r: VehicleRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            currency: parse(&r.key, "currency", &r.currency)?,
            transmission: parse(&r.key, "transmission", &r.transmission)?,
            fuel_type: parse(&r.key, "fuel_type", &r.fuel_type)?,
            body_type: parse(&r.key, "body_type", &r.body_type)?,
            condition: parse(&r.key, "condition", &r.condition)?,
            status: parse(&r.key, "status", &r.status)?,
            created_at: timestamp(r.created_at),
            updated_at: timestamp(r.updated_at),
            id: r.key,
            title: r.title,
            brand: r.brand,
            model: r.model,
            year: r.year,
            price: r.price,
            mileage: r.mileage,
            color: r.color,
            engine_size: r.engine_size,
            horsepower: r.horsepower,
            description: r.description,
            features: r.features,
            images: r
                .images
                .into_iter()
                .map(|i| VehicleImage { url: i.url, alt: i.alt, is_primary: i.is_primary, order: i.order })
                .collect(),
            featured: r.featured,
            slug: r.slug,
            seo_title: r.seo_title,
            seo_description: r.seo_description,
            seo_keywords: r.seo_keywords,
            views: r.views,
            favorites: r.favorites,
        })
    }
}

fn parse<E: FromStr>(key: &str, field: &str, raw: &str) -> Result<E, VehicleError> {
    raw.parse().map_err(|_| VehicleError::Internal {
        message: format!("Unexpected {field} '{raw}'").into(),
        context: Some(format!("Decoding vehicle {key}").into()),
    })
}

fn timestamp(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

const SELECT: &str = "SELECT * OMIT id FROM vehicle";
const SLUG_INDEX: &str = "vehicle_slug";
const SLUG_ATTEMPTS: u32 = 5;
const UPDATE_ATTEMPTS: u32 = 5;

/// `SurrealDB` access for the `vehicle` table.
#[derive(Debug, Clone)]
pub struct VehicleRepository {
    db: Database,
}

impl VehicleRepository {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// One page of vehicles matching `filter`, plus the total match count.
    #[instrument(skip(self), err)]
    pub async fn list(
        &self,
        filter: &VehicleFilter,
        page: PageRequest,
    ) -> Result<(Vec<Vehicle>, u64), VehicleError> {
        let conditions = where_clause(filter);
        let sql = format!(
            "{SELECT}{conditions} ORDER BY {order} LIMIT {limit} START {offset};
            SELECT count() AS total FROM vehicle{conditions} GROUP ALL;",
            order = filter.sort.order_by(),
            limit = page.limit,
            offset = page.offset(),
        );
        debug!(%sql, "Listing vehicles");

        let mut response = self
            .db
            .query(&sql)
            .bind(("brand", filter.brand.clone()))
            .bind(("model", filter.model.clone()))
            .bind(("search", filter.search.clone()))
            .bind(("year_from", filter.year_from))
            .bind(("year_to", filter.year_to))
            .bind(("price_from", filter.price_from))
            .bind(("price_to", filter.price_to))
            .bind(("mileage_from", filter.mileage_from))
            .bind(("mileage_to", filter.mileage_to))
            .bind(("transmission", filter.transmission.map(|t| t.to_string())))
            .bind(("fuel_type", filter.fuel_type.map(|t| t.to_string())))
            .bind(("body_type", filter.body_type.map(|t| t.to_string())))
            .bind(("condition", filter.condition.map(|t| t.to_string())))
            .bind(("status", filter.status.map(|t| t.to_string())))
            .bind(("featured", filter.featured))
            .await
            .context("Listing vehicles")?
            .check()
            .map_err(surrealdb::Error::from)?;

        let records = response.take::<Vec<VehicleRecord>>(0).context("Decoding vehicles")?;
        let total = response.take::<Vec<CountRow>>(1).context("Counting vehicles")?;
        let total = total.first().map_or(0, |row| row.total.unsigned_abs());

        Ok((into_vehicles(records)?, total))
    }

    /// Featured vehicles that are still available, newest first.
    pub async fn featured(&self, limit: u64) -> Result<Vec<Vehicle>, VehicleError> {
        let sql = format!(
            "{SELECT} WHERE featured = true AND status = 'Available' ORDER BY created_at DESC LIMIT {limit}"
        );
        let records = self
            .db
            .query(&sql)
            .await
            .context("Loading featured vehicles")?
            .take::<Vec<VehicleRecord>>(0)
            .context("Decoding featured vehicles")?;

        into_vehicles(records)
    }

    pub async fn find(&self, key: &str) -> Result<Option<Vehicle>, VehicleError> {
        self.find_by("key", key).await
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Vehicle>, VehicleError> {
        self.find_by("slug", slug).await
    }

    /// # Errors
    /// Returns [`VehicleError::NotFound`] when no vehicle has this key.
    pub async fn get(&self, key: &str) -> Result<Vehicle, VehicleError> {
        self.find(key).await?.ok_or_else(|| VehicleError::not_found(key))
    }

    /// Available vehicles sharing the brand or body type of `key`.
    pub async fn related(&self, key: &str, limit: u64) -> Result<Vec<Vehicle>, VehicleError> {
        let vehicle = self.get(key).await?;
        let sql = format!(
            "{SELECT} WHERE key != $key AND status = 'Available'
                AND (brand_lower = $brand OR body_type = $body_type)
            ORDER BY featured DESC, created_at DESC LIMIT {limit}"
        );

        let records = self
            .db
            .query(&sql)
            .bind(("key", vehicle.id))
            .bind(("brand", vehicle.brand.to_lowercase()))
            .bind(("body_type", vehicle.body_type.to_string()))
            .await
            .context("Loading related vehicles")?
            .take::<Vec<VehicleRecord>>(0)
            .context("Decoding related vehicles")?;

        into_vehicles(records)
    }

    #[instrument(skip(self, draft), fields(title = %draft.title), err)]
    pub async fn create(&self, draft: VehicleDraft) -> Result<Vehicle, VehicleError> {
        let slug = self.free_slug(&draft.title, None).await?;
        let now = Utc::now().timestamp_millis();
        let record = VehicleRecord::new(safe_nanoid!(), slug, draft, now, now);

        let record = self
            .store("CREATE vehicle CONTENT $record RETURN VALUE key", record, None)
            .await?
            .ok_or_else(|| VehicleError::Internal {
                message: "Vehicle was not created".into(),
                context: Some("Creating vehicle".into()),
            })?;
        Vehicle::try_from(record)
    }

    /// Replaces every editable field of `key`. The slug follows the title only when it
    /// changed. Views and favorites are carried over; the write only lands while they
    /// still hold the values read, otherwise the vehicle is re-read and the write retried.
    #[instrument(skip(self, draft), err)]
    pub async fn update(&self, key: &str, draft: VehicleDraft) -> Result<Vehicle, VehicleError> {
        for attempt in 1..=UPDATE_ATTEMPTS {
            let existing = self.get(key).await?;
            let slug = if existing.title == draft.title {
                existing.slug
            } else {
                self.free_slug(&draft.title, Some(key)).await?
            };
            let record = VehicleRecord::new(
                existing.id,
                slug,
                draft.clone(),
                existing.created_at.timestamp_millis(),
                Utc::now().timestamp_millis(),
            )
            .with_engagement(existing.views, existing.favorites);

            let stored = self
                .store(
                    "UPDATE vehicle CONTENT $record
                    WHERE key = $key AND views = $record.views AND favorites = $record.favorites
                    RETURN VALUE key",
                    record,
                    Some(key),
                )
                .await?;
            match stored {
                Some(record) => return Vehicle::try_from(record),
                None => debug!(attempt, "Vehicle counters moved during update, retrying"),
            }
        }

        Err(VehicleError::Internal {
            message: "Vehicle kept changing during update".into(),
            context: Some(format!("Updating vehicle {key}").into()),
        })
    }

    /// Counts one detail page view of the vehicle whose `field` equals `value` and returns it.
    pub async fn view_by(&self, field: &'static str, value: &str) -> Result<Option<Vehicle>, VehicleError> {
        let sql = format!(
            "UPDATE vehicle SET views += 1 WHERE {field} = $value RETURN NONE;
            {SELECT} WHERE {field} = $value LIMIT 1;"
        );
        let records = self
            .db
            .query(&sql)
            .bind(("value", value.to_owned()))
            .await
            .context("Counting vehicle view")?
            .check()
            .map_err(surrealdb::Error::from)?
            .take::<Vec<VehicleRecord>>(1)
            .context("Decoding vehicle")?;

        records.into_iter().next().map(Vehicle::try_from).transpose()
    }

    /// Adds `delta` to the favorites of `key`, never going below zero.
    ///
    /// # Errors
    /// Returns [`VehicleError::NotFound`] when no vehicle has this key.
    #[instrument(skip(self), err)]
    pub async fn favorite(&self, key: &str, delta: i64) -> Result<VehicleEngagement, VehicleError> {
        let rows = self
            .db
            .query(
                "UPDATE vehicle SET favorites = math::max([favorites + $delta, 0])
                WHERE key = $key RETURN views, favorites",
            )
            .bind(("key", key.to_owned()))
            .bind(("delta", delta))
            .await
            .context("Updating favorites")?
            .check()
            .map_err(surrealdb::Error::from)?
            .take::<Vec<EngagementRow>>(0)
            .context("Decoding favorites")?;

        rows.into_iter()
            .next()
            .map(|row| VehicleEngagement { views: row.views, favorites: row.favorites })
            .ok_or_else(|| VehicleError::not_found(key))
    }

    /// Deletes `key` and returns the removed vehicle.
    #[instrument(skip(self), err)]
    pub async fn delete(&self, key: &str) -> Result<Vehicle, VehicleError> {
        let existing = self.get(key).await?;

        self.db
            .query("DELETE vehicle WHERE key = $key")
            .bind(("key", key.to_owned()))
            .await
            .context("Deleting vehicle")?
            .check()
            .map_err(surrealdb::Error::from)?;

        Ok(existing)
    }

    pub async fn count(&self) -> Result<u64, VehicleError> {
        let rows = self
            .db
            .query("SELECT count() AS total FROM vehicle GROUP ALL")
            .await
            .context("Counting vehicles")?
            .take::<Vec<CountRow>>(0)
            .context("Decoding vehicle count")?;

        Ok(rows.first().map_or(0, |row| row.total.unsigned_abs()))
    }

    async fn find_by(&self, field: &'static str, value: &str) -> Result<Option<Vehicle>, VehicleError> {
        let sql = format!("{SELECT} WHERE {field} = $value LIMIT 1");
        let records = self
            .db
            .query(&sql)
            .bind(("value", value.to_owned()))
            .await
            .context("Loading vehicle")?
            .take::<Vec<VehicleRecord>>(0)
            .context("Decoding vehicle")?;

        records.into_iter().next().map(Vehicle::try_from).transpose()
    }

    /// Runs the `CREATE`/`UPDATE` in `sql`, which must return the written keys. `None`
    /// means no row matched. When a concurrent write took the slug first, the next free
    /// slug is picked and the write retried.
    async fn store(
        &self,
        sql: &'static str,
        mut record: VehicleRecord,
        key: Option<&str>,
    ) -> Result<Option<VehicleRecord>, VehicleError> {
        let mut attempt = 1;
        loop {
            let result = self
                .db
                .query(sql)
                .bind(("key", key.unwrap_or_default().to_owned()))
                .bind(("record", record.clone()))
                .await
                .and_then(|response| response.check().map_err(surrealdb::Error::from))
                .and_then(|mut response| response.take::<Vec<String>>(0));

            match result {
                Ok(keys) if keys.is_empty() => return Ok(None),
                Ok(_) => return Ok(Some(record)),
                Err(err) if attempt < SLUG_ATTEMPTS && is_unique_violation(&err, SLUG_INDEX) => {
                    debug!(attempt, slug = %record.slug, "Slug taken concurrently, retrying");
                    record.slug = self.free_slug(&record.title, key).await?;
                    attempt += 1;
                },
                Err(err) => {
                    return Err(VehicleError::Database {
                        source: err,
                        context: Some(format!("Storing vehicle {}", record.key).into()),
                    });
                },
            }
        }
    }

    /// First free slug for `title`, ignoring the record `exclude` itself.
    async fn free_slug(&self, title: &str, exclude: Option<&str>) -> Result<String, VehicleError> {
        let base = slugify(title);
        let taken: FxHashSet<String> = self
            .db
            .query(
                "SELECT VALUE slug FROM vehicle
                WHERE (slug = $base OR string::starts_with(slug, $prefix)) AND key != $exclude",
            )
            .bind(("base", base.clone()))
            .bind(("prefix", format!("{base}-")))
            .bind(("exclude", exclude.unwrap_or_default().to_owned()))
            .await
            .context("Loading taken slugs")?
            .take::<Vec<String>>(0)
            .context("Decoding taken slugs")?
            .into_iter()
            .collect();

        Ok(unique_slug(&base, |candidate| taken.contains(candidate)))
    }
}

fn into_vehicles(records: Vec<VehicleRecord>) -> Result<Vec<Vehicle>, VehicleError> {
    records.into_iter().map(Vehicle::try_from).collect()
}

fn where_clause(filter: &VehicleFilter) -> String {
    let checks = [
        (filter.brand.is_some(), "brand_lower CONTAINS $brand"),
        (filter.model.is_some(), "string::lowercase(model) CONTAINS $model"),
        (filter.search.is_some(), "search_text CONTAINS $search"),
        (filter.year_from.is_some(), "year >= $year_from"),
        (filter.year_to.is_some(), "year <= $year_to"),
        (filter.price_from.is_some(), "price >= $price_from"),
        (filter.price_to.is_some(), "price <= $price_to"),
        (filter.mileage_from.is_some(), "mileage >= $mileage_from"),
        (filter.mileage_to.is_some(), "mileage <= $mileage_to"),
        (filter.transmission.is_some(), "transmission = $transmission"),
        (filter.fuel_type.is_some(), "fuel_type = $fuel_type"),
        (filter.body_type.is_some(), "body_type = $body_type"),
        (filter.condition.is_some(), "condition = $condition"),
        (filter.status.is_some(), "status = $status"),
        (filter.featured.is_some(), "featured = $featured"),
    ];

    let conditions: Vec<&str> = checks.iter().filter(|(on, _)| *on).map(|(_, sql)| *sql).collect();
    if conditions.is_empty() { String::new() } else { format!(" WHERE {}", conditions.join(" AND ")) }
}
