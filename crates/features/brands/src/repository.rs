use crate::error::{BrandError, BrandErrorExt};
use crate::model::{Brand, BrandDraft};
use autoani_database::{Database, is_unique_violation};
use autoani_kernel::safe_nanoid;
use autoani_kernel::slug::{slugify, unique_slug};
use chrono::{DateTime, Utc};
use fxhash::{FxHashMap, FxHashSet};
use surrealdb::types::SurrealValue;
use tracing::{debug, instrument};

#[derive(Debug, Clone, SurrealValue)]
struct BrandRecord {
    key: String,
    name: String,
    name_lower: String,
    logo: String,
    description: String,
    featured: bool,
    slug: String,
    created_at: i64,
    updated_at: i64,
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: i64,
}

#[derive(Debug, SurrealValue)]
struct BrandCount {
    brand_lower: String,
    total: i64,
}

impl BrandRecord {
    fn new(key: String, slug: String, draft: BrandDraft, created_at: i64, updated_at: i64) -> Self {
        Self {
            key,
            name_lower: draft.name.to_lowercase(),
            name: draft.name,
            logo: draft.logo,
            description: draft.description,
            featured: draft.featured,
            slug,
            created_at,
            updated_at,
        }
    }

    fn into_brand(self, vehicle_count: u64) -> Brand {
        Brand {
            id: self.key,
            name: self.name,
            logo: self.logo,
            description: self.description,
            featured: self.featured,
            vehicle_count,
            slug: self.slug,
            created_at: DateTime::from_timestamp_millis(self.created_at).unwrap_or_default(),
            updated_at: DateTime::from_timestamp_millis(self.updated_at).unwrap_or_default(),
        }
    }
}

const SELECT: &str = "SELECT * OMIT id FROM brand";
const NAME_INDEX: &str = "brand_name";
const SLUG_INDEX: &str = "brand_slug";
const SLUG_ATTEMPTS: u32 = 5;

fn name_taken() -> BrandError {
    BrandError::Conflict { message: "Brand already exists".into(), context: None }
}

/// `SurrealDB` access for the `brand` table.
#[derive(Debug, Clone)]
pub struct BrandRepository {
    db: Database,
}

impl BrandRepository {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// All brands ordered by name; `featured_only` narrows to featured ones.
    pub async fn list(&self, featured_only: bool) -> Result<Vec<Brand>, BrandError> {
        let filter = if featured_only { " WHERE featured = true" } else { "" };
        let sql = format!("{SELECT}{filter} ORDER BY name_lower ASC");

        let records = self
            .db
            .query(&sql)
            .await
            .context("Listing brands")?
            .take::<Vec<BrandRecord>>(0)
            .context("Decoding brands")?;

        let counts = self.vehicle_counts().await?;
        Ok(records
            .into_iter()
            .map(|r| {
                let count = counts.get(&r.name_lower).copied().unwrap_or_default();
                r.into_brand(count)
            })
            .collect())
    }

    pub async fn find(&self, key: &str) -> Result<Option<Brand>, BrandError> {
        self.find_by("key", key).await
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Brand>, BrandError> {
        self.find_by("slug", slug).await
    }

    /// # Errors
    /// Returns [`BrandError::NotFound`] when no brand has this key.
    pub async fn get(&self, key: &str) -> Result<Brand, BrandError> {
        self.find(key).await?.ok_or_else(|| BrandError::NotFound {
            message: key.to_owned().into(),
            context: None,
        })
    }

    #[instrument(skip(self, draft), fields(name = %draft.name), err)]
    pub async fn create(&self, draft: BrandDraft) -> Result<Brand, BrandError> {
        self.ensure_name_free(&draft.name, None).await?;

        let slug = self.free_slug(&draft.name, None).await?;
        let now = Utc::now().timestamp_millis();
        let record = BrandRecord::new(safe_nanoid!(), slug, draft, now, now);

        let record = self.store("CREATE brand CONTENT $record RETURN NONE", record, None).await?;

        let count = self.vehicle_count(&record.name_lower).await?;
        Ok(record.into_brand(count))
    }

    #[instrument(skip(self, draft), err)]
    pub async fn update(&self, key: &str, draft: BrandDraft) -> Result<Brand, BrandError> {
        let existing = self.get(key).await?;
        self.ensure_name_free(&draft.name, Some(key)).await?;

        let slug = if existing.name == draft.name {
            existing.slug
        } else {
            self.free_slug(&draft.name, Some(key)).await?
        };
        let record = BrandRecord::new(
            existing.id,
            slug,
            draft,
            existing.created_at.timestamp_millis(),
            Utc::now().timestamp_millis(),
        );

        let record = self
            .store("UPDATE brand CONTENT $record WHERE key = $key RETURN NONE", record, Some(key))
            .await?;

        let count = self.vehicle_count(&record.name_lower).await?;
        Ok(record.into_brand(count))
    }

    #[instrument(skip(self), err)]
    pub async fn delete(&self, key: &str) -> Result<Brand, BrandError> {
        let existing = self.get(key).await?;

        self.db
            .query("DELETE brand WHERE key = $key")
            .bind(("key", key.to_owned()))
            .await
            .context("Deleting brand")?
            .check()
            .map_err(surrealdb::Error::from)?;

        Ok(existing)
    }

    pub async fn count(&self) -> Result<u64, BrandError> {
        let totals = self
            .db
            .query("SELECT count() AS total FROM brand GROUP ALL")
            .await
            .context("Counting brands")?
            .take::<Vec<CountRow>>(0)
            .context("Decoding brand count")?;

        Ok(totals.first().map_or(0, |row| row.total.unsigned_abs()))
    }

    async fn find_by(&self, field: &'static str, value: &str) -> Result<Option<Brand>, BrandError> {
        let sql = format!("{SELECT} WHERE {field} = $value LIMIT 1");
        let record = self
            .db
            .query(&sql)
            .bind(("value", value.to_owned()))
            .await
            .context("Loading brand")?
            .take::<Vec<BrandRecord>>(0)
            .context("Decoding brand")?
            .into_iter()
            .next();

        match record {
            Some(record) => {
                let count = self.vehicle_count(&record.name_lower).await?;
                Ok(Some(record.into_brand(count)))
            },
            None => Ok(None),
        }
    }

    /// Runs the `CREATE`/`UPDATE` in `sql`, resolving races the pre-checks cannot see:
    /// a name taken meanwhile is a conflict, a slug taken meanwhile is replaced.
    async fn store(
        &self,
        sql: &'static str,
        mut record: BrandRecord,
        key: Option<&str>,
    ) -> Result<BrandRecord, BrandError> {
        let mut attempt = 1;
        loop {
            let result = self
                .db
                .query(sql)
                .bind(("key", key.unwrap_or_default().to_owned()))
                .bind(("record", record.clone()))
                .await
                .and_then(|response| response.check().map_err(surrealdb::Error::from));

            match result {
                Ok(_) => return Ok(record),
                Err(err) if is_unique_violation(&err, NAME_INDEX) => return Err(name_taken()),
                Err(err) if attempt < SLUG_ATTEMPTS && is_unique_violation(&err, SLUG_INDEX) => {
                    debug!(attempt, slug = %record.slug, "Brand slug taken concurrently, retrying");
                    record.slug = self.free_slug(&record.name, key).await?;
                    attempt += 1;
                },
                Err(err) => {
                    return Err(BrandError::Database {
                        source: err,
                        context: Some(format!("Storing brand {}", record.key).into()),
                    });
                },
            }
        }
    }

    async fn ensure_name_free(&self, name: &str, exclude: Option<&str>) -> Result<(), BrandError> {
        let clashes = self
            .db
            .query("SELECT VALUE key FROM brand WHERE name_lower = $name AND key != $exclude")
            .bind(("name", name.to_lowercase()))
            .bind(("exclude", exclude.unwrap_or_default().to_owned()))
            .await
            .context("Checking brand name")?
            .take::<Vec<String>>(0)
            .context("Decoding brand name check")?;

        if clashes.is_empty() {
            Ok(())
        } else {
            Err(name_taken())
        }
    }

    async fn free_slug(&self, name: &str, exclude: Option<&str>) -> Result<String, BrandError> {
        let base = slugify(name);
        let taken: FxHashSet<String> = self
            .db
            .query(
                "SELECT VALUE slug FROM brand
                WHERE (slug = $base OR string::starts_with(slug, $prefix)) AND key != $exclude",
            )
            .bind(("base", base.clone()))
            .bind(("prefix", format!("{base}-")))
            .bind(("exclude", exclude.unwrap_or_default().to_owned()))
            .await
            .context("Loading taken brand slugs")?
            .take::<Vec<String>>(0)
            .context("Decoding taken brand slugs")?
            .into_iter()
            .collect();

        Ok(unique_slug(&base, |candidate| taken.contains(candidate)))
    }

    async fn vehicle_count(&self, name_lower: &str) -> Result<u64, BrandError> {
        let totals = self
            .db
            .query("SELECT count() AS total FROM vehicle WHERE brand_lower = $brand GROUP ALL")
            .bind(("brand", name_lower.to_owned()))
            .await
            .context("Counting brand vehicles")?
            .take::<Vec<CountRow>>(0)
            .context("Decoding brand vehicle count")?;

        Ok(totals.first().map_or(0, |row| row.total.unsigned_abs()))
    }

    async fn vehicle_counts(&self) -> Result<FxHashMap<String, u64>, BrandError> {
        let rows = self
            .db
            .query("SELECT brand_lower, count() AS total FROM vehicle GROUP BY brand_lower")
            .await
            .context("Counting vehicles per brand")?
            .take::<Vec<BrandCount>>(0)
            .context("Decoding vehicles per brand")?;

        Ok(rows.into_iter().map(|row| (row.brand_lower, row.total.unsigned_abs())).collect())
    }
}
