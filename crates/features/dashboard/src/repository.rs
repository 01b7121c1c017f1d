use crate::error::{DashboardError, DashboardErrorExt};
use crate::model::{Activity, BrandStat, ConditionStat, DashboardTotals, MonthlyStat, PopularVehicle};
use autoani_database::Database;
use autoani_domain::events::CatalogEvent;
use autoani_kernel::safe_nanoid;
use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use fxhash::FxHashMap;
use surrealdb::types::SurrealValue;
use tracing::{debug, instrument};

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: i64,
}

#[derive(Debug, SurrealValue)]
struct ConditionRow {
    condition: String,
    total: i64,
}

#[derive(Debug, SurrealValue)]
struct BrandRow {
    brand_lower: String,
    brand: String,
    total: i64,
}

#[derive(Debug, SurrealValue)]
struct PopularRow {
    key: String,
    title: String,
    slug: String,
    views: i64,
    favorites: i64,
}

#[derive(Debug, SurrealValue)]
struct EngagementRow {
    created_at: i64,
    views: i64,
    favorites: i64,
}

#[derive(Debug, SurrealValue)]
struct StaleRow {
    key: String,
    timestamp: i64,
}

#[derive(Debug, Clone, SurrealValue)]
struct ActivityRecord {
    key: String,
    kind: String,
    description: String,
    subject_id: String,
    timestamp: i64,
}

impl From<ActivityRecord> for Activity {
    fn from(r: ActivityRecord) -> Self {
        Self {
            id: r.key,
            kind: r.kind,
            description: r.description,
            subject_id: r.subject_id,
            timestamp: DateTime::from_timestamp_millis(r.timestamp).unwrap_or_default(),
        }
    }
}

const TOTALS: &str = "
    SELECT count() AS total FROM vehicle GROUP ALL;
    SELECT count() AS total FROM vehicle WHERE status = 'Available' GROUP ALL;
    SELECT count() AS total FROM vehicle WHERE status = 'Sold' GROUP ALL;
    SELECT count() AS total FROM vehicle WHERE status = 'Reserved' GROUP ALL;
    SELECT count() AS total FROM vehicle WHERE featured = true GROUP ALL;
    SELECT count() AS total FROM brand GROUP ALL;
    SELECT count() AS total FROM media GROUP ALL;
    SELECT count() AS total FROM inquiry GROUP ALL;
    SELECT math::sum(views) AS total FROM vehicle GROUP ALL;
    SELECT math::sum(favorites) AS total FROM vehicle GROUP ALL;
";

/// Upper bound on activity entries deleted by one prune.
const PRUNE_BATCH: u64 = 1000;

/// Read-only aggregates over the catalog tables, plus the `activity` log.
#[derive(Debug, Clone)]
pub struct StatsRepository {
    db: Database,
}

impl StatsRepository {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn totals(&self) -> Result<DashboardTotals, DashboardError> {
        let mut response = self
            .db
            .query(TOTALS)
            .await
            .context("Counting catalog")?
            .check()
            .map_err(surrealdb::Error::from)?;

        let mut counts = [0u64; 10];
        for (idx, slot) in counts.iter_mut().enumerate() {
            let rows = response.take::<Vec<CountRow>>(idx).context("Decoding catalog counts")?;
            *slot = rows.first().map_or(0, |row| row.total.unsigned_abs());
        }
        let [vehicles, available, sold, reserved, featured, brands, media, inquiries, views, favorites] = counts;

        Ok(DashboardTotals {
            vehicles,
            available,
            sold,
            reserved,
            featured,
            brands,
            media,
            inquiries,
            views,
            favorites,
        })
    }

    /// Vehicles per condition, in `New`, `Used`, `Certified` order, zeros included.
    pub async fn conditions(&self) -> Result<Vec<ConditionStat>, DashboardError> {
        let rows = self
            .db
            .query("SELECT condition, count() AS total FROM vehicle GROUP BY condition")
            .await
            .context("Counting vehicles per condition")?
            .take::<Vec<ConditionRow>>(0)
            .context("Decoding condition counts")?;

        let mut stats: Vec<ConditionStat> = ["New", "Used", "Certified"]
            .iter()
            .map(|condition| ConditionStat { condition: (*condition).to_owned(), count: 0 })
            .collect();
        for row in rows {
            let count = row.total.unsigned_abs();
            match stats.iter_mut().find(|s| s.condition == row.condition) {
                Some(known) => known.count = count,
                None => stats.push(ConditionStat { condition: row.condition, count }),
            }
        }

        Ok(stats)
    }

    /// Vehicles per brand, largest first. Spellings that differ only in case count as
    /// one brand, shown under the spelling most vehicles use.
    pub async fn brands(&self) -> Result<Vec<BrandStat>, DashboardError> {
        let rows = self
            .db
            .query("SELECT brand_lower, brand, count() AS total FROM vehicle GROUP BY brand_lower, brand")
            .await
            .context("Counting vehicles per brand")?
            .take::<Vec<BrandRow>>(0)
            .context("Decoding brand counts")?;

        let mut grouped: FxHashMap<String, (u64, String, u64)> = FxHashMap::default();
        for row in rows {
            let count = row.total.unsigned_abs();
            let entry = grouped.entry(row.brand_lower).or_insert((0, String::new(), 0));
            entry.0 += count;
            if count > entry.2 || (count == entry.2 && row.brand < entry.1) {
                entry.1 = row.brand;
                entry.2 = count;
            }
        }

        let mut stats: Vec<BrandStat> =
            grouped.into_values().map(|(count, brand, _)| BrandStat { brand, count }).collect();
        stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.brand.cmp(&b.brand)));

        Ok(stats)
    }

    /// Most viewed vehicles, favorites breaking ties.
    pub async fn popular(&self, limit: u64) -> Result<Vec<PopularVehicle>, DashboardError> {
        let rows = self
            .db
            .query(format!(
                "SELECT key, title, slug, views, favorites FROM vehicle
                ORDER BY views DESC, favorites DESC LIMIT {limit}"
            ))
            .await
            .context("Loading popular vehicles")?
            .take::<Vec<PopularRow>>(0)
            .context("Decoding popular vehicles")?;

        Ok(rows
            .into_iter()
            .map(|row| PopularVehicle {
                id: row.key,
                title: row.title,
                slug: row.slug,
                views: row.views.unsigned_abs(),
                favorites: row.favorites.unsigned_abs(),
            })
            .collect())
    }

    /// The last `months` calendar months up to `now`, oldest first, empty months included.
    pub async fn monthly(&self, months: u32, now: DateTime<Utc>) -> Result<Vec<MonthlyStat>, DashboardError> {
        let current = NaiveDate::from_ymd_opt(now.year(), now.month(), 1).unwrap_or_default();
        let starts: Vec<NaiveDate> = (0..months.max(1))
            .rev()
            .filter_map(|back| current.checked_sub_months(Months::new(back)))
            .collect();
        let since = starts.first().copied().unwrap_or(current).and_time(chrono::NaiveTime::MIN).and_utc();

        let rows = self
            .db
            .query("SELECT created_at, views, favorites FROM vehicle WHERE created_at >= $since")
            .bind(("since", since.timestamp_millis()))
            .await
            .context("Loading monthly engagement")?
            .take::<Vec<EngagementRow>>(0)
            .context("Decoding monthly engagement")?;

        let mut stats: Vec<MonthlyStat> = starts
            .iter()
            .map(|start| MonthlyStat {
                month: start.format("%Y-%m").to_string(),
                vehicles: 0,
                views: 0,
                favorites: 0,
            })
            .collect();
        for row in rows {
            let Some(created) = DateTime::from_timestamp_millis(row.created_at) else {
                continue;
            };
            let month = created.format("%Y-%m").to_string();
            if let Some(stat) = stats.iter_mut().find(|s| s.month == month) {
                stat.vehicles += 1;
                stat.views += row.views.unsigned_abs();
                stat.favorites += row.favorites.unsigned_abs();
            }
        }

        Ok(stats)
    }

    pub async fn count(&self, table: &'static str, condition: Option<&'static str>) -> Result<u64, DashboardError> {
        let condition = condition.map(|c| format!(" WHERE {c}")).unwrap_or_default();
        let rows = self
            .db
            .query(format!("SELECT count() AS total FROM {table}{condition} GROUP ALL"))
            .await
            .context(format!("Counting {table}"))?
            .take::<Vec<CountRow>>(0)
            .context(format!("Decoding {table} count"))?;

        Ok(rows.first().map_or(0, |row| row.total.unsigned_abs()))
    }

    /// Newest first.
    pub async fn recent_activity(&self, limit: u64) -> Result<Vec<Activity>, DashboardError> {
        let records = self
            .db
            .query(format!("SELECT * OMIT id FROM activity ORDER BY timestamp DESC LIMIT {limit}"))
            .await
            .context("Loading recent activity")?
            .take::<Vec<ActivityRecord>>(0)
            .context("Decoding activity")?;

        Ok(records.into_iter().map(Activity::from).collect())
    }

    pub async fn record(&self, event: &CatalogEvent) -> Result<(), DashboardError> {
        let record = ActivityRecord {
            key: safe_nanoid!(),
            kind: event.kind.to_string(),
            description: event.description.clone(),
            subject_id: event.subject_id.clone(),
            timestamp: Utc::now().timestamp_millis(),
        };

        self.db
            .query("CREATE activity CONTENT $record RETURN NONE")
            .bind(("record", record))
            .await
            .context("Recording activity")?
            .check()
            .map_err(surrealdb::Error::from)?;

        Ok(())
    }

    /// Deletes all but the newest `keep` activity entries. Returns how many went.
    #[instrument(skip(self), err)]
    pub async fn prune_activity(&self, keep: u64) -> Result<usize, DashboardError> {
        let stale = self
            .db
            .query(format!(
                "SELECT key, timestamp FROM activity ORDER BY timestamp DESC LIMIT {PRUNE_BATCH} START {keep}"
            ))
            .await
            .context("Finding stale activity")?
            .take::<Vec<StaleRow>>(0)
            .context("Decoding stale activity")?;
        let Some(newest) = stale.first().map(|row| row.timestamp) else {
            return Ok(0);
        };

        let pruned = stale.len();
        let keys: Vec<String> = stale.into_iter().map(|row| row.key).collect();
        self.db
            .query("DELETE activity WHERE key INSIDE $keys")
            .bind(("keys", keys))
            .await
            .context("Pruning activity")?
            .check()
            .map_err(surrealdb::Error::from)?;
        debug!(pruned, keep, newest, "Activity log pruned");

        Ok(pruned)
    }
}
