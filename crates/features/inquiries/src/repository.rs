use crate::error::{InquiryError, InquiryErrorExt};
use crate::model::{Inquiry, InquiryDraft, Subscription};
use autoani_database::{Database, is_unique_violation};
use autoani_kernel::pagination::PageRequest;
use autoani_kernel::safe_nanoid;
use chrono::{DateTime, Utc};
use surrealdb::types::SurrealValue;
use tracing::{debug, instrument};

#[derive(Debug, Clone, SurrealValue)]
struct InquiryRecord {
    key: String,
    name: String,
    email: String,
    phone: Option<String>,
    subject: String,
    message: String,
    vehicle_id: Option<String>,
    inquiry_type: String,
    created_at: i64,
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: i64,
}

impl TryFrom<InquiryRecord> for Inquiry {
    type Error = InquiryError;

    fn try_from(r: InquiryRecord) -> Result<Self, Self::Error> {
        let inquiry_type = r.inquiry_type.parse().map_err(|_| InquiryError::Internal {
            message: format!("Unexpected inquiry type '{}'", r.inquiry_type).into(),
            context: Some(format!("Decoding inquiry {}", r.key).into()),
        })?;

        Ok(Self {
            id: r.key,
            name: r.name,
            email: r.email,
            phone: r.phone,
            subject: r.subject,
            message: r.message,
            vehicle_id: r.vehicle_id,
            inquiry_type,
            created_at: DateTime::from_timestamp_millis(r.created_at).unwrap_or_default(),
        })
    }
}

const EMAIL_INDEX: &str = "subscriber_email";
const UPSERT_ATTEMPTS: u32 = 2;

/// `SurrealDB` access for the `inquiry` and `subscriber` tables.
#[derive(Debug, Clone)]
pub struct InquiryRepository {
    db: Database,
}

impl InquiryRepository {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    #[instrument(skip(self, draft), fields(kind = %draft.inquiry_type), err)]
    pub async fn create(&self, draft: InquiryDraft) -> Result<Inquiry, InquiryError> {
        let record = InquiryRecord {
            key: safe_nanoid!(),
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            subject: draft.subject,
            message: draft.message,
            vehicle_id: draft.vehicle_id,
            inquiry_type: draft.inquiry_type.to_string(),
            created_at: Utc::now().timestamp_millis(),
        };

        self.db
            .query("CREATE inquiry CONTENT $record RETURN NONE")
            .bind(("record", record.clone()))
            .await
            .context("Storing inquiry")?
            .check()
            .map_err(surrealdb::Error::from)?;

        Inquiry::try_from(record)
    }

    /// Newest first.
    pub async fn list(&self, page: PageRequest) -> Result<(Vec<Inquiry>, u64), InquiryError> {
        let sql = format!(
            "SELECT * OMIT id FROM inquiry ORDER BY created_at DESC LIMIT {limit} START {offset};
            SELECT count() AS total FROM inquiry GROUP ALL;",
            limit = page.limit,
            offset = page.offset(),
        );

        let mut response = self
            .db
            .query(&sql)
            .await
            .context("Listing inquiries")?
            .check()
            .map_err(surrealdb::Error::from)?;

        let records = response.take::<Vec<InquiryRecord>>(0).context("Decoding inquiries")?;
        let total = response.take::<Vec<CountRow>>(1).context("Counting inquiries")?;
        let total = total.first().map_or(0, |row| row.total.unsigned_abs());

        let inquiries = records.into_iter().map(Inquiry::try_from).collect::<Result<_, _>>()?;
        Ok((inquiries, total))
    }

    pub async fn count(&self) -> Result<u64, InquiryError> {
        self.count_table("SELECT count() AS total FROM inquiry GROUP ALL").await
    }

    pub async fn subscriber_count(&self) -> Result<u64, InquiryError> {
        self.count_table("SELECT count() AS total FROM subscriber GROUP ALL").await
    }

    /// Adds the address or refreshes its language. Returns `true` for a new subscriber.
    ///
    /// A single `UPSERT` keyed by email; when a concurrent request inserted the same
    /// address first, the retry finds that row and only refreshes it.
    #[instrument(skip(self, subscription), err)]
    pub async fn subscribe(&self, subscription: Subscription) -> Result<bool, InquiryError> {
        let language = subscription.language.to_string();
        let mut attempt = 1;
        loop {
            let result = self
                .db
                .query(
                    "UPSERT subscriber SET
                        email = $email,
                        language = $language,
                        subscribed_at = subscribed_at ?? $now,
                        updated_at = $now
                    WHERE email = $email RETURN VALUE $before.email",
                )
                .bind(("email", subscription.email.clone()))
                .bind(("language", language.clone()))
                .bind(("now", Utc::now().timestamp_millis()))
                .await
                .and_then(|response| response.check().map_err(surrealdb::Error::from));

            match result {
                Ok(mut response) => {
                    let before = response.take::<Vec<Option<String>>>(0).context("Decoding subscriber")?;
                    return Ok(before.into_iter().flatten().next().is_none());
                },
                Err(err) if attempt < UPSERT_ATTEMPTS && is_unique_violation(&err, EMAIL_INDEX) => {
                    debug!(attempt, "Subscriber inserted concurrently, retrying");
                    attempt += 1;
                },
                Err(err) => {
                    return Err(InquiryError::Database {
                        source: err,
                        context: Some("Upserting subscriber".into()),
                    });
                },
            }
        }
    }

    async fn count_table(&self, sql: &'static str) -> Result<u64, InquiryError> {
        let rows = self
            .db
            .query(sql)
            .await
            .context("Counting rows")?
            .take::<Vec<CountRow>>(0)
            .context("Decoding count")?;

        Ok(rows.first().map_or(0, |row| row.total.unsigned_abs()))
    }
}
