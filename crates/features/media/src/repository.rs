use crate::error::{MediaError, MediaErrorExt};
use crate::model::{FolderSummary, MediaFile, MediaFilter, MediaKind};
use autoani_database::Database;
use autoani_domain::constants::MEDIA_FOLDERS;
use autoani_kernel::pagination::PageRequest;
use chrono::{DateTime, Utc};
use surrealdb::types::SurrealValue;
use tracing::{debug, instrument};

#[derive(Debug, Clone, SurrealValue)]
struct MediaRecord {
    key: String,
    filename: String,
    original_name: String,
    original_name_lower: String,
    mimetype: String,
    kind: String,
    size: i64,
    url: String,
    thumbnail_url: Option<String>,
    alt: Option<String>,
    title: Option<String>,
    description: Option<String>,
    tags: Vec<String>,
    folder: String,
    search_text: String,
    created_at: i64,
    updated_at: i64,
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: i64,
}

#[derive(Debug, SurrealValue)]
struct FolderRow {
    folder: String,
    total: i64,
}

impl From<&MediaFile> for MediaRecord {
    fn from(file: &MediaFile) -> Self {
        let search_text = [
            file.title.as_deref().unwrap_or_default(),
            &file.original_name,
            &file.tags.join(" "),
        ]
        .join(" ")
        .to_lowercase();

        Self {
            key: file.id.clone(),
            filename: file.filename.clone(),
            original_name: file.original_name.clone(),
            original_name_lower: file.original_name.to_lowercase(),
            mimetype: file.mimetype.clone(),
            kind: file.kind.to_string(),
            size: i64::try_from(file.size).unwrap_or(i64::MAX),
            url: file.url.clone(),
            thumbnail_url: file.thumbnail_url.clone(),
            alt: file.alt.clone(),
            title: file.title.clone(),
            description: file.description.clone(),
            tags: file.tags.clone(),
            folder: file.folder.clone(),
            search_text,
            created_at: file.created_at.timestamp_millis(),
            updated_at: file.updated_at.timestamp_millis(),
        }
    }
}

impl TryFrom<MediaRecord> for MediaFile {
    type Error = MediaError;

    fn try_from(r: MediaRecord) -> Result<Self, Self::Error> {
        let kind: MediaKind = r.kind.parse().map_err(|_| MediaError::Internal {
            message: format!("Unexpected media type '{}'", r.kind).into(),
            context: Some(format!("Decoding media {}", r.key).into()),
        })?;

        Ok(Self {
            id: r.key,
            filename: r.filename,
            original_name: r.original_name,
            mimetype: r.mimetype,
            kind,
            size: r.size.unsigned_abs(),
            url: r.url,
            thumbnail_url: r.thumbnail_url,
            alt: r.alt,
            title: r.title,
            description: r.description,
            tags: r.tags,
            folder: r.folder,
            created_at: timestamp(r.created_at),
            updated_at: timestamp(r.updated_at),
        })
    }
}

fn timestamp(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

const SELECT: &str = "SELECT * OMIT id FROM media";

/// `SurrealDB` access for the `media` table. Files on disk are handled by the slice.
#[derive(Debug, Clone)]
pub struct MediaRepository {
    db: Database,
}

impl MediaRepository {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn list(&self, filter: &MediaFilter, page: PageRequest) -> Result<(Vec<MediaFile>, u64), MediaError> {
        let conditions = where_clause(filter);
        let sql = format!(
            "{SELECT}{conditions} ORDER BY {order} LIMIT {limit} START {offset};
            SELECT count() AS total FROM media{conditions} GROUP ALL;",
            order = filter.sort.order_by(),
            limit = page.limit,
            offset = page.offset(),
        );
        debug!(%sql, "Listing media");

        let mut response = self
            .db
            .query(&sql)
            .bind(("search", filter.search.clone()))
            .bind(("kind", filter.kind.map(|k| k.to_string())))
            .bind(("folder", filter.folder.clone()))
            .await
            .context("Listing media")?
            .check()
            .map_err(surrealdb::Error::from)?;

        let records = response.take::<Vec<MediaRecord>>(0).context("Decoding media")?;
        let total = response.take::<Vec<CountRow>>(1).context("Counting media")?;
        let total = total.first().map_or(0, |row| row.total.unsigned_abs());

        let files = records.into_iter().map(MediaFile::try_from).collect::<Result<_, _>>()?;
        Ok((files, total))
    }

    /// Well-known folders (even when empty) followed by any other folder in use.
    pub async fn folders(&self) -> Result<Vec<FolderSummary>, MediaError> {
        let rows = self
            .db
            .query("SELECT folder, count() AS total FROM media GROUP BY folder")
            .await
            .context("Counting media per folder")?
            .take::<Vec<FolderRow>>(0)
            .context("Decoding folder counts")?;

        let mut folders: Vec<FolderSummary> =
            MEDIA_FOLDERS.iter().map(|name| FolderSummary { name: (*name).to_owned(), count: 0 }).collect();
        for row in rows {
            let count = row.total.unsigned_abs();
            match folders.iter_mut().find(|f| f.name == row.folder) {
                Some(known) => known.count = count,
                None => folders.push(FolderSummary { name: row.folder, count }),
            }
        }

        Ok(folders)
    }

    pub async fn find(&self, key: &str) -> Result<Option<MediaFile>, MediaError> {
        self.find_where("key = $value", key).await
    }

    /// Looks up the record behind a stored file name.
    pub async fn find_by_filename(&self, folder: &str, filename: &str) -> Result<Option<MediaFile>, MediaError> {
        let records = self
            .db
            .query(format!("{SELECT} WHERE folder = $folder AND filename = $filename LIMIT 1"))
            .bind(("folder", folder.to_owned()))
            .bind(("filename", filename.to_owned()))
            .await
            .context("Loading media by file name")?
            .take::<Vec<MediaRecord>>(0)
            .context("Decoding media")?;

        records.into_iter().next().map(MediaFile::try_from).transpose()
    }

    /// # Errors
    /// Returns [`MediaError::NotFound`] when no record has this key.
    pub async fn get(&self, key: &str) -> Result<MediaFile, MediaError> {
        self.find(key).await?.ok_or_else(|| MediaError::NotFound { message: key.to_owned().into(), context: None })
    }

    pub async fn create(&self, file: &MediaFile) -> Result<(), MediaError> {
        self.db
            .query("CREATE media CONTENT $record RETURN NONE")
            .bind(("record", MediaRecord::from(file)))
            .await
            .context("Creating media")?
            .check()
            .map_err(surrealdb::Error::from)?;

        Ok(())
    }

    pub async fn update(&self, file: &MediaFile) -> Result<(), MediaError> {
        self.db
            .query("UPDATE media CONTENT $record WHERE key = $key RETURN NONE")
            .bind(("key", file.id.clone()))
            .bind(("record", MediaRecord::from(file)))
            .await
            .context("Updating media")?
            .check()
            .map_err(surrealdb::Error::from)?;

        Ok(())
    }

    pub async fn delete(&self, key: &str) -> Result<(), MediaError> {
        self.db
            .query("DELETE media WHERE key = $key")
            .bind(("key", key.to_owned()))
            .await
            .context("Deleting media")?
            .check()
            .map_err(surrealdb::Error::from)?;

        Ok(())
    }

    pub async fn count(&self) -> Result<u64, MediaError> {
        let rows = self
            .db
            .query("SELECT count() AS total FROM media GROUP ALL")
            .await
            .context("Counting media")?
            .take::<Vec<CountRow>>(0)
            .context("Decoding media count")?;

        Ok(rows.first().map_or(0, |row| row.total.unsigned_abs()))
    }

    async fn find_where(&self, condition: &str, value: &str) -> Result<Option<MediaFile>, MediaError> {
        let records = self
            .db
            .query(format!("{SELECT} WHERE {condition} LIMIT 1"))
            .bind(("value", value.to_owned()))
            .await
            .context("Loading media")?
            .take::<Vec<MediaRecord>>(0)
            .context("Decoding media")?;

        records.into_iter().next().map(MediaFile::try_from).transpose()
    }
}

fn where_clause(filter: &MediaFilter) -> String {
    let checks = [
        (filter.search.is_some(), "search_text CONTAINS $search"),
        (filter.kind.is_some(), "kind = $kind"),
        (filter.folder.is_some(), "folder = $folder"),
    ];
    let conditions: Vec<&str> = checks.iter().filter(|(on, _)| *on).map(|(_, sql)| *sql).collect();

    if conditions.is_empty() { String::new() } else { format!(" WHERE {}", conditions.join(" AND ")) }
}
