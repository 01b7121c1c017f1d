use crate::Media;
use crate::error::MediaError;
use crate::model::{
    DESCRIPTION_MAX, IncomingFile, MediaChanges, MediaFile, MediaKind, TAG_MAX, TEXT_MAX, UploadMeta, split_tags,
};
use autoani_domain::constants::DEFAULT_MEDIA_FOLDER;
use autoani_domain::events::ActivityKind;
use autoani_kernel::safe_nanoid;
use autoani_kernel::validation::Validator;
use autoani_storage::{Folder, StorageError};
use chrono::Utc;
use tracing::{info, instrument, warn};

const EXTENSION_MAX: usize = 10;

impl Media {
    /// Stores every file of one upload request under the same folder and metadata.
    ///
    /// All files are checked before the first one is written.
    ///
    /// # Errors
    /// [`MediaError::Rejected`] for a missing file or a disallowed type,
    /// [`MediaError::TooLarge`] above the configured limit and
    /// [`MediaError::Validation`] for oversized metadata.
    #[instrument(skip_all, fields(files = files.len()), err)]
    pub async fn upload(&self, files: Vec<IncomingFile>, meta: UploadMeta) -> Result<Vec<MediaFile>, MediaError> {
        if files.is_empty() {
            return Err(MediaError::rejected("No files uploaded"));
        }
        for file in &files {
            self.check(file)?;
        }

        let mut v = Validator::new();
        let alt = v.optional("alt", "Alt text", meta.alt.as_deref(), TEXT_MAX);
        let title = v.optional("title", "Title", meta.title.as_deref(), TEXT_MAX);
        let description = v.optional("description", "Description", meta.description.as_deref(), DESCRIPTION_MAX);
        let tags = v.list("tags", "Tag", &split_tags(meta.tags.as_deref().unwrap_or_default()), TAG_MAX);
        v.finish()?;

        let folder_name = meta.folder.as_deref().map(str::trim).filter(|f| !f.is_empty()).unwrap_or(DEFAULT_MEDIA_FOLDER);
        let folder = self.storage.folder(folder_name)?;
        folder.ensure().await?;

        let mut stored = Vec::with_capacity(files.len());
        for file in files {
            let id = safe_nanoid!();
            let filename = format!("{id}.{}", extension(&file.original_name, &file.mimetype));
            folder.write(&filename, &file.bytes).await?;

            let now = Utc::now();
            let record = MediaFile {
                url: self.url(folder.name(), &filename),
                id,
                filename,
                kind: MediaKind::from_mimetype(&file.mimetype),
                size: file.bytes.len() as u64,
                original_name: file.original_name,
                mimetype: file.mimetype,
                thumbnail_url: None,
                alt: alt.clone(),
                title: title.clone(),
                description: description.clone(),
                tags: tags.clone(),
                folder: folder.name().to_owned(),
                created_at: now,
                updated_at: now,
            };

            if let Err(err) = self.repo.create(&record).await {
                discard(&folder, &record.filename).await;
                return Err(err);
            }

            info!(media = %record.id, folder = %record.folder, size = record.size, "Media uploaded");
            self.announce(ActivityKind::MediaUploaded, &record, "Media uploaded");
            stored.push(record);
        }

        Ok(stored)
    }

    /// Applies metadata changes. A new folder moves the file on disk and changes its URL.
    #[instrument(skip(self, changes), err)]
    pub async fn update(&self, key: &str, changes: MediaChanges) -> Result<MediaFile, MediaError> {
        let mut file = self.repo.get(key).await?;
        let mut moved = None;

        if let Some(target) = changes.folder {
            let target = self.storage.folder(target.as_str())?;
            if target.name() != file.folder {
                let source = self.storage.folder(file.folder.as_str())?;
                let bytes = source.read(&file.filename).await?;
                target.ensure().await?;
                target.write(&file.filename, &bytes).await?;

                file.url = self.url(target.name(), &file.filename);
                file.folder = target.name().to_owned();
                moved = Some((source, target));
            }
        }
        if let Some(alt) = changes.alt {
            file.alt = alt;
        }
        if let Some(title) = changes.title {
            file.title = title;
        }
        if let Some(description) = changes.description {
            file.description = description;
        }
        if let Some(tags) = changes.tags {
            file.tags = tags;
        }
        file.updated_at = Utc::now();

        if let Err(err) = self.repo.update(&file).await {
            if let Some((_, target)) = &moved {
                discard(target, &file.filename).await;
            }
            return Err(err);
        }

        if let Some((source, _)) = moved {
            discard(&source, &file.filename).await;
        }

        Ok(file)
    }

    /// Removes the record, then the stored file. A file that cannot be removed
    /// afterwards is only logged; no record is left pointing at it.
    #[instrument(skip(self), err)]
    pub async fn remove(&self, key: &str) -> Result<MediaFile, MediaError> {
        let file = self.repo.get(key).await?;
        let folder = self.storage.folder(file.folder.as_str())?;

        self.repo.delete(key).await?;
        match folder.delete(&file.filename).await {
            Ok(()) | Err(StorageError::FileNotFound { .. }) => {},
            Err(err) => warn!(error = %err, media = %file.id, "Stored file outlived its record"),
        }

        info!(media = %file.id, "Media deleted");
        self.announce(ActivityKind::MediaDeleted, &file, "Media deleted");
        Ok(file)
    }

    /// Bytes of a stored upload together with its record.
    ///
    /// # Errors
    /// [`MediaError::NotFound`] unless a record points at `folder/filename`.
    pub async fn open(&self, folder: &str, filename: &str) -> Result<(MediaFile, Vec<u8>), MediaError> {
        let folder = self.storage.folder(folder)?;
        let file = self
            .repo
            .find_by_filename(folder.name(), filename)
            .await?
            .ok_or_else(|| MediaError::NotFound { message: filename.to_owned().into(), context: None })?;
        let bytes = folder.read(&file.filename).await?;

        Ok((file, bytes))
    }

    fn check(&self, file: &IncomingFile) -> Result<(), MediaError> {
        if !self.limits.accepts(&file.mimetype) {
            return Err(MediaError::rejected(format!("File type not allowed: {}", file.mimetype)));
        }
        if file.bytes.len() > self.limits.max_upload_bytes {
            return Err(MediaError::TooLarge {
                message: format!("{} exceeds {} bytes", file.original_name, self.limits.max_upload_bytes).into(),
                context: None,
            });
        }
        Ok(())
    }

    fn url(&self, folder: &str, filename: &str) -> String {
        format!("{}/{folder}/{filename}", self.public_url)
    }
}

async fn discard(folder: &Folder, filename: &str) {
    if let Err(err) = folder.delete(filename).await {
        warn!(error = %err, folder = folder.name(), filename, "Failed to remove stored file");
    }
}

/// Lowercased extension of `original_name`, else the mimetype subtype, else `bin`.
fn extension(original_name: &str, mimetype: &str) -> String {
    let clean = |raw: &str| {
        let ext: String = raw.chars().take_while(char::is_ascii_alphanumeric).collect::<String>().to_ascii_lowercase();
        (!ext.is_empty() && ext.len() <= EXTENSION_MAX && ext.len() == raw.len()).then_some(ext)
    };

    original_name
        .rsplit_once('.')
        .and_then(|(_, ext)| clean(ext))
        .or_else(|| {
            mimetype.split_once('/').and_then(|(_, subtype)| {
                let subtype = subtype.split(['+', ';']).next().unwrap_or_default();
                clean(subtype)
            })
        })
        .unwrap_or_else(|| "bin".to_owned())
}
