use autoani_derive::api_model;
use autoani_kernel::validation::{FieldError, Validator};
use chrono::{DateTime, Utc};
use strum::VariantNames;
use strum_macros::{AsRefStr, Display, EnumString, VariantNames};
use utoipa::{IntoParams, ToSchema};

pub const TEXT_MAX: usize = 200;
pub const DESCRIPTION_MAX: usize = 1000;
pub const TAG_MAX: usize = 50;

#[api_model(rename_all = "lowercase")]
#[derive(Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr, VariantNames)]
#[strum(serialize_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Document,
}

impl MediaKind {
    /// `image/*` and `video/*` keep their family; everything else is a document.
    #[must_use]
    pub fn from_mimetype(mimetype: &str) -> Self {
        match mimetype.split_once('/').map(|(family, _)| family.to_ascii_lowercase()) {
            Some(family) if family == "image" => Self::Image,
            Some(family) if family == "video" => Self::Video,
            _ => Self::Document,
        }
    }
}

#[api_model(rename_all = "lowercase")]
#[derive(Clone, Copy, PartialEq, Eq, Default, Display, EnumString, AsRefStr, VariantNames)]
#[strum(serialize_all = "lowercase")]
pub enum MediaSort {
    /// Newest first.
    #[default]
    Date,
    Name,
    /// Largest first.
    Size,
    Type,
}

impl MediaSort {
    #[must_use]
    pub const fn order_by(self) -> &'static str {
        match self {
            Self::Date => "created_at DESC",
            Self::Name => "original_name_lower ASC, created_at DESC",
            Self::Size => "size DESC, created_at DESC",
            Self::Type => "kind ASC, created_at DESC",
        }
    }
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub id: String,
    /// Stored name, `<id>.<ext>`.
    pub filename: String,
    pub original_name: String,
    pub mimetype: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub size: u64,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub folder: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Metadata sent alongside uploaded files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadMeta {
    pub folder: Option<String>,
    /// Comma separated.
    pub tags: Option<String>,
    pub alt: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Documentation shape of the `multipart/form-data` upload body.
#[derive(ToSchema)]
pub struct UploadForm {
    /// Repeat the part to upload several files at once.
    #[schema(value_type = Vec<String>, format = Binary)]
    pub file: Vec<Vec<u8>>,
    pub folder: Option<String>,
    /// Comma separated.
    pub tags: Option<String>,
    pub alt: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// One file part of a multipart upload.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub original_name: String,
    pub mimetype: String,
    pub bytes: Vec<u8>,
}

/// Body of `PATCH /api/media/{id}`; absent fields stay untouched.
#[api_model]
#[derive(Clone, Default)]
#[serde(default)]
pub struct MediaUpdate {
    pub alt: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    /// Moves the file into another folder.
    pub folder: Option<String>,
}

/// Validated form of [`MediaUpdate`]. `Some(None)` clears a text field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaChanges {
    pub alt: Option<Option<String>>,
    pub title: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub folder: Option<String>,
}

impl MediaUpdate {
    /// # Errors
    /// Every offending field, at once.
    pub fn validate(self) -> Result<MediaChanges, Vec<FieldError>> {
        let mut v = Validator::new();

        let changes = MediaChanges {
            alt: self.alt.map(|alt| v.optional("alt", "Alt text", Some(&alt), TEXT_MAX)),
            title: self.title.map(|title| v.optional("title", "Title", Some(&title), TEXT_MAX)),
            description: self
                .description
                .map(|d| v.optional("description", "Description", Some(&d), DESCRIPTION_MAX)),
            tags: self.tags.map(|tags| v.list("tags", "Tag", &tags, TAG_MAX)),
            folder: self.folder.map(|folder| v.required("folder", "Folder", &folder, TAG_MAX).to_lowercase()),
        };

        v.finish().map(|()| changes)
    }
}

#[api_model(deny_unknown_fields = false)]
#[derive(Default, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(default)]
pub struct MediaListQuery {
    /// Case-insensitive match on title, original name or tags.
    pub search: Option<String>,
    /// `all`, `image`, `video` or `document`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub folder: Option<String>,
    /// `date` (default), `name`, `size` or `type`.
    pub sort: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl MediaListQuery {
    /// # Errors
    /// Unknown `type` or `sort` values.
    pub fn filter(&self) -> Result<MediaFilter, Vec<FieldError>> {
        let mut v = Validator::new();

        let kind = match self.kind.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            None | Some("all") => None,
            Some(raw) => v.choice::<MediaKind>("type", "Type", raw, MediaKind::VARIANTS),
        };
        let sort = match self.sort.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => MediaSort::default(),
            Some(raw) => v.choice("sort", "Sort", raw, MediaSort::VARIANTS).unwrap_or_default(),
        };

        let filter = MediaFilter {
            search: lowered(self.search.as_deref()),
            kind,
            folder: lowered(self.folder.as_deref()),
            sort,
        };

        v.finish().map(|()| filter)
    }
}

fn lowered(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|s| !s.is_empty()).map(str::to_lowercase)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaFilter {
    pub search: Option<String>,
    pub kind: Option<MediaKind>,
    pub folder: Option<String>,
    pub sort: MediaSort,
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct FolderSummary {
    pub name: String,
    pub count: u64,
}

/// Splits a comma separated tag list, trimming and dropping blanks and duplicates.
#[must_use]
pub fn split_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            tags.push(tag.to_owned());
        }
    }
    tags
}
