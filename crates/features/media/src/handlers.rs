use crate::Media;
use crate::model::{FolderSummary, IncomingFile, MediaFile, MediaListQuery, MediaUpdate, UploadForm, UploadMeta};
use autoani_derive::api_handler;
use autoani_domain::constants::{MEDIA, TAG_MEDIA};
use autoani_kernel::prelude::*;
use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

const DEFAULT_LIMIT: u64 = 24;
const MAX_LIMIT: u64 = 100;
const FALLBACK_MIMETYPE: &str = "application/octet-stream";
const UPLOAD_CACHE: &str = "public, max-age=31536000, immutable";

#[api_handler(
    get,
    path = "/api/media",
    params(MediaListQuery),
    responses(
        (status = OK, description = "Paginated media", body = ApiResponse<Page<MediaFile>>),
        (status = BAD_REQUEST, description = "Invalid filters"),
    ),
    tag = TAG_MEDIA,
)]
pub(crate) async fn list_media(
    State(state): State<ApiState>,
    ApiQuery(query): ApiQuery<MediaListQuery>,
) -> ApiResult<ApiResponse<Page<MediaFile>>> {
    let (page, filter) =
        match (PageRequest::parse(query.page, query.limit, DEFAULT_LIMIT, MAX_LIMIT), query.filter()) {
            (Ok(page), Ok(filter)) => (page, filter),
            (page, filter) => {
                let errors: Vec<FieldError> =
                    page.err().into_iter().chain(filter.err()).flatten().collect();
                return Err(ApiError::from(errors));
            },
        };

    let slice = state.try_get_slice::<Media>()?;
    let (files, total) = slice.repo.list(&filter, page).await?;

    Ok(ApiResponse::ok(Page::new(files, page, total)))
}

#[api_handler(
    post,
    path = "/api/media",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = CREATED, description = "Stored files", body = ApiResponse<Vec<MediaFile>>),
        (status = BAD_REQUEST, description = "Missing file, disallowed type or bad metadata"),
        (status = UNAUTHORIZED, description = "Admin access required"),
        (status = PAYLOAD_TOO_LARGE, description = "File exceeds the upload limit"),
    ),
    tag = TAG_MEDIA,
)]
pub(crate) async fn upload_media(
    _admin: AdminAccess,
    State(state): State<ApiState>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ApiResponse<Vec<MediaFile>>>)> {
    let mut files = Vec::new();
    let mut meta = UploadMeta::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "file" | "files" => {
                let original_name = field.file_name().unwrap_or("upload").to_owned();
                let mimetype = field.content_type().unwrap_or(FALLBACK_MIMETYPE).to_owned();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                files.push(IncomingFile { original_name, mimetype, bytes: bytes.to_vec() });
            },
            "folder" | "tags" | "alt" | "title" | "description" => {
                let value = Some(field.text().await.map_err(multipart_error)?);
                match name.as_str() {
                    "folder" => meta.folder = value,
                    "tags" => meta.tags = value,
                    "alt" => meta.alt = value,
                    "title" => meta.title = value,
                    _ => meta.description = value,
                }
            },
            _ => {},
        }
    }

    let slice = state.try_get_slice::<Media>()?;
    let stored = slice.upload(files, meta).await?;

    Ok(ApiResponse::created(stored))
}

#[api_handler(
    get,
    path = "/api/media/folders",
    responses((status = OK, description = "Folders with file counts", body = ApiResponse<Vec<FolderSummary>>)),
    tag = TAG_MEDIA,
)]
pub(crate) async fn media_folders(State(state): State<ApiState>) -> ApiResult<ApiResponse<Vec<FolderSummary>>> {
    let slice = state.try_get_slice::<Media>()?;

    Ok(ApiResponse::ok(slice.repo.folders().await?))
}

#[api_handler(
    get,
    path = "/api/media/{id}",
    params(("id" = String, Path, description = "Media id")),
    responses(
        (status = OK, body = ApiResponse<MediaFile>),
        (status = NOT_FOUND, description = "Media not found"),
    ),
    tag = TAG_MEDIA,
)]
pub(crate) async fn get_media(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<MediaFile>> {
    let key = ResourceGuard::key(&id, MEDIA)?;
    let slice = state.try_get_slice::<Media>()?;

    Ok(ApiResponse::ok(slice.repo.get(&key).await?))
}

#[api_handler(
    patch,
    path = "/api/media/{id}",
    params(("id" = String, Path, description = "Media id")),
    request_body = MediaUpdate,
    responses(
        (status = OK, body = ApiResponse<MediaFile>),
        (status = BAD_REQUEST, description = "Invalid metadata or folder"),
        (status = NOT_FOUND, description = "Media not found"),
    ),
    tag = TAG_MEDIA,
)]
pub(crate) async fn update_media(
    _admin: AdminAccess,
    State(state): State<ApiState>,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<MediaUpdate>,
) -> ApiResult<ApiResponse<MediaFile>> {
    let key = ResourceGuard::key(&id, MEDIA)?;
    let changes = update.validate()?;
    let slice = state.try_get_slice::<Media>()?;

    Ok(ApiResponse::ok(slice.update(&key, changes).await?))
}

#[api_handler(
    delete,
    path = "/api/media/{id}",
    params(("id" = String, Path, description = "Media id")),
    responses(
        (status = OK, description = "Media deleted"),
        (status = NOT_FOUND, description = "Media not found"),
    ),
    tag = TAG_MEDIA,
)]
pub(crate) async fn delete_media(
    _admin: AdminAccess,
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<()>> {
    let key = ResourceGuard::key(&id, MEDIA)?;
    let slice = state.try_get_slice::<Media>()?;
    slice.remove(&key).await?;

    Ok(ApiResponse::message("Media deleted successfully"))
}

#[api_handler(
    get,
    path = "/uploads/{folder}/{filename}",
    params(
        ("folder" = String, Path, description = "Upload folder"),
        ("filename" = String, Path, description = "Stored file name"),
    ),
    responses(
        (status = OK, description = "File contents with the recorded mimetype"),
        (status = NOT_FOUND, description = "Media not found"),
    ),
    tag = TAG_MEDIA,
)]
pub(crate) async fn serve_upload(
    State(state): State<ApiState>,
    Path((folder, filename)): Path<(String, String)>,
) -> ApiResult<Response> {
    let slice = state.try_get_slice::<Media>()?;
    let (file, bytes) = slice.open(&folder, &filename).await?;

    Ok(([(header::CONTENT_TYPE, file.mimetype), (header::CACHE_CONTROL, UPLOAD_CACHE.to_owned())], bytes)
        .into_response())
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::PayloadTooLarge { message: err.body_text().into(), context: None };
    }
    ApiError::bad_request(format!("Invalid upload: {}", err.body_text()))
}
