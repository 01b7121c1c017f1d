use crate::Brands;
use crate::model::{Brand, BrandPayload};
use autoani_derive::api_handler;
use autoani_domain::constants::{BRAND, TAG_BRANDS};
use autoani_domain::events::ActivityKind;
use autoani_kernel::prelude::*;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

#[api_handler(
    get,
    path = "/api/brands",
    responses((status = OK, description = "All brands by name", body = ApiResponse<Vec<Brand>>)),
    tag = TAG_BRANDS,
)]
pub(crate) async fn list_brands(State(state): State<ApiState>) -> ApiResult<ApiResponse<Vec<Brand>>> {
    let slice = state.try_get_slice::<Brands>()?;
    Ok(ApiResponse::ok(slice.repo.list(false).await?))
}

#[api_handler(
    get,
    path = "/api/brands/featured",
    responses((status = OK, description = "Featured brands", body = ApiResponse<Vec<Brand>>)),
    tag = TAG_BRANDS,
)]
pub(crate) async fn featured_brands(State(state): State<ApiState>) -> ApiResult<ApiResponse<Vec<Brand>>> {
    let slice = state.try_get_slice::<Brands>()?;
    Ok(ApiResponse::ok(slice.repo.list(true).await?))
}

#[api_handler(
    get,
    path = "/api/brands/{id}",
    params(("id" = String, Path, description = "Brand id")),
    responses(
        (status = OK, body = ApiResponse<Brand>),
        (status = NOT_FOUND, description = "Brand not found"),
    ),
    tag = TAG_BRANDS,
)]
pub(crate) async fn get_brand(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<Brand>> {
    let key = ResourceGuard::key(&id, BRAND)?;
    let slice = state.try_get_slice::<Brands>()?;

    Ok(ApiResponse::ok(slice.repo.get(&key).await?))
}

#[api_handler(
    get,
    path = "/api/brands/slug/{slug}",
    params(("slug" = String, Path, description = "Brand slug")),
    responses(
        (status = OK, body = ApiResponse<Brand>),
        (status = NOT_FOUND, description = "Brand not found"),
    ),
    tag = TAG_BRANDS,
)]
pub(crate) async fn brand_by_slug(
    State(state): State<ApiState>,
    Path(slug): Path<String>,
) -> ApiResult<ApiResponse<Brand>> {
    let slice = state.try_get_slice::<Brands>()?;
    let brand = slice
        .repo
        .find_by_slug(slug.trim())
        .await?
        .ok_or_else(|| ApiError::not_found("Brand not found"))?;

    Ok(ApiResponse::ok(brand))
}

#[api_handler(
    post,
    path = "/api/brands",
    request_body = BrandPayload,
    responses(
        (status = CREATED, body = ApiResponse<Brand>),
        (status = BAD_REQUEST, description = "Validation failed"),
        (status = CONFLICT, description = "Brand already exists"),
    ),
    tag = TAG_BRANDS,
)]
pub(crate) async fn create_brand(
    _admin: AdminAccess,
    State(state): State<ApiState>,
    ApiJson(payload): ApiJson<BrandPayload>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Brand>>)> {
    let draft = payload.validate()?;
    let slice = state.try_get_slice::<Brands>()?;

    let brand = slice.repo.create(draft).await?;
    slice.announce(ActivityKind::BrandAdded, &brand, "New brand added");

    Ok(ApiResponse::created(brand))
}

#[api_handler(
    put,
    path = "/api/brands/{id}",
    params(("id" = String, Path, description = "Brand id")),
    request_body = BrandPayload,
    responses(
        (status = OK, body = ApiResponse<Brand>),
        (status = NOT_FOUND, description = "Brand not found"),
        (status = CONFLICT, description = "Brand already exists"),
    ),
    tag = TAG_BRANDS,
)]
pub(crate) async fn update_brand(
    _admin: AdminAccess,
    State(state): State<ApiState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<BrandPayload>,
) -> ApiResult<ApiResponse<Brand>> {
    let key = ResourceGuard::key(&id, BRAND)?;
    let draft = payload.validate()?;
    let slice = state.try_get_slice::<Brands>()?;

    let brand = slice.repo.update(&key, draft).await?;
    slice.announce(ActivityKind::BrandUpdated, &brand, "Brand updated");

    Ok(ApiResponse::ok(brand))
}

#[api_handler(
    delete,
    path = "/api/brands/{id}",
    params(("id" = String, Path, description = "Brand id")),
    responses(
        (status = OK, description = "Brand deleted"),
        (status = NOT_FOUND, description = "Brand not found"),
    ),
    tag = TAG_BRANDS,
)]
pub(crate) async fn delete_brand(
    _admin: AdminAccess,
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<()>> {
    let key = ResourceGuard::key(&id, BRAND)?;
    let slice = state.try_get_slice::<Brands>()?;

    let brand = slice.repo.delete(&key).await?;
    slice.announce(ActivityKind::BrandDeleted, &brand, "Brand deleted");

    Ok(ApiResponse::message("Brand deleted successfully"))
}
