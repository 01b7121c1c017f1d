use crate::{VehicleError, Vehicles};
use crate::model::{LimitQuery, Vehicle, VehicleEngagement, VehicleListQuery, VehiclePayload};
use autoani_derive::api_handler;
use autoani_domain::constants::{TAG_VEHICLES, VEHICLE};
use autoani_domain::events::ActivityKind;
use autoani_kernel::prelude::*;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{Datelike, Utc};

const DEFAULT_LIMIT: u64 = 12;
const MAX_LIMIT: u64 = 50;
const FEATURED_DEFAULT: u64 = 6;
const FEATURED_MAX: u64 = 20;
const RELATED_DEFAULT: u64 = 4;

#[api_handler(
    get,
    path = "/api/vehicles",
    params(VehicleListQuery),
    responses(
        (status = OK, description = "Paginated vehicles", body = ApiResponse<Page<Vehicle>>),
        (status = BAD_REQUEST, description = "Invalid filters"),
    ),
    tag = TAG_VEHICLES,
)]
pub(crate) async fn list_vehicles(
    State(state): State<ApiState>,
    ApiQuery(query): ApiQuery<VehicleListQuery>,
) -> ApiResult<ApiResponse<Page<Vehicle>>> {
    let (page, filter) =
        match (PageRequest::parse(query.page, query.limit, DEFAULT_LIMIT, MAX_LIMIT), query.filter()) {
            (Ok(page), Ok(filter)) => (page, filter),
            (page, filter) => {
                let errors: Vec<FieldError> =
                    page.err().into_iter().chain(filter.err()).flatten().collect();
                return Err(ApiError::from(errors));
            },
        };

    let slice = state.try_get_slice::<Vehicles>()?;
    let (vehicles, total) = slice.repo.list(&filter, page).await?;

    Ok(ApiResponse::ok(Page::new(vehicles, page, total)))
}

#[api_handler(
    get,
    path = "/api/vehicles/featured",
    params(LimitQuery),
    responses((status = OK, description = "Featured available vehicles", body = ApiResponse<Vec<Vehicle>>)),
    tag = TAG_VEHICLES,
)]
pub(crate) async fn featured_vehicles(
    State(state): State<ApiState>,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> ApiResult<ApiResponse<Vec<Vehicle>>> {
    let limit = PageRequest::parse(None, query.limit, FEATURED_DEFAULT, FEATURED_MAX)?.limit;
    let slice = state.try_get_slice::<Vehicles>()?;

    Ok(ApiResponse::ok(slice.repo.featured(limit).await?))
}

#[api_handler(
    get,
    path = "/api/vehicles/{id}",
    params(("id" = String, Path, description = "Vehicle id")),
    responses(
        (status = OK, body = ApiResponse<Vehicle>),
        (status = NOT_FOUND, description = "Vehicle not found"),
    ),
    tag = TAG_VEHICLES,
)]
pub(crate) async fn get_vehicle(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<Vehicle>> {
    let key = ResourceGuard::key(&id, VEHICLE)?;
    let slice = state.try_get_slice::<Vehicles>()?;
    let vehicle = slice.repo.view_by("key", &key).await?.ok_or_else(|| VehicleError::not_found(&key))?;

    Ok(ApiResponse::ok(vehicle))
}

#[api_handler(
    get,
    path = "/api/vehicles/slug/{slug}",
    params(("slug" = String, Path, description = "Vehicle slug")),
    responses(
        (status = OK, body = ApiResponse<Vehicle>),
        (status = NOT_FOUND, description = "Vehicle not found"),
    ),
    tag = TAG_VEHICLES,
)]
pub(crate) async fn vehicle_by_slug(
    State(state): State<ApiState>,
    Path(slug): Path<String>,
) -> ApiResult<ApiResponse<Vehicle>> {
    let slice = state.try_get_slice::<Vehicles>()?;
    let vehicle = slice
        .repo
        .view_by("slug", slug.trim())
        .await?
        .ok_or_else(|| ApiError::not_found("Vehicle not found"))?;

    Ok(ApiResponse::ok(vehicle))
}

#[api_handler(
    get,
    path = "/api/vehicles/{id}/related",
    params(("id" = String, Path, description = "Vehicle id"), LimitQuery),
    responses(
        (status = OK, description = "Vehicles of the same brand or body type", body = ApiResponse<Vec<Vehicle>>),
        (status = NOT_FOUND, description = "Vehicle not found"),
    ),
    tag = TAG_VEHICLES,
)]
pub(crate) async fn related_vehicles(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> ApiResult<ApiResponse<Vec<Vehicle>>> {
    let key = ResourceGuard::key(&id, VEHICLE)?;
    let limit = PageRequest::parse(None, query.limit, RELATED_DEFAULT, FEATURED_MAX)?.limit;
    let slice = state.try_get_slice::<Vehicles>()?;

    Ok(ApiResponse::ok(slice.repo.related(&key, limit).await?))
}

#[api_handler(
    post,
    path = "/api/vehicles/{id}/favorite",
    params(("id" = String, Path, description = "Vehicle id")),
    responses(
        (status = OK, description = "Updated counters", body = ApiResponse<VehicleEngagement>),
        (status = NOT_FOUND, description = "Vehicle not found"),
    ),
    tag = TAG_VEHICLES,
)]
pub(crate) async fn favorite_vehicle(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<VehicleEngagement>> {
    let key = ResourceGuard::key(&id, VEHICLE)?;
    let slice = state.try_get_slice::<Vehicles>()?;

    Ok(ApiResponse::ok(slice.repo.favorite(&key, 1).await?))
}

#[api_handler(
    delete,
    path = "/api/vehicles/{id}/favorite",
    params(("id" = String, Path, description = "Vehicle id")),
    responses(
        (status = OK, description = "Updated counters", body = ApiResponse<VehicleEngagement>),
        (status = NOT_FOUND, description = "Vehicle not found"),
    ),
    tag = TAG_VEHICLES,
)]
pub(crate) async fn unfavorite_vehicle(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<VehicleEngagement>> {
    let key = ResourceGuard::key(&id, VEHICLE)?;
    let slice = state.try_get_slice::<Vehicles>()?;

    Ok(ApiResponse::ok(slice.repo.favorite(&key, -1).await?))
}

#[api_handler(
    post,
    path = "/api/vehicles",
    request_body = VehiclePayload,
    responses(
        (status = CREATED, body = ApiResponse<Vehicle>),
        (status = BAD_REQUEST, description = "Validation failed"),
        (status = UNAUTHORIZED, description = "Admin token required"),
    ),
    tag = TAG_VEHICLES,
)]
pub(crate) async fn create_vehicle(
    _admin: AdminAccess,
    State(state): State<ApiState>,
    ApiJson(payload): ApiJson<VehiclePayload>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Vehicle>>)> {
    let draft = payload.validate(current_year())?;
    let slice = state.try_get_slice::<Vehicles>()?;

    let vehicle = slice.repo.create(draft).await?;
    slice.announce(ActivityKind::VehicleAdded, &vehicle, "New vehicle added");

    Ok(ApiResponse::created(vehicle))
}

#[api_handler(
    put,
    path = "/api/vehicles/{id}",
    params(("id" = String, Path, description = "Vehicle id")),
    request_body = VehiclePayload,
    responses(
        (status = OK, body = ApiResponse<Vehicle>),
        (status = BAD_REQUEST, description = "Validation failed"),
        (status = NOT_FOUND, description = "Vehicle not found"),
    ),
    tag = TAG_VEHICLES,
)]
pub(crate) async fn update_vehicle(
    _admin: AdminAccess,
    State(state): State<ApiState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<VehiclePayload>,
) -> ApiResult<ApiResponse<Vehicle>> {
    let key = ResourceGuard::key(&id, VEHICLE)?;
    let draft = payload.validate(current_year())?;
    let slice = state.try_get_slice::<Vehicles>()?;

    let vehicle = slice.repo.update(&key, draft).await?;
    slice.announce(ActivityKind::VehicleUpdated, &vehicle, "Vehicle updated");

    Ok(ApiResponse::ok(vehicle))
}

#[api_handler(
    delete,
    path = "/api/vehicles/{id}",
    params(("id" = String, Path, description = "Vehicle id")),
    responses(
        (status = OK, description = "Vehicle deleted"),
        (status = NOT_FOUND, description = "Vehicle not found"),
    ),
    tag = TAG_VEHICLES,
)]
pub(crate) async fn delete_vehicle(
    _admin: AdminAccess,
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<()>> {
    let key = ResourceGuard::key(&id, VEHICLE)?;
    let slice = state.try_get_slice::<Vehicles>()?;

    let vehicle = slice.repo.delete(&key).await?;
    slice.announce(ActivityKind::VehicleDeleted, &vehicle, "Vehicle deleted");

    Ok(ApiResponse::message("Vehicle deleted successfully"))
}

fn current_year() -> i64 {
    i64::from(Utc::now().year())
}
