use crate::Dashboard;
use crate::model::{DashboardStats, HomepageStats};
use autoani_derive::api_handler;
use autoani_domain::constants::{BRAND, TAG_STATS, VEHICLE};
use autoani_kernel::prelude::*;
use axum::extract::State;
use chrono::Utc;

const RECENT_ACTIVITY: u64 = 10;
const POPULAR_VEHICLES: u64 = 5;
const MONTHS: u32 = 6;

#[api_handler(
    get,
    path = "/api/stats/homepage",
    responses((status = OK, body = ApiResponse<HomepageStats>)),
    tag = TAG_STATS,
)]
pub(crate) async fn homepage_stats(State(state): State<ApiState>) -> ApiResult<ApiResponse<HomepageStats>> {
    let slice = state.try_get_slice::<Dashboard>()?;

    let stats = HomepageStats {
        total_vehicles: slice.repo.count(VEHICLE, None).await?,
        featured_vehicles: slice.repo.count(VEHICLE, Some("featured = true")).await?,
        brands_count: slice.repo.count(BRAND, None).await?,
        happy_customers: state.config.site.happy_customers,
    };

    Ok(ApiResponse::ok(stats))
}

#[api_handler(
    get,
    path = "/api/stats/dashboard",
    responses(
        (status = OK, body = ApiResponse<DashboardStats>),
        (status = UNAUTHORIZED, description = "Admin access required"),
    ),
    tag = TAG_STATS,
)]
pub(crate) async fn dashboard_stats(
    _admin: AdminAccess,
    State(state): State<ApiState>,
) -> ApiResult<ApiResponse<DashboardStats>> {
    let slice = state.try_get_slice::<Dashboard>()?;

    let stats = DashboardStats {
        totals: slice.repo.totals().await?,
        condition_stats: slice.repo.conditions().await?,
        brand_stats: slice.repo.brands().await?,
        popular_vehicles: slice.repo.popular(POPULAR_VEHICLES).await?,
        monthly: slice.repo.monthly(MONTHS, Utc::now()).await?,
        recent_activity: slice.repo.recent_activity(RECENT_ACTIVITY).await?,
    };

    Ok(ApiResponse::ok(stats))
}
