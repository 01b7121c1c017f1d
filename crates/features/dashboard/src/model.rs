use autoani_derive::api_model;
use chrono::{DateTime, Utc};

/// Numbers shown on the storefront landing page.
#[api_model]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct HomepageStats {
    pub total_vehicles: u64,
    pub featured_vehicles: u64,
    pub brands_count: u64,
    /// Configured, not counted.
    pub happy_customers: u64,
}

#[api_model]
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardTotals {
    pub vehicles: u64,
    pub available: u64,
    pub sold: u64,
    pub reserved: u64,
    pub featured: u64,
    pub brands: u64,
    pub media: u64,
    pub inquiries: u64,
    /// Sum of detail page views over every vehicle.
    pub views: u64,
    pub favorites: u64,
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct ConditionStat {
    pub condition: String,
    pub count: u64,
}

/// Vehicles of one brand, matched case-insensitively. `brand` is the most used spelling.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct BrandStat {
    pub brand: String,
    pub count: u64,
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct PopularVehicle {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub views: u64,
    pub favorites: u64,
}

/// Vehicles added in one calendar month (`YYYY-MM`, UTC) and the engagement they gathered.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct MonthlyStat {
    pub month: String,
    pub vehicles: u64,
    pub views: u64,
    pub favorites: u64,
}

/// One entry of the catalog activity log.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct Activity {
    pub id: String,
    /// `vehicle_added`, `brand_deleted`, `media_uploaded`, ...
    pub kind: String,
    pub description: String,
    pub subject_id: String,
    pub timestamp: DateTime<Utc>,
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub totals: DashboardTotals,
    pub condition_stats: Vec<ConditionStat>,
    pub brand_stats: Vec<BrandStat>,
    pub popular_vehicles: Vec<PopularVehicle>,
    pub monthly: Vec<MonthlyStat>,
    pub recent_activity: Vec<Activity>,
}
