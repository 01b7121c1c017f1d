use autoani_derive::api_model;
use autoani_kernel::validation::{FieldError, Validator};
use chrono::{DateTime, Utc};

pub const NAME_MAX: usize = 50;
pub const DESCRIPTION_MAX: usize = 500;

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct Brand {
    pub id: String,
    pub name: String,
    pub logo: String,
    pub description: String,
    pub featured: bool,
    /// Vehicles whose brand matches this name, counted at read time.
    pub vehicle_count: u64,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[api_model]
#[derive(Clone, Default)]
#[serde(default)]
pub struct BrandPayload {
    pub name: String,
    pub logo: String,
    pub description: Option<String>,
    pub featured: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandDraft {
    pub name: String,
    pub logo: String,
    pub description: String,
    pub featured: bool,
}

impl BrandPayload {
    /// # Errors
    /// Returns every field error found.
    pub fn validate(self) -> Result<BrandDraft, Vec<FieldError>> {
        let mut v = Validator::new();
        let name = v.required("name", "Brand name", &self.name, NAME_MAX);
        let logo = v.required("logo", "Brand logo", &self.logo, usize::MAX);
        let description = v
            .optional("description", "Description", self.description.as_deref(), DESCRIPTION_MAX)
            .unwrap_or_default();
        v.finish()?;

        Ok(BrandDraft { name, logo, description, featured: self.featured })
    }
}
