//! Sample brands for demo deployments.

use crate::error::BrandError;
use crate::model::BrandDraft;
use crate::repository::BrandRepository;
use tracing::info;

const SAMPLES: [(&str, &str, &str); 3] = [
    (
        "Mercedes-Benz",
        "https://logos-world.net/wp-content/uploads/2020/05/Mercedes-Benz-Logo.png",
        "Luxury German automotive manufacturer known for innovation and quality",
    ),
    (
        "BMW",
        "https://logos-world.net/wp-content/uploads/2020/03/BMW-Logo.png",
        "Premium German luxury vehicles with ultimate driving pleasure",
    ),
    (
        "Audi",
        "https://logos-world.net/wp-content/uploads/2021/03/Audi-Logo.png",
        "German luxury automobile manufacturer with Vorsprung durch Technik",
    ),
];

#[must_use]
pub fn drafts() -> Vec<BrandDraft> {
    SAMPLES
        .iter()
        .map(|(name, logo, description)| BrandDraft {
            name: (*name).to_owned(),
            logo: (*logo).to_owned(),
            description: (*description).to_owned(),
            featured: true,
        })
        .collect()
}

/// Inserts the sample brands when none exist. Returns how many were added.
///
/// # Errors
/// Propagates repository failures.
pub async fn seed(repo: &BrandRepository) -> Result<usize, BrandError> {
    if repo.count().await? > 0 {
        return Ok(0);
    }

    let drafts = drafts();
    let added = drafts.len();
    for draft in drafts {
        repo.create(draft).await?;
    }

    info!(added, "Seeded demo brands");
    Ok(added)
}
