//! Per-page `<head>` metadata for the storefront.

use autoani_derive::api_model;
use strum_macros::{AsRefStr, Display, EnumString, VariantNames};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, AsRefStr, VariantNames)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SeoPage {
    #[default]
    Home,
    Vehicles,
    About,
    Services,
    Contact,
}

impl SeoPage {
    /// Unknown pages get the home page metadata.
    #[must_use]
    pub fn resolve(raw: &str) -> Self {
        raw.trim().parse().unwrap_or_default()
    }

    #[must_use]
    pub fn meta(self) -> SeoMeta {
        let (title, description, keywords): (&str, &str, &[&str]) = match self {
            Self::Home => (
                "AutoAni - Premium Automotive Dealership",
                "Discover luxury vehicles at AutoAni. Premium cars from top brands with exceptional service.",
                &["AutoAni", "cars", "luxury", "automotive", "Kosovo"],
            ),
            Self::Vehicles => (
                "Vehicles - AutoAni",
                "Browse our extensive collection of premium vehicles.",
                &["vehicles", "cars", "luxury cars", "AutoAni"],
            ),
            Self::About => (
                "About Us - AutoAni",
                "Leading automotive dealership since 1995, trusted across Kosovo.",
                &["about", "dealership", "AutoAni", "Kosovo"],
            ),
            Self::Services => (
                "Services - AutoAni",
                "Financing, trade-in and warranty services for every vehicle we sell.",
                &["financing", "trade-in", "warranty", "AutoAni"],
            ),
            Self::Contact => (
                "Contact - AutoAni",
                "Get in touch with the AutoAni team for test drives and inquiries.",
                &["contact", "test drive", "AutoAni"],
            ),
        };

        SeoMeta {
            title: title.to_owned(),
            description: description.to_owned(),
            keywords: keywords.iter().map(|k| (*k).to_owned()).collect(),
        }
    }
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct SeoMeta {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_pages_fall_back_to_home() {
        assert_eq!(SeoPage::resolve("pricing"), SeoPage::Home);
        assert_eq!(SeoPage::resolve(" Vehicles "), SeoPage::Vehicles);
        assert_eq!(SeoPage::resolve("pricing").meta().title, "AutoAni - Premium Automotive Dealership");
    }

    #[test]
    fn every_page_has_keywords() {
        for page in [SeoPage::Home, SeoPage::Vehicles, SeoPage::About, SeoPage::Services, SeoPage::Contact] {
            let meta = page.meta();
            assert!(meta.title.contains("AutoAni"), "{page}");
            assert!(!meta.keywords.is_empty(), "{page}");
        }
    }
}
