use autoani_derive::api_model;
use autoani_kernel::validation::{FieldError, Validator};
use chrono::{DateTime, Utc};
use strum::VariantNames;
use strum_macros::{AsRefStr, Display, EnumString, VariantNames};
use utoipa::IntoParams;

pub const NAME_MAX: usize = 100;
pub const PHONE_MAX: usize = 30;
pub const SUBJECT_MAX: usize = 200;
pub const MESSAGE_MAX: usize = 5000;
pub const VEHICLE_ID_MAX: usize = 64;

#[api_model(rename_all = "kebab-case")]
#[derive(Clone, Copy, PartialEq, Eq, Default, Display, EnumString, AsRefStr, VariantNames)]
#[strum(serialize_all = "kebab-case")]
pub enum InquiryType {
    #[default]
    General,
    Vehicle,
    Financing,
    TradeIn,
}

#[api_model(rename_all = "lowercase")]
#[derive(Clone, Copy, PartialEq, Eq, Default, Display, EnumString, AsRefStr, VariantNames)]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Sq,
}

/// A stored contact form submission.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct Inquiry {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<String>,
    pub inquiry_type: InquiryType,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/contact`.
#[api_model]
#[derive(Clone, Default)]
#[serde(default)]
pub struct ContactPayload {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub vehicle_id: Option<String>,
    /// `general` (default), `vehicle`, `financing` or `trade-in`.
    pub inquiry_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InquiryDraft {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub vehicle_id: Option<String>,
    pub inquiry_type: InquiryType,
}

impl ContactPayload {
    /// # Errors
    /// Every offending field, at once.
    pub fn validate(self) -> Result<InquiryDraft, Vec<FieldError>> {
        let mut v = Validator::new();

        let draft = InquiryDraft {
            name: v.required("name", "Name", &self.name, NAME_MAX),
            email: v.email("email", &self.email),
            phone: v.optional("phone", "Phone", self.phone.as_deref(), PHONE_MAX),
            subject: v.required("subject", "Subject", &self.subject, SUBJECT_MAX),
            message: v.required("message", "Message", &self.message, MESSAGE_MAX),
            vehicle_id: v.optional("vehicleId", "Vehicle id", self.vehicle_id.as_deref(), VEHICLE_ID_MAX),
            inquiry_type: choice(&mut v, "inquiryType", "Inquiry type", self.inquiry_type.as_deref()),
        };

        v.finish().map(|()| draft)
    }
}

/// Body of `POST /api/contact/newsletter`.
#[api_model]
#[derive(Clone, Default)]
#[serde(default)]
pub struct NewsletterPayload {
    pub email: String,
    /// `en` (default) or `sq`.
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub email: String,
    pub language: Language,
}

impl NewsletterPayload {
    /// # Errors
    /// Invalid email or unknown language.
    pub fn validate(self) -> Result<Subscription, Vec<FieldError>> {
        let mut v = Validator::new();
        let subscription = Subscription {
            email: v.email("email", &self.email),
            language: choice(&mut v, "language", "Language", self.language.as_deref()),
        };

        v.finish().map(|()| subscription)
    }
}

fn choice<E>(v: &mut Validator, field: &str, label: &str, value: Option<&str>) -> E
where
    E: VariantNames + std::str::FromStr + Default,
{
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|raw| v.choice(field, label, raw, E::VARIANTS))
        .unwrap_or_default()
}

#[api_model(deny_unknown_fields = false)]
#[derive(Default, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(default)]
pub struct InquiryListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
