use autoani_derive::{api_model, autoani_error};
use std::borrow::Cow;

#[test]
fn error_macro_compiles() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/error_pass.rs");
}

#[autoani_error]
pub enum SampleError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[api_model]
pub struct SamplePayload {
    pub display_name: String,
    pub vehicle_count: u32,
}

#[api_model(deny_unknown_fields = false)]
pub struct LenientPayload {
    pub display_name: String,
}

#[api_model]
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum SampleStatus {
    Available,
    #[serde(rename = "Coming Soon")]
    ComingSoon,
}

#[test]
fn context_is_attached_to_source_errors() {
    let res: Result<(), std::io::Error> = Err(std::io::Error::other("disk"));
    let err = SampleErrorExt::context(res, "reading upload").unwrap_err();
    assert_eq!(err.to_string(), "IO error (reading upload): disk");
}

#[test]
fn internal_accepts_plain_strings() {
    let err: SampleError = "boom".into();
    assert_eq!(err.to_string(), "Internal error: boom");

    let err = Err::<(), _>(SampleError::from(String::from("later")))
        .context("seeding")
        .unwrap_err();
    assert_eq!(err.to_string(), "Internal error (seeding): later");
}

#[test]
fn api_model_uses_camel_case_and_rejects_unknown_fields() {
    let json = serde_json::json!({ "displayName": "Audi", "vehicleCount": 3 });
    let payload: SamplePayload = serde_json::from_value(json).unwrap();
    assert_eq!(payload.display_name, "Audi");
    assert_eq!(payload.vehicle_count, 3);

    let json = serde_json::json!({ "displayName": "Audi", "vehicleCount": 3, "extra": true });
    assert!(serde_json::from_value::<SamplePayload>(json).is_err());
}

#[test]
fn api_model_can_allow_unknown_fields() {
    let json = serde_json::json!({ "displayName": "BMW", "extra": true });
    let payload: LenientPayload = serde_json::from_value(json).unwrap();
    assert_eq!(payload.display_name, "BMW");
}

#[test]
fn api_model_keeps_enum_variant_names() {
    let status: SampleStatus = serde_json::from_str("\"Coming Soon\"").unwrap();
    assert_eq!(status, SampleStatus::ComingSoon);
    assert_eq!(serde_json::to_string(&SampleStatus::Available).unwrap(), "\"Available\"");
}
