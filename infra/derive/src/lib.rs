#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Attribute macros that keep the AutoAni crates uniform: error enums, API data
//! models, documented handlers and feature slice handles.
//!
//! The examples below are `ignore`d because a proc-macro crate cannot use its own
//! macros in doctests; the `tests/` directory exercises them from the outside.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, Item, ItemFn, ItemStruct, parse_macro_input};

/// Defines a request/response model for the REST API.
///
/// # Injected Behaviors
///
/// * **Derives**: `Debug`, `Serialize`, `Deserialize` and `utoipa::ToSchema` when missing.
/// * **Serde Policy** for structs:
///     * `rename_all = "camelCase"` by default (can be overridden).
///     * `deny_unknown_fields` by default (can be disabled).
/// * Enums only receive `rename_all` when it is passed explicitly, since their wire
///   names are usually spelled out per variant.
///
/// # Example
///
/// ```rust,ignore
/// use autoani_derive::api_model;
///
/// #[api_model(deny_unknown_fields = false)]
/// pub struct BrandPayload {
///     pub name: Option<String>,
///     pub logo: Option<String>,
/// }
///
/// #[api_model(rename_all = "lowercase")]
/// #[derive(Clone, Copy)]
/// pub enum MediaKind { Image, Video, Document }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as Item);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Bridges an Axum handler with its `OpenAPI` description.
///
/// Accepts the regular `utoipa::path` arguments (`get`, `post`, `path = "..."`,
/// `params(...)`, `responses(...)`, `tag = "..."`) and allows `clippy::unused_async`
/// on the handler.
///
/// ```rust,ignore
/// #[api_handler(
///     get,
///     path = "/health",
///     responses((status = OK, body = HealthResponse)),
///     tag = "System"
/// )]
/// pub async fn health_handler() -> impl IntoResponse { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Turns an enum into a crate error type.
///
/// * Injects `#[derive(Debug, thiserror::Error)]`.
/// * Generates a `<ErrorName>Ext` trait adding `.context(...)` to `Result<T, ErrorName>`
///   and to `Result<T, SourceError>` for every variant carrying a `source` field.
/// * Implements `From<SourceError>` for those variants so `?` works on upstream errors.
/// * Implements `From<&'static str>` and `From<String>` when an `Internal` variant exists.
/// * Emits a module-level `format_context` helper for the `#[error(...)]` strings, so use
///   at most one such enum per module.
///
/// Variants must have named fields; variants with a source must also carry
/// `context: Option<Cow<'static, str>>`.
///
/// ```rust,ignore
/// use autoani_derive::autoani_error;
/// use std::borrow::Cow;
///
/// #[autoani_error]
/// pub enum StorageError {
///     #[error("IO error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn autoani_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Defines the shared handle of a feature slice.
///
/// The annotated struct becomes `<Name>Inner`; `<Name>` wraps it in an `Arc`,
/// derefs to it and implements `FeatureSlice` so the kernel state can hold it.
///
/// ```rust,ignore
/// #[autoani_derive::autoani_slice]
/// pub struct Vehicles {
///     pub repo: VehicleRepository,
/// }
///
/// let slice = Vehicles::new(VehiclesInner { repo });
/// ```
#[proc_macro_attribute]
pub fn autoani_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
