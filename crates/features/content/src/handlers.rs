use crate::Content;
use crate::i18n::{LanguageInfo, Translations};
use crate::seo::{SeoMeta, SeoPage};
use autoani_derive::api_handler;
use autoani_domain::constants::TAG_CONTENT;
use autoani_kernel::prelude::*;
use axum::extract::{Path, State};

#[api_handler(
    get,
    path = "/api/seo/{page}",
    params(("page" = String, Path, description = "home, vehicles, about, services or contact")),
    responses((status = OK, description = "Page metadata; unknown pages get the home page's", body = ApiResponse<SeoMeta>)),
    tag = TAG_CONTENT,
)]
pub(crate) async fn seo_meta(Path(page): Path<String>) -> ApiResponse<SeoMeta> {
    ApiResponse::ok(SeoPage::resolve(&page).meta())
}

#[api_handler(
    get,
    path = "/api/i18n",
    responses((status = OK, description = "Supported languages", body = ApiResponse<Vec<LanguageInfo>>)),
    tag = TAG_CONTENT,
)]
pub(crate) async fn list_languages(State(state): State<ApiState>) -> ApiResult<ApiResponse<Vec<LanguageInfo>>> {
    let slice = state.try_get_slice::<Content>()?;

    Ok(ApiResponse::ok(slice.catalog.languages()))
}

#[api_handler(
    get,
    path = "/api/i18n/{lang}",
    params(("lang" = String, Path, description = "en or sq")),
    responses(
        (status = OK, body = ApiResponse<Translations>),
        (status = NOT_FOUND, description = "Language not supported"),
    ),
    tag = TAG_CONTENT,
)]
pub(crate) async fn translations(
    State(state): State<ApiState>,
    Path(lang): Path<String>,
) -> ApiResult<ApiResponse<Translations>> {
    let slice = state.try_get_slice::<Content>()?;

    Ok(ApiResponse::ok(slice.catalog.translations(&lang)?))
}
