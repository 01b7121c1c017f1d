use crate::Inquiries;
use crate::model::{ContactPayload, Inquiry, InquiryListQuery, NewsletterPayload};
use autoani_derive::api_handler;
use autoani_domain::constants::TAG_CONTACT;
use autoani_kernel::prelude::*;
use axum::extract::State;
use tracing::info;

const DEFAULT_LIMIT: u64 = 20;
const MAX_LIMIT: u64 = 100;

#[api_handler(
    post,
    path = "/api/contact",
    request_body = ContactPayload,
    responses(
        (status = OK, description = "Contact form submitted successfully"),
        (status = BAD_REQUEST, description = "Invalid submission"),
    ),
    tag = TAG_CONTACT,
)]
pub(crate) async fn submit_contact(
    State(state): State<ApiState>,
    ApiJson(payload): ApiJson<ContactPayload>,
) -> ApiResult<ApiResponse<()>> {
    let draft = payload.validate()?;
    let slice = state.try_get_slice::<Inquiries>()?;

    let inquiry = slice.repo.create(draft).await?;
    info!(inquiry = %inquiry.id, kind = %inquiry.inquiry_type, "Contact form received");

    Ok(ApiResponse::message("Contact form submitted successfully"))
}

#[api_handler(
    get,
    path = "/api/contact",
    params(InquiryListQuery),
    responses(
        (status = OK, description = "Inquiries, newest first", body = ApiResponse<Page<Inquiry>>),
        (status = UNAUTHORIZED, description = "Admin access required"),
    ),
    tag = TAG_CONTACT,
)]
pub(crate) async fn list_inquiries(
    _admin: AdminAccess,
    State(state): State<ApiState>,
    ApiQuery(query): ApiQuery<InquiryListQuery>,
) -> ApiResult<ApiResponse<Page<Inquiry>>> {
    let page = PageRequest::parse(query.page, query.limit, DEFAULT_LIMIT, MAX_LIMIT)?;
    let slice = state.try_get_slice::<Inquiries>()?;
    let (inquiries, total) = slice.repo.list(page).await?;

    Ok(ApiResponse::ok(Page::new(inquiries, page, total)))
}

#[api_handler(
    post,
    path = "/api/contact/newsletter",
    request_body = NewsletterPayload,
    responses(
        (status = OK, description = "Subscribed successfully!"),
        (status = BAD_REQUEST, description = "Invalid email or language"),
    ),
    tag = TAG_CONTACT,
)]
pub(crate) async fn subscribe_newsletter(
    State(state): State<ApiState>,
    ApiJson(payload): ApiJson<NewsletterPayload>,
) -> ApiResult<ApiResponse<()>> {
    let subscription = payload.validate()?;
    let slice = state.try_get_slice::<Inquiries>()?;

    if slice.repo.subscribe(subscription).await? {
        info!("Newsletter subscriber added");
    }

    Ok(ApiResponse::message("Subscribed successfully!"))
}
