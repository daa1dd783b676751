use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::info;

use common::types::Message;
use models::Member;
use service::pagination::Page;

use crate::errors::JsonApiError;
use crate::observability::{MEMBERS_ADDED_TOTAL, MEMBERS_REMOVED_TOTAL, MERCHANTS_CREATED_TOTAL, MERCHANTS_DELETED_TOTAL};
use crate::routes::ServerState;

#[derive(Debug, Deserialize)]
pub struct CreateMerchantInput {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub members: Option<Vec<Member>>,
}

#[derive(Debug, Deserialize)]
pub struct AddMemberInput {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct MembersQuery {
    pub page: Option<String>,
}

/// Decode a JSON body regardless of the request's content type.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, JsonApiError> {
    serde_json::from_slice(body).map_err(|e| JsonApiError::bad_request(e.to_string()))
}

#[utoipa::path(
    get, path = "/merchant", tag = "merchant",
    responses(
        (status = 200, description = "Merchant codes", body = [String]),
        (status = 500, description = "Failed to get merchant list")
    )
)]
pub async fn list_merchants(State(state): State<ServerState>) -> Result<Json<Vec<String>>, JsonApiError> {
    let codes = state.merchants.list_codes().await?;
    info!(count = codes.len(), "list merchants");
    Ok(Json(codes))
}

#[utoipa::path(
    post, path = "/merchant", tag = "merchant",
    request_body = crate::openapi::CreateMerchantDoc,
    responses(
        (status = 201, description = "Merchant added", body = crate::openapi::MessageDoc),
        (status = 400, description = "Invalid input format"),
        (status = 409, description = "Merchant with the same code already exists")
    )
)]
pub async fn create_merchant(
    State(state): State<ServerState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Message>), JsonApiError> {
    let input: CreateMerchantInput = parse_body(&body)?;
    let merchant = state
        .merchants
        .create(input.code, input.members.unwrap_or_default())
        .await?;
    MERCHANTS_CREATED_TOTAL.inc();
    Ok((StatusCode::CREATED, Json(Message::with_code("Merchant added.", merchant.code))))
}

#[utoipa::path(
    delete, path = "/merchant/{code}", tag = "merchant",
    params(("code" = String, Path, description = "Merchant code")),
    responses(
        (status = 200, description = "Merchant deleted", body = crate::openapi::MessageDoc),
        (status = 404, description = "Merchant does not exist")
    )
)]
pub async fn delete_merchant(
    State(state): State<ServerState>,
    Path(code): Path<String>,
) -> Result<Json<Message>, JsonApiError> {
    state.merchants.delete(&code).await?;
    MERCHANTS_DELETED_TOTAL.inc();
    Ok(Json(Message::new("Merchant deleted.")))
}

#[utoipa::path(
    post, path = "/merchant/{code}/addmember", tag = "merchant",
    params(("code" = String, Path, description = "Merchant code")),
    request_body = crate::openapi::AddMemberDoc,
    responses(
        (status = 201, description = "Member added", body = crate::openapi::MessageDoc),
        (status = 400, description = "Invalid input format"),
        (status = 404, description = "Merchant does not exist"),
        (status = 409, description = "Member with the same email already exists")
    )
)]
pub async fn add_member(
    State(state): State<ServerState>,
    Path(code): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<Message>), JsonApiError> {
    let input: AddMemberInput = parse_body(&body)?;
    state.merchants.add_member(&code, &input.email).await?;
    MEMBERS_ADDED_TOTAL.inc();
    Ok((StatusCode::CREATED, Json(Message::new("Member added."))))
}

#[utoipa::path(
    delete, path = "/merchant/{code}/{email}", tag = "merchant",
    params(
        ("code" = String, Path, description = "Merchant code"),
        ("email" = String, Path, description = "Member email")
    ),
    responses(
        (status = 200, description = "Member deleted", body = crate::openapi::MessageDoc),
        (status = 404, description = "Merchant or member does not exist")
    )
)]
pub async fn remove_member(
    State(state): State<ServerState>,
    Path((code, email)): Path<(String, String)>,
) -> Result<Json<Message>, JsonApiError> {
    state.merchants.remove_member(&code, &email).await?;
    MEMBERS_REMOVED_TOTAL.inc();
    Ok(Json(Message::new("Member deleted.")))
}

#[utoipa::path(
    get, path = "/merchant/{code}/members", tag = "merchant",
    params(
        ("code" = String, Path, description = "Merchant code"),
        ("page" = Option<String>, Query, description = "1-based page number, defaults to 1")
    ),
    responses(
        (status = 200, description = "One page of members", body = crate::openapi::MemberPageDoc),
        (status = 400, description = "Page is not a number"),
        (status = 404, description = "Merchant does not exist or page out of bounds")
    )
)]
pub async fn list_members(
    State(state): State<ServerState>,
    Path(code): Path<String>,
    Query(q): Query<MembersQuery>,
) -> Result<Json<Page<Member>>, JsonApiError> {
    let page = state
        .merchants
        .members_page(&code, q.page.as_deref(), state.per_page)
        .await?;
    info!(%code, page = page.page, total_pages = page.total_pages, count = page.count, "list members");
    Ok(Json(page))
}
