use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use service::subscription::{SpendQuery, Subscription, SubscriptionInput};
use tracing::{error, info, warn};
use utoipa::IntoParams;

use crate::errors::ApiError;
use crate::extract::{parse_id, ApiJson};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: &'static str,
    pub id: i32,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionList {
    pub subscriptions: Vec<Subscription>,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionEnvelope {
    #[serde(rename = "Subscription")]
    pub subscription: Subscription,
}

#[derive(Debug, Serialize)]
pub struct TotalResponse {
    pub total: i64,
}

/// Summation filter given as query parameters instead of a JSON body.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SpendParams {
    /// `MM-YYYY`
    pub start_date: String,
    /// `MM-YYYY`
    pub end_date: String,
    pub user_id: Option<String>,
    pub service_name: Option<String>,
}

impl From<SpendParams> for SpendQuery {
    fn from(p: SpendParams) -> Self {
        SpendQuery {
            start_date: p.start_date,
            end_date: p.end_date,
            user_id: p.user_id,
            service_name: p.service_name,
        }
    }
}

fn failed(err: service::errors::ServiceError, fallback: &str) -> ApiError {
    match &err {
        service::errors::ServiceError::Db { .. } => error!(error = %err, "{fallback}"),
        _ => warn!(error = %err, "{fallback}"),
    }
    ApiError::from_service(&err, fallback)
}

/// Create a subscription
#[utoipa::path(
    post,
    path = "/api/v1/subscription/",
    request_body = crate::openapi::SubscriptionInputDoc,
    responses(
        (status = 200, description = "Created", body = crate::openapi::CreatedResponseDoc),
        (status = 400, description = "Invalid body", body = crate::openapi::ErrorResponseDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorResponseDoc)
    ),
    tag = "subscriptions"
)]
pub async fn create_subscription(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<SubscriptionInput>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let id = state
        .subscriptions
        .create(input)
        .await
        .map_err(|e| failed(e, "Failed to create subscription"))?;
    info!(id, "create_subscription");
    Ok(Json(CreatedResponse { message: "Subscription created successfully", id }))
}

/// List all subscriptions, newest first
#[utoipa::path(
    get,
    path = "/api/v1/subscription/",
    responses(
        (status = 200, description = "All subscriptions", body = crate::openapi::SubscriptionListDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorResponseDoc)
    ),
    tag = "subscriptions"
)]
pub async fn list_subscriptions(State(state): State<AppState>) -> Result<Json<SubscriptionList>, ApiError> {
    let subscriptions = state
        .subscriptions
        .list()
        .await
        .map_err(|e| failed(e, "Failed to get subscriptions"))?;
    Ok(Json(SubscriptionList { subscriptions }))
}

/// Fetch one subscription
#[utoipa::path(
    get,
    path = "/api/v1/subscription/{id}",
    params(("id" = i32, Path, description = "Subscription id")),
    responses(
        (status = 200, description = "Found", body = crate::openapi::SubscriptionEnvelopeDoc),
        (status = 400, description = "Invalid id", body = crate::openapi::ErrorResponseDoc),
        (status = 404, description = "Not found", body = crate::openapi::ErrorResponseDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorResponseDoc)
    ),
    tag = "subscriptions"
)]
pub async fn get_subscription(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<SubscriptionEnvelope>, ApiError> {
    let id = parse_id(&raw_id)?;
    let subscription = state
        .subscriptions
        .get(id)
        .await
        .map_err(|e| failed(e, "Failed to get subscription"))?;
    Ok(Json(SubscriptionEnvelope { subscription }))
}

/// Replace every field of a subscription
#[utoipa::path(
    put,
    path = "/api/v1/subscription/{id}",
    params(("id" = i32, Path, description = "Subscription id")),
    request_body = crate::openapi::SubscriptionInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::MessageResponseDoc),
        (status = 400, description = "Invalid id or body", body = crate::openapi::ErrorResponseDoc),
        (status = 404, description = "Not found", body = crate::openapi::ErrorResponseDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorResponseDoc)
    ),
    tag = "subscriptions"
)]
pub async fn update_subscription(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    ApiJson(input): ApiJson<SubscriptionInput>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&raw_id)?;
    state
        .subscriptions
        .update(id, input)
        .await
        .map_err(|e| failed(e, "Failed to update subscription"))?;
    info!(id, "update_subscription");
    Ok(Json(MessageResponse { message: "Subscription has been updated" }))
}

/// Delete a subscription; unknown ids succeed
#[utoipa::path(
    delete,
    path = "/api/v1/subscription/{id}",
    params(("id" = i32, Path, description = "Subscription id")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::MessageResponseDoc),
        (status = 400, description = "Invalid id", body = crate::openapi::ErrorResponseDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorResponseDoc)
    ),
    tag = "subscriptions"
)]
pub async fn delete_subscription(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&raw_id)?;
    state
        .subscriptions
        .delete(id)
        .await
        .map_err(|e| failed(e, "Failed to delete subscription"))?;
    info!(id, "delete_subscription");
    Ok(Json(MessageResponse { message: "Subscription has been deleted" }))
}

/// Sum subscription prices over a month range.
///
/// The filter is read from the JSON body; a bodyless request may pass it as query parameters.
#[utoipa::path(
    get,
    path = "/api/v1/summ/",
    params(SpendParams),
    request_body = crate::openapi::SpendQueryDoc,
    responses(
        (status = 200, description = "Total price", body = crate::openapi::TotalResponseDoc),
        (status = 400, description = "Invalid filter", body = crate::openapi::ErrorResponseDoc),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorResponseDoc)
    ),
    tag = "subscriptions"
)]
pub async fn total_spend(
    State(state): State<AppState>,
    query: Option<Query<SpendParams>>,
    body: Bytes,
) -> Result<Json<TotalResponse>, ApiError> {
    let filter = if !body.is_empty() {
        serde_json::from_slice::<SpendQuery>(&body).map_err(|e| {
            warn!(error = %e, "invalid summation body");
            ApiError::bad_request("Invalid request body")
        })?
    } else if let Some(Query(params)) = query {
        SpendQuery::from(params)
    } else {
        return Err(ApiError::bad_request("Invalid request body"));
    };
    let total = state
        .subscriptions
        .total_spend(filter)
        .await
        .map_err(|e| failed(e, "Failed to get summ"))?;
    Ok(Json(TotalResponse { total }))
}
