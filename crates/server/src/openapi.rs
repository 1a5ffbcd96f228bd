//! OpenAPI document. The `*Doc` structs mirror wire shapes for schema generation only.

use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ErrorResponseDoc { pub error: String }

#[derive(ToSchema)]
pub struct SubscriptionDoc {
    pub id: i32,
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    /// `MM-YYYY`
    pub start_date: String,
    /// `MM-YYYY`
    pub end_date: Option<String>,
}

#[derive(ToSchema)]
pub struct SubscriptionInputDoc {
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    pub start_date: String,
    pub end_date: Option<String>,
}

#[derive(ToSchema)]
pub struct SpendQueryDoc {
    pub start_date: String,
    pub end_date: String,
    pub user_id: Option<Uuid>,
    pub service_name: Option<String>,
}

#[derive(ToSchema)]
pub struct SubscriptionEnvelopeDoc {
    #[schema(rename = "Subscription")]
    pub subscription: SubscriptionDoc,
}

#[derive(ToSchema)]
pub struct SubscriptionListDoc { pub subscriptions: Vec<SubscriptionDoc> }

#[derive(ToSchema)]
pub struct CreatedResponseDoc { pub message: String, pub id: i32 }

#[derive(ToSchema)]
pub struct MessageResponseDoc { pub message: String }

#[derive(ToSchema)]
pub struct TotalResponseDoc { pub total: i64 }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::subscriptions::create_subscription,
        crate::routes::subscriptions::list_subscriptions,
        crate::routes::subscriptions::get_subscription,
        crate::routes::subscriptions::update_subscription,
        crate::routes::subscriptions::delete_subscription,
        crate::routes::subscriptions::total_spend,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorResponseDoc,
            SubscriptionDoc,
            SubscriptionInputDoc,
            SpendQueryDoc,
            SubscriptionEnvelopeDoc,
            SubscriptionListDoc,
            CreatedResponseDoc,
            MessageResponseDoc,
            TotalResponseDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "subscriptions")
    )
)]
pub struct ApiDoc;
