use async_trait::async_trait;
use models::errors::ModelError;
use models::subscription::SpendFilter;

use super::domain::{Subscription, SubscriptionInput};

/// Storage abstraction for the `subscriptions` table.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Insert a row and return its generated id.
    async fn insert(&self, input: &SubscriptionInput) -> Result<i32, ModelError>;
    /// All rows, newest (highest id) first.
    async fn select_all(&self) -> Result<Vec<Subscription>, ModelError>;
    async fn select_by_id(&self, id: i32) -> Result<Subscription, ModelError>;
    /// Replace every column except `id`; `NotFound` when no row has `id`.
    async fn update(&self, input: &SubscriptionInput, id: i32) -> Result<(), ModelError>;
    /// Remove a row. A missing id is not an error.
    async fn delete(&self, id: i32) -> Result<(), ModelError>;
    /// Sum of `price` over rows matching `filter`; 0 when nothing matches.
    async fn select_sum(&self, filter: &SpendFilter) -> Result<i64, ModelError>;
}
