use std::sync::Arc;

use models::errors::ModelError;
use tracing::{debug, error, info, instrument, warn};

use super::domain::{SpendQuery, Subscription, SubscriptionInput};
use super::repository::SubscriptionRepository;
use crate::errors::ServiceError;

/// Subscription business service independent of web framework.
pub struct SubscriptionService<R: SubscriptionRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: SubscriptionRepository + ?Sized> Clone for SubscriptionService<R> {
    fn clone(&self) -> Self { Self { repo: Arc::clone(&self.repo) } }
}

/// Log a storage failure at a level matching its kind and label it with `op`.
fn relabel(op: &'static str, err: ModelError) -> ServiceError {
    match &err {
        ModelError::Validation(detail) => debug!(op, %detail, "rejected input"),
        ModelError::NotFound(detail) => info!(op, %detail, "not found"),
        ModelError::Db(detail) => error!(op, %detail, "storage failure"),
    }
    ServiceError::at(op, err)
}

impl<R: SubscriptionRepository + ?Sized> SubscriptionService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Validate and store a subscription, returning its id.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::subscription::{SubscriptionInput, SubscriptionService};
    /// use service::subscription::repo::InMemorySubscriptionRepository;
    /// let svc = SubscriptionService::new(Arc::new(InMemorySubscriptionRepository::new()));
    /// let input = SubscriptionInput {
    ///     service_name: "Yandex Plus".into(),
    ///     price: 400,
    ///     user_id: uuid::Uuid::new_v4(),
    ///     start_date: "07-2025".into(),
    ///     end_date: None,
    /// };
    /// let id = tokio_test::block_on(svc.create(input)).unwrap();
    /// assert_eq!(id, 1);
    /// ```
    #[instrument(skip(self, input), fields(op = "services.subscription.create", service_name = %input.service_name))]
    pub async fn create(&self, input: SubscriptionInput) -> Result<i32, ServiceError> {
        const OP: &str = "services.subscription.create";
        let input = input.normalized();
        input.validate().map_err(|e| relabel(OP, e))?;
        let id = self.repo.insert(&input).await.map_err(|e| relabel(OP, e))?;
        info!(id, "subscription created");
        Ok(id)
    }

    /// Every stored subscription, newest first.
    #[instrument(skip(self), fields(op = "services.subscription.list"))]
    pub async fn list(&self) -> Result<Vec<Subscription>, ServiceError> {
        let subs = self
            .repo
            .select_all()
            .await
            .map_err(|e| relabel("services.subscription.list", e))?;
        debug!(count = subs.len(), "listed subscriptions");
        Ok(subs)
    }

    #[instrument(skip(self), fields(op = "services.subscription.get"))]
    pub async fn get(&self, id: i32) -> Result<Subscription, ServiceError> {
        self.repo
            .select_by_id(id)
            .await
            .map_err(|e| relabel("services.subscription.get", e))
    }

    /// Replace every field of subscription `id`.
    #[instrument(skip(self, input), fields(op = "services.subscription.update"))]
    pub async fn update(&self, id: i32, input: SubscriptionInput) -> Result<(), ServiceError> {
        const OP: &str = "services.subscription.update";
        if id == 0 {
            warn!("update without id");
            return Err(ServiceError::Validation { op: OP, detail: "id is required for update".into() });
        }
        let input = input.normalized();
        input.validate().map_err(|e| relabel(OP, e))?;
        self.repo.update(&input, id).await.map_err(|e| relabel(OP, e))
    }

    /// Delete subscription `id`; deleting a missing id succeeds.
    #[instrument(skip(self), fields(op = "services.subscription.delete"))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.repo
            .delete(id)
            .await
            .map_err(|e| relabel("services.subscription.delete", e))
    }

    /// Total price of subscriptions starting within the query's month range.
    #[instrument(skip(self, query), fields(op = "services.subscription.total_spend"))]
    pub async fn total_spend(&self, query: SpendQuery) -> Result<i64, ServiceError> {
        const OP: &str = "services.subscription.total_spend";
        let filter = query.to_filter().map_err(|e| relabel(OP, e))?;
        let total = self.repo.select_sum(&filter).await.map_err(|e| relabel(OP, e))?;
        debug!(total, "computed total spend");
        Ok(total)
    }
}
