use std::sync::Arc;

use service::subscription::{SubscriptionRepository, SubscriptionService};

/// Shared handler state; cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub subscriptions: SubscriptionService<dyn SubscriptionRepository>,
}

impl AppState {
    pub fn new(repo: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subscriptions: SubscriptionService::new(repo) }
    }
}
