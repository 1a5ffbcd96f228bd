use models::errors::ModelError;
use models::subscription::{self, SpendFilter};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Persisted subscription row.
pub type Subscription = subscription::Model;

/// Subscription fields supplied by a client; the id is assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionInput {
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl SubscriptionInput {
    /// Trim date fields and treat a blank `end_date` as absent.
    pub fn normalized(mut self) -> Self {
        self.start_date = self.start_date.trim().to_string();
        self.end_date = self
            .end_date
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        self
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        subscription::validate_service_name(&self.service_name)?;
        subscription::validate_price(self.price)?;
        subscription::validate_month_year("start_date", &self.start_date)?;
        if let Some(end) = &self.end_date {
            subscription::validate_month_year("end_date", end)?;
        }
        Ok(())
    }
}

/// Summation filter as it arrives on the wire: an absent or empty (`""`) user or
/// service means "any". Other values are matched exactly, whitespace included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendQuery {
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub service_name: Option<String>,
}

impl SpendQuery {
    pub fn to_filter(&self) -> Result<SpendFilter, ModelError> {
        let start = subscription::validate_month_year("start_date", &self.start_date)?;
        let end = subscription::validate_month_year("end_date", &self.end_date)?;
        let user_id = match non_empty(&self.user_id) {
            Some(raw) => Some(
                Uuid::parse_str(raw)
                    .map_err(|_| ModelError::Validation("user_id must be a UUID".into()))?,
            ),
            None => None,
        };
        let service_name = non_empty(&self.service_name).map(str::to_string);
        Ok(SpendFilter { start, end, user_id, service_name })
    }
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}
