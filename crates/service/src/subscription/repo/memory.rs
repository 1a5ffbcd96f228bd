use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use models::errors::ModelError;
use models::subscription::SpendFilter;

use crate::subscription::domain::{Subscription, SubscriptionInput};
use crate::subscription::repository::SubscriptionRepository;

#[derive(Default)]
struct Table {
    last_id: i32,
    rows: BTreeMap<i32, Subscription>,
}

/// Process-local storage with the same observable behaviour as the PostgreSQL repository.
#[derive(Default)]
pub struct InMemorySubscriptionRepository {
    table: Mutex<Table>,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self { Self::default() }

    fn lock(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn row(id: i32, input: &SubscriptionInput) -> Subscription {
    Subscription {
        id,
        service_name: input.service_name.clone(),
        price: input.price,
        user_id: input.user_id,
        start_date: input.start_date.clone(),
        end_date: input.end_date.clone(),
    }
}

#[async_trait::async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn insert(&self, input: &SubscriptionInput) -> Result<i32, ModelError> {
        let mut table = self.lock();
        table.last_id += 1;
        let id = table.last_id;
        table.rows.insert(id, row(id, input));
        Ok(id)
    }

    async fn select_all(&self) -> Result<Vec<Subscription>, ModelError> {
        Ok(self.lock().rows.values().rev().cloned().collect())
    }

    async fn select_by_id(&self, id: i32) -> Result<Subscription, ModelError> {
        self.lock()
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| ModelError::NotFound(format!("no subscription with id {id}")))
    }

    async fn update(&self, input: &SubscriptionInput, id: i32) -> Result<(), ModelError> {
        let mut table = self.lock();
        match table.rows.get_mut(&id) {
            Some(existing) => {
                *existing = row(id, input);
                Ok(())
            }
            None => Err(ModelError::NotFound(format!("no subscription with id {id}"))),
        }
    }

    async fn delete(&self, id: i32) -> Result<(), ModelError> {
        self.lock().rows.remove(&id);
        Ok(())
    }

    async fn select_sum(&self, filter: &SpendFilter) -> Result<i64, ModelError> {
        Ok(self
            .lock()
            .rows
            .values()
            .filter(|s| filter.matches(s))
            .map(|s| i64::from(s.price))
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn input(service: &str, price: i32) -> SubscriptionInput {
        SubscriptionInput {
            service_name: service.into(),
            price,
            user_id: Uuid::nil(),
            start_date: "01-2024".into(),
            end_date: None,
        }
    }

    #[test]
    fn ids_are_sequential_and_listing_is_newest_first() {
        tokio_test::block_on(async {
            let repo = InMemorySubscriptionRepository::new();
            assert_eq!(repo.insert(&input("A", 1)).await.unwrap(), 1);
            assert_eq!(repo.insert(&input("B", 2)).await.unwrap(), 2);
            repo.delete(2).await.unwrap();
            // ids are never reused
            assert_eq!(repo.insert(&input("C", 3)).await.unwrap(), 3);

            let ids: Vec<i32> = repo.select_all().await.unwrap().iter().map(|s| s.id).collect();
            assert_eq!(ids, vec![3, 1]);
        });
    }

    #[test]
    fn update_and_delete_missing_rows() {
        tokio_test::block_on(async {
            let repo = InMemorySubscriptionRepository::new();
            let err = repo.update(&input("A", 1), 42).await.unwrap_err();
            assert!(matches!(err, ModelError::NotFound(_)));
            assert!(repo.delete(42).await.is_ok());
            assert!(matches!(repo.select_by_id(42).await, Err(ModelError::NotFound(_))));
        });
    }

    #[test]
    fn sum_of_nothing_is_zero() {
        tokio_test::block_on(async {
            let repo = InMemorySubscriptionRepository::new();
            let filter = SpendFilter {
                start: "01-2024".parse().unwrap(),
                end: "12-2024".parse().unwrap(),
                user_id: None,
                service_name: None,
            };
            assert_eq!(repo.select_sum(&filter).await.unwrap(), 0);
            repo.insert(&input("A", 1500)).await.unwrap();
            repo.insert(&input("B", 300)).await.unwrap();
            assert_eq!(repo.select_sum(&filter).await.unwrap(), 1800);
        });
    }
}
