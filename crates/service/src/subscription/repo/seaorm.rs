use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult, NotSet, QueryFilter,
    QueryOrder, QueryTrait, Set,
};
use tracing::{debug, error, info, instrument, warn};

use models::errors::ModelError;
use models::subscription::{self, SpendFilter};

use crate::subscription::domain::{Subscription, SubscriptionInput};
use crate::subscription::repository::SubscriptionRepository;

/// PostgreSQL-backed storage via SeaORM.
#[derive(Clone)]
pub struct SeaOrmSubscriptionRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmSubscriptionRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn active_model(input: &SubscriptionInput) -> subscription::ActiveModel {
    subscription::ActiveModel {
        id: NotSet,
        service_name: Set(input.service_name.clone()),
        price: Set(input.price),
        user_id: Set(input.user_id),
        start_date: Set(input.start_date.clone()),
        end_date: Set(input.end_date.clone()),
    }
}

/// Decode every row, logging and dropping the ones that fail.
///
/// The migrated schema types and constrains every column, so a failure here means the
/// table has drifted from the entity (a manual `ALTER`, say). The listing stays available.
fn keep_decodable<R, T, E: std::fmt::Display>(rows: &[R], decode: impl Fn(&R) -> Result<T, E>) -> Vec<T> {
    let mut kept = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        match decode(row) {
            Ok(item) => kept.push(item),
            Err(e) => warn!(index, error = %e, "failed to decode subscription row; skipping"),
        }
    }
    kept
}

fn db_failure(context: &str, e: sea_orm::DbErr) -> ModelError {
    error!(error = %e, "{context}");
    ModelError::from(e)
}

#[async_trait::async_trait]
impl SubscriptionRepository for SeaOrmSubscriptionRepository {
    #[instrument(skip(self, input), fields(op = "repository.subscription.insert"))]
    async fn insert(&self, input: &SubscriptionInput) -> Result<i32, ModelError> {
        info!(service_name = %input.service_name, user_id = %input.user_id, "inserting subscription");
        let res = subscription::Entity::insert(active_model(input))
            .exec(&self.db)
            .await
            .map_err(|e| db_failure("failed to insert subscription", e))?;
        debug!(id = res.last_insert_id, "inserted successfully");
        Ok(res.last_insert_id)
    }

    #[instrument(skip(self), fields(op = "repository.subscription.select_all"))]
    async fn select_all(&self) -> Result<Vec<Subscription>, ModelError> {
        let stmt = subscription::Entity::find()
            .order_by_desc(subscription::Column::Id)
            .build(self.db.get_database_backend());
        let rows = self
            .db
            .query_all(stmt)
            .await
            .map_err(|e| db_failure("failed to execute query", e))?;

        Ok(keep_decodable(&rows, |row| Subscription::from_query_result(row, "")))
    }

    #[instrument(skip(self), fields(op = "repository.subscription.select_by_id"))]
    async fn select_by_id(&self, id: i32) -> Result<Subscription, ModelError> {
        subscription::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| db_failure("failed to select subscription", e))?
            .ok_or_else(|| ModelError::NotFound(format!("no subscription with id {id}")))
    }

    #[instrument(skip(self, input), fields(op = "repository.subscription.update"))]
    async fn update(&self, input: &SubscriptionInput, id: i32) -> Result<(), ModelError> {
        let res = subscription::Entity::update_many()
            .set(active_model(input))
            .filter(subscription::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| db_failure("failed to update subscription", e))?;
        if res.rows_affected == 0 {
            return Err(ModelError::NotFound(format!("no subscription with id {id}")));
        }
        info!(id, "subscription updated");
        Ok(())
    }

    #[instrument(skip(self), fields(op = "repository.subscription.delete"))]
    async fn delete(&self, id: i32) -> Result<(), ModelError> {
        let res = subscription::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| db_failure("failed to delete subscription", e))?;
        if res.rows_affected == 0 {
            info!(id, "no subscription found with id");
        } else {
            info!(id, "subscription deleted");
        }
        Ok(())
    }

    #[instrument(skip(self), fields(op = "repository.subscription.select_sum"))]
    async fn select_sum(&self, filter: &SpendFilter) -> Result<i64, ModelError> {
        let row = self
            .db
            .query_one(filter.to_statement())
            .await
            .map_err(|e| db_failure("failed to select sum", e))?;
        let total = match row {
            Some(row) => row
                .try_get::<i64>("", "total")
                .map_err(|e| db_failure("failed to read sum", e))?,
            None => 0,
        };
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{db_tests_enabled, get_db};
    use uuid::Uuid;

    fn input(user_id: Uuid, service: &str, price: i32, start: &str) -> SubscriptionInput {
        SubscriptionInput {
            service_name: service.into(),
            price,
            user_id,
            start_date: start.into(),
            end_date: None,
        }
    }

    #[test]
    fn undecodable_rows_are_skipped_in_order() {
        let rows = ["3", "x", "1", ""];
        let kept = keep_decodable(&rows, |r| r.parse::<i32>());
        assert_eq!(kept, vec![3, 1]);

        let none: Vec<i32> = keep_decodable(&["a", "b"], |r| r.parse::<i32>());
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn subscription_crud_repository() -> Result<(), anyhow::Error> {
        if !db_tests_enabled() { return Ok(()); }
        let repo = SeaOrmSubscriptionRepository::new(get_db().await?);
        let user = Uuid::new_v4();

        let first = repo.insert(&input(user, "Netflix", 1500, "01-2024")).await?;
        let second = repo.insert(&input(user, "Spotify", 300, "02-2024")).await?;
        assert!(second > first);

        let found = repo.select_by_id(first).await?;
        assert_eq!(found.service_name, "Netflix");
        assert_eq!(found.price, 1500);
        assert_eq!(found.user_id, user);

        // newest first
        let all = repo.select_all().await?;
        let pos_first = all.iter().position(|s| s.id == first).expect("first listed");
        let pos_second = all.iter().position(|s| s.id == second).expect("second listed");
        assert!(pos_second < pos_first);
        assert!(all.windows(2).all(|w| w[0].id > w[1].id));

        let mut changed = input(user, "Netflix Premium", 2000, "03-2024");
        changed.end_date = Some("12-2024".into());
        repo.update(&changed, first).await?;
        let after = repo.select_by_id(first).await?;
        assert_eq!(after.id, first);
        assert_eq!(after.service_name, "Netflix Premium");
        assert_eq!(after.price, 2000);
        assert_eq!(after.start_date, "03-2024");
        assert_eq!(after.end_date.as_deref(), Some("12-2024"));

        repo.delete(first).await?;
        repo.delete(first).await?;
        assert!(matches!(repo.select_by_id(first).await, Err(ModelError::NotFound(_))));
        assert!(matches!(repo.update(&changed, first).await, Err(ModelError::NotFound(_))));

        repo.delete(second).await?;
        Ok(())
    }

    #[tokio::test]
    async fn select_sum_filters_by_range_user_and_service() -> Result<(), anyhow::Error> {
        if !db_tests_enabled() { return Ok(()); }
        let repo = SeaOrmSubscriptionRepository::new(get_db().await?);
        let user = Uuid::new_v4();
        let ids = vec![
            repo.insert(&input(user, "Netflix", 1500, "01-2024")).await?,
            repo.insert(&input(user, "Spotify", 300, "12-2024")).await?,
            repo.insert(&input(user, "Netflix", 700, "01-2025")).await?,
        ];

        let mut filter = SpendFilter {
            start: "01-2024".parse()?,
            end: "12-2024".parse()?,
            user_id: Some(user),
            service_name: None,
        };
        assert_eq!(repo.select_sum(&filter).await?, 1800);

        filter.service_name = Some("Spotify".into());
        assert_eq!(repo.select_sum(&filter).await?, 300);

        filter.user_id = Some(Uuid::new_v4());
        assert_eq!(repo.select_sum(&filter).await?, 0);

        for id in ids { repo.delete(id).await?; }
        Ok(())
    }
}
