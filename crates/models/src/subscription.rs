use sea_orm::{entity::prelude::*, DatabaseBackend, Statement, Value};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::period::MonthYear;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscriptions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub start_date: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub end_date: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { match *self {} }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_service_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("service_name required".into()));
    }
    Ok(())
}

pub fn validate_price(price: i32) -> Result<(), ModelError> {
    if price < 0 {
        return Err(ModelError::Validation("price must not be negative".into()));
    }
    Ok(())
}

/// Parse a `MM-YYYY` field, naming the field in the error.
pub fn validate_month_year(field: &str, value: &str) -> Result<MonthYear, ModelError> {
    value
        .parse::<MonthYear>()
        .map_err(|_| ModelError::Validation(format!("{field} must be in MM-YYYY form")))
}

/// Criteria for summing subscription prices.
///
/// Rows match when their `start_date` falls within `start..=end` (by month) and,
/// when given, their owner and service name are equal to the filter's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendFilter {
    pub start: MonthYear,
    pub end: MonthYear,
    pub user_id: Option<Uuid>,
    pub service_name: Option<String>,
}

pub const SPEND_SQL: &str = r#"SELECT COALESCE(SUM(price), 0)::BIGINT AS total
FROM subscriptions
WHERE to_date(start_date, 'MM-YYYY') BETWEEN $1 AND $2
  AND ($3::uuid IS NULL OR user_id = $3::uuid)
  AND ($4::text IS NULL OR service_name = $4::text)"#;

impl SpendFilter {
    /// Parameterized `SUM(price)` statement; the result column is `total`.
    pub fn to_statement(&self) -> Statement {
        let values: [Value; 4] = [
            self.start.first_day().into(),
            self.end.first_day().into(),
            self.user_id.into(),
            self.service_name.clone().into(),
        ];
        Statement::from_sql_and_values(DatabaseBackend::Postgres, SPEND_SQL, values)
    }

    /// Same predicate as [`SPEND_SQL`], evaluated in memory.
    pub fn matches(&self, row: &Model) -> bool {
        let Ok(started) = row.start_date.parse::<MonthYear>() else { return false };
        if started < self.start || started > self.end {
            return false;
        }
        if self.user_id.is_some_and(|u| u != row.user_id) {
            return false;
        }
        match &self.service_name {
            Some(name) => *name == row.service_name,
            None => true,
        }
    }
}
