use chrono::{DateTime, Utc};
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

/// Closed set of offered service types.
pub const SERVICE_TYPES: [&str; 6] = [
    "basic-wash",
    "deep-clean",
    "waxing",
    "interior-clean",
    "engine-wash",
    "full-service",
];

pub const STATUSES: [&str; 4] = ["pending", "in-progress", "completed", "cancelled"];

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_CANCELLED: &str = "cancelled";

pub const NOTES_MAX: usize = 500;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "services")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Reference to the customer; not a foreign key, so it may dangle after
    /// a customer delete.
    pub customer_id: Uuid,
    pub service_type: String,
    pub price: f64,
    pub service_date: DateTimeWithTimeZone,
    pub status: String,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_service_type(v: &str) -> Result<(), String> {
    if SERVICE_TYPES.contains(&v) {
        Ok(())
    } else {
        Err("invalid service type".into())
    }
}

pub fn validate_status(v: &str) -> Result<(), String> {
    if STATUSES.contains(&v) {
        Ok(())
    } else {
        Err("invalid status".into())
    }
}

pub fn validate_price(v: f64) -> Result<(), String> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err("price must be a non-negative number".into())
    }
}

pub fn validate_notes(v: &str) -> Result<(), String> {
    if v.chars().count() > NOTES_MAX {
        Err(format!("notes cannot be more than {} characters", NOTES_MAX))
    } else {
        Ok(())
    }
}

/// Insert a service record with status defaulted to pending.
pub async fn create(
    db: &DatabaseConnection,
    customer_id: Uuid,
    service_type: &str,
    price: f64,
    service_date: DateTime<Utc>,
    notes: Option<String>,
    created_by: Uuid,
) -> Result<Model, ModelError> {
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        customer_id: Set(customer_id),
        service_type: Set(service_type.to_string()),
        price: Set(price),
        service_date: Set(service_date.into()),
        status: Set(STATUS_PENDING.to_string()),
        notes: Set(notes),
        created_by: Set(created_by),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_type_is_closed_set() {
        for t in SERVICE_TYPES {
            assert!(validate_service_type(t).is_ok());
        }
        assert!(validate_service_type("dry-clean").is_err());
        assert!(validate_service_type("").is_err());
    }

    #[test]
    fn status_is_closed_set() {
        for s in STATUSES {
            assert!(validate_status(s).is_ok());
        }
        assert!(validate_status("done").is_err());
    }

    #[test]
    fn price_must_be_non_negative_and_finite() {
        assert!(validate_price(0.0).is_ok());
        assert!(validate_price(125_000.5).is_ok());
        assert!(validate_price(-1.0).is_err());
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(f64::INFINITY).is_err());
    }

    #[test]
    fn notes_length_bound() {
        assert!(validate_notes(&"x".repeat(NOTES_MAX)).is_ok());
        assert!(validate_notes(&"x".repeat(NOTES_MAX + 1)).is_err());
    }
}
