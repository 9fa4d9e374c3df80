use chrono::Utc;
use sea_orm::{entity::prelude::*, Condition, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::is_unique_violation;
use crate::errors::{ModelError, ValidationErrors};

pub const NAME_MAX: usize = 100;
pub const ADDRESS_MAX: usize = 200;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub vehicle_number: String,
    pub vehicle_plate: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Caller-supplied customer fields, prior to normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub vehicle_number: String,
    pub vehicle_plate: String,
}

pub fn validate_name(v: &str) -> Result<(), String> {
    let n = v.trim();
    if n.is_empty() || n.chars().count() > NAME_MAX {
        return Err(format!("name must be between 1 and {} characters", NAME_MAX));
    }
    Ok(())
}

/// Loose phone pattern: optional leading `+`, then a non-zero digit and up
/// to 15 further digits.
pub fn validate_phone(v: &str) -> Result<(), String> {
    let s = v.trim();
    let digits = s.strip_prefix('+').unwrap_or(s);
    let mut chars = digits.chars();
    let valid = matches!(chars.next(), Some('1'..='9'))
        && chars.all(|c| c.is_ascii_digit())
        && digits.len() <= 16;
    if !valid {
        return Err("please enter a valid phone number".into());
    }
    Ok(())
}

pub fn validate_address(v: &str) -> Result<(), String> {
    let a = v.trim();
    if a.is_empty() || a.chars().count() > ADDRESS_MAX {
        return Err(format!("address must be between 1 and {} characters", ADDRESS_MAX));
    }
    Ok(())
}

pub fn validate_vehicle_field(v: &str) -> Result<(), String> {
    let t = v.trim();
    if t.is_empty() || t.chars().count() > 32 {
        return Err("must be between 1 and 32 characters".into());
    }
    Ok(())
}

/// Vehicle identifiers are stored trimmed and upper-cased.
pub fn normalize_vehicle(v: &str) -> String {
    v.trim().to_uppercase()
}

impl CustomerInput {
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut errs = ValidationErrors::new();
        errs.check("name", validate_name(&self.name));
        errs.check("phone", validate_phone(&self.phone));
        errs.check("address", validate_address(&self.address));
        errs.check("vehicleNumber", validate_vehicle_field(&self.vehicle_number));
        errs.check("vehiclePlate", validate_vehicle_field(&self.vehicle_plate));
        errs.into_result()
    }
}

/// Insert a customer. The unique indexes on phone and plate are the
/// duplicate check; a violation surfaces as a conflict.
pub async fn create(db: &DatabaseConnection, input: &CustomerInput) -> Result<Model, ModelError> {
    input.validate()?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name.trim().to_string()),
        phone: Set(input.phone.trim().to_string()),
        address: Set(input.address.trim().to_string()),
        vehicle_number: Set(normalize_vehicle(&input.vehicle_number)),
        vehicle_plate: Set(normalize_vehicle(&input.vehicle_plate)),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| {
        if is_unique_violation(&e) {
            ModelError::Conflict("customer with this phone number or vehicle plate already exists".into())
        } else {
            ModelError::Db(e.to_string())
        }
    })
}

/// Match an existing customer by phone or normalized plate.
pub async fn find_by_phone_or_plate(
    db: &DatabaseConnection,
    phone: &str,
    plate: &str,
) -> Result<Option<Model>, ModelError> {
    Entity::find()
        .filter(
            Condition::any()
                .add(Column::Phone.eq(phone.trim()))
                .add(Column::VehiclePlate.eq(normalize_vehicle(plate))),
        )
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_pattern_accepts_plus_and_digits() {
        assert!(validate_phone("+6281234567890").is_ok());
        assert!(validate_phone("81234567890").is_ok());
    }

    #[test]
    fn phone_pattern_rejects_leading_zero_and_letters() {
        assert!(validate_phone("0812345").is_err());
        assert!(validate_phone("+62-812").is_err());
        assert!(validate_phone("phone").is_err());
        assert!(validate_phone("").is_err());
    }

    #[test]
    fn phone_pattern_rejects_overlong() {
        assert!(validate_phone("+12345678901234567").is_err());
        assert!(validate_phone("+1234567890123456").is_ok());
    }

    #[test]
    fn vehicle_fields_are_upper_cased() {
        assert_eq!(normalize_vehicle("  b 1234 xyz "), "B 1234 XYZ");
    }

    #[test]
    fn input_validation_collects_every_bad_field() {
        let input = CustomerInput {
            name: "".into(),
            phone: "abc".into(),
            address: "x".repeat(ADDRESS_MAX + 1),
            vehicle_number: "A1".into(),
            vehicle_plate: "".into(),
        };
        match input.validate() {
            Err(ModelError::Validation(v)) => {
                let fields: Vec<&str> = v.0.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, ["name", "phone", "address", "vehiclePlate"]);
            }
            other => panic!("expected validation error, got {:?}", other.err()),
        }
    }

    #[test]
    fn valid_input_passes() {
        let input = CustomerInput {
            name: "Alice".into(),
            phone: "+6281234567".into(),
            address: "Jl. Sudirman 10".into(),
            vehicle_number: "b1234xyz".into(),
            vehicle_plate: "b 1234 xyz".into(),
        };
        assert!(input.validate().is_ok());
    }
}
