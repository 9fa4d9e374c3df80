use chrono::Utc;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Serialize;
use uuid::Uuid;

use models::customer;
use models::errors::ValidationErrors;

use crate::errors::ServiceError;
use crate::pagination::{PageInfo, Pagination};

/// One page of customers plus the pagination envelope.
#[derive(Debug, Serialize)]
pub struct CustomerPage {
    pub customers: Vec<customer::Model>,
    pub pagination: PageInfo,
}

/// Partial update; only supplied fields are validated and written.
#[derive(Debug, Default, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub vehicle_number: Option<String>,
    pub vehicle_plate: Option<String>,
}

fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

/// List customers newest-first, optionally filtered by a case-insensitive
/// substring match over name, phone, or vehicle plate.
pub async fn list_customers(
    db: &DatabaseConnection,
    page: Pagination,
    search: Option<&str>,
) -> Result<CustomerPage, ServiceError> {
    let mut query = customer::Entity::find();
    if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = format!("%{}%", escape_like(term));
        query = query.filter(
            Condition::any()
                .add(Expr::col(customer::Column::Name).ilike(pattern.clone()))
                .add(Expr::col(customer::Column::Phone).ilike(pattern.clone()))
                .add(Expr::col(customer::Column::VehiclePlate).ilike(pattern)),
        );
    }
    let (page_idx, per_page) = page.normalize();
    let paginator = query
        .order_by_desc(customer::Column::CreatedAt)
        .paginate(db, per_page);
    let total = paginator.num_items().await?;
    let customers = paginator.fetch_page(page_idx).await?;
    Ok(CustomerPage {
        customers,
        pagination: PageInfo::new(page.current(), total, per_page),
    })
}

pub async fn get_customer(db: &DatabaseConnection, id: Uuid) -> Result<customer::Model, ServiceError> {
    customer::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("customer"))
}

pub async fn create_customer(
    db: &DatabaseConnection,
    input: &customer::CustomerInput,
) -> Result<customer::Model, ServiceError> {
    let created = customer::create(db, input).await?;
    tracing::info!(customer_id = %created.id, plate = %created.vehicle_plate, "customer_created");
    Ok(created)
}

/// Apply a partial update. Only supplied fields are validated; the unique
/// indexes still reject a phone/plate that collides with another customer.
pub async fn update_customer(
    db: &DatabaseConnection,
    id: Uuid,
    update: CustomerUpdate,
) -> Result<customer::Model, ServiceError> {
    let mut errs = ValidationErrors::new();
    if let Some(v) = &update.name {
        errs.check("name", customer::validate_name(v));
    }
    if let Some(v) = &update.phone {
        errs.check("phone", customer::validate_phone(v));
    }
    if let Some(v) = &update.address {
        errs.check("address", customer::validate_address(v));
    }
    if let Some(v) = &update.vehicle_number {
        errs.check("vehicleNumber", customer::validate_vehicle_field(v));
    }
    if let Some(v) = &update.vehicle_plate {
        errs.check("vehiclePlate", customer::validate_vehicle_field(v));
    }
    errs.into_result().map_err(ServiceError::from)?;

    let mut am: customer::ActiveModel = customer::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("customer"))?
        .into();
    if let Some(v) = update.name {
        am.name = Set(v.trim().to_string());
    }
    if let Some(v) = update.phone {
        am.phone = Set(v.trim().to_string());
    }
    if let Some(v) = update.address {
        am.address = Set(v.trim().to_string());
    }
    if let Some(v) = update.vehicle_number {
        am.vehicle_number = Set(customer::normalize_vehicle(&v));
    }
    if let Some(v) = update.vehicle_plate {
        am.vehicle_plate = Set(customer::normalize_vehicle(&v));
    }
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| {
        if models::db::is_unique_violation(&e) {
            ServiceError::Conflict("customer with this phone number or vehicle plate already exists".into())
        } else {
            ServiceError::Db(e.to_string())
        }
    })
}

/// Remove a customer. Referencing service records are left untouched and
/// keep a dangling `customer_id`.
pub async fn delete_customer(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = customer::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("customer"));
    }
    tracing::info!(customer_id = %id, "customer_deleted");
    Ok(())
}
