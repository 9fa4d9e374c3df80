use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::customer::{self, CustomerInput};
use models::errors::{ModelError, ValidationErrors};
use models::service_record::{self, STATUS_PENDING};
use models::user;

use crate::dates::parse_date_time;
use crate::errors::ServiceError;
use crate::pagination::{PageInfo, Pagination};

/// Customer fields denormalized into list responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerBrief {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub vehicle_plate: String,
}

impl From<&customer::Model> for CustomerBrief {
    fn from(c: &customer::Model) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            phone: c.phone.clone(),
            vehicle_plate: c.vehicle_plate.clone(),
        }
    }
}

/// List row: the service record expanded with the referenced customer's
/// display fields and the creator's name. Either may be absent when the
/// reference dangles.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceListItem {
    #[serde(flatten)]
    pub service: service_record::Model,
    pub customer: Option<CustomerBrief>,
    pub created_by_name: Option<String>,
}

/// Detail row: the full customer record instead of the brief.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDetail {
    #[serde(flatten)]
    pub service: service_record::Model,
    pub customer: Option<customer::Model>,
    pub created_by_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ServicePage {
    pub services: Vec<ServiceListItem>,
    pub pagination: PageInfo,
}

/// Exact-match and date-range filters for the service list.
#[derive(Debug, Default, Clone)]
pub struct ServiceFilters {
    pub service_type: Option<String>,
    pub status: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

impl ServiceFilters {
    pub fn validate(&self) -> Result<(), ServiceError> {
        let mut errs = ValidationErrors::new();
        if let Some(t) = &self.service_type {
            errs.check("serviceType", service_record::validate_service_type(t));
        }
        if let Some(s) = &self.status {
            errs.check("status", service_record::validate_status(s));
        }
        errs.into_result().map_err(ServiceError::from)
    }
}

/// Typed create command. Exactly one of `customer_id`/`customer_data` is
/// required; the service date arrives as text and is validated here.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceInput {
    pub customer_id: Option<Uuid>,
    pub customer_data: Option<CustomerInput>,
    pub service_type: String,
    pub price: f64,
    pub service_date: String,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceInput {
    pub service_type: Option<String>,
    pub price: Option<f64>,
    pub service_date: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// Batch-expand service rows with customer briefs and creator names.
pub(crate) async fn expand_list(
    db: &DatabaseConnection,
    rows: Vec<service_record::Model>,
) -> Result<Vec<ServiceListItem>, ServiceError> {
    let customer_ids: Vec<Uuid> = rows.iter().map(|s| s.customer_id).collect();
    let user_ids: Vec<Uuid> = rows.iter().map(|s| s.created_by).collect();

    let customers: HashMap<Uuid, customer::Model> = if customer_ids.is_empty() {
        HashMap::new()
    } else {
        customer::Entity::find()
            .filter(customer::Column::Id.is_in(customer_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect()
    };
    let users: HashMap<Uuid, user::Model> = if user_ids.is_empty() {
        HashMap::new()
    } else {
        user::Entity::find()
            .filter(user::Column::Id.is_in(user_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect()
    };

    Ok(rows
        .into_iter()
        .map(|s| {
            let customer = customers.get(&s.customer_id).map(CustomerBrief::from);
            let created_by_name = users.get(&s.created_by).map(|u| u.name.clone());
            ServiceListItem { service: s, customer, created_by_name }
        })
        .collect())
}

async fn expand_detail(
    db: &DatabaseConnection,
    s: service_record::Model,
) -> Result<ServiceDetail, ServiceError> {
    let customer = customer::Entity::find_by_id(s.customer_id).one(db).await?;
    let created_by_name = user::Entity::find_by_id(s.created_by)
        .one(db)
        .await?
        .map(|u| u.name);
    Ok(ServiceDetail { service: s, customer, created_by_name })
}

/// List services ordered by service date descending.
pub async fn list_services(
    db: &DatabaseConnection,
    page: Pagination,
    filters: ServiceFilters,
) -> Result<ServicePage, ServiceError> {
    filters.validate()?;
    let mut query = service_record::Entity::find();
    if let Some(t) = &filters.service_type {
        query = query.filter(service_record::Column::ServiceType.eq(t.as_str()));
    }
    if let Some(s) = &filters.status {
        query = query.filter(service_record::Column::Status.eq(s.as_str()));
    }
    if let Some(from) = filters.date_from {
        query = query.filter(service_record::Column::ServiceDate.gte(from));
    }
    if let Some(to) = filters.date_to {
        query = query.filter(service_record::Column::ServiceDate.lte(to));
    }

    let (page_idx, per_page) = page.normalize();
    let paginator = query
        .order_by_desc(service_record::Column::ServiceDate)
        .paginate(db, per_page);
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(page_idx).await?;
    let services = expand_list(db, rows).await?;
    Ok(ServicePage {
        services,
        pagination: PageInfo::new(page.current(), total, per_page),
    })
}

pub async fn get_service(db: &DatabaseConnection, id: Uuid) -> Result<ServiceDetail, ServiceError> {
    let s = service_record::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("service"))?;
    expand_detail(db, s).await
}

/// Resolve a customer for a new service: reuse an existing record matched by
/// phone or plate, otherwise insert one. A lost insert race surfaces as a
/// unique violation; the winner is then looked up and reused.
pub(crate) async fn find_or_create_customer(
    db: &DatabaseConnection,
    data: &CustomerInput,
) -> Result<customer::Model, ServiceError> {
    if let Some(existing) =
        customer::find_by_phone_or_plate(db, &data.phone, &data.vehicle_plate).await?
    {
        return Ok(existing);
    }
    match customer::create(db, data).await {
        Ok(created) => Ok(created),
        Err(ModelError::Conflict(_)) => {
            tracing::debug!(phone = %data.phone, "customer insert lost race, reusing winner");
            customer::find_by_phone_or_plate(db, &data.phone, &data.vehicle_plate)
                .await?
                .ok_or_else(|| ServiceError::Db("customer conflict without a matching record".into()))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn create_service(
    db: &DatabaseConnection,
    input: CreateServiceInput,
    created_by: Uuid,
) -> Result<ServiceDetail, ServiceError> {
    let mut errs = ValidationErrors::new();
    errs.check("serviceType", service_record::validate_service_type(&input.service_type));
    errs.check("price", service_record::validate_price(input.price));
    if let Some(n) = &input.notes {
        errs.check("notes", service_record::validate_notes(n));
    }
    let service_date = match parse_date_time(&input.service_date) {
        Ok(dt) => Some(dt),
        Err(msg) => {
            errs.push("serviceDate", msg);
            None
        }
    };
    if input.customer_id.is_none() {
        match &input.customer_data {
            None => errs.push("customerId", "customer id or customer data required"),
            Some(data) => {
                if let Err(ModelError::Validation(v)) = data.validate() {
                    for fe in v.0 {
                        errs.push(&format!("customerData.{}", fe.field), fe.message);
                    }
                }
            }
        }
    }
    errs.into_result().map_err(ServiceError::from)?;
    let service_date = service_date.unwrap_or_else(Utc::now);

    let customer_id = match input.customer_id {
        Some(id) => id,
        // Validated above, so customer_data is present here.
        None => match &input.customer_data {
            Some(data) => find_or_create_customer(db, data).await?.id,
            None => return Err(ServiceError::invalid("customerId", "customer id or customer data required")),
        },
    };

    let created = service_record::create(
        db,
        customer_id,
        &input.service_type,
        input.price,
        service_date,
        input.notes,
        created_by,
    )
    .await?;
    tracing::info!(
        service_id = %created.id,
        customer_id = %customer_id,
        service_type = %created.service_type,
        "service_created"
    );
    expand_detail(db, created).await
}

/// Apply a partial update. Any status transition is permitted, including
/// moving a completed or cancelled record back to pending.
pub async fn update_service(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateServiceInput,
) -> Result<ServiceDetail, ServiceError> {
    let mut errs = ValidationErrors::new();
    if let Some(t) = &input.service_type {
        errs.check("serviceType", service_record::validate_service_type(t));
    }
    if let Some(p) = input.price {
        errs.check("price", service_record::validate_price(p));
    }
    if let Some(s) = &input.status {
        errs.check("status", service_record::validate_status(s));
    }
    if let Some(n) = &input.notes {
        errs.check("notes", service_record::validate_notes(n));
    }
    let service_date = match &input.service_date {
        None => None,
        Some(raw) => match parse_date_time(raw) {
            Ok(dt) => Some(dt),
            Err(msg) => {
                errs.push("serviceDate", msg);
                None
            }
        },
    };
    errs.into_result().map_err(ServiceError::from)?;

    let mut am: service_record::ActiveModel = service_record::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("service"))?
        .into();
    if let Some(t) = input.service_type {
        am.service_type = Set(t);
    }
    if let Some(p) = input.price {
        am.price = Set(p);
    }
    if let Some(dt) = service_date {
        am.service_date = Set(dt.into());
    }
    if let Some(s) = input.status {
        am.status = Set(s);
    }
    if let Some(n) = input.notes {
        am.notes = Set(Some(n));
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;
    expand_detail(db, updated).await
}

pub async fn delete_service(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = service_record::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("service"));
    }
    tracing::info!(service_id = %id, "service_deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create_input() -> CreateServiceInput {
        CreateServiceInput {
            customer_id: Some(Uuid::new_v4()),
            customer_data: None,
            service_type: "basic-wash".into(),
            price: 50.0,
            service_date: "2024-03-01".into(),
            notes: None,
        }
    }

    #[test]
    fn filters_reject_unknown_enum_values() {
        let bad = ServiceFilters {
            service_type: Some("dry-clean".into()),
            status: Some("done".into()),
            ..Default::default()
        };
        match bad.validate() {
            Err(ServiceError::Validation(v)) => {
                let fields: Vec<&str> = v.0.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, ["serviceType", "status"]);
            }
            other => panic!("expected validation error, got {:?}", other.err()),
        }
    }

    #[test]
    fn filters_accept_known_values() {
        let ok = ServiceFilters {
            service_type: Some("waxing".into()),
            status: Some("completed".into()),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn create_input_deserializes_camel_case() {
        let input: CreateServiceInput = serde_json::from_value(serde_json::json!({
            "customerData": {
                "name": "Alice",
                "phone": "+6281234567",
                "address": "Jl. Sudirman 10",
                "vehicleNumber": "B1234XYZ",
                "vehiclePlate": "B 1234 XYZ"
            },
            "serviceType": "deep-clean",
            "price": 150.0,
            "serviceDate": "2024-03-01T09:00:00Z"
        }))
        .unwrap();
        assert!(input.customer_id.is_none());
        assert_eq!(input.customer_data.unwrap().name, "Alice");
    }

    #[test]
    fn create_requires_customer_reference_or_data() {
        let mut input = valid_create_input();
        input.customer_id = None;
        // Re-run just the synchronous validation block.
        let mut errs = ValidationErrors::new();
        if input.customer_id.is_none() && input.customer_data.is_none() {
            errs.push("customerId", "customer id or customer data required");
        }
        assert!(errs.into_result().is_err());
    }
}
