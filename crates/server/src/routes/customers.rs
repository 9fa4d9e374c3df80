use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use models::customer::CustomerInput;
use service::customer_service::{self, CustomerPage, CustomerUpdate};
use service::pagination::Pagination;

use crate::errors::ApiError;
use crate::routes::auth::ServerState;
use crate::routes::parse_id;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
}

impl ListQuery {
    fn pagination(&self) -> Pagination {
        let default = Pagination::default();
        Pagination {
            page: self.page.unwrap_or(default.page),
            per_page: self.limit.unwrap_or(default.per_page),
        }
    }
}

#[utoipa::path(get, path = "/api/customers", tag = "customers", params(ListQuery), responses((status = 200, description = "Page of customers"), (status = 400, description = "Validation Error")))]
pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<CustomerPage>, ApiError> {
    if q.search.as_deref().is_some_and(|s| s.chars().count() > 100) {
        return Err(ApiError::bad_request("search term too long"));
    }
    let page = customer_service::list_customers(&state.db, q.pagination(), q.search.as_deref()).await?;
    Ok(Json(page))
}

#[utoipa::path(get, path = "/api/customers/{id}", tag = "customers", params(("id" = String, Path, description = "Customer ID")), responses((status = 200, description = "Customer"), (status = 400, description = "Invalid ID"), (status = 404, description = "Not Found")))]
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<models::customer::Model>, ApiError> {
    let id = parse_id(&id, "customer")?;
    let found = customer_service::get_customer(&state.db, id).await?;
    Ok(Json(found))
}

#[utoipa::path(post, path = "/api/customers", tag = "customers", request_body = crate::openapi::CustomerRequest, responses((status = 201, description = "Created"), (status = 400, description = "Validation Error"), (status = 409, description = "Duplicate phone or plate")))]
pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<CustomerInput>,
) -> Result<(StatusCode, Json<models::customer::Model>), ApiError> {
    let created = customer_service::create_customer(&state.db, &input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(put, path = "/api/customers/{id}", tag = "customers", params(("id" = String, Path, description = "Customer ID")), request_body = crate::openapi::CustomerUpdateRequest, responses((status = 200, description = "Updated"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found"), (status = 409, description = "Duplicate phone or plate")))]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(input): Json<CustomerUpdate>,
) -> Result<Json<models::customer::Model>, ApiError> {
    let id = parse_id(&id, "customer")?;
    let updated = customer_service::update_customer(&state.db, id, input).await?;
    Ok(Json(updated))
}

#[utoipa::path(delete, path = "/api/customers/{id}", tag = "customers", params(("id" = String, Path, description = "Customer ID")), responses((status = 200, description = "Deleted"), (status = 400, description = "Invalid ID"), (status = 404, description = "Not Found")))]
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_id(&id, "customer")?;
    customer_service::delete_customer(&state.db, id).await?;
    Ok(Json(serde_json::json!({ "message": "customer deleted successfully" })))
}
