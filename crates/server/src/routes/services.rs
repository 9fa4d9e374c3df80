use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use models::errors::ValidationErrors;
use service::auth::AuthUser;
use service::dates::parse_date_time;
use service::pagination::Pagination;
use service::service_record_service::{
    self, CreateServiceInput, ServiceDetail, ServiceFilters, ServicePage, UpdateServiceInput,
};

use crate::errors::ApiError;
use crate::routes::auth::ServerState;
use crate::routes::parse_id;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub service_type: Option<String>,
    pub status: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

impl ListQuery {
    fn pagination(&self) -> Pagination {
        let default = Pagination::default();
        Pagination {
            page: self.page.unwrap_or(default.page),
            per_page: self.limit.unwrap_or(default.per_page),
        }
    }

    /// Parse the date bounds; enum filter values are validated by the
    /// service layer.
    fn filters(&self) -> Result<ServiceFilters, ApiError> {
        let mut errs = ValidationErrors::new();
        let date_from = match self.date_from.as_deref() {
            None => None,
            Some(raw) => match parse_date_time(raw) {
                Ok(dt) => Some(dt),
                Err(msg) => {
                    errs.push("dateFrom", msg);
                    None
                }
            },
        };
        let date_to = match self.date_to.as_deref() {
            None => None,
            Some(raw) => match parse_date_time(raw) {
                Ok(dt) => Some(dt),
                Err(msg) => {
                    errs.push("dateTo", msg);
                    None
                }
            },
        };
        if !errs.is_empty() {
            return Err(ApiError::validation(errs));
        }
        Ok(ServiceFilters {
            service_type: self.service_type.clone(),
            status: self.status.clone(),
            date_from,
            date_to,
        })
    }
}

#[utoipa::path(get, path = "/api/services", tag = "services", params(ListQuery), responses((status = 200, description = "Page of services"), (status = 400, description = "Validation Error")))]
pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<ServicePage>, ApiError> {
    let filters = q.filters()?;
    let page = service_record_service::list_services(&state.db, q.pagination(), filters).await?;
    Ok(Json(page))
}

#[utoipa::path(get, path = "/api/services/{id}", tag = "services", params(("id" = String, Path, description = "Service ID")), responses((status = 200, description = "Service"), (status = 400, description = "Invalid ID"), (status = 404, description = "Not Found")))]
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ServiceDetail>, ApiError> {
    let id = parse_id(&id, "service")?;
    let found = service_record_service::get_service(&state.db, id).await?;
    Ok(Json(found))
}

#[utoipa::path(post, path = "/api/services", tag = "services", request_body = crate::openapi::ServiceRequest, responses((status = 201, description = "Created"), (status = 400, description = "Validation Error")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<CreateServiceInput>,
) -> Result<(StatusCode, Json<ServiceDetail>), ApiError> {
    let created = service_record_service::create_service(&state.db, input, user.id).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(put, path = "/api/services/{id}", tag = "services", params(("id" = String, Path, description = "Service ID")), request_body = crate::openapi::ServiceUpdateRequest, responses((status = 200, description = "Updated"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateServiceInput>,
) -> Result<Json<ServiceDetail>, ApiError> {
    let id = parse_id(&id, "service")?;
    let updated = service_record_service::update_service(&state.db, id, input).await?;
    Ok(Json(updated))
}

#[utoipa::path(delete, path = "/api/services/{id}", tag = "services", params(("id" = String, Path, description = "Service ID")), responses((status = 200, description = "Deleted"), (status = 400, description = "Invalid ID"), (status = 404, description = "Not Found")))]
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_id(&id, "service")?;
    service_record_service::delete_service(&state.db, id).await?;
    Ok(Json(serde_json::json!({ "message": "service deleted successfully" })))
}
