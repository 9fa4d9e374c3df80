//! Request-body schemas for the Swagger docs. These mirror the service
//! layer's input types but stay independent of them so the docs do not leak
//! internal fields.

use serde::Deserialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequest {
    pub name: String,
    pub phone: String,
    pub address: String,
    #[schema(example = "B1234XYZ")]
    pub vehicle_number: String,
    #[schema(example = "B 1234 XYZ")]
    pub vehicle_plate: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdateRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub vehicle_number: Option<String>,
    pub vehicle_plate: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    pub customer_id: Option<String>,
    pub customer_data: Option<CustomerRequest>,
    #[schema(example = "basic-wash")]
    pub service_type: String,
    pub price: f64,
    #[schema(example = "2024-03-01T09:00:00Z")]
    pub service_date: String,
    pub notes: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceUpdateRequest {
    pub service_type: Option<String>,
    pub price: Option<f64>,
    pub service_date: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::me,
        crate::routes::customers::list,
        crate::routes::customers::get,
        crate::routes::customers::create,
        crate::routes::customers::update,
        crate::routes::customers::delete,
        crate::routes::services::list,
        crate::routes::services::get,
        crate::routes::services::create,
        crate::routes::services::update,
        crate::routes::services::delete,
        crate::routes::analytics::dashboard,
        crate::routes::analytics::monthly,
        crate::routes::analytics::service_types,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            CustomerRequest,
            CustomerUpdateRequest,
            ServiceRequest,
            ServiceUpdateRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "customers"),
        (name = "services"),
        (name = "analytics"),
    )
)]
pub struct ApiDoc;
