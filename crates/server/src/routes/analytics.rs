use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;

use models::errors::ValidationErrors;
use service::analytics_service::{self, DashboardSummary, MonthlyBreakdown, TypeBreakdown};
use service::dates::parse_date_time;

use crate::errors::ApiError;
use crate::routes::auth::ServerState;

#[utoipa::path(get, path = "/api/analytics/dashboard", tag = "analytics", responses((status = 200, description = "Today/month totals and recent services")))]
pub async fn dashboard(State(state): State<ServerState>) -> Result<Json<DashboardSummary>, ApiError> {
    let summary = analytics_service::dashboard_summary(&state.db).await?;
    Ok(Json(summary))
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct MonthlyQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

#[utoipa::path(get, path = "/api/analytics/monthly", tag = "analytics", params(MonthlyQuery), responses((status = 200, description = "Daily income and per-type breakdown"), (status = 400, description = "Invalid month")))]
pub async fn monthly(
    State(state): State<ServerState>,
    Query(q): Query<MonthlyQuery>,
) -> Result<Json<MonthlyBreakdown>, ApiError> {
    // Defaults to the current UTC month.
    let now = Utc::now();
    let month = q.month.unwrap_or(now.month());
    let year = q.year.unwrap_or(now.year());
    let breakdown = analytics_service::monthly_breakdown(&state.db, month, year).await?;
    Ok(Json(breakdown))
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct RangeQuery {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

#[utoipa::path(get, path = "/api/analytics/service-types", tag = "analytics", params(RangeQuery), responses((status = 200, description = "Per-type breakdown, highest revenue first"), (status = 400, description = "Invalid date")))]
pub async fn service_types(
    State(state): State<ServerState>,
    Query(q): Query<RangeQuery>,
) -> Result<Json<Vec<TypeBreakdown>>, ApiError> {
    let mut errs = ValidationErrors::new();
    let date_from = match q.date_from.as_deref() {
        None => None,
        Some(raw) => match parse_date_time(raw) {
            Ok(dt) => Some(dt),
            Err(msg) => {
                errs.push("dateFrom", msg);
                None
            }
        },
    };
    let date_to = match q.date_to.as_deref() {
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
    let breakdown = analytics_service::service_type_breakdown(&state.db, date_from, date_to).await?;
    Ok(Json(breakdown))
}
