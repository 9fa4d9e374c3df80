//! Grouped sums over service records: dashboard windows, per-day income,
//! and per-type revenue. Cancelled records never count.
//!
//! The folds are pure functions over fetched rows so they can be tested
//! without a database; the async wrappers only build the row queries.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::Serialize;

use models::service_record::{self, STATUS_CANCELLED};

use crate::dates::{day_window, month_window};
use crate::errors::ServiceError;
use crate::service_record_service::{expand_list, ServiceListItem};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PeriodStats {
    pub count: u64,
    pub income: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub today: PeriodStats,
    pub month: PeriodStats,
    pub recent_services: Vec<ServiceListItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyIncome {
    pub date: String,
    pub income: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeBreakdown {
    #[serde(rename = "type")]
    pub service_type: String,
    pub count: u64,
    pub revenue: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBreakdown {
    pub daily_income: Vec<DailyIncome>,
    pub service_type_breakdown: Vec<TypeBreakdown>,
}

fn qualifying(rows: &[service_record::Model]) -> impl Iterator<Item = &service_record::Model> {
    rows.iter().filter(|s| s.status != STATUS_CANCELLED)
}

fn period_stats(rows: &[service_record::Model]) -> PeriodStats {
    let mut stats = PeriodStats { count: 0, income: 0.0 };
    for s in qualifying(rows) {
        stats.count += 1;
        stats.income += s.price;
    }
    stats
}

/// Per-day income for the given rows, ascending by date. Days without a
/// qualifying service are omitted, not zero-filled.
fn daily_income(rows: &[service_record::Model]) -> Vec<DailyIncome> {
    let mut days: BTreeMap<NaiveDate, (f64, u64)> = BTreeMap::new();
    for s in qualifying(rows) {
        let day = s.service_date.with_timezone(&Utc).date_naive();
        let entry = days.entry(day).or_insert((0.0, 0));
        entry.0 += s.price;
        entry.1 += 1;
    }
    days.into_iter()
        .map(|(date, (income, count))| DailyIncome {
            date: date.format("%Y-%m-%d").to_string(),
            income,
            count,
        })
        .collect()
}

/// Per-type count and revenue, in grouping (lexical) order.
fn type_breakdown(rows: &[service_record::Model]) -> Vec<TypeBreakdown> {
    let mut types: BTreeMap<&str, (u64, f64)> = BTreeMap::new();
    for s in qualifying(rows) {
        let entry = types.entry(s.service_type.as_str()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += s.price;
    }
    types
        .into_iter()
        .map(|(t, (count, revenue))| TypeBreakdown {
            service_type: t.to_string(),
            count,
            revenue,
        })
        .collect()
}

fn type_breakdown_by_revenue(rows: &[service_record::Model]) -> Vec<TypeBreakdown> {
    let mut breakdown = type_breakdown(rows);
    breakdown.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    breakdown
}

/// Non-cancelled services with `service_date` in `[from, to)`.
async fn qualifying_in_window(
    db: &DatabaseConnection,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<service_record::Model>, ServiceError> {
    Ok(service_record::Entity::find()
        .filter(service_record::Column::Status.ne(STATUS_CANCELLED))
        .filter(service_record::Column::ServiceDate.gte(from))
        .filter(service_record::Column::ServiceDate.lt(to))
        .all(db)
        .await?)
}

/// Non-cancelled services in an inclusive, optionally unbounded range.
async fn qualifying_in_range(
    db: &DatabaseConnection,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Result<Vec<service_record::Model>, ServiceError> {
    let mut query = service_record::Entity::find()
        .filter(service_record::Column::Status.ne(STATUS_CANCELLED));
    if let Some(from) = from {
        query = query.filter(service_record::Column::ServiceDate.gte(from));
    }
    if let Some(to) = to {
        query = query.filter(service_record::Column::ServiceDate.lte(to));
    }
    Ok(query.all(db).await?)
}

/// Today and current-month totals plus the five most recently created
/// services.
pub async fn dashboard_summary(db: &DatabaseConnection) -> Result<DashboardSummary, ServiceError> {
    let now = Utc::now();
    let (day_start, day_end) = day_window(now);
    let (month_start, month_end) = month_window(now.year(), now.month())
        .ok_or_else(|| ServiceError::Db("failed to compute current month window".into()))?;

    let today_rows = qualifying_in_window(db, day_start, day_end).await?;
    let month_rows = qualifying_in_window(db, month_start, month_end).await?;
    // Recency feed, not an aggregate: cancelled records stay visible here.
    let recent_rows = service_record::Entity::find()
        .order_by_desc(service_record::Column::CreatedAt)
        .limit(5)
        .all(db)
        .await?;
    let recent_services = expand_list(db, recent_rows).await?;

    Ok(DashboardSummary {
        today: period_stats(&today_rows),
        month: period_stats(&month_rows),
        recent_services,
    })
}

pub async fn monthly_breakdown(
    db: &DatabaseConnection,
    month: u32,
    year: i32,
) -> Result<MonthlyBreakdown, ServiceError> {
    let (start, end) = month_window(year, month)
        .ok_or_else(|| ServiceError::invalid("month", "invalid month or year"))?;
    let rows = qualifying_in_window(db, start, end).await?;
    Ok(MonthlyBreakdown {
        daily_income: daily_income(&rows),
        service_type_breakdown: type_breakdown(&rows),
    })
}

/// Per-type breakdown over an arbitrary inclusive range, highest revenue
/// first.
pub async fn service_type_breakdown(
    db: &DatabaseConnection,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Result<Vec<TypeBreakdown>, ServiceError> {
    let rows = qualifying_in_range(db, from, to).await?;
    Ok(type_breakdown_by_revenue(&rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::parse_date_time;
    use uuid::Uuid;

    fn svc(service_type: &str, price: f64, date: &str, status: &str) -> service_record::Model {
        let dt = parse_date_time(date).unwrap();
        service_record::Model {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            service_type: service_type.into(),
            price,
            service_date: dt.into(),
            status: status.into(),
            notes: None,
            created_by: Uuid::new_v4(),
            created_at: dt.into(),
            updated_at: dt.into(),
        }
    }

    #[test]
    fn period_stats_sums_count_and_income() {
        let rows = vec![
            svc("basic-wash", 100.0, "2024-03-01", "completed"),
            svc("waxing", 50.5, "2024-03-01", "pending"),
        ];
        let stats = period_stats(&rows);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.income, 150.5);
    }

    #[test]
    fn daily_income_groups_by_utc_day_ascending() {
        let rows = vec![
            svc("basic-wash", 100.0, "2024-03-02T08:00:00Z", "completed"),
            svc("waxing", 40.0, "2024-03-01T23:59:00Z", "completed"),
            svc("deep-clean", 60.0, "2024-03-02T17:00:00Z", "pending"),
        ];
        let daily = daily_income(&rows);
        assert_eq!(
            daily,
            vec![
                DailyIncome { date: "2024-03-01".into(), income: 40.0, count: 1 },
                DailyIncome { date: "2024-03-02".into(), income: 160.0, count: 2 },
            ]
        );
    }

    #[test]
    fn daily_income_buckets_by_utc_not_local_offset() {
        // 01:00+07:00 is still the previous UTC day.
        let rows = vec![svc("basic-wash", 10.0, "2024-03-02T01:00:00+07:00", "pending")];
        let daily = daily_income(&rows);
        assert_eq!(daily[0].date, "2024-03-01");
    }

    #[test]
    fn daily_income_omits_empty_days() {
        let rows = vec![
            svc("basic-wash", 10.0, "2024-03-01", "pending"),
            svc("basic-wash", 10.0, "2024-03-05", "pending"),
        ];
        assert_eq!(daily_income(&rows).len(), 2);
    }

    #[test]
    fn cancelled_services_never_count() {
        let rows = vec![
            svc("basic-wash", 100.0, "2024-03-01", "completed"),
            svc("basic-wash", 50.0, "2024-03-01", "cancelled"),
        ];
        let stats = period_stats(&rows);
        assert_eq!(stats.count, 1);
        assert_eq!(stats.income, 100.0);
        assert_eq!(
            daily_income(&rows),
            vec![DailyIncome { date: "2024-03-01".into(), income: 100.0, count: 1 }]
        );
        assert_eq!(type_breakdown(&rows)[0].count, 1);
    }

    #[test]
    fn type_breakdown_groups_count_and_revenue() {
        let rows = vec![
            svc("basic-wash", 100.0, "2024-03-01", "completed"),
            svc("basic-wash", 50.0, "2024-03-02", "pending"),
            svc("full-service", 300.0, "2024-03-03", "completed"),
        ];
        let breakdown = type_breakdown(&rows);
        assert_eq!(
            breakdown,
            vec![
                TypeBreakdown { service_type: "basic-wash".into(), count: 2, revenue: 150.0 },
                TypeBreakdown { service_type: "full-service".into(), count: 1, revenue: 300.0 },
            ]
        );
    }

    #[test]
    fn revenue_sort_is_descending() {
        let rows = vec![
            svc("basic-wash", 10.0, "2024-03-01", "pending"),
            svc("full-service", 300.0, "2024-03-01", "pending"),
            svc("waxing", 100.0, "2024-03-01", "pending"),
        ];
        let breakdown = type_breakdown_by_revenue(&rows);
        let types: Vec<&str> = breakdown.iter().map(|b| b.service_type.as_str()).collect();
        assert_eq!(types, ["full-service", "waxing", "basic-wash"]);
    }

    #[test]
    fn type_field_serializes_as_type() {
        let b = TypeBreakdown { service_type: "waxing".into(), count: 1, revenue: 5.0 };
        let json = serde_json::to_value(&b).unwrap();
        assert_eq!(json["type"], "waxing");
    }
}
