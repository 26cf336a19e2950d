use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Workflow states for a monthly payroll record. Computation always lands a
/// record in `draft`; the transitions to `pending` and `approved` belong to
/// the approval endpoints, never to the compute path.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PayrollStatus {
    Draft,
    Pending,
    Approved,
}

/// One officer's computed pay for one month, keyed `(officer_id, month)`.
/// Recomputing upserts the row in place, so retries never duplicate it.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PayrollRecord {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1001)]
    pub officer_id: u64,

    /// First day of the payroll month.
    #[schema(example = "2024-06-01", value_type = String, format = "date")]
    pub month: NaiveDate,

    #[schema(example = 21)]
    pub working_days: u32,

    #[schema(example = 20)]
    pub present_days: u32,

    #[schema(example = 147.0)]
    pub total_hours_worked: f64,

    #[schema(example = 46000.0)]
    pub salary_monthly: f64,

    #[schema(example = 43809.52)]
    pub base_pay: f64,

    #[schema(example = 0.0)]
    pub overtime_pay: f64,

    #[schema(example = 43809.52)]
    pub calculated_pay: f64,

    #[schema(example = 2000.0)]
    pub deductions: f64,

    #[schema(example = 0.0)]
    pub tds: f64,

    #[schema(example = 41809.52)]
    pub net_pay: f64,

    #[schema(example = "draft")]
    pub status: String,

    #[schema(example = 1, nullable = true)]
    pub approved_by: Option<u64>,

    #[schema(example = "2024-07-05T10:00:00Z", value_type = String, format = "date-time", nullable = true)]
    pub approved_date: Option<DateTime<Utc>>,
}
