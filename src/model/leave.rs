use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A leave application. `paid_days`/`lop_days` are fixed at apply time; only
/// rows that reach `approved` count toward balance usage.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct LeaveApplication {
    pub id: u64,
    pub officer_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub leave_type: String,
    pub status: String,
    pub paid_days: f64,
    pub lop_days: f64,
    pub reason: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}
