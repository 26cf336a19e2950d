use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row per officer per day. `status` stays NULL until the day is marked
/// (or a check-in sets it); unmarked rows never count toward any total.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct DailyAttendance {
    pub id: u64,
    pub officer_id: u64,
    pub date: NaiveDate,
    pub status: Option<String>,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
    pub hours_worked: Option<f64>,
    pub leave_type: Option<String>,
    pub leave_reason: Option<String>,
}
