use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One classified date, keyed `(calendar_type, institution_id, date)`.
/// `institution_id` is NULL for company-wide entries; institution entries
/// shadow company ones only when the caller queries both scopes and merges.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct CalendarDayEntry {
    pub id: u64,
    pub calendar_type: String,
    pub institution_id: Option<u64>,
    pub date: NaiveDate,
    pub day_type: String,
    pub description: Option<String>,
}
