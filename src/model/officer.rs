use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "staff_code": "STF-001",
        "first_name": "Asha",
        "last_name": "Nair",
        "email": "asha.nair@campus.edu",
        "phone": "+919812345678",
        "institution_id": 10,
        "designation": "Mathematics Teacher",
        "join_date": "2024-06-15",
        "salary_monthly": 46000.0,
        "hourly_rate": 300.0,
        "overtime_rate_multiplier": 1.5,
        "normal_working_hours": 7.0,
        "status": "active"
    })
)]
pub struct Officer {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "STF-001")]
    pub staff_code: String,

    #[schema(example = "Asha")]
    pub first_name: String,

    #[schema(example = "Nair")]
    pub last_name: String,

    #[schema(example = "asha.nair@campus.edu")]
    pub email: String,

    #[schema(example = "+919812345678", nullable = true)]
    pub phone: Option<String>,

    #[schema(example = 10)]
    pub institution_id: u64,

    #[schema(example = "Mathematics Teacher")]
    pub designation: String,

    /// Absent for legacy imports; leave entitlement then defaults to a full
    /// year.
    #[schema(example = "2024-06-15", value_type = String, format = "date", nullable = true)]
    pub join_date: Option<NaiveDate>,

    #[schema(example = 46000.0)]
    pub salary_monthly: f64,

    #[schema(example = 300.0)]
    pub hourly_rate: f64,

    #[schema(example = 1.5)]
    pub overtime_rate_multiplier: f64,

    /// Daily working hours; payroll falls back to the configured default
    /// when absent.
    #[schema(example = 7.0, nullable = true)]
    pub normal_working_hours: Option<f64>,

    #[schema(example = "active")]
    pub status: String,
}
