use crate::auth::auth::AuthUser;
use crate::calc::attendance::{AttendanceStatus, DayRecord, MonthlySummary, aggregate_month};
use crate::calc::calendar::month_bounds;
use crate::model::attendance::DailyAttendance;
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-in",
    responses(
        (status = 200, description = "Checked in successfully", body = Object, example = json!({
            "message": "Checked in successfully"
        })),
        (status = 400, description = "Already checked in today", body = Object, example = json!({
            "message": "Already checked in today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let officer_id: u64 = auth
        .officer_id
        .ok_or_else(|| actix_web::error::ErrorForbidden("No officer profile"))?;

    let result = sqlx::query(
        r#"
        INSERT INTO daily_attendance (officer_id, date, status, check_in)
        VALUES (?, CURDATE(), 'present', CURTIME())
        "#,
    )
    .bind(officer_id)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Checked in successfully"
        }))),

        Err(e) => {
            // Duplicate check-in for same day
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                        "message": "Already checked in today"
                    })));
                }
            }

            tracing::error!(error = %e, officer_id, "Check-in failed");
            Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ))
        }
    }
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-out",
    responses(
        (status = 200, description = "Checked out successfully", body = Object, example = json!({
            "message": "Checked out successfully"
        })),
        (status = 400, description = "No active check-in found for today", body = Object, example = json!({
            "message": "No active check-in found for today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let officer_id: u64 = auth
        .officer_id
        .ok_or_else(|| actix_web::error::ErrorForbidden("No officer profile"))?;

    // hours_worked lands with the check-out so the aggregator never has to
    // look at the clock times again
    let result = sqlx::query(
        r#"
        UPDATE daily_attendance
        SET check_out = CURTIME(),
            hours_worked = TIMESTAMPDIFF(MINUTE, check_in, CURTIME()) / 60.0
        WHERE officer_id = ?
        AND date = CURDATE()
        AND check_out IS NULL
        "#,
    )
    .bind(officer_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, officer_id, "Check-out failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "No active check-in found for today"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Checked out successfully"
    })))
}

#[derive(Deserialize, ToSchema)]
pub struct MarkDay {
    #[schema(example = 1001)]
    pub officer_id: u64,

    #[schema(example = "2024-06-17", format = "date", value_type = String)]
    pub date: NaiveDate,

    #[schema(example = "leave")]
    pub status: AttendanceStatus,

    #[schema(example = 7.0, nullable = true)]
    pub hours_worked: Option<f64>,

    #[schema(example = "annual", nullable = true)]
    pub leave_type: Option<String>,

    #[schema(example = "Family function", nullable = true)]
    pub leave_reason: Option<String>,
}

/// Mark or correct one officer's day (HR/Admin)
#[utoipa::path(
    post,
    path = "/api/v1/attendance/mark",
    request_body = MarkDay,
    responses(
        (status = 200, description = "Day marked", body = Object, example = json!({
            "message": "Attendance marked"
        })),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn mark_day(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<MarkDay>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    if let Some(hours) = payload.hours_worked {
        if hours < 0.0 {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": "hours_worked must not be negative"
            })));
        }
    }

    sqlx::query(
        r#"
        INSERT INTO daily_attendance
            (officer_id, date, status, hours_worked, leave_type, leave_reason)
        VALUES (?, ?, ?, ?, ?, ?)
        ON DUPLICATE KEY UPDATE
            status = VALUES(status),
            hours_worked = VALUES(hours_worked),
            leave_type = VALUES(leave_type),
            leave_reason = VALUES(leave_reason)
        "#,
    )
    .bind(payload.officer_id)
    .bind(payload.date)
    .bind(payload.status.to_string())
    .bind(payload.hours_worked)
    .bind(&payload.leave_type)
    .bind(&payload.leave_reason)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, officer_id = payload.officer_id, "Failed to mark attendance");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Attendance marked"
    })))
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct SummaryQuery {
    #[schema(example = 1001)]
    pub officer_id: u64,
    #[schema(example = 2024)]
    pub year: i32,
    #[schema(example = 6)]
    pub month: u32,
}

/// Monthly attendance summary
///
/// Folds the month's daily rows into present/absent/leave counts and total
/// worked hours. Unmarked days are excluded, never counted as absent.
#[utoipa::path(
    get,
    path = "/api/v1/attendance/summary",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Monthly aggregate", body = MonthlySummary),
        (status = 400, description = "Invalid month"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn monthly_summary(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<SummaryQuery>,
) -> actix_web::Result<impl Responder> {
    // officers may read their own summary; HR/Admin anyone's
    if auth.is_officer() && auth.officer_id != Some(query.officer_id) {
        return Err(actix_web::error::ErrorForbidden("Own summary only"));
    }

    let summary =
        fetch_monthly_summary(pool.get_ref(), query.officer_id, query.year, query.month).await?;

    Ok(HttpResponse::Ok().json(summary))
}

/// Fetches and folds one officer-month. Shared with payroll computation.
pub async fn fetch_monthly_summary(
    pool: &MySqlPool,
    officer_id: u64,
    year: i32,
    month: u32,
) -> actix_web::Result<MonthlySummary> {
    let (first, last) =
        month_bounds(year, month).map_err(actix_web::error::ErrorBadRequest)?;

    let rows = sqlx::query_as::<_, DailyAttendance>(
        r#"
        SELECT *
        FROM daily_attendance
        WHERE officer_id = ?
        AND date BETWEEN ? AND ?
        ORDER BY date
        "#,
    )
    .bind(officer_id)
    .bind(first)
    .bind(last)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, officer_id, "Failed to fetch attendance rows");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let records: Vec<DayRecord> = rows
        .iter()
        .map(|row| DayRecord {
            date: row.date,
            // unknown strings fold the same way as unmarked rows
            status: row
                .status
                .as_deref()
                .and_then(|s| s.parse::<AttendanceStatus>().ok()),
            check_in: row.check_in,
            check_out: row.check_out,
            hours_worked: row.hours_worked,
        })
        .collect();

    Ok(aggregate_month(&records))
}
