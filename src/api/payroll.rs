use actix_web::{HttpResponse, Responder, web};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::api::attendance::fetch_monthly_summary;
use crate::api::calendar::resolve_working_days;
use crate::auth::auth::AuthUser;
use crate::calc::CalcError;
use crate::calc::payroll::{PayInputs, compute_pay};
use crate::config::Config;
use crate::model::officer::Officer;
use crate::model::payroll::{PayrollRecord, PayrollStatus};

#[derive(Deserialize, ToSchema)]
pub struct ComputePayroll {
    #[schema(example = 1001)]
    pub officer_id: u64,

    /// Any date inside the payroll month; stored normalized to its first day
    #[schema(example = "2024-06-01", value_type = String, format = "date")]
    pub month: NaiveDate,

    #[schema(example = 2000.0)]
    pub deductions: f64,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct PayrollQuery {
    #[schema(example = 1)]
    pub page: Option<u32>,

    #[schema(example = 10)]
    pub per_page: Option<u32>,

    #[schema(example = 1001)]
    pub officer_id: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedPayrollResponse {
    pub data: Vec<PayrollRecord>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
}

/// Compute payroll for one officer-month
///
/// Working days come from the company calendar with the officer's
/// institution calendar layered on top; attendance from the month's daily
/// rows. The result is upserted by `(officer_id, month)` in `draft` status,
/// so recomputing is safe. Approved months are left untouched.
#[utoipa::path(
    post,
    path = "/api/v1/payroll/compute",
    request_body = ComputePayroll,
    responses(
        (status = 200, description = "Payroll computed and saved as draft", body = PayrollRecord),
        (status = 400, description = "Invalid input"),
        (status = 401),
        (status = 403),
        (status = 404, description = "Officer not found"),
        (status = 409, description = "Month already approved")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn compute_payroll(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<ComputePayroll>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    if payload.deductions < 0.0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "deductions must not be negative"
        })));
    }

    let month_start = payload.month.with_day(1).unwrap_or(payload.month);
    let (year, month) = (month_start.year(), month_start.month());

    let officer = sqlx::query_as::<_, Officer>("SELECT * FROM officers WHERE id = ?")
        .bind(payload.officer_id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, officer_id = payload.officer_id, "Failed to fetch officer");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let officer = match officer {
        Some(o) => o,
        None => {
            return Ok(HttpResponse::NotFound().json(serde_json::json!({
                "message": "Officer not found"
            })));
        }
    };

    // a record already signed off must not be silently recomputed
    let existing_status = sqlx::query_scalar::<_, String>(
        "SELECT status FROM payroll_records WHERE officer_id = ? AND month = ?",
    )
    .bind(payload.officer_id)
    .bind(month_start)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to check payroll status");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if existing_status.and_then(|s| s.parse::<PayrollStatus>().ok())
        == Some(PayrollStatus::Approved)
    {
        return Ok(HttpResponse::Conflict().json(serde_json::json!({
            "message": "Payroll for this month is already approved"
        })));
    }

    let working = resolve_working_days(pool.get_ref(), officer.institution_id, year, month).await?;
    let attendance = fetch_monthly_summary(pool.get_ref(), officer.id, year, month).await?;

    let inputs = PayInputs {
        salary_monthly: officer.salary_monthly,
        hourly_rate: officer.hourly_rate,
        overtime_rate_multiplier: officer.overtime_rate_multiplier,
        normal_working_hours: officer.normal_working_hours,
        deductions: payload.deductions,
    };

    let breakdown = match compute_pay(
        &inputs,
        &attendance,
        working.len() as u32,
        &config.pay_policy(),
    ) {
        Ok(b) => b,
        Err(e @ CalcError::InvalidInput { .. }) | Err(e @ CalcError::MissingInput { .. }) => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": e.to_string()
            })));
        }
    };

    sqlx::query(
        r#"
        INSERT INTO payroll_records
            (officer_id, month, working_days, present_days, total_hours_worked,
             salary_monthly, base_pay, overtime_pay, calculated_pay, deductions, tds,
             net_pay, status)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON DUPLICATE KEY UPDATE
            working_days = VALUES(working_days),
            present_days = VALUES(present_days),
            total_hours_worked = VALUES(total_hours_worked),
            salary_monthly = VALUES(salary_monthly),
            base_pay = VALUES(base_pay),
            overtime_pay = VALUES(overtime_pay),
            calculated_pay = VALUES(calculated_pay),
            deductions = VALUES(deductions),
            tds = VALUES(tds),
            net_pay = VALUES(net_pay),
            status = VALUES(status)
        "#,
    )
    .bind(officer.id)
    .bind(month_start)
    .bind(working.len() as u32)
    .bind(attendance.present_days)
    .bind(attendance.total_hours_worked)
    .bind(officer.salary_monthly)
    .bind(breakdown.base_pay)
    .bind(breakdown.overtime_pay)
    .bind(breakdown.calculated_pay)
    .bind(breakdown.deductions)
    .bind(breakdown.tds)
    .bind(breakdown.net_pay)
    .bind(PayrollStatus::Draft.to_string())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, officer_id = officer.id, "Failed to upsert payroll record");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let saved = sqlx::query_as::<_, PayrollRecord>(
        "SELECT * FROM payroll_records WHERE officer_id = ? AND month = ?",
    )
    .bind(officer.id)
    .bind(month_start)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to read back payroll record");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(saved))
}

#[utoipa::path(
    get,
    path = "/api/v1/payroll/{payroll_id}",
    params(
        ("payroll_id", description = "Payroll record ID")
    ),
    responses(
        (status = 200, body = PayrollRecord),
        (status = 404)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn get_payroll(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let payroll_id = path.into_inner();

    let payroll =
        sqlx::query_as::<_, PayrollRecord>("SELECT * FROM payroll_records WHERE id = ?")
            .bind(payroll_id)
            .fetch_optional(pool.get_ref())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, payroll_id, "Failed to fetch payroll");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?;

    match payroll {
        Some(p) => Ok(HttpResponse::Ok().json(p)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Payroll not found"
        }))),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/payroll",
    params(PayrollQuery),
    responses(
        (status = 200, body = PaginatedPayrollResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn list_payrolls(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<PayrollQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let (count_sql, data_sql) = match query.officer_id {
        Some(_) => (
            "SELECT COUNT(*) FROM payroll_records WHERE officer_id = ?",
            "SELECT * FROM payroll_records WHERE officer_id = ? ORDER BY month DESC LIMIT ? OFFSET ?",
        ),
        None => (
            "SELECT COUNT(*) FROM payroll_records",
            "SELECT * FROM payroll_records ORDER BY month DESC LIMIT ? OFFSET ?",
        ),
    };

    let mut count_q = sqlx::query_scalar::<_, i64>(count_sql);
    if let Some(officer_id) = query.officer_id {
        count_q = count_q.bind(officer_id);
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count payrolls");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let mut data_q = sqlx::query_as::<_, PayrollRecord>(data_sql);
    if let Some(officer_id) = query.officer_id {
        data_q = data_q.bind(officer_id);
    }

    let data = data_q
        .bind(per_page as i64)
        .bind(offset as i64)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch payroll list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(PaginatedPayrollResponse {
        data,
        page,
        per_page,
        total,
    }))
}

/// Submit a draft for approval (HR/Admin)
#[utoipa::path(
    put,
    path = "/api/v1/payroll/{payroll_id}/submit",
    params(
        ("payroll_id", description = "Payroll record ID")
    ),
    responses(
        (status = 200, description = "Submitted for approval"),
        (status = 400, description = "Record not found or not a draft"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn submit_payroll(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let payroll_id = path.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE payroll_records
        SET status = 'pending'
        WHERE id = ?
        AND status = 'draft'
        "#,
    )
    .bind(payroll_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, payroll_id, "Submit payroll failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Payroll record not found or not a draft"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Payroll submitted for approval"
    })))
}

/// Approve a pending payroll (Admin)
#[utoipa::path(
    put,
    path = "/api/v1/payroll/{payroll_id}/approve",
    params(
        ("payroll_id", description = "Payroll record ID")
    ),
    responses(
        (status = 200, description = "Approved"),
        (status = 400, description = "Record not found or not pending"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn approve_payroll(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let payroll_id = path.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE payroll_records
        SET status = 'approved',
            approved_by = ?,
            approved_date = NOW()
        WHERE id = ?
        AND status = 'pending'
        "#,
    )
    .bind(auth.user_id)
    .bind(payroll_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, payroll_id, "Approve payroll failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Payroll record not found or not pending"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Payroll approved"
    })))
}
