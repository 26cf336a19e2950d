use crate::auth::auth::AuthUser;
use crate::calc::entitlement::{ProRatedLeave, pro_rated_entitlement};
use crate::calc::leave_balance::{Application, LeaveStatus, YearlySummary, before_start, yearly_summary};
use crate::model::leave::LeaveApplication;
use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{MySqlPool, prelude::FromRow};
use utoipa::{IntoParams, ToSchema};

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LeaveType {
    Annual,
    Sick,
    Unpaid,
}

impl LeaveType {
    fn as_str(&self) -> &str {
        match self {
            LeaveType::Annual => "annual",
            LeaveType::Sick => "sick",
            LeaveType::Unpaid => "unpaid",
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = "2024-07-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2024-07-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "annual")]
    pub leave_type: LeaveType,
    /// Days drawn from the paid entitlement
    #[schema(example = 2.0)]
    pub paid_days: f64,
    /// Loss-of-pay days beyond the balance
    #[schema(example = 1.0)]
    pub lop_days: f64,
    #[schema(example = "Family function", nullable = true)]
    pub reason: Option<String>,
}

#[derive(Serialize, Deserialize, FromRow, ToSchema)]
pub struct LeaveResponse {
    #[schema(example = 1)]
    /// leave application id
    pub id: u64,
    /// officer for whom the leave is applied
    #[schema(example = 1001)]
    pub officer_id: u64,
    #[schema(example = "2024-07-01", format = "date", value_type = String)]
    /// leave start date
    pub start_date: NaiveDate,
    #[schema(example = "2024-07-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "annual", value_type = String)]
    pub leave_type: String,
    #[schema(example = "pending", value_type = String)]
    pub status: Option<String>,
    #[schema(example = 2.0)]
    pub paid_days: f64,
    #[schema(example = 1.0)]
    pub lop_days: f64,
    #[schema(example = "2024-06-25T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveResponse>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveFilter {
    #[schema(example = 1001)]
    /// Filter by officer ID
    pub officer_id: Option<u64>,
    #[schema(example = "pending")]
    /// Filter by leave status
    pub status: Option<String>,
    #[schema(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u64>, // 1-based
    #[schema(example = 10)]
    /// Pagination per page number
    pub per_page: Option<u64>, // items per page
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

/* =========================
Create leave application
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body(
        content = CreateLeave,
        description = "Leave application payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Leave application submitted successfully",
         body = Object,
         example = json!({
            "message": "Leave application submitted",
            "status": "pending"
         })
        ),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeave>,
) -> actix_web::Result<impl Responder> {
    let officer_id: u64 = auth
        .officer_id
        .ok_or_else(|| actix_web::error::ErrorForbidden("No officer profile"))?;

    if payload.start_date > payload.end_date {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "start_date cannot be after end_date"
        })));
    }

    if payload.paid_days < 0.0 || payload.lop_days < 0.0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "paid_days and lop_days must not be negative"
        })));
    }

    if payload.paid_days + payload.lop_days == 0.0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Application must cover at least one day"
        })));
    }

    sqlx::query(
        r#"
        INSERT INTO leave_applications
            (officer_id, start_date, end_date, leave_type, paid_days, lop_days, reason)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(officer_id)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(payload.leave_type.as_str())
    .bind(payload.paid_days)
    .bind(payload.lop_days)
    .bind(&payload.reason)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, officer_id, "Failed to create leave application");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave application submitted",
        "status": "pending"
    })))
}

/* =========================
Approve leave (HR/Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/approve",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave application to approve")
    ),
    responses(
        (status = 200, description = "Leave approved successfully", body = Object, example = json!({
            "message": "Leave approved"
        })),
        (status = 400, description = "Leave application not found or already processed", body = Object, example = json!({
            "message": "Leave application not found or already processed"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let leave_id = path.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE leave_applications
        SET status = 'approved'
        WHERE id = ?
        AND status = 'pending'
        "#,
    )
    .bind(leave_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Approve leave failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Leave application not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave approved"
    })))
}

/* =========================
Reject leave (HR/Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/reject",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave application to reject")
    ),
    responses(
        (status = 200, description = "Leave rejected successfully", body = Object, example = json!({
            "message": "Leave rejected"
        })),
        (status = 400, description = "Leave application not found or already processed", body = Object, example = json!({
            "message": "Leave application not found or already processed"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let leave_id = path.into_inner();

    let result = sqlx::query(
        r#"
        UPDATE leave_applications
        SET status = 'rejected'
        WHERE id = ?
        AND status = 'pending'
        "#,
    )
    .bind(leave_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Reject leave failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Leave application not found or already processed"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave rejected"
    })))
}

/// for getting a leave application details endpoint
#[utoipa::path(
    get,
    path = "/api/v1/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave application to fetch")
    ),
    responses(
        (status = 200, description = "Leave application found", body = LeaveResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave application not found", body = Object, example = json!({
            "message": "Leave application not found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let leave_id = path.into_inner();

    let leave = sqlx::query_as::<_, LeaveResponse>(
        r#"
        SELECT
            id,
            officer_id,
            start_date,
            end_date,
            leave_type,
            status,
            paid_days,
            lop_days,
            created_at
        FROM leave_applications
        WHERE id = ?
        "#,
    )
    .bind(leave_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to fetch leave application");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match leave {
        Some(data) => Ok(HttpResponse::Ok().json(data)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Leave application not found"
        }))),
    }
}

/// for getting leave applications endpoint
#[utoipa::path(
    get,
    path = "/api/v1/leave",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated leave list", body = LeaveListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<LeaveFilter>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    // -------------------------
    // Pagination
    // -------------------------
    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    // -------------------------
    // WHERE clause
    // -------------------------
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(officer_id) = query.officer_id {
        where_sql.push_str(" AND officer_id = ?");
        args.push(FilterValue::U64(officer_id));
    }

    if let Some(status) = query.status.as_deref() {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status));
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM leave_applications{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error=%e, "Failed to count leave applications");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        r#"
        SELECT id, officer_id, start_date, end_date, leave_type, status, paid_days, lop_days, created_at
        FROM leave_applications
        {}
        ORDER BY created_at DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, LeaveResponse>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let leaves = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error=%e, "Failed to fetch leave list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    // -------------------------
    // Response
    // -------------------------
    let response = LeaveListResponse {
        data: leaves,
        page: page as u32,
        per_page: per_page as u32,
        total,
    };

    Ok(HttpResponse::Ok().json(response))
}

/* =========================
Balance and yearly summary
========================= */

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct BalanceQuery {
    #[schema(example = 1001)]
    pub officer_id: u64,
    #[schema(example = 2024)]
    pub year: i32,
    #[schema(example = 6)]
    pub month: u32,
}

#[derive(Serialize, ToSchema)]
pub struct BalanceResponse {
    #[schema(example = 1.0)]
    pub monthly_credit: f64,
    #[schema(example = 4.0)]
    pub balance_remaining: f64,
    /// false when the month predates the officer's first credited month
    #[schema(example = true)]
    pub eligible: bool,
}

#[derive(FromRow)]
struct JoinDateRow {
    join_date: Option<NaiveDate>,
}

#[derive(FromRow)]
struct BalanceRow {
    monthly_credit: f64,
    balance_remaining: f64,
}

async fn fetch_entitlement(
    pool: &MySqlPool,
    officer_id: u64,
    year: i32,
) -> actix_web::Result<ProRatedLeave> {
    let row = sqlx::query_as::<_, JoinDateRow>("SELECT join_date FROM officers WHERE id = ?")
        .bind(officer_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, officer_id, "Failed to fetch officer join date");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?
        .ok_or_else(|| actix_web::error::ErrorNotFound("Officer not found"))?;

    Ok(pro_rated_entitlement(row.join_date, year))
}

/// Available leave balance for one month
///
/// Months before the officer's first credited month short-circuit to zero
/// without calling the stored balance computation.
#[utoipa::path(
    get,
    path = "/api/v1/leave/balance",
    params(BalanceQuery),
    responses(
        (status = 200, description = "Balance for the month", body = BalanceResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Officer not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn get_balance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<BalanceQuery>,
) -> actix_web::Result<impl Responder> {
    if auth.is_officer() && auth.officer_id != Some(query.officer_id) {
        return Err(actix_web::error::ErrorForbidden("Own balance only"));
    }

    if query.month < 1 || query.month > 12 {
        return Err(actix_web::error::ErrorBadRequest("month must be 1-12"));
    }

    let entitlement = fetch_entitlement(pool.get_ref(), query.officer_id, query.year).await?;

    if before_start(&entitlement, query.year, query.month) {
        return Ok(HttpResponse::Ok().json(BalanceResponse {
            monthly_credit: 0.0,
            balance_remaining: 0.0,
            eligible: false,
        }));
    }

    let row = sqlx::query_as::<_, BalanceRow>("CALL get_leave_balance(?, ?, ?)")
        .bind(query.officer_id)
        .bind(query.year)
        .bind(query.month)
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, officer_id = query.officer_id, "Balance RPC failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(BalanceResponse {
        monthly_credit: row.monthly_credit,
        balance_remaining: row.balance_remaining,
        eligible: true,
    }))
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct SummaryQuery {
    #[schema(example = 1001)]
    pub officer_id: u64,
    #[schema(example = 2024)]
    pub year: i32,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveSummaryResponse {
    pub entitlement: ProRatedLeave,
    pub summary: YearlySummary,
    pub applications: Vec<LeaveResponse>,
}

/// Yearly leave summary
///
/// Entitlement from the join date, usage from the year's approved
/// applications. Loss-of-pay days are reported separately and never reduce
/// the remaining balance.
#[utoipa::path(
    get,
    path = "/api/v1/leave/summary",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Yearly summary", body = LeaveSummaryResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Officer not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn get_yearly_summary(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<SummaryQuery>,
) -> actix_web::Result<impl Responder> {
    if auth.is_officer() && auth.officer_id != Some(query.officer_id) {
        return Err(actix_web::error::ErrorForbidden("Own summary only"));
    }

    let entitlement = fetch_entitlement(pool.get_ref(), query.officer_id, query.year).await?;

    let rows = sqlx::query_as::<_, LeaveApplication>(
        r#"
        SELECT *
        FROM leave_applications
        WHERE officer_id = ?
        AND start_date BETWEEN ? AND ?
        ORDER BY start_date
        "#,
    )
    .bind(query.officer_id)
    .bind(NaiveDate::from_ymd_opt(query.year, 1, 1))
    .bind(NaiveDate::from_ymd_opt(query.year, 12, 31))
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, officer_id = query.officer_id, "Failed to fetch applications");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let applications: Vec<Application> = rows
        .iter()
        .filter_map(|row| {
            // unknown status strings never count as approved
            let status = row.status.parse::<LeaveStatus>().ok()?;
            Some(Application {
                start_date: row.start_date,
                status,
                paid_days: row.paid_days,
                lop_days: row.lop_days,
            })
        })
        .collect();

    let summary = yearly_summary(
        entitlement.total_entitlement as f64,
        query.year,
        &applications,
    );

    let response_rows = rows
        .into_iter()
        .map(|row| LeaveResponse {
            id: row.id,
            officer_id: row.officer_id,
            start_date: row.start_date,
            end_date: row.end_date,
            leave_type: row.leave_type,
            status: Some(row.status),
            paid_days: row.paid_days,
            lop_days: row.lop_days,
            created_at: row.created_at,
        })
        .collect();

    Ok(HttpResponse::Ok().json(LeaveSummaryResponse {
        entitlement,
        summary,
        applications: response_rows,
    }))
}
