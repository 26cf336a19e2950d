use std::collections::BTreeMap;

use crate::auth::auth::AuthUser;
use crate::calc::calendar::{
    CalendarType, DayEntry, DayType, day_types_for_month, month_dates, quick_setup_day_type,
    working_days,
};
use crate::model::calendar::CalendarDayEntry;
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct MonthQuery {
    #[schema(example = "institution")]
    pub calendar_type: CalendarType,
    #[schema(example = 2024)]
    pub year: i32,
    #[schema(example = 6)]
    pub month: u32,
    /// Required when calendar_type = institution, ignored otherwise
    #[schema(example = 10)]
    pub institution_id: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct DayTypeResponse {
    #[schema(example = "2024-06-17", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(example = "working")]
    pub day_type: DayType,
    #[schema(example = "Founders day", nullable = true)]
    pub description: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct MonthResponse {
    pub data: Vec<DayTypeResponse>,
    /// Dates without an entry are unclassified and excluded from every count
    #[schema(example = 21)]
    pub working_day_count: usize,
}

/// Fetches one scope's entries for a month. Institution queries return only
/// institution rows and company queries only unscoped rows; callers wanting
/// a fallback must fetch both scopes and merge themselves.
async fn fetch_month_entries(
    pool: &MySqlPool,
    calendar_type: CalendarType,
    institution_id: Option<u64>,
    first: NaiveDate,
    last: NaiveDate,
) -> Result<Vec<CalendarDayEntry>, sqlx::Error> {
    match calendar_type {
        CalendarType::Institution => {
            sqlx::query_as::<_, CalendarDayEntry>(
                r#"
                SELECT *
                FROM calendar_day_types
                WHERE calendar_type = 'institution'
                AND institution_id = ?
                AND date BETWEEN ? AND ?
                ORDER BY date
                "#,
            )
            .bind(institution_id)
            .bind(first)
            .bind(last)
            .fetch_all(pool)
            .await
        }
        CalendarType::Company => {
            sqlx::query_as::<_, CalendarDayEntry>(
                r#"
                SELECT *
                FROM calendar_day_types
                WHERE calendar_type = 'company'
                AND institution_id IS NULL
                AND date BETWEEN ? AND ?
                ORDER BY date
                "#,
            )
            .bind(first)
            .bind(last)
            .fetch_all(pool)
            .await
        }
    }
}

/// Resolves a month's day types for payroll: company scope first, then the
/// officer's institution scope layered on top. This merge is the explicit
/// two-query fallback; the single-scope endpoints never do it implicitly.
pub async fn resolve_working_days(
    pool: &MySqlPool,
    institution_id: u64,
    year: i32,
    month: u32,
) -> actix_web::Result<Vec<NaiveDate>> {
    let (first, last) = crate::calc::calendar::month_bounds(year, month)
        .map_err(actix_web::error::ErrorBadRequest)?;

    let company = fetch_month_entries(pool, CalendarType::Company, None, first, last)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch company calendar");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let institution = fetch_month_entries(
        pool,
        CalendarType::Institution,
        Some(institution_id),
        first,
        last,
    )
    .await
    .map_err(|e| {
        error!(error = %e, institution_id, "Failed to fetch institution calendar");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let mut entries = to_day_entries(&company);
    entries.extend(to_day_entries(&institution));

    // later entries win in the map, so institution rows shadow company rows
    let map = day_types_for_month(&entries, year, month)
        .map_err(actix_web::error::ErrorBadRequest)?;

    Ok(working_days(&map))
}

fn to_day_entries(rows: &[CalendarDayEntry]) -> Vec<DayEntry> {
    rows.iter()
        .filter_map(|row| {
            // rows with an unknown day_type string are unclassified
            let day_type = row.day_type.parse::<DayType>().ok()?;
            Some(DayEntry {
                date: row.date,
                day_type,
            })
        })
        .collect()
}

fn month_response(rows: &[CalendarDayEntry], map: &BTreeMap<NaiveDate, DayType>) -> MonthResponse {
    let data = rows
        .iter()
        .filter_map(|row| {
            let day_type = *map.get(&row.date)?;
            Some(DayTypeResponse {
                date: row.date,
                day_type,
                description: row.description.clone(),
            })
        })
        .collect();

    MonthResponse {
        data,
        working_day_count: working_days(map).len(),
    }
}

/// Day types for a month (single scope)
#[utoipa::path(
    get,
    path = "/api/v1/calendar",
    params(MonthQuery),
    responses(
        (status = 200, description = "Classified dates for the month", body = MonthResponse),
        (status = 400, description = "Invalid month or missing institution_id"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Calendar"
)]
pub async fn get_month(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<MonthQuery>,
) -> actix_web::Result<impl Responder> {
    if query.calendar_type == CalendarType::Institution && query.institution_id.is_none() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "institution_id is required for institution calendars"
        })));
    }

    let (first, last) = crate::calc::calendar::month_bounds(query.year, query.month)
        .map_err(actix_web::error::ErrorBadRequest)?;

    let rows = fetch_month_entries(
        pool.get_ref(),
        query.calendar_type,
        query.institution_id,
        first,
        last,
    )
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch calendar entries");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let map = day_types_for_month(&to_day_entries(&rows), query.year, query.month)
        .map_err(actix_web::error::ErrorBadRequest)?;

    Ok(HttpResponse::Ok().json(month_response(&rows, &map)))
}

#[derive(Deserialize, ToSchema)]
pub struct SetDay {
    #[schema(example = "institution")]
    pub calendar_type: CalendarType,
    #[schema(example = 10)]
    pub institution_id: Option<u64>,
    #[schema(example = "2024-06-17", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "holiday")]
    pub day_type: DayType,
    #[schema(example = "Founders day", nullable = true)]
    pub description: Option<String>,
}

/// Classify one date (upsert)
#[utoipa::path(
    put,
    path = "/api/v1/calendar/day",
    request_body = SetDay,
    responses(
        (status = 200, description = "Date classified", body = Object, example = json!({
            "message": "Day type saved"
        })),
        (status = 400, description = "Missing institution_id"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Calendar"
)]
pub async fn set_day(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<SetDay>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    if payload.calendar_type == CalendarType::Institution && payload.institution_id.is_none() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "institution_id is required for institution calendars"
        })));
    }

    sqlx::query(
        r#"
        INSERT INTO calendar_day_types
            (calendar_type, institution_id, date, day_type, description)
        VALUES (?, ?, ?, ?, ?)
        ON DUPLICATE KEY UPDATE
            day_type = VALUES(day_type),
            description = VALUES(description)
        "#,
    )
    .bind(payload.calendar_type.to_string())
    .bind(payload.institution_id)
    .bind(payload.date)
    .bind(payload.day_type.to_string())
    .bind(&payload.description)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to upsert calendar day");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Day type saved"
    })))
}

#[derive(Deserialize, ToSchema)]
pub struct QuickSetup {
    #[schema(example = "institution")]
    pub calendar_type: CalendarType,
    #[schema(example = 10)]
    pub institution_id: Option<u64>,
    #[schema(example = 2024)]
    pub year: i32,
    #[schema(example = 6)]
    pub month: u32,
}

/// Bulk-classify a month: weekends on Saturday/Sunday, working otherwise
///
/// Replaces every entry in the month's range, including manually set
/// holidays. Reclassify those afterwards with PUT /calendar/day.
#[utoipa::path(
    post,
    path = "/api/v1/calendar/quick-setup",
    request_body = QuickSetup,
    responses(
        (status = 200, description = "Month populated", body = Object, example = json!({
            "message": "Month populated",
            "days": 30
        })),
        (status = 400, description = "Invalid month or missing institution_id"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Calendar"
)]
pub async fn quick_setup(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<QuickSetup>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    if payload.calendar_type == CalendarType::Institution && payload.institution_id.is_none() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "institution_id is required for institution calendars"
        })));
    }

    let dates = month_dates(payload.year, payload.month)
        .map_err(actix_web::error::ErrorBadRequest)?;
    let (first, last) = (dates[0], dates[dates.len() - 1]);

    let mut tx = pool.begin().await.map_err(|e| {
        error!(error = %e, "Failed to open transaction");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // delete-then-insert: quick setup always wins over whatever was there
    sqlx::query(
        r#"
        DELETE FROM calendar_day_types
        WHERE calendar_type = ?
        AND (institution_id = ? OR (institution_id IS NULL AND ? IS NULL))
        AND date BETWEEN ? AND ?
        "#,
    )
    .bind(payload.calendar_type.to_string())
    .bind(payload.institution_id)
    .bind(payload.institution_id)
    .bind(first)
    .bind(last)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to clear calendar range");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    for date in &dates {
        sqlx::query(
            r#"
            INSERT INTO calendar_day_types
                (calendar_type, institution_id, date, day_type)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(payload.calendar_type.to_string())
        .bind(payload.institution_id)
        .bind(date)
        .bind(quick_setup_day_type(*date).to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!(error = %e, date = %date, "Failed to insert calendar day");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;
    }

    tx.commit().await.map_err(|e| {
        error!(error = %e, "Failed to commit quick setup");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Month populated",
        "days": dates.len()
    })))
}

#[derive(Serialize, ToSchema)]
pub struct WorkingDaysResponse {
    #[schema(value_type = Vec<String>, format = "date")]
    pub dates: Vec<NaiveDate>,
    #[schema(example = 21)]
    pub count: usize,
}

/// Working days for a month (single scope)
#[utoipa::path(
    get,
    path = "/api/v1/calendar/working-days",
    params(MonthQuery),
    responses(
        (status = 200, description = "Sorted working dates", body = WorkingDaysResponse),
        (status = 400, description = "Invalid month or missing institution_id"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Calendar"
)]
pub async fn get_working_days(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<MonthQuery>,
) -> actix_web::Result<impl Responder> {
    if query.calendar_type == CalendarType::Institution && query.institution_id.is_none() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "institution_id is required for institution calendars"
        })));
    }

    let (first, last) = crate::calc::calendar::month_bounds(query.year, query.month)
        .map_err(actix_web::error::ErrorBadRequest)?;

    let rows = fetch_month_entries(
        pool.get_ref(),
        query.calendar_type,
        query.institution_id,
        first,
        last,
    )
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch calendar entries");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let map = day_types_for_month(&to_day_entries(&rows), query.year, query.month)
        .map_err(actix_web::error::ErrorBadRequest)?;
    let dates = working_days(&map);

    Ok(HttpResponse::Ok().json(WorkingDaysResponse {
        count: dates.len(),
        dates,
    }))
}
