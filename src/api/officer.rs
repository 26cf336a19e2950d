use crate::{
    auth::auth::AuthUser,
    model::officer::Officer,
    utils::db_utils::{build_update_sql, execute_update},
    utils::{staff_code_cache, staff_code_filter},
};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, error};
use utoipa::ToSchema;

/// Columns an update payload may touch; everything else is rejected before
/// SQL is built.
const UPDATABLE_COLUMNS: &[&str] = &[
    "staff_code",
    "first_name",
    "last_name",
    "email",
    "phone",
    "institution_id",
    "designation",
    "join_date",
    "salary_monthly",
    "hourly_rate",
    "overtime_rate_multiplier",
    "normal_working_hours",
    "status",
];

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateOfficer {
    #[schema(example = "STF-3000", value_type = String)]
    pub staff_code: String,
    #[schema(example = "Asha", value_type = String)]
    pub first_name: String,
    #[schema(example = "Nair", value_type = String)]
    pub last_name: String,
    #[schema(example = "asha.nair@campus.edu", format = "email", value_type = String)]
    pub email: String,
    #[schema(example = 10, value_type = u64)]
    pub institution_id: u64,
    #[schema(example = "Mathematics Teacher", value_type = String)]
    pub designation: String,
    #[schema(example = "2024-06-15", format = "date", value_type = String)]
    pub join_date: Option<NaiveDate>,
    #[schema(example = 46000.0)]
    pub salary_monthly: f64,
    #[schema(example = 300.0)]
    pub hourly_rate: f64,
    #[schema(example = 1.5)]
    pub overtime_rate_multiplier: f64,
    #[schema(example = 7.0, nullable = true)]
    pub normal_working_hours: Option<f64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OfficerQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub institution_id: Option<u64>,
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct OfficerListResponse {
    pub data: Vec<Officer>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 5)]
    pub per_page: u32,
    #[schema(example = 10)]
    pub total: i64,
}

/// true  => staff code AVAILABLE
/// false => staff code TAKEN
///
/// Cuckoo filter gives a fast negative, the moka cache a fast positive,
/// and the database settles the rest.
async fn is_staff_code_available(staff_code: &str, pool: &MySqlPool) -> bool {
    if !staff_code_filter::might_exist(staff_code) {
        return true;
    }

    if staff_code_cache::is_issued(staff_code).await {
        return false;
    }

    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM officers WHERE staff_code = ? LIMIT 1)",
    )
    .bind(staff_code)
    .fetch_one(pool)
    .await
    .unwrap_or(true); // fail-safe

    !exists
}

/// Create Officer
#[utoipa::path(
    post,
    path = "/api/v1/officers",
    request_body = CreateOfficer,
    responses(
        (status = 201, description = "Officer created successfully", body = Object, example = json!({
            "message": "Officer created successfully"
        })),
        (status = 409, description = "Staff code already issued"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Officer",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_officer(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateOfficer>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    if !is_staff_code_available(&payload.staff_code, pool.get_ref()).await {
        return Ok(HttpResponse::Conflict().json(json!({
            "message": "Staff code already issued"
        })));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO officers
        (staff_code, first_name, last_name, email, phone, institution_id, designation,
         join_date, salary_monthly, hourly_rate, overtime_rate_multiplier, normal_working_hours)
        VALUES (?, ?, ?, ?, NULL, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&payload.staff_code)
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .bind(&payload.email)
    .bind(payload.institution_id)
    .bind(&payload.designation)
    .bind(payload.join_date)
    .bind(payload.salary_monthly)
    .bind(payload.hourly_rate)
    .bind(payload.overtime_rate_multiplier)
    .bind(payload.normal_working_hours)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => {
            // keep the fast path in sync once the row is durable
            staff_code_filter::insert(&payload.staff_code);
            staff_code_cache::mark_issued(&payload.staff_code).await;

            Ok(HttpResponse::Created().json(json!({
                "message": "Officer created successfully"
            })))
        }
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::Conflict().json(json!({
                        "message": "Staff code already issued"
                    })));
                }
            }

            error!(error = %e, "Failed to create officer");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Something went wrong, Contact with system admin"
            })))
        }
    }
}

// -------------------- Handler --------------------

#[utoipa::path(
    get,
    path = "/api/v1/officers",
    params(
        ("page", Query, description = "Page number"),
        ("per_page", Query, description = "Items per page"),
        ("institution_id", Query, description = "Filter by institution"),
        ("status", Query, description = "Filter by status"),
        ("search", Query, description = "Search by name, email or staff code")
    ),
    responses(
        (status = 200, description = "Paginated officer list", body = OfficerListResponse)
    ),
    tag = "Officer",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_officers(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<OfficerQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    // ---------- build WHERE clause dynamically ----------
    let mut conditions = Vec::new();
    let mut bindings: Vec<sqlx::types::JsonValue> = Vec::new();

    if let Some(institution_id) = query.institution_id {
        conditions.push("institution_id = ?");
        bindings.push(institution_id.into());
    }

    if let Some(status) = &query.status {
        conditions.push("status = ?");
        bindings.push(status.clone().into());
    }

    if let Some(search) = &query.search {
        conditions.push("(first_name LIKE ? OR last_name LIKE ? OR email LIKE ? OR staff_code LIKE ?)");
        let like = format!("%{}%", search);
        bindings.push(like.clone().into());
        bindings.push(like.clone().into());
        bindings.push(like.clone().into());
        bindings.push(like.into());
    }

    let where_clause = if conditions.is_empty() {
        "".to_string()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    // ---------- total count ----------
    let count_sql = format!("SELECT COUNT(*) as total FROM officers {}", where_clause);
    debug!(sql = %count_sql, bindings = ?bindings, "Counting officers");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &bindings {
        count_query = count_query.bind(b);
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %count_sql, "Failed to count officers");
        ErrorInternalServerError("Database error")
    })?;

    // ---------- data query ----------
    let data_sql = format!(
        "SELECT * FROM officers {} ORDER BY id DESC LIMIT ? OFFSET ?",
        where_clause
    );
    debug!(sql = %data_sql, bindings = ?bindings, page, per_page, offset, "Fetching officers");

    let mut data_query = sqlx::query_as::<_, Officer>(&data_sql);
    for b in &bindings {
        data_query = data_query.bind(b);
    }
    data_query = data_query.bind(per_page as i64).bind(offset as i64);

    let officers = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %data_sql, "Failed to fetch officers");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(OfficerListResponse {
        data: officers,
        page,
        per_page,
        total,
    }))
}

/// Update Officer
#[utoipa::path(
    put,
    path = "/api/v1/officers/{officer_id}",
    params(
        ("officer_id", Path, description = "Officer ID")
    ),
    responses(
        (status = 200, description = "Officer updated successfully", body = Object, example = json!({
            "message": "Officer updated successfully"
        })),
        (status = 404, description = "Officer not found", body = Object, example = json!({
            "message": "Officer not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Officer",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_officer(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let officer_id = path.into_inner();

    let update = build_update_sql("officers", &body, UPDATABLE_COLUMNS, "id", officer_id)?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().body("Officer not found"));
    }

    Ok(HttpResponse::Ok().body("Officer updated successfully"))
}

/// Delete Officer
#[utoipa::path(
    delete,
    path = "/api/v1/officers/{officer_id}",
    params(
        ("officer_id", Path, description = "Officer ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = Object, example = json!({
            "message": "Successfully deleted"
        })),
        (status = 404, description = "Officer not found", body = Object, example = json!({
            "message": "Officer not found"
        })),
        (status = 500, description = "Internal server error", body = Object)
    ),
    tag = "Officer",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_officer(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let officer_id = path.into_inner();

    let result = sqlx::query(r#"DELETE FROM officers WHERE id = ?"#)
        .bind(officer_id)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(res) => {
            if res.rows_affected() == 0 {
                return Ok(HttpResponse::NotFound().json(json!({
                    "message": "Officer not found"
                })));
            }

            Ok(HttpResponse::Ok().json(json!({
                "message": "Successfully deleted"
            })))
        }

        Err(e) => {
            error!(error = %e, officer_id, "Failed to delete officer");

            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// Get Officer by ID
#[utoipa::path(
    get,
    path = "/api/v1/officers/{officer_id}",
    params(
        ("officer_id", Path, description = "Officer ID")
    ),
    responses(
        (status = 200, description = "Officer found", body = Officer),
        (status = 404, description = "Officer not found", body = Object, example = json!({
            "message": "Officer not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Officer",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_officer(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let officer_id: u64 = path.into_inner();

    let officer = sqlx::query_as::<_, Officer>(
        r#"
        SELECT *
        FROM officers
        WHERE id = ?
        "#,
    )
    .bind(officer_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, officer_id, "Failed to fetch officer");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match officer {
        Some(found) => Ok(HttpResponse::Ok().json(found)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Officer not found"
        }))),
    }
}
