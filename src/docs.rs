use crate::api::attendance::{MarkDay, SummaryQuery};
use crate::api::calendar::{
    DayTypeResponse, MonthQuery, MonthResponse, QuickSetup, SetDay, WorkingDaysResponse,
};
use crate::api::leave::{
    BalanceQuery, BalanceResponse, CreateLeave, LeaveFilter, LeaveListResponse, LeaveResponse,
    LeaveSummaryResponse,
};
use crate::api::officer::{CreateOfficer, OfficerListResponse, OfficerQuery};
use crate::api::payroll::{ComputePayroll, PaginatedPayrollResponse, PayrollQuery};
use crate::calc::attendance::{AttendanceStatus, MonthlySummary};
use crate::calc::calendar::{CalendarType, DayType};
use crate::calc::entitlement::ProRatedLeave;
use crate::calc::leave_balance::YearlySummary;
use crate::model::officer::Officer;
use crate::model::payroll::{PayrollRecord, PayrollStatus};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Campus HRM API",
        version = "1.0.0",
        description = r#"
## Campus HRM — HR & Payroll service

This API powers the HR/payroll slice of a multi-tenant school and
institution management platform.

### 🔹 Key Features
- **Officer Management**
  - Create, update, list, and view officer profiles with pay parameters
- **Attendance Management**
  - Daily check-in/check-out, day marking, and monthly aggregation
- **Calendar Management**
  - Company and institution day-type calendars with bulk month setup
- **Leave Management**
  - Applications with paid/loss-of-pay splits, approvals, pro-rated
    entitlements, and balances
- **Payroll Management**
  - Attendance-derived pay computation with overtime, deductions, and TDS,
    plus a draft → pending → approved workflow

### 🔐 Security
Most endpoints are protected using **JWT Bearer authentication**.
Only authorized roles such as **Admin** or **HR** can access sensitive operations.

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints
- Money values are rupees at full precision; round at display time

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::leave::leave_list,
        crate::api::leave::get_leave,
        crate::api::leave::create_leave,
        crate::api::leave::approve_leave,
        crate::api::leave::reject_leave,
        crate::api::leave::get_balance,
        crate::api::leave::get_yearly_summary,

        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::mark_day,
        crate::api::attendance::monthly_summary,

        crate::api::calendar::get_month,
        crate::api::calendar::set_day,
        crate::api::calendar::quick_setup,
        crate::api::calendar::get_working_days,

        crate::api::officer::create_officer,
        crate::api::officer::get_officer,
        crate::api::officer::list_officers,
        crate::api::officer::update_officer,
        crate::api::officer::delete_officer,

        crate::api::payroll::compute_payroll,
        crate::api::payroll::get_payroll,
        crate::api::payroll::list_payrolls,
        crate::api::payroll::submit_payroll,
        crate::api::payroll::approve_payroll
    ),
    components(
        schemas(
            LeaveFilter,
            LeaveResponse,
            LeaveListResponse,
            CreateLeave,
            BalanceQuery,
            BalanceResponse,
            LeaveSummaryResponse,
            ProRatedLeave,
            YearlySummary,
            MarkDay,
            SummaryQuery,
            MonthlySummary,
            AttendanceStatus,
            MonthQuery,
            MonthResponse,
            DayTypeResponse,
            SetDay,
            QuickSetup,
            WorkingDaysResponse,
            DayType,
            CalendarType,
            CreateOfficer,
            OfficerQuery,
            Officer,
            OfficerListResponse,
            PaginatedPayrollResponse,
            PayrollRecord,
            PayrollStatus,
            ComputePayroll,
            PayrollQuery
        )
    ),
    tags(
        (name = "Leave", description = "Leave management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
        (name = "Calendar", description = "Working-day calendar APIs"),
        (name = "Officer", description = "Officer management APIs"),
        (name = "Payroll", description = "Payroll management APIs"),
    )
)]
pub struct ApiDoc;
