use crate::{
    api::{attendance, calendar, leave, officer, payroll},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let register_limiter = Arc::new(build_limiter(config.rate_register_per_min));
    let refresh_limiter = Arc::new(build_limiter(config.rate_refresh_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(register_limiter.clone())
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(refresh_limiter.clone())
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware))
            // authentication
            .wrap(protected_limiter) // rate limiting
            .service(handlers::protected)
            .service(
                web::scope("/officers")
                    // /officers
                    .service(
                        web::resource("")
                            .route(web::post().to(officer::create_officer))
                            .route(web::get().to(officer::list_officers)),
                    )
                    // /officers/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(officer::update_officer))
                            .route(web::get().to(officer::get_officer))
                            .route(web::delete().to(officer::delete_officer)),
                    ),
            )
            .service(
                web::scope("/leave")
                    // /leave/balance
                    .service(
                        web::resource("/balance").route(web::get().to(leave::get_balance)),
                    )
                    // /leave/summary
                    .service(
                        web::resource("/summary")
                            .route(web::get().to(leave::get_yearly_summary)),
                    )
                    // /leave
                    .service(
                        web::resource("")
                            .route(web::get().to(leave::leave_list))
                            .route(web::post().to(leave::create_leave)),
                    )
                    // /leave/{id}
                    .service(web::resource("/{id}").route(web::get().to(leave::get_leave)))
                    // /leave/{id}/approve
                    .service(
                        web::resource("/{id}/approve").route(web::put().to(leave::approve_leave)),
                    )
                    // /leave/{id}/reject
                    .service(
                        web::resource("/{id}/reject").route(web::put().to(leave::reject_leave)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    // /attendance/check-in, /attendance/check-out
                    .service(
                        web::resource("/check-in").route(web::post().to(attendance::check_in)),
                    )
                    .service(
                        web::resource("/check-out").route(web::post().to(attendance::check_out)),
                    )
                    // /attendance/mark
                    .service(web::resource("/mark").route(web::post().to(attendance::mark_day)))
                    // /attendance/summary
                    .service(
                        web::resource("/summary")
                            .route(web::get().to(attendance::monthly_summary)),
                    ),
            )
            .service(
                web::scope("/calendar")
                    // /calendar
                    .service(web::resource("").route(web::get().to(calendar::get_month)))
                    // /calendar/day
                    .service(web::resource("/day").route(web::put().to(calendar::set_day)))
                    // /calendar/quick-setup
                    .service(
                        web::resource("/quick-setup")
                            .route(web::post().to(calendar::quick_setup)),
                    )
                    // /calendar/working-days
                    .service(
                        web::resource("/working-days")
                            .route(web::get().to(calendar::get_working_days)),
                    ),
            )
            .service(
                web::scope("/payroll")
                    // /payroll/compute
                    .service(
                        web::resource("/compute")
                            .route(web::post().to(payroll::compute_payroll)),
                    )
                    // /payroll
                    .service(web::resource("").route(web::get().to(payroll::list_payrolls)))
                    // /payroll/{id}
                    .service(web::resource("/{id}").route(web::get().to(payroll::get_payroll)))
                    // /payroll/{id}/submit
                    .service(
                        web::resource("/{id}/submit")
                            .route(web::put().to(payroll::submit_payroll)),
                    )
                    // /payroll/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(payroll::approve_payroll)),
                    ),
            ),
    );
}

// LOGIN
//  ├─ access_token (15 min)
//  └─ refresh_token (7 days)

// API REQUEST
//  └─ Authorization: Bearer access_token

// ACCESS EXPIRED
//  └─ POST /refresh with refresh_token
//       └─ returns new access_token
