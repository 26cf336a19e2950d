use dotenvy::dotenv;
use std::env;

use crate::calc::payroll::PayPolicy;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,
    pub refresh_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_register_per_min: u32,
    pub rate_refresh_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    // Payroll policy; handed to the calculation core as an input, never
    // read from globals at compute time
    pub prorate_base_pay: bool,
    pub default_normal_working_hours: f64,
    pub tds_rate: f64,
    pub tds_threshold_monthly: f64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            access_token_ttl: env::var("ACCESS_TOKEN_TTL")
                .unwrap_or_else(|_| "900".to_string()) // default 15 min
                .parse()
                .unwrap(),
            refresh_token_ttl: env::var("REFRESH_TOKEN_TTL")
                .unwrap_or_else(|_| "604800".to_string()) // default 7 days
                .parse()
                .unwrap(),

            rate_login_per_min: env::var("RATE_LOGIN_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap(),
            rate_register_per_min: env::var("RATE_REGISTER_PER_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),
            rate_refresh_per_min: env::var("RATE_REFRESH_PER_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),
            rate_protected_per_min: env::var("RATE_PROTECTED_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            prorate_base_pay: env::var("PRORATE_BASE_PAY")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap(),
            default_normal_working_hours: env::var("DEFAULT_NORMAL_WORKING_HOURS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .unwrap(),
            tds_rate: env::var("TDS_RATE")
                .unwrap_or_else(|_| "0".to_string())
                .parse()
                .unwrap(),
            tds_threshold_monthly: env::var("TDS_THRESHOLD_MONTHLY")
                .unwrap_or_else(|_| "0".to_string())
                .parse()
                .unwrap(),
        }
    }

    pub fn pay_policy(&self) -> PayPolicy {
        PayPolicy {
            prorate_base_pay: self.prorate_base_pay,
            default_normal_working_hours: self.default_normal_working_hours,
            tds_rate: self.tds_rate,
            tds_threshold_monthly: self.tds_threshold_monthly,
        }
    }
}
