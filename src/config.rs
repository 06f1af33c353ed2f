use crate::engine::aggregate::HourTargets;
use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,

    // Rate limiting
    pub rate_api_per_min: u32,

    pub api_prefix: String,

    /// Weekly/monthly hour targets, overridable per deployment.
    pub targets: HourTargets,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),

            rate_api_per_min: env::var("RATE_API_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".to_string()),

            targets: HourTargets {
                full_time_week: env::var("FULL_TIME_WEEK_TARGET")
                    .unwrap_or_else(|_| "48".to_string())
                    .parse()
                    .unwrap(),
                full_time_month: env::var("FULL_TIME_MONTH_TARGET")
                    .unwrap_or_else(|_| "192".to_string())
                    .parse()
                    .unwrap(),
                part_time_week: env::var("PART_TIME_WEEK_TARGET")
                    .unwrap_or_else(|_| "24".to_string())
                    .parse()
                    .unwrap(),
                part_time_month: env::var("PART_TIME_MONTH_TARGET")
                    .unwrap_or_else(|_| "96".to_string())
                    .parse()
                    .unwrap(),
            },
        }
    }
}
