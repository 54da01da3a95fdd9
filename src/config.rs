use std::env;

use anyhow::{Context, Result};
use dotenvy::dotenv;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    /// Unset means the in-memory store seeded with demo data
    pub database_url: Option<String>,

    // Rate limiting
    pub rate_api_per_min: u32,

    pub api_prefix: String,
    pub log_dir: String,

    // Names printed in the report signature block
    pub report_prepared_by: String,
    pub report_approved_by: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:5000".to_string(),
            database_url: None,
            rate_api_per_min: 1000,
            api_prefix: "/api".to_string(),
            log_dir: "logs".to_string(),
            report_prepared_by: "Payroll Officer".to_string(),
            report_approved_by: "Finance Manager".to_string(),
        }
    }
}

fn var_or(name: &str, default: String) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let defaults = Config::default();

        Ok(Self {
            server_addr: var_or("SERVER_ADDR", defaults.server_addr),
            database_url: env::var("DATABASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            rate_api_per_min: var_or("RATE_API_PER_MIN", defaults.rate_api_per_min.to_string())
                .parse()
                .context("RATE_API_PER_MIN must be a non-negative integer")?,
            api_prefix: var_or("API_PREFIX", defaults.api_prefix),
            log_dir: var_or("LOG_DIR", defaults.log_dir),
            report_prepared_by: var_or("REPORT_PREPARED_BY", defaults.report_prepared_by),
            report_approved_by: var_or("REPORT_APPROVED_BY", defaults.report_approved_by),
        })
    }
}
