use std::time::Duration;

use chrono_tz::Tz;

use crate::services::sheet_locator::WeekdaySheetNames;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub port: u16,
    pub spreadsheet_base_url: String,
    pub fetch_timeout: Duration,
    pub ingest_cron: String,
    pub ingest_timezone: Tz,
    pub ingest_on_startup: bool,
    pub sheet_names: WeekdaySheetNames,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Reads settings from the environment (after `.env` has been loaded).
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| get(key).ok_or_else(|| format!("{} is not set", key));

        let timezone_name = get("INGEST_TIMEZONE").unwrap_or_else(|| "Asia/Tokyo".to_string());
        let ingest_timezone = timezone_name
            .parse::<Tz>()
            .map_err(|e| format!("INGEST_TIMEZONE {:?} is invalid: {}", timezone_name, e))?;

        let sheet_names = match get("SHEET_NAMES") {
            Some(list) => WeekdaySheetNames::parse(&list).map_err(|e| format!("SHEET_NAMES: {}", e))?,
            None => WeekdaySheetNames::default(),
        };

        let config = Self {
            database_url: required("DATABASE_URL")?,
            db_max_connections: parse_or(&get, "DB_MAX_CONNECTIONS", 10)?,
            port: parse_or(&get, "PORT", 8080)?,
            spreadsheet_base_url: required("SPREADSHEET_BASE_URL")?,
            fetch_timeout: Duration::from_secs(parse_or(&get, "FETCH_TIMEOUT_SECS", 30)?),
            ingest_cron: get("INGEST_CRON").unwrap_or_else(|| "0 0 9 * * *".to_string()),
            ingest_timezone,
            ingest_on_startup: parse_or(&get, "INGEST_ON_STARTUP", false)?,
            sheet_names,
            cors_allowed_origins: get("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        url::Url::parse(&self.spreadsheet_base_url)
            .map_err(|e| format!("SPREADSHEET_BASE_URL is not a valid URL: {}", e))?;

        if self.fetch_timeout.is_zero() {
            return Err("FETCH_TIMEOUT_SECS must be greater than 0".to_string());
        }
        if self.db_max_connections == 0 {
            return Err("DB_MAX_CONNECTIONS must be greater than 0".to_string());
        }
        if self.ingest_cron.split_whitespace().count() != 6 {
            return Err(format!(
                "INGEST_CRON {:?} must have 6 fields (sec min hour day month weekday)",
                self.ingest_cron
            ));
        }
        if self.cors_allowed_origins.is_empty() {
            return Err("CORS_ALLOWED_ORIGINS must list at least one origin or *".to_string());
        }
        Ok(())
    }
}

fn parse_or<F, T>(get: &F, key: &str, default: T) -> Result<T, String>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| format!("{} has invalid value {:?}: {}", key, raw, e)),
        None => Ok(default),
    }
}
