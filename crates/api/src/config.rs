use haccp_core::rollup::DEFAULT_MIN_RECORDS_PER_DAY;
use haccp_core::thresholds::{ThresholdRegistry, DEFAULT_OIL_MAX_POLAR_PERCENTAGE};

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Polar compound percentage above which an oil check is anomalous.
    pub oil_max_polar_percentage: f64,
    /// Records a cold storage needs in a day to count as complete.
    pub temperature_min_records_per_day: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                           | Default                 |
    /// |-----------------------------------|-------------------------|
    /// | `HOST`                            | `0.0.0.0`               |
    /// | `PORT`                            | `3000`                  |
    /// | `CORS_ORIGINS`                    | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`            | `30`                    |
    /// | `OIL_MAX_POLAR_PERCENTAGE`        | `24.0`                  |
    /// | `TEMPERATURE_MIN_RECORDS_PER_DAY` | `2`                     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let oil_max_polar_percentage: f64 = std::env::var("OIL_MAX_POLAR_PERCENTAGE")
            .map(|v| v.parse().expect("OIL_MAX_POLAR_PERCENTAGE must be a number"))
            .unwrap_or(DEFAULT_OIL_MAX_POLAR_PERCENTAGE);

        let temperature_min_records_per_day: usize =
            std::env::var("TEMPERATURE_MIN_RECORDS_PER_DAY")
                .map(|v| {
                    v.parse()
                        .expect("TEMPERATURE_MIN_RECORDS_PER_DAY must be a valid usize")
                })
                .unwrap_or(DEFAULT_MIN_RECORDS_PER_DAY);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            oil_max_polar_percentage,
            temperature_min_records_per_day,
        }
    }

    /// Threshold registry with the configured overrides applied.
    pub fn registry(&self) -> ThresholdRegistry {
        ThresholdRegistry::default().with_oil_max_polar_percentage(self.oil_max_polar_percentage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            cors_origins: vec![],
            request_timeout_secs: 30,
            oil_max_polar_percentage: 20.0,
            temperature_min_records_per_day: 3,
        }
    }

    #[test]
    fn registry_applies_oil_override() {
        let registry = config().registry();
        assert_eq!(registry.oil_max_polar_percentage(), 20.0);
        assert!(registry.resolve_kind("vitrine").is_ok());
    }
}
