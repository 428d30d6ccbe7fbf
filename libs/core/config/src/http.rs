use crate::{env_or_default, env_parse, ConfigError, FromEnv};
use std::time::Duration;

/// Cross-cutting HTTP settings applied by the router middleware stack.
#[derive(Clone, Debug)]
pub struct HttpConfig {
    /// Allowed CORS origins. Empty means any origin.
    pub cors_allowed_origins: Vec<String>,
    pub request_timeout: Duration,
    pub body_limit_bytes: usize,
    /// Upper bound for post-shutdown cleanup (closing the pool and so on)
    pub shutdown_timeout: Duration,
}

impl HttpConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.cors_allowed_origins.is_empty()
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            cors_allowed_origins: Vec::new(),
            request_timeout: Duration::from_secs(30),
            body_limit_bytes: 10 * 1024 * 1024,
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty() && *origin != "*")
        .map(str::to_string)
        .collect()
}

impl FromEnv for HttpConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            cors_allowed_origins: parse_origins(&env_or_default("CORS_ALLOWED_ORIGIN", "*")),
            request_timeout: Duration::from_secs(env_parse(
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
            body_limit_bytes: env_parse("BODY_LIMIT_BYTES", defaults.body_limit_bytes)?,
            shutdown_timeout: Duration::from_secs(env_parse(
                "SHUTDOWN_TIMEOUT_SECS",
                defaults.shutdown_timeout.as_secs(),
            )?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 4] = [
        "CORS_ALLOWED_ORIGIN",
        "REQUEST_TIMEOUT_SECS",
        "BODY_LIMIT_BYTES",
        "SHUTDOWN_TIMEOUT_SECS",
    ];

    #[test]
    fn test_defaults_allow_any_origin() {
        temp_env::with_vars_unset(VARS, || {
            let config = HttpConfig::from_env().unwrap();
            assert!(config.allows_any_origin());
            assert_eq!(config.request_timeout, Duration::from_secs(30));
            assert_eq!(config.body_limit_bytes, 10 * 1024 * 1024);
        });
    }

    #[test]
    fn test_origin_list_is_split_and_trimmed() {
        temp_env::with_var(
            "CORS_ALLOWED_ORIGIN",
            Some("https://shop.example.com, http://localhost:3000 ,"),
            || {
                let config = HttpConfig::from_env().unwrap();
                assert_eq!(
                    config.cors_allowed_origins,
                    vec!["https://shop.example.com", "http://localhost:3000"]
                );
                assert!(!config.allows_any_origin());
            },
        );
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        temp_env::with_var("REQUEST_TIMEOUT_SECS", Some("soon"), || {
            let err = HttpConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("REQUEST_TIMEOUT_SECS"));
        });
    }
}
