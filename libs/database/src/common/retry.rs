use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_parse};

/// Exponential backoff policy for establishing connections at startup.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Attempts after the first one
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: u32,
    /// Spread each delay over 50-100% of its nominal value
    pub jitter: bool,
}

impl RetryConfig {
    pub fn new(max_retries: u32, initial_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay,
            ..Self::default()
        }
    }

    pub fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    /// Nominal delay before retry number `retry` (1-based), capped at
    /// `max_delay`.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = self
            .multiplier
            .saturating_pow(retry.saturating_sub(1));
        let nominal = self.initial_delay.saturating_mul(factor).min(self.max_delay);
        if self.jitter { jittered(nominal) } else { nominal }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            multiplier: 2,
            jitter: true,
        }
    }
}

#[cfg(feature = "config")]
impl FromEnv for RetryConfig {
    /// - DB_CONNECT_RETRIES: defaults to 5
    /// - DB_RETRY_DELAY_MS: defaults to 200
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self::new(
            env_parse("DB_CONNECT_RETRIES", defaults.max_retries)?,
            Duration::from_millis(env_parse(
                "DB_RETRY_DELAY_MS",
                defaults.initial_delay.as_millis() as u64,
            )?),
        ))
    }
}

/// Scales `delay` into [50%, 100%] using the sub-second clock as entropy.
fn jittered(delay: Duration) -> Duration {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    let percent = 50 + (nanos % 51);
    delay * percent / 100
}

/// Runs `operation` until it succeeds or `config.max_retries` retries have
/// failed, sleeping with exponential backoff in between. The last error is
/// returned.
pub async fn retry_with_backoff<F, Fut, T, E>(mut operation: F, config: &RetryConfig) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut retry = 0;
    loop {
        match operation().await {
            Ok(value) => {
                if retry > 0 {
                    debug!(retries = retry, "Operation succeeded after retrying");
                }
                return Ok(value);
            }
            Err(e) if retry < config.max_retries => {
                retry += 1;
                let delay = config.delay_for(retry);
                warn!(
                    attempt = retry,
                    max_retries = config.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Operation failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                warn!(retries = retry, error = %e, "Operation failed, giving up");
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast(max_retries: u32) -> RetryConfig {
        RetryConfig::new(max_retries, Duration::from_millis(1)).without_jitter()
    }

    #[test]
    fn test_delay_grows_and_caps() {
        let config = RetryConfig {
            max_delay: Duration::from_millis(500),
            ..RetryConfig::new(10, Duration::from_millis(100)).without_jitter()
        };
        assert_eq!(config.delay_for(1), Duration::from_millis(100));
        assert_eq!(config.delay_for(2), Duration::from_millis(200));
        assert_eq!(config.delay_for(3), Duration::from_millis(400));
        assert_eq!(config.delay_for(4), Duration::from_millis(500));
        assert_eq!(config.delay_for(40), Duration::from_millis(500));
    }

    #[test]
    fn test_jitter_stays_within_bounds() {
        let config = RetryConfig::new(3, Duration::from_millis(1000));
        for retry in 1..=3 {
            let nominal = config.clone().without_jitter().delay_for(retry);
            let delay = config.delay_for(retry);
            assert!(delay >= nominal / 2 && delay <= nominal);
        }
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<&str, String> = retry_with_backoff(
            || async move {
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err("connection refused".to_string())
                } else {
                    Ok("connected")
                }
            },
            &fast(3),
        )
        .await;

        assert_eq!(result.unwrap(), "connected");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<(), String> = retry_with_backoff(
            || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err("still down".to_string())
            },
            &fast(2),
        )
        .await;

        assert_eq!(result.unwrap_err(), "still down");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env() {
        temp_env::with_vars(
            [("DB_CONNECT_RETRIES", Some("9")), ("DB_RETRY_DELAY_MS", Some("50"))],
            || {
                let config = RetryConfig::from_env().unwrap();
                assert_eq!(config.max_retries, 9);
                assert_eq!(config.initial_delay, Duration::from_millis(50));
            },
        );
    }
}
