//! Process configuration, read from the environment.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

use arbitra_infra::verdict::DEFAULT_VERDICT_TIMEOUT;
use arbitra_infra::{HearingServiceConfig, DEFAULT_MAX_WRITE_ATTEMPTS};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEV_JWT_SECRET: &str = "dev-secret";

/// Runtime configuration for the API process.
///
/// Secrets are redacted from the `Debug` output.
#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    /// Unset selects the in-memory case repository.
    pub database_url: Option<String>,
    /// Unset selects the canned verdict generator.
    pub verdict_generator_url: Option<String>,
    pub verdict_generator_api_key: Option<String>,
    pub verdict_timeout: Duration,
    pub max_write_attempts: u32,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("jwt_secret", &"[REDACTED]")
            .field("database_url", &self.database_url.as_ref().map(|_| "[REDACTED]"))
            .field("verdict_generator_url", &self.verdict_generator_url)
            .field(
                "verdict_generator_api_key",
                &self.verdict_generator_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("verdict_timeout", &self.verdict_timeout)
            .field("max_write_attempts", &self.max_write_attempts)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            database_url: None,
            verdict_generator_url: None,
            verdict_generator_api_key: None,
            verdict_timeout: DEFAULT_VERDICT_TIMEOUT,
            max_write_attempts: DEFAULT_MAX_WRITE_ATTEMPTS,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `BIND_ADDR` (default: `0.0.0.0:8080`)
    /// - `JWT_SECRET` (default: an insecure dev secret, with a warning)
    /// - `DATABASE_URL` (optional)
    /// - `VERDICT_GENERATOR_URL` (optional)
    /// - `VERDICT_GENERATOR_API_KEY` (optional)
    /// - `VERDICT_TIMEOUT_SECS` (default: 30)
    /// - `MAX_WRITE_ATTEMPTS` (default: 5)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = var("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address such as 0.0.0.0:8080")?;

        let jwt_secret = var("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        let verdict_timeout = match var("VERDICT_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw
                    .parse::<u64>()
                    .with_context(|| format!("VERDICT_TIMEOUT_SECS is not a number: {raw}"))?;
                anyhow::ensure!(secs > 0, "VERDICT_TIMEOUT_SECS must be positive");
                Duration::from_secs(secs)
            }
            None => DEFAULT_VERDICT_TIMEOUT,
        };

        let max_write_attempts = match var("MAX_WRITE_ATTEMPTS") {
            Some(raw) => {
                let n = raw
                    .parse::<u32>()
                    .with_context(|| format!("MAX_WRITE_ATTEMPTS is not a number: {raw}"))?;
                anyhow::ensure!(n > 0, "MAX_WRITE_ATTEMPTS must be at least 1");
                n
            }
            None => DEFAULT_MAX_WRITE_ATTEMPTS,
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            database_url: var("DATABASE_URL"),
            verdict_generator_url: var("VERDICT_GENERATOR_URL"),
            verdict_generator_api_key: var("VERDICT_GENERATOR_API_KEY"),
            verdict_timeout,
            max_write_attempts,
        })
    }

    pub fn service_config(&self) -> HearingServiceConfig {
        HearingServiceConfig {
            verdict_timeout: self.verdict_timeout,
            max_write_attempts: self.max_write_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.jwt_secret, DEV_JWT_SECRET);
        assert!(config.database_url.is_none());
        assert!(config.verdict_generator_url.is_none());
        assert_eq!(config.verdict_timeout, Duration::from_secs(30));
        assert_eq!(config.max_write_attempts, 5);
    }

    #[test]
    fn explicit_values_are_parsed() {
        let config = load(&[
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("JWT_SECRET", "s3cret"),
            ("DATABASE_URL", "postgres://localhost/arbitra"),
            ("VERDICT_GENERATOR_URL", "http://oracle.local/verdict"),
            ("VERDICT_GENERATOR_API_KEY", "k"),
            ("VERDICT_TIMEOUT_SECS", "7"),
            ("MAX_WRITE_ATTEMPTS", "9"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/arbitra"));
        assert_eq!(config.verdict_generator_api_key.as_deref(), Some("k"));
        assert_eq!(config.service_config().verdict_timeout, Duration::from_secs(7));
        assert_eq!(config.service_config().max_write_attempts, 9);
    }

    #[test]
    fn malformed_numbers_are_reported() {
        let err = load(&[("VERDICT_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("VERDICT_TIMEOUT_SECS"));

        assert!(load(&[("MAX_WRITE_ATTEMPTS", "0")]).is_err());
        assert!(load(&[("BIND_ADDR", "not an address")]).is_err());
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = load(&[("JWT_SECRET", "top-secret"), ("DATABASE_URL", "postgres://u:pw@h/db")])
            .unwrap();
        let printed = format!("{config:?}");
        assert!(!printed.contains("top-secret"));
        assert!(!printed.contains("pw@h"));
    }
}
