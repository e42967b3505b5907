//! Client configuration.
//!
//! Browser builds read `CAREERMAP_*` variables at compile time. Native
//! callers build the struct directly.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "/api";
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Simulated round-trip latencies used by the auth stub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthLatency {
    pub google_sign_in: Duration,
    pub email_sign_in: Duration,
    pub sign_up: Duration,
    pub sign_out: Duration,
}

impl AuthLatency {
    pub const NONE: Self = Self {
        google_sign_in: Duration::ZERO,
        email_sign_in: Duration::ZERO,
        sign_up: Duration::ZERO,
        sign_out: Duration::ZERO,
    };
}

impl Default for AuthLatency {
    fn default() -> Self {
        Self {
            google_sign_in: Duration::from_millis(1000),
            email_sign_in: Duration::from_millis(800),
            sign_up: Duration::from_millis(1000),
            sign_out: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix joined with every API endpoint, without a trailing slash.
    pub api_base: String,
    /// When false, Google sign-in warns that no provider is configured and
    /// still resolves through the stub.
    pub auth_stub: bool,
    pub auth_latency: AuthLatency,
    pub health_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_owned(),
            auth_stub: true,
            auth_latency: AuthLatency::default(),
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Build config from values baked in at compile time.
    ///
    /// - `CAREERMAP_API_BASE`: default `/api`
    /// - `CAREERMAP_ENABLE_AUTH_STUB`: anything but `false` keeps the stub on
    #[must_use]
    pub fn from_build_env() -> Self {
        Self::from_values(option_env!("CAREERMAP_API_BASE"), option_env!("CAREERMAP_ENABLE_AUTH_STUB"))
    }

    fn from_values(api_base: Option<&str>, auth_stub: Option<&str>) -> Self {
        let mut config = Self::default();
        if let Some(base) = api_base.filter(|b| !b.trim().is_empty()) {
            config = config.with_api_base(base);
        }
        config.auth_stub = !matches!(auth_stub.map(str::trim), Some("false" | "0"));
        config
    }

    /// Same as `default()` but with every simulated delay removed.
    #[must_use]
    pub fn instant() -> Self {
        Self { auth_latency: AuthLatency::NONE, ..Self::default() }
    }

    #[must_use]
    pub fn with_api_base(mut self, base: &str) -> Self {
        self.api_base = base.trim().trim_end_matches('/').to_owned();
        self
    }
}
