//! Client configuration

use std::time::Duration;

use crate::constants::{ATLAS_API_BASE_URL, DEFAULT_HTTP_TIMEOUT_SECS, SERVICES_API_BASE_URL};

/// Endpoint and timeout configuration shared by the API clients.
///
/// Base URLs are overridable so tests can point the clients at a local mock
/// server; production callers use [`ClientConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the App Services admin API.
    pub services_base_url: String,
    /// Base URL of the Atlas admin API.
    pub atlas_base_url: String,
    /// Per-call HTTP timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            services_base_url: SERVICES_API_BASE_URL.to_string(),
            atlas_base_url: ATLAS_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Default production configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the App Services admin base URL.
    pub fn with_services_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.services_base_url = base_url.into();
        self
    }

    /// Override the Atlas admin base URL.
    pub fn with_atlas_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.atlas_base_url = base_url.into();
        self
    }

    /// Override the per-call HTTP timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_production_endpoints() {
        let config = ClientConfig::default();
        assert_eq!(config.services_base_url, SERVICES_API_BASE_URL);
        assert_eq!(config.atlas_base_url, ATLAS_API_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn builders_override_fields() {
        let config = ClientConfig::new()
            .with_services_base_url("http://localhost:9999")
            .with_timeout(Duration::from_secs(3));

        assert_eq!(config.services_base_url, "http://localhost:9999");
        assert_eq!(config.timeout, Duration::from_secs(3));
    }
}
