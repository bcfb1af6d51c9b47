//! Traveline service configuration

use serde::{Deserialize, Serialize};

/// Configuration for the Traveline NextBuses SIRI endpoint
#[derive(Clone, Serialize, Deserialize)]
pub struct TravelineConfig {
    /// Stop monitoring endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Requestor reference issued by Traveline (also the basic auth user)
    #[serde(default)]
    pub requestor_ref: String,

    /// API key (excluded from serialization to prevent leaks)
    #[serde(skip_serializing, default)]
    pub api_key: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with each request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl std::fmt::Debug for TravelineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TravelineConfig")
            .field("endpoint", &self.endpoint)
            .field("requestor_ref", &self.requestor_ref)
            .field("api_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

fn default_endpoint() -> String {
    "https://nextbus.mxdata.co.uk/nextbuses/1.0/1".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("next-departure/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for TravelineConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            requestor_ref: String::new(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl TravelineConfig {
    /// Create a configuration with the given credentials and default endpoint
    #[must_use]
    pub fn new(requestor_ref: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            requestor_ref: requestor_ref.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            ..Self::new("TravelineAPI999", "letmein")
        }
    }

    /// Point the client at a different endpoint
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint.is_empty() {
            return Err("endpoint must not be empty".to_string());
        }

        if self.requestor_ref.is_empty() {
            return Err("requestor_ref must not be empty".to_string());
        }

        if self.api_key.is_empty() {
            return Err("api_key must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}
