//! Geocoder configuration

use serde::{Deserialize, Serialize};

/// Configuration for the Mapbox geocoding service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Base URL for the geocoding API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Provider access token (required)
    #[serde(default)]
    pub access_token: String,

    /// Connection timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Forward-result cache TTL in minutes (0 to disable caching)
    #[serde(default = "default_cache_ttl_minutes")]
    pub cache_ttl_minutes: u32,

    /// Use the permanent endpoint (enterprise plans; enables batch geocoding)
    #[serde(default)]
    pub permanent_endpoint: bool,
}

fn default_base_url() -> String {
    "https://api.mapbox.com".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_cache_ttl_minutes() -> u32 {
    60
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_token: String::new(),
            timeout_secs: default_timeout_secs(),
            cache_ttl_minutes: default_cache_ttl_minutes(),
            permanent_endpoint: false,
        }
    }
}

impl GeocoderConfig {
    /// Create a configuration with the given access token and defaults otherwise
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            ..Default::default()
        }
    }

    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            access_token: "pk.test".to_string(),
            timeout_secs: 5,
            cache_ttl_minutes: 0,
            ..Default::default()
        }
    }

    /// Check if forward-result caching is enabled
    #[must_use]
    pub const fn caching_enabled(&self) -> bool {
        self.cache_ttl_minutes > 0
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if self.access_token.is_empty() {
            return Err("access_token must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeocoderConfig::default();
        assert_eq!(config.base_url, "https://api.mapbox.com");
        assert!(config.access_token.is_empty());
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.cache_ttl_minutes, 60);
        assert!(!config.permanent_endpoint);
    }

    #[test]
    fn test_new_sets_token() {
        let config = GeocoderConfig::new("pk.abc123");
        assert_eq!(config.access_token, "pk.abc123");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_testing_config() {
        let config = GeocoderConfig::for_testing();
        assert_eq!(config.timeout_secs, 5);
        assert!(!config.caching_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_caching_enabled() {
        let mut config = GeocoderConfig::new("pk.test");
        assert!(config.caching_enabled());

        config.cache_ttl_minutes = 0;
        assert!(!config.caching_enabled());
    }

    #[test]
    fn test_validation_empty_token() {
        let config = GeocoderConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_empty_base_url() {
        let config = GeocoderConfig {
            base_url: String::new(),
            ..GeocoderConfig::new("pk.test")
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let config = GeocoderConfig {
            timeout_secs: 0,
            ..GeocoderConfig::new("pk.test")
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let config = GeocoderConfig::new("pk.test");
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: GeocoderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.base_url, config.base_url);
        assert_eq!(deserialized.access_token, config.access_token);
        assert_eq!(deserialized.cache_ttl_minutes, config.cache_ttl_minutes);
    }

    #[test]
    fn test_deserialization_defaults() {
        let config: GeocoderConfig =
            serde_json::from_str(r#"{ "access_token": "pk.test" }"#).unwrap();
        assert_eq!(config.base_url, "https://api.mapbox.com");
        assert_eq!(config.timeout_secs, 10);
        assert!(!config.permanent_endpoint);
    }
}
