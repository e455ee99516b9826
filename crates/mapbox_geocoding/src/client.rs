//! Mapbox geocoding client
//!
//! HTTP client for the Mapbox Geocoding v5 API. Forward results are cached
//! (configurable TTL) to minimize token-metered API calls.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::Client;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::GeocoderConfig;
use crate::error::GeocodingError;
use crate::models::GeocodeResult;
use crate::options::{ForwardBatchGeocodeOptions, ForwardGeocodeOptions, ReverseGeocodeOptions};
use crate::response::{parse_batch_response, parse_geocode_response, provider_message};

const USER_AGENT: &str = concat!("mapbox_geocoding/", env!("CARGO_PKG_VERSION"));

/// Trait for geocoding clients
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    /// Geocode a free-text query to placemarks
    async fn geocode(
        &self,
        options: &ForwardGeocodeOptions,
    ) -> Result<GeocodeResult, GeocodingError>;

    /// Reverse-geocode a coordinate to placemarks
    async fn reverse_geocode(
        &self,
        options: &ReverseGeocodeOptions,
    ) -> Result<GeocodeResult, GeocodingError>;

    /// Check if the geocoding service is reachable
    async fn is_healthy(&self) -> bool;
}

/// Mapbox Geocoding v5 client with forward-result caching
#[derive(Debug)]
pub struct MapboxGeocoder {
    client: Client,
    config: GeocoderConfig,
    cache: Cache<String, GeocodeResult>,
}

impl MapboxGeocoder {
    /// Create a new geocoder with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodingError> {
        config.validate().map_err(GeocodingError::ConfigurationError)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GeocodingError::ConnectionFailed(e.to_string()))?;

        let cache_ttl = if config.cache_ttl_minutes > 0 {
            Duration::from_secs(u64::from(config.cache_ttl_minutes) * 60)
        } else {
            Duration::from_secs(1) // Minimal TTL when "disabled"
        };

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(cache_ttl)
            .build();

        Ok(Self {
            client,
            config: config.clone(),
            cache,
        })
    }

    /// Endpoint name within the v5 API
    const fn endpoint(&self) -> &'static str {
        if self.config.permanent_endpoint {
            "mapbox.places-permanent"
        } else {
            "mapbox.places"
        }
    }

    /// Assemble the full request URL for a resource path and its parameters
    fn request_url(
        &self,
        resource: &str,
        params: &[(&'static str, String)],
    ) -> Result<Url, GeocodingError> {
        let raw = format!(
            "{}/geocoding/v5/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.endpoint(),
            resource
        );
        let mut url =
            Url::parse(&raw).map_err(|e| GeocodingError::ConfigurationError(e.to_string()))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("access_token", &self.config.access_token);
        }
        Ok(url)
    }

    /// Execute a request and return the response body, mapping HTTP-level
    /// failures to typed errors
    async fn execute(&self, url: Url) -> Result<String, GeocodingError> {
        // Path only: the full URL carries the access token
        debug!(path = url.path(), "Sending geocoding request");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                GeocodingError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                }
            } else {
                GeocodingError::ConnectionFailed(e.to_string())
            }
        })?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());

        let body = response
            .text()
            .await
            .map_err(|e| GeocodingError::ParseError(e.to_string()))?;

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodingError::RateLimitExceeded {
                retry_after_secs: retry_after,
            });
        }
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(GeocodingError::Unauthorized(
                provider_message(&body).unwrap_or_else(|| format!("HTTP {status}")),
            ));
        }
        if status.is_server_error() {
            return Err(GeocodingError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            let detail = provider_message(&body)
                .map_or_else(|| format!("HTTP {status}"), |m| format!("HTTP {status}: {m}"));
            return Err(GeocodingError::RequestFailed(detail));
        }

        Ok(body)
    }

    /// Geocode a batch of free-text queries in one request
    ///
    /// One result is returned per query, in query order. Only available on
    /// the permanent endpoint.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOptions` when the configuration does not select the
    /// permanent endpoint or a query is empty, and the usual transport and
    /// decoding errors otherwise.
    #[instrument(skip(self), fields(queries = options.queries.len()))]
    pub async fn batch_geocode(
        &self,
        options: &ForwardBatchGeocodeOptions,
    ) -> Result<Vec<GeocodeResult>, GeocodingError> {
        if !self.config.permanent_endpoint {
            return Err(GeocodingError::InvalidOptions(
                "batch geocoding requires the permanent endpoint".to_string(),
            ));
        }
        if options.queries.is_empty() {
            return Err(GeocodingError::InvalidOptions(
                "batch queries must not be empty".to_string(),
            ));
        }
        if options.queries.iter().any(|q| q.trim().is_empty()) {
            return Err(GeocodingError::InvalidOptions(
                "batch queries must not contain empty entries".to_string(),
            ));
        }

        let url = self.request_url(&options.resource_path(), &options.query_params())?;
        let body = self.execute(url).await?;
        let results = parse_batch_response(&body)?;

        debug!(count = results.len(), "Batch geocoding results");
        Ok(results)
    }
}

#[async_trait]
impl GeocodingClient for MapboxGeocoder {
    #[instrument(skip(self), fields(query = %options.query))]
    async fn geocode(
        &self,
        options: &ForwardGeocodeOptions,
    ) -> Result<GeocodeResult, GeocodingError> {
        if options.query.trim().is_empty() {
            return Err(GeocodingError::InvalidOptions(
                "query must not be empty".to_string(),
            ));
        }

        let url = self.request_url(&options.resource_path(), &options.query_params())?;

        let cache_key = url.to_string();
        if self.config.caching_enabled() {
            if let Some(hit) = self.cache.get(&cache_key).await {
                debug!("Geocoding cache hit");
                return Ok(hit);
            }
        }

        let body = self.execute(url).await?;
        let result = parse_geocode_response(&body)?;

        if result.placemarks.is_empty() {
            warn!("No geocoding results");
        }

        if self.config.caching_enabled() {
            self.cache.insert(cache_key, result.clone()).await;
        }

        debug!(count = result.placemarks.len(), "Geocoding results");
        Ok(result)
    }

    #[instrument(skip(self), fields(coordinate = %options.coordinate))]
    async fn reverse_geocode(
        &self,
        options: &ReverseGeocodeOptions,
    ) -> Result<GeocodeResult, GeocodingError> {
        let url = self.request_url(&options.resource_path(), &options.query_params())?;

        let body = self.execute(url).await?;
        let result = parse_geocode_response(&body)?;

        if result.placemarks.is_empty() {
            warn!("No reverse geocoding results");
        }

        debug!(count = result.placemarks.len(), "Reverse geocoding results");
        Ok(result)
    }

    async fn is_healthy(&self) -> bool {
        let options = ForwardGeocodeOptions::new("Berlin").with_limit(1);
        self.geocode(&options).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = GeocoderConfig::for_testing();
        assert!(MapboxGeocoder::new(&config).is_ok());
    }

    #[test]
    fn test_client_creation_rejects_invalid_config() {
        let config = GeocoderConfig::default(); // no access token
        let result = MapboxGeocoder::new(&config);
        assert!(matches!(
            result,
            Err(GeocodingError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_endpoint_selection() {
        let config = GeocoderConfig::for_testing();
        let geocoder = MapboxGeocoder::new(&config).unwrap();
        assert_eq!(geocoder.endpoint(), "mapbox.places");

        let config = GeocoderConfig {
            permanent_endpoint: true,
            ..GeocoderConfig::for_testing()
        };
        let geocoder = MapboxGeocoder::new(&config).unwrap();
        assert_eq!(geocoder.endpoint(), "mapbox.places-permanent");
    }

    #[test]
    fn test_request_url_shape() {
        let config = GeocoderConfig::for_testing();
        let geocoder = MapboxGeocoder::new(&config).unwrap();

        let url = geocoder
            .request_url("Berlin.json", &[("limit", "1".to_string())])
            .unwrap();
        assert_eq!(url.path(), "/geocoding/v5/mapbox.places/Berlin.json");
        let query = url.query().unwrap();
        assert!(query.contains("limit=1"));
        assert!(query.contains("access_token=pk.test"));
    }

    #[test]
    fn test_request_url_trims_trailing_slash() {
        let config = GeocoderConfig {
            base_url: "https://api.mapbox.com/".to_string(),
            ..GeocoderConfig::for_testing()
        };
        let geocoder = MapboxGeocoder::new(&config).unwrap();
        let url = geocoder.request_url("Berlin.json", &[]).unwrap();
        assert_eq!(url.path(), "/geocoding/v5/mapbox.places/Berlin.json");
    }

    #[tokio::test]
    async fn test_geocode_rejects_empty_query() {
        let config = GeocoderConfig::for_testing();
        let geocoder = MapboxGeocoder::new(&config).unwrap();

        let options = ForwardGeocodeOptions::new("   ");
        let result = geocoder.geocode(&options).await;
        assert!(matches!(result, Err(GeocodingError::InvalidOptions(_))));
    }

    #[tokio::test]
    async fn test_batch_geocode_requires_permanent_endpoint() {
        let config = GeocoderConfig::for_testing();
        let geocoder = MapboxGeocoder::new(&config).unwrap();

        let options = ForwardBatchGeocodeOptions::new(&["Berlin"]);
        let result = geocoder.batch_geocode(&options).await;
        assert!(matches!(result, Err(GeocodingError::InvalidOptions(_))));
    }

    #[tokio::test]
    async fn test_batch_geocode_rejects_empty_queries() {
        let config = GeocoderConfig {
            permanent_endpoint: true,
            ..GeocoderConfig::for_testing()
        };
        let geocoder = MapboxGeocoder::new(&config).unwrap();

        let result = geocoder
            .batch_geocode(&ForwardBatchGeocodeOptions::new(&[]))
            .await;
        assert!(matches!(result, Err(GeocodingError::InvalidOptions(_))));

        let result = geocoder
            .batch_geocode(&ForwardBatchGeocodeOptions::new(&["Berlin", " "]))
            .await;
        assert!(matches!(result, Err(GeocodingError::InvalidOptions(_))));
    }
}
