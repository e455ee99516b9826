//! Geocode request options and provider query construction
//!
//! Translates a structured forward or reverse request into the provider's
//! resource path segment and query parameters. A forward request carries
//! exactly one free-text query; a reverse request exactly one coordinate.

use serde::{Deserialize, Serialize};

use crate::models::{BoundingBox, Coordinate, PlaceScope};

/// Options for a forward (text to place) geocoding request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForwardGeocodeOptions {
    /// Free-text place query
    pub query: String,
    /// Restrict results to these ISO 3166-1 alpha-2 country codes
    #[serde(default)]
    pub country_codes: Vec<String>,
    /// Bias results toward this coordinate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proximity: Option<Coordinate>,
    /// Restrict results to these scopes
    #[serde(default)]
    pub scopes: Vec<PlaceScope>,
    /// Restrict results to this bounding box
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    /// Language for result names (BCP 47 tag, e.g. "de")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Maximum number of results (the provider caps this at 10)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u8>,
    /// Whether partial queries should match (autocomplete)
    #[serde(default = "default_autocomplete")]
    pub autocomplete: bool,
}

const fn default_autocomplete() -> bool {
    true
}

impl ForwardGeocodeOptions {
    /// Create options for a single free-text query
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            country_codes: Vec::new(),
            proximity: None,
            scopes: Vec::new(),
            bounding_box: None,
            language: None,
            limit: None,
            autocomplete: true,
        }
    }

    /// Restrict results to the given country codes
    #[must_use]
    pub fn with_countries(mut self, codes: &[&str]) -> Self {
        self.country_codes = codes.iter().map(|c| (*c).to_string()).collect();
        self
    }

    /// Bias results toward a coordinate
    #[must_use]
    pub const fn with_proximity(mut self, proximity: Coordinate) -> Self {
        self.proximity = Some(proximity);
        self
    }

    /// Restrict results to the given scopes
    #[must_use]
    pub fn with_scopes(mut self, scopes: &[PlaceScope]) -> Self {
        self.scopes = scopes.to_vec();
        self
    }

    /// Restrict results to a bounding box
    #[must_use]
    pub const fn with_bounding_box(mut self, bounding_box: BoundingBox) -> Self {
        self.bounding_box = Some(bounding_box);
        self
    }

    /// Request result names in the given language
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Limit the number of results
    #[must_use]
    pub const fn with_limit(mut self, limit: u8) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Disable autocomplete matching of partial queries
    #[must_use]
    pub const fn without_autocomplete(mut self) -> Self {
        self.autocomplete = false;
        self
    }

    /// Provider resource path segment for this request
    #[must_use]
    pub fn resource_path(&self) -> String {
        format!("{}.json", encode_path_component(self.query.trim()))
    }

    /// Provider query parameters for this request
    #[must_use]
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if !self.country_codes.is_empty() {
            params.push(("country", join_country_codes(&self.country_codes)));
        }
        if let Some(proximity) = self.proximity {
            // Longitude first, three decimals, per the provider contract
            params.push((
                "proximity",
                format!("{:.3},{:.3}", proximity.longitude(), proximity.latitude()),
            ));
        }
        if let Some(bounding_box) = &self.bounding_box {
            params.push(("bbox", bbox_param(bounding_box)));
        }
        params.extend(filter_params(
            &self.scopes,
            self.language.as_deref(),
            self.limit,
        ));
        if !self.autocomplete {
            params.push(("autocomplete", "false".to_string()));
        }
        params
    }
}

/// Options for a reverse (coordinate to place) geocoding request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReverseGeocodeOptions {
    /// Coordinate to look up
    pub coordinate: Coordinate,
    /// Restrict results to these scopes
    #[serde(default)]
    pub scopes: Vec<PlaceScope>,
    /// Language for result names (BCP 47 tag)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Maximum number of results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u8>,
}

impl ReverseGeocodeOptions {
    /// Create options for a single coordinate lookup
    #[must_use]
    pub const fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            scopes: Vec::new(),
            language: None,
            limit: None,
        }
    }

    /// Restrict results to the given scopes
    #[must_use]
    pub fn with_scopes(mut self, scopes: &[PlaceScope]) -> Self {
        self.scopes = scopes.to_vec();
        self
    }

    /// Request result names in the given language
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Limit the number of results
    #[must_use]
    pub const fn with_limit(mut self, limit: u8) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Provider resource path segment for this request
    ///
    /// Longitude first, five decimal places, matching the provider's
    /// reverse-lookup path format.
    #[must_use]
    pub fn resource_path(&self) -> String {
        format!(
            "{:.5},{:.5}.json",
            self.coordinate.longitude(),
            self.coordinate.latitude()
        )
    }

    /// Provider query parameters for this request
    #[must_use]
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        filter_params(&self.scopes, self.language.as_deref(), self.limit)
    }
}

/// Options for a batch forward geocoding request (permanent endpoint only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForwardBatchGeocodeOptions {
    /// Free-text place queries, one result set per query
    pub queries: Vec<String>,
    /// Restrict results to these ISO 3166-1 alpha-2 country codes
    #[serde(default)]
    pub country_codes: Vec<String>,
    /// Restrict results to these scopes
    #[serde(default)]
    pub scopes: Vec<PlaceScope>,
    /// Language for result names (BCP 47 tag)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Maximum number of results per query
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u8>,
}

impl ForwardBatchGeocodeOptions {
    /// Create options for a set of free-text queries
    #[must_use]
    pub fn new(queries: &[&str]) -> Self {
        Self {
            queries: queries.iter().map(|q| (*q).to_string()).collect(),
            country_codes: Vec::new(),
            scopes: Vec::new(),
            language: None,
            limit: None,
        }
    }

    /// Restrict results to the given country codes
    #[must_use]
    pub fn with_countries(mut self, codes: &[&str]) -> Self {
        self.country_codes = codes.iter().map(|c| (*c).to_string()).collect();
        self
    }

    /// Restrict results to the given scopes
    #[must_use]
    pub fn with_scopes(mut self, scopes: &[PlaceScope]) -> Self {
        self.scopes = scopes.to_vec();
        self
    }

    /// Request result names in the given language
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Limit the number of results per query
    #[must_use]
    pub const fn with_limit(mut self, limit: u8) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Provider resource path segment: encoded queries joined by `;`
    #[must_use]
    pub fn resource_path(&self) -> String {
        let joined = self
            .queries
            .iter()
            .map(|q| encode_path_component(q.trim()))
            .collect::<Vec<_>>()
            .join(";");
        format!("{joined}.json")
    }

    /// Provider query parameters for this request
    #[must_use]
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if !self.country_codes.is_empty() {
            params.push(("country", join_country_codes(&self.country_codes)));
        }
        params.extend(filter_params(
            &self.scopes,
            self.language.as_deref(),
            self.limit,
        ));
        params
    }
}

/// Query parameters shared by forward and reverse requests
fn filter_params(
    scopes: &[PlaceScope],
    language: Option<&str>,
    limit: Option<u8>,
) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if !scopes.is_empty() {
        let types = scopes
            .iter()
            .map(PlaceScope::as_str)
            .collect::<Vec<_>>()
            .join(",");
        params.push(("types", types));
    }
    if let Some(language) = language {
        params.push(("language", language.to_string()));
    }
    if let Some(limit) = limit {
        params.push(("limit", limit.clamp(1, 10).to_string()));
    }
    params
}

fn join_country_codes(codes: &[String]) -> String {
    codes
        .iter()
        .map(|c| c.to_lowercase())
        .collect::<Vec<_>>()
        .join(",")
}

/// `minLon,minLat,maxLon,maxLat` as expected by the provider
fn bbox_param(bounding_box: &BoundingBox) -> String {
    format!(
        "{},{},{},{}",
        bounding_box.south_west.longitude(),
        bounding_box.south_west.latitude(),
        bounding_box.north_east.longitude(),
        bounding_box.north_east.latitude()
    )
}

/// Percent-encode a string for use as a URL path segment
///
/// Encodes all characters except unreserved characters (`A-Z`, `a-z`, `0-9`,
/// `-`, `_`, `.`, `~`).
pub(crate) fn encode_path_component(input: &str) -> String {
    let mut result = String::with_capacity(input.len() * 3);
    for c in input.chars() {
        match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' | '~' => result.push(c),
            _ => {
                for b in c.to_string().as_bytes() {
                    result.push_str(&format!("%{b:02X}"));
                }
            },
        }
    }
    result
}
