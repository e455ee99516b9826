//! Geocoding domain models
//!
//! Typed representations of decoded geocoding results: coordinates, bounding
//! boxes, placemark scopes, and placemarks with their hierarchical address
//! containment.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GeocodingError;

/// A geographic coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    latitude: f64,
    /// Longitude in degrees (-180 to 180)
    longitude: f64,
}

/// Error type for invalid coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidCoordinates;

impl fmt::Display for InvalidCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180"
        )
    }
}

impl std::error::Error for InvalidCoordinates {}

impl From<InvalidCoordinates> for GeocodingError {
    fn from(err: InvalidCoordinates) -> Self {
        Self::InvalidOptions(err.to_string())
    }
}

impl Coordinate {
    /// Create a new coordinate with validation
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoordinates` if latitude is not in [-90, 90]
    /// or longitude is not in [-180, 180]
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinates> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidCoordinates);
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Create a coordinate without validation (for trusted sources)
    ///
    /// # Safety
    ///
    /// Caller must ensure latitude is in [-90, 90] and longitude in [-180, 180]
    #[must_use]
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Get the latitude
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Get the longitude
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// A rectangular geographic region given by its south-west and north-east corners
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// South-west corner
    pub south_west: Coordinate,
    /// North-east corner
    pub north_east: Coordinate,
}

impl BoundingBox {
    /// Create a bounding box from its corners
    #[must_use]
    pub const fn new(south_west: Coordinate, north_east: Coordinate) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Check whether a coordinate lies within this box
    #[must_use]
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        (self.south_west.latitude()..=self.north_east.latitude())
            .contains(&coordinate.latitude())
            && (self.south_west.longitude()..=self.north_east.longitude())
                .contains(&coordinate.longitude())
    }
}

/// The administrative/semantic level of a geocoding feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceScope {
    /// A sovereign state
    Country,
    /// A first-level administrative division (state, province)
    Region,
    /// A postal code area
    Postcode,
    /// A second-level division used in some countries
    District,
    /// A city, town, or village
    Place,
    /// An official sub-city division
    Locality,
    /// A colloquial sub-city area
    Neighborhood,
    /// An individual street address
    Address,
    /// A point of interest (business, landmark, venue)
    PointOfInterest,
    /// A prominent landmark POI
    Landmark,
    /// A feature type this crate does not recognize
    Unknown,
}

impl PlaceScope {
    /// Map a provider feature identifier (e.g. `"poi.123"`, `"poi.landmark.42"`)
    /// to a scope
    #[must_use]
    pub fn from_identifier(id: &str) -> Self {
        let mut parts = id.split('.');
        match (parts.next(), parts.next()) {
            (Some("poi"), Some("landmark")) => Self::Landmark,
            (Some("poi"), _) => Self::PointOfInterest,
            (Some("country"), _) => Self::Country,
            (Some("region"), _) => Self::Region,
            (Some("postcode"), _) => Self::Postcode,
            (Some("district"), _) => Self::District,
            (Some("place"), _) => Self::Place,
            (Some("locality"), _) => Self::Locality,
            (Some("neighborhood"), _) => Self::Neighborhood,
            (Some("address"), _) => Self::Address,
            _ => Self::Unknown,
        }
    }

    /// Provider string for the `types` query parameter
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::Region => "region",
            Self::Postcode => "postcode",
            Self::District => "district",
            Self::Place => "place",
            Self::Locality => "locality",
            Self::Neighborhood => "neighborhood",
            Self::Address => "address",
            Self::PointOfInterest => "poi",
            Self::Landmark => "poi.landmark",
            Self::Unknown => "unknown",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Country => "Country",
            Self::Region => "Region",
            Self::Postcode => "Postal code",
            Self::District => "District",
            Self::Place => "Place",
            Self::Locality => "Locality",
            Self::Neighborhood => "Neighborhood",
            Self::Address => "Address",
            Self::PointOfInterest => "Point of interest",
            Self::Landmark => "Landmark",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for PlaceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One level of a placemark's address hierarchy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddressComponent {
    /// Component name (e.g. "Kansas", "United States")
    pub name: String,
    /// Short code where the provider supplies one (e.g. "US", "US-KS")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl AddressComponent {
    /// Create a component with just a name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: None,
        }
    }

    /// Attach a short code
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl fmt::Display for AddressComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Postal-address projection of a placemark
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostalAddress {
    /// Street line including the house number where known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    /// City or town
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// State, province, or other administrative region
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Postal code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    /// Country name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// ISO 3166-1 alpha-2 country code, upper-cased
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

/// A decoded geocoding result representing one place
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Placemark {
    /// Provider feature identifier (e.g. "poi.123")
    pub id: String,
    /// Place name
    pub name: String,
    /// Fully qualified, comma-separated name including the containment hierarchy
    pub qualified_name: String,
    /// Administrative/semantic level of this placemark
    pub scope: PlaceScope,
    /// Provider relevance score for forward matches (0 to 1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance: Option<f64>,
    /// Representative point location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Coordinate>,
    /// Geographic extent, for features that cover an area
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<BoundingBox>,
    /// Containing country
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<AddressComponent>,
    /// Containing administrative region (state, province)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<AddressComponent>,
    /// Containing district
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<AddressComponent>,
    /// Containing place (city, town, village)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place: Option<AddressComponent>,
    /// Containing locality
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<AddressComponent>,
    /// Containing neighborhood
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<AddressComponent>,
    /// Containing postal code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<AddressComponent>,
    /// Street name (populated for address-scoped placemarks)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thoroughfare: Option<String>,
    /// House number (populated for address-scoped placemarks)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_thoroughfare: Option<String>,
    /// Street line reported by the provider for POIs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    /// POI category (e.g. "restaurant")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Maki icon name for POIs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maki: Option<String>,
}

impl Placemark {
    /// Create a placemark with the required fields; everything else starts empty
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        qualified_name: impl Into<String>,
        scope: PlaceScope,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            qualified_name: qualified_name.into(),
            scope,
            relevance: None,
            location: None,
            bounds: None,
            country: None,
            region: None,
            district: None,
            place: None,
            locality: None,
            neighborhood: None,
            postal_code: None,
            thoroughfare: None,
            sub_thoroughfare: None,
            street: None,
            category: None,
            maki: None,
        }
    }

    /// Project this placemark onto a postal address
    #[must_use]
    pub fn postal_address(&self) -> PostalAddress {
        let street = if self.scope == PlaceScope::Address {
            match (&self.sub_thoroughfare, &self.thoroughfare) {
                (Some(number), Some(street)) => Some(format!("{number} {street}")),
                (None, Some(street)) => Some(street.clone()),
                _ => None,
            }
        } else {
            self.street.clone()
        };

        PostalAddress {
            street,
            city: self.place.as_ref().map(|c| c.name.clone()),
            state: self.region.as_ref().map(|c| c.name.clone()),
            postal_code: self.postal_code.as_ref().map(|c| c.name.clone()),
            country: self.country.as_ref().map(|c| c.name.clone()),
            country_code: self.country.as_ref().and_then(|c| c.code.clone()),
        }
    }
}

impl fmt::Display for Placemark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.qualified_name.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}", self.qualified_name)
        }
    }
}

/// Result of one geocoding request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeResult {
    /// Decoded placemarks, in provider order (most relevant first)
    pub placemarks: Vec<Placemark>,
    /// Provider-mandated attribution text (empty when the provider omits it)
    pub attribution: String,
}

impl GeocodeResult {
    /// Create a result with no placemarks
    #[must_use]
    pub fn empty() -> Self {
        Self {
            placemarks: Vec::new(),
            attribution: String::new(),
        }
    }
}
