//! Mapbox Geocoding API client
//!
//! Forward and reverse geocoding against the
//! [Mapbox Geocoding v5 API](https://docs.mapbox.com/api/search/geocoding-v5/),
//! decoding responses into typed [`Placemark`] records with hierarchical
//! address containment (country → region → place → postal code →
//! thoroughfare) and the provider-mandated attribution text.
//!
//! # Architecture
//!
//! The crate follows a client-trait pattern. [`GeocodingClient`] defines the
//! interface for forward and reverse lookups, implemented by
//! [`MapboxGeocoder`]. [`ForwardGeocodeOptions`] and [`ReverseGeocodeOptions`]
//! translate a structured request into the provider's resource path and query
//! parameters; the response mapper decodes the JSON payload into
//! [`GeocodeResult`]s.
//!
//! # Example
//!
//! ```rust,ignore
//! use mapbox_geocoding::{
//!     ForwardGeocodeOptions, GeocoderConfig, GeocodingClient, MapboxGeocoder,
//! };
//!
//! let config = GeocoderConfig::new("pk.my-access-token");
//! let geocoder = MapboxGeocoder::new(&config)?;
//!
//! let options = ForwardGeocodeOptions::new("1600 Pennsylvania Ave NW")
//!     .with_countries(&["US"])
//!     .with_limit(3);
//! let result = geocoder.geocode(&options).await?;
//! for placemark in &result.placemarks {
//!     println!("{placemark}");
//! }
//! println!("{}", result.attribution);
//! ```

mod client;
mod config;
mod error;
mod models;
mod options;
mod response;

pub use client::{GeocodingClient, MapboxGeocoder};
pub use config::GeocoderConfig;
pub use error::GeocodingError;
pub use models::{
    AddressComponent, BoundingBox, Coordinate, GeocodeResult, InvalidCoordinates, PlaceScope,
    Placemark, PostalAddress,
};
pub use options::{ForwardBatchGeocodeOptions, ForwardGeocodeOptions, ReverseGeocodeOptions};
