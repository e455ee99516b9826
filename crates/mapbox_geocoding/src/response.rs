//! Provider response decoding
//!
//! Maps the provider's GeoJSON-style feature collections into typed
//! [`Placemark`] records. Scope comes from the feature id prefix, the
//! containment hierarchy from the `context` entries, and the geographic
//! extent from `center` / `bbox`.

use serde::Deserialize;

use crate::error::GeocodingError;
use crate::models::{
    AddressComponent, BoundingBox, Coordinate, GeocodeResult, PlaceScope, Placemark,
};

/// Decode a single feature-collection body into a result
pub(crate) fn parse_geocode_response(body: &str) -> Result<GeocodeResult, GeocodingError> {
    let raw: RawFeatureCollection =
        serde_json::from_str(body).map_err(|e| GeocodingError::ParseError(e.to_string()))?;
    convert_collection(raw)
}

/// Decode the array-of-collections body returned by the batch endpoint
pub(crate) fn parse_batch_response(body: &str) -> Result<Vec<GeocodeResult>, GeocodingError> {
    let raw: Vec<RawFeatureCollection> =
        serde_json::from_str(body).map_err(|e| GeocodingError::ParseError(e.to_string()))?;
    raw.into_iter().map(convert_collection).collect()
}

/// Extract the provider's error message from a response body, if present
pub(crate) fn provider_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct RawErrorBody {
        message: Option<String>,
    }
    serde_json::from_str::<RawErrorBody>(body)
        .ok()
        .and_then(|raw| raw.message)
}

fn convert_collection(raw: RawFeatureCollection) -> Result<GeocodeResult, GeocodingError> {
    if let Some(message) = raw.message {
        return Err(GeocodingError::RequestFailed(message));
    }

    let placemarks = raw.features.into_iter().map(convert_feature).collect();
    Ok(GeocodeResult {
        placemarks,
        attribution: raw.attribution.unwrap_or_default(),
    })
}

/// Convert a raw feature to a typed placemark
fn convert_feature(raw: RawFeature) -> Placemark {
    let id = raw.id.unwrap_or_default();
    let scope = PlaceScope::from_identifier(&id);

    let mut placemark = Placemark::new(
        id,
        raw.text.clone().unwrap_or_default(),
        raw.place_name.unwrap_or_default(),
        scope,
    );
    placemark.relevance = raw.relevance;
    placemark.location = raw.center.as_deref().and_then(convert_point);
    placemark.bounds = raw.bbox.as_deref().and_then(convert_bounds);

    // The feature itself occupies one level of the hierarchy; the context
    // entries fill in the containing levels.
    if let Some(name) = raw.text {
        let component = AddressComponent {
            name,
            code: raw.properties.short_code.as_deref().map(str::to_uppercase),
        };
        assign_component(&mut placemark, scope, component);
    }
    for entry in raw.context {
        let entry_scope = PlaceScope::from_identifier(&entry.id);
        let component = AddressComponent {
            name: entry.text,
            code: entry.short_code.as_deref().map(str::to_uppercase),
        };
        assign_component(&mut placemark, entry_scope, component);
    }

    match scope {
        PlaceScope::Address => {
            placemark.thoroughfare = Some(placemark.name.clone());
            placemark.sub_thoroughfare = raw.address.map(HouseNumber::into_string);
        },
        PlaceScope::PointOfInterest | PlaceScope::Landmark => {
            placemark.street = raw.properties.address;
            placemark.category = raw.properties.category;
            placemark.maki = raw.properties.maki;
        },
        _ => {},
    }

    placemark
}

/// Slot a component into the placemark level matching its scope
fn assign_component(placemark: &mut Placemark, scope: PlaceScope, component: AddressComponent) {
    match scope {
        PlaceScope::Country => placemark.country = Some(component),
        PlaceScope::Region => placemark.region = Some(component),
        PlaceScope::District => placemark.district = Some(component),
        PlaceScope::Place => placemark.place = Some(component),
        PlaceScope::Locality => placemark.locality = Some(component),
        PlaceScope::Neighborhood => placemark.neighborhood = Some(component),
        PlaceScope::Postcode => placemark.postal_code = Some(component),
        _ => {},
    }
}

/// `[lon, lat]` pair to a validated coordinate
fn convert_point(pair: &[f64]) -> Option<Coordinate> {
    match pair {
        [longitude, latitude, ..] => Coordinate::new(*latitude, *longitude).ok(),
        _ => None,
    }
}

/// `[minLon, minLat, maxLon, maxLat]` to a bounding box
fn convert_bounds(bbox: &[f64]) -> Option<BoundingBox> {
    match bbox {
        [min_lon, min_lat, max_lon, max_lat, ..] => {
            let south_west = Coordinate::new(*min_lat, *min_lon).ok()?;
            let north_east = Coordinate::new(*max_lat, *max_lon).ok()?;
            Some(BoundingBox::new(south_west, north_east))
        },
        _ => None,
    }
}

// --- Raw API response types for deserialization ---

#[derive(Debug, Deserialize)]
struct RawFeatureCollection {
    #[serde(default)]
    features: Vec<RawFeature>,
    attribution: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    id: Option<String>,
    text: Option<String>,
    place_name: Option<String>,
    relevance: Option<f64>,
    address: Option<HouseNumber>,
    center: Option<Vec<f64>>,
    bbox: Option<Vec<f64>>,
    #[serde(default)]
    properties: RawProperties,
    #[serde(default)]
    context: Vec<RawContextEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct RawProperties {
    short_code: Option<String>,
    address: Option<String>,
    category: Option<String>,
    maki: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawContextEntry {
    id: String,
    text: String,
    short_code: Option<String>,
}

/// House numbers arrive as either strings or bare numbers
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HouseNumber {
    Text(String),
    Number(i64),
}

impl HouseNumber {
    fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REVERSE_BODY: &str = r#"{
        "type": "FeatureCollection",
        "query": [-95.78558, 37.13284],
        "features": [
            {
                "id": "poi.1234",
                "type": "Feature",
                "text": "Jones Jerry",
                "place_name": "Jones Jerry, 2850 CR 3100, Independence, Kansas 67301, United States",
                "relevance": 1,
                "properties": {
                    "address": "2850 CR 3100",
                    "category": "office",
                    "maki": "marker"
                },
                "center": [-95.782951, 37.128003],
                "geometry": { "type": "Point", "coordinates": [-95.782951, 37.128003] },
                "context": [
                    { "id": "place.5678", "text": "Independence" },
                    { "id": "postcode.91011", "text": "67301" },
                    { "id": "region.1213", "text": "Kansas", "short_code": "US-KS" },
                    { "id": "country.1415", "text": "United States", "short_code": "us" }
                ]
            },
            {
                "id": "place.5678",
                "type": "Feature",
                "text": "Independence",
                "place_name": "Independence, Kansas, United States",
                "bbox": [-95.927990005645, 37.033229992893, -95.594628992671, 37.35632800706],
                "center": [-95.78558, 37.13284],
                "context": [
                    { "id": "region.1213", "text": "Kansas", "short_code": "US-KS" },
                    { "id": "country.1415", "text": "United States", "short_code": "us" }
                ]
            }
        ],
        "attribution": "NOTICE: © 2016 Mapbox and its suppliers. All rights reserved."
    }"#;

    #[test]
    fn test_parse_reverse_response() {
        let result = parse_geocode_response(REVERSE_BODY).unwrap();
        assert_eq!(result.placemarks.len(), 2);
        assert_eq!(
            result.attribution,
            "NOTICE: © 2016 Mapbox and its suppliers. All rights reserved."
        );

        let poi = &result.placemarks[0];
        assert_eq!(poi.name, "Jones Jerry");
        assert_eq!(
            poi.qualified_name,
            "Jones Jerry, 2850 CR 3100, Independence, Kansas 67301, United States"
        );
        assert_eq!(poi.scope, PlaceScope::PointOfInterest);
        let location = poi.location.unwrap();
        assert!((location.latitude() - 37.128003).abs() < 1e-9);
        assert!((location.longitude() - (-95.782951)).abs() < 1e-9);
        assert_eq!(poi.country.as_ref().unwrap().name, "United States");
        assert_eq!(poi.country.as_ref().unwrap().code.as_deref(), Some("US"));
        assert_eq!(poi.region.as_ref().unwrap().name, "Kansas");
        assert_eq!(poi.place.as_ref().unwrap().name, "Independence");
        assert_eq!(poi.postal_code.as_ref().unwrap().name, "67301");
        assert!(poi.district.is_none());
        assert!(poi.thoroughfare.is_none());
        assert!(poi.sub_thoroughfare.is_none());
        assert_eq!(poi.street.as_deref(), Some("2850 CR 3100"));
        assert_eq!(poi.category.as_deref(), Some("office"));
    }

    #[test]
    fn test_parse_reverse_response_place_bounds() {
        let result = parse_geocode_response(REVERSE_BODY).unwrap();
        let place = &result.placemarks[1];
        assert_eq!(place.scope, PlaceScope::Place);

        let bounds = place.bounds.unwrap();
        assert!((bounds.south_west.latitude() - 37.033229992893).abs() < 1e-12);
        assert!((bounds.south_west.longitude() - (-95.927990005645)).abs() < 1e-12);
        assert!((bounds.north_east.latitude() - 37.35632800706).abs() < 1e-12);
        assert!((bounds.north_east.longitude() - (-95.594628992671)).abs() < 1e-12);

        // A place feature slots itself into its own hierarchy level
        assert_eq!(place.place.as_ref().unwrap().name, "Independence");
    }

    #[test]
    fn test_parse_address_feature() {
        let body = r#"{
            "features": [{
                "id": "address.4321",
                "text": "Pennsylvania Ave NW",
                "place_name": "1600 Pennsylvania Ave NW, Washington, District of Columbia 20500, United States",
                "address": "1600",
                "center": [-77.036547, 38.897675],
                "context": [
                    { "id": "place.1", "text": "Washington" },
                    { "id": "postcode.2", "text": "20500" },
                    { "id": "region.3", "text": "District of Columbia" },
                    { "id": "country.4", "text": "United States", "short_code": "us" }
                ]
            }],
            "attribution": "NOTICE"
        }"#;

        let result = parse_geocode_response(body).unwrap();
        let address = &result.placemarks[0];
        assert_eq!(address.scope, PlaceScope::Address);
        assert_eq!(address.thoroughfare.as_deref(), Some("Pennsylvania Ave NW"));
        assert_eq!(address.sub_thoroughfare.as_deref(), Some("1600"));

        let postal = address.postal_address();
        assert_eq!(postal.street.as_deref(), Some("1600 Pennsylvania Ave NW"));
        assert_eq!(postal.city.as_deref(), Some("Washington"));
        assert_eq!(postal.country_code.as_deref(), Some("US"));
    }

    #[test]
    fn test_parse_numeric_house_number() {
        let body = r#"{
            "features": [{
                "id": "address.1",
                "text": "Main St",
                "place_name": "42 Main St",
                "address": 42
            }]
        }"#;

        let result = parse_geocode_response(body).unwrap();
        assert_eq!(result.placemarks[0].sub_thoroughfare.as_deref(), Some("42"));
    }

    #[test]
    fn test_parse_country_feature_short_code() {
        let body = r#"{
            "features": [{
                "id": "country.1",
                "text": "United States",
                "place_name": "United States",
                "properties": { "short_code": "us" }
            }]
        }"#;

        let result = parse_geocode_response(body).unwrap();
        let country = &result.placemarks[0];
        assert_eq!(country.scope, PlaceScope::Country);
        assert_eq!(country.country.as_ref().unwrap().code.as_deref(), Some("US"));
    }

    #[test]
    fn test_parse_empty_features() {
        let body = r#"{ "features": [], "attribution": "NOTICE" }"#;
        let result = parse_geocode_response(body).unwrap();
        assert!(result.placemarks.is_empty());
        assert_eq!(result.attribution, "NOTICE");
    }

    #[test]
    fn test_parse_missing_attribution_defaults_empty() {
        let body = r#"{ "features": [] }"#;
        let result = parse_geocode_response(body).unwrap();
        assert!(result.attribution.is_empty());
    }

    #[test]
    fn test_parse_feature_without_center_or_context() {
        let body = r#"{
            "features": [{ "id": "place.9", "text": "Nowhere", "place_name": "Nowhere" }]
        }"#;
        let result = parse_geocode_response(body).unwrap();
        let placemark = &result.placemarks[0];
        assert!(placemark.location.is_none());
        assert!(placemark.bounds.is_none());
        assert!(placemark.country.is_none());
    }

    #[test]
    fn test_parse_unknown_scope() {
        let body = r#"{
            "features": [{ "id": "galaxy.9", "text": "Andromeda", "place_name": "Andromeda" }]
        }"#;
        let result = parse_geocode_response(body).unwrap();
        assert_eq!(result.placemarks[0].scope, PlaceScope::Unknown);
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_geocode_response("not json").is_err());
    }

    #[test]
    fn test_parse_message_body_surfaces_provider_error() {
        let body = r#"{ "message": "Not Authorized - Invalid Token" }"#;
        let err = parse_geocode_response(body).unwrap_err();
        assert!(err.to_string().contains("Invalid Token"));
    }

    #[test]
    fn test_parse_batch_response() {
        let body = r#"[
            { "features": [{ "id": "place.1", "text": "Independence", "place_name": "Independence, Kansas" }], "attribution": "NOTICE" },
            { "features": [], "attribution": "NOTICE" }
        ]"#;

        let results = parse_batch_response(body).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].placemarks.len(), 1);
        assert!(results[1].placemarks.is_empty());
    }

    #[test]
    fn test_provider_message() {
        assert_eq!(
            provider_message(r#"{ "message": "Forbidden" }"#).as_deref(),
            Some("Forbidden")
        );
        assert!(provider_message(r#"{ "features": [] }"#).is_none());
        assert!(provider_message("not json").is_none());
    }
}
