//! Flattening of hydrated SmartSuite records into [`Lead`]s.
//!
//! SmartSuite hands back loosely-typed JSON whose shape depends on the field
//! type and on how the table was set up, so every accessor here is lenient:
//! anything it cannot interpret becomes an empty value rather than an error.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};

use crate::config::FieldMap;
use crate::lead::{Coordinates, Lead};

lazy_static! {
    static ref EMBEDDED_COORDS: Regex =
        Regex::new(r"(-?\d+\.?\d*),\s*(-?\d+\.?\d*)").expect("valid regex");
    static ref LEADING_INT: Regex = Regex::new(r"^\s*([+-]?\d+)").expect("valid regex");
}

/// Address and coordinates extracted from a location field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Location {
    /// Single-line address, empty when none could be built.
    pub address: String,
    /// Validated coordinates.
    pub coordinates: Option<Coordinates>,
}

/// Flatten one hydrated record into a lead.
#[must_use]
pub fn normalize_record(record: &Value, fields: &FieldMap) -> Lead {
    let field = |id: &str| record.get(id).unwrap_or(&Value::Null);

    let company = non_empty_string(field(&fields.company))
        .or_else(|| record.get("title").and_then(non_empty_string))
        .unwrap_or_default();

    let location = extract_location(field(&fields.location));

    Lead {
        company,
        address: location.address,
        coordinates: location.coordinates,
        estimated_new_jobs: parse_int(field(&fields.estimated_new_jobs)),
        activity_type: single_label(field(&fields.activity_type)),
        timeframe: single_label(field(&fields.timeframe)),
        site_type: join_labels(field(&fields.site_type)),
        specialized_industry_site: join_labels(field(&fields.specialized_industry_site)),
        onet_industry_site: join_labels(field(&fields.onet_industry_site)),
        general_lead_summary: text(field(&fields.general_lead_summary)),
        about: text(field(&fields.about)),
    }
}

/// Extract an address and coordinates from a location field of any known shape.
#[must_use]
pub fn extract_location(value: &Value) -> Location {
    match value {
        Value::Object(loc) => {
            let mut coordinates = object_coordinates(loc);
            let address = object_address(loc, &mut coordinates);
            Location {
                address,
                coordinates,
            }
        }
        Value::String(s) => {
            let coordinates = EMBEDDED_COORDS.captures(s).and_then(|caps| {
                let lat = caps.get(1)?.as_str().parse().ok()?;
                let lon = caps.get(2)?.as_str().parse().ok()?;
                Coordinates::new(lat, lon)
            });
            Location {
                address: s.clone(),
                coordinates,
            }
        }
        _ => Location::default(),
    }
}

/// Coordinates from the first matching shape, in priority order.
fn object_coordinates(loc: &Map<String, Value>) -> Option<Coordinates> {
    if has_pair(loc, "latitude", "longitude") {
        return pair(loc, "latitude", "longitude");
    }
    if has_pair(loc, "lat", "lng") {
        return pair(loc, "lat", "lng");
    }
    if let Some(coords) = loc.get("coordinates").and_then(Value::as_array) {
        if coords.len() >= 2 {
            return lon_lat_array(coords);
        }
    }
    if let Some(inner) = loc.get("location").and_then(Value::as_object) {
        return lat_lng_either(inner);
    }
    if let Some(coords) = loc
        .get("geometry")
        .and_then(|g| g.get("coordinates"))
        .and_then(Value::as_array)
    {
        return lon_lat_array(coords);
    }
    if let Some(place) = loc.get("place").and_then(Value::as_object) {
        return place
            .get("location")
            .and_then(Value::as_object)
            .and_then(|l| pair(l, "lat", "lng"));
    }
    if let Some(value) = loc.get("value").and_then(Value::as_object) {
        return lat_lng_either(value).or_else(|| {
            value
                .get("location")
                .and_then(Value::as_object)
                .and_then(|l| pair(l, "latitude", "longitude"))
        });
    }
    None
}

fn lat_lng_either(obj: &Map<String, Value>) -> Option<Coordinates> {
    if has_pair(obj, "latitude", "longitude") {
        pair(obj, "latitude", "longitude")
    } else if has_pair(obj, "lat", "lng") {
        pair(obj, "lat", "lng")
    } else {
        None
    }
}

/// Both keys present and non-null. An explicit `null` pair does not claim the
/// shape, so a later shape in the same object can still supply coordinates.
fn has_pair(obj: &Map<String, Value>, a: &str, b: &str) -> bool {
    obj.get(a).is_some_and(|v| !v.is_null()) && obj.get(b).is_some_and(|v| !v.is_null())
}

fn pair(obj: &Map<String, Value>, lat_key: &str, lon_key: &str) -> Option<Coordinates> {
    let lat = number(obj.get(lat_key)?)?;
    let lon = number(obj.get(lon_key)?)?;
    Coordinates::new(lat, lon)
}

/// GeoJSON order: `[longitude, latitude]`.
fn lon_lat_array(coords: &[Value]) -> Option<Coordinates> {
    let lon = number(coords.first()?)?;
    let lat = number(coords.get(1)?)?;
    Coordinates::new(lat, lon)
}

fn object_address(loc: &Map<String, Value>, coordinates: &mut Option<Coordinates>) -> String {
    let nested = loc.get("value").and_then(Value::as_object);
    let nested_str = |key: &str| nested.and_then(|v| v.get(key)).and_then(non_empty_string);

    if let Some(addr) = loc.get("formatted_address").and_then(non_empty_string) {
        return addr;
    }
    if let Some(addr) = loc.get("address").and_then(non_empty_string) {
        return addr;
    }
    if let Some(addr) = nested_str("formatted_address") {
        return addr;
    }
    if let Some(addr) = nested_str("address") {
        return addr;
    }

    let legacy = |key: &str| loc.get(key).and_then(non_empty_string);
    if legacy("location_address").is_some()
        || legacy("location_city").is_some()
        || legacy("location_state").is_some()
    {
        let parts: Vec<String> = [
            "location_address",
            "location_address2",
            "location_city",
            "location_state",
            "location_zip",
            "location_country",
        ]
        .iter()
        .filter_map(|key| legacy(key))
        .collect();

        if let (Some(lat), Some(lon)) = (
            loc.get("location_latitude").and_then(number),
            loc.get("location_longitude").and_then(number),
        ) {
            if let Some(c) = Coordinates::new(lat, lon) {
                *coordinates = Some(c);
            }
        }

        return parts.join(", ");
    }

    let first_of = |top: &[&str], inner: &[&str]| -> Option<String> {
        top.iter()
            .find_map(|key| loc.get(*key).and_then(non_empty_string))
            .or_else(|| inner.iter().find_map(|key| nested_str(key)))
    };

    let components = [
        first_of(
            &[
                "street_address",
                "streetAddress",
                "street",
                "location_address",
                "address1",
                "address_1",
            ],
            &["street_address", "address"],
        ),
        first_of(
            &["address2", "address_2", "location_address2"],
            &["address2"],
        ),
        first_of(&["city", "location_city", "locality"], &["city", "locality"]),
        first_of(&["state", "location_state", "region"], &["state", "region"]),
        first_of(
            &["postal_code", "postalCode", "zip", "location_zip"],
            &["postal_code"],
        ),
        first_of(&["country", "location_country"], &["country"]),
    ];

    components.into_iter().flatten().collect::<Vec<_>>().join(", ")
}

/// A numeric value from a JSON number or numeric string.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Integer from a number (truncated) or the leading digits of a string.
#[allow(clippy::cast_possible_truncation)]
fn parse_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => LEADING_INT
            .captures(s)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0),
        _ => 0,
    }
}

fn non_empty_string(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn text(value: &Value) -> String {
    value.as_str().unwrap_or_default().to_string()
}

/// Label of a single-select value: `{ "label": … }` or a plain string.
fn single_label(value: &Value) -> String {
    match value {
        Value::Object(obj) => obj
            .get("label")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        Value::String(s) => s.clone(),
        _ => String::new(),
    }
}

/// Comma-joined labels of a multi-select value.
fn join_labels(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Array(items) => items
            .iter()
            .map(label_or_self)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(obj) => {
            if let Some(label) = obj.get("label") {
                label_or_self(label)
            } else if let Some(values) = obj.get("values") {
                match values {
                    Value::Array(items) => items
                        .iter()
                        .map(label_or_self)
                        .collect::<Vec<_>>()
                        .join(", "),
                    other => scalar_string(other),
                }
            } else {
                scalar_string(value)
            }
        }
        other => scalar_string(other),
    }
}

fn label_or_self(item: &Value) -> String {
    match item.get("label") {
        Some(label) => scalar_string(label),
        None => scalar_string(item),
    }
}

fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fields() -> FieldMap {
        FieldMap::default()
    }

    #[test]
    fn test_normalize_full_record() {
        let record = json!({
            "title": "fallback title",
            "s79c2f08d9": "Acme Steel",
            "s5d25b0846": {
                "location_address": "1 Mill Rd",
                "location_city": "Pittsburgh",
                "location_state": "PA",
                "location_zip": "15201",
                "location_country": "USA",
                "location_latitude": "40.4406",
                "location_longitude": "-79.9959"
            },
            "s20f809da6": "250",
            "s560d452b4": {"label": "Expansion", "value": "x1"},
            "s8a9285317": {"label": "2025"},
            "s54a8cc7de": "Big plant",
            "sb7f0cac0e": "Steel maker",
            "s91e2ac54c": [{"label": "Manufacturing"}, {"label": "Warehouse"}],
            "s21hlm59": {"label": "Metals"},
            "s5530473fb": {"values": [{"label": "31-33"}, "42"]}
        });

        let lead = normalize_record(&record, &fields());

        assert_eq!(lead.company, "Acme Steel");
        assert_eq!(lead.address, "1 Mill Rd, Pittsburgh, PA, 15201, USA");
        assert_eq!(lead.coordinates, Coordinates::new(40.4406, -79.9959));
        assert_eq!(lead.estimated_new_jobs, 250);
        assert_eq!(lead.activity_type, "Expansion");
        assert_eq!(lead.timeframe, "2025");
        assert_eq!(lead.general_lead_summary, "Big plant");
        assert_eq!(lead.about, "Steel maker");
        assert_eq!(lead.site_type, "Manufacturing, Warehouse");
        assert_eq!(lead.specialized_industry_site, "Metals");
        assert_eq!(lead.onet_industry_site, "31-33, 42");
    }

    #[test]
    fn test_company_falls_back_to_title() {
        let lead = normalize_record(&json!({"title": "Widgets Inc"}), &fields());
        assert_eq!(lead.company, "Widgets Inc");
    }

    #[test]
    fn test_empty_record_is_blank_lead() {
        let lead = normalize_record(&json!({}), &fields());
        assert_eq!(lead, Lead::default());
    }

    #[test]
    fn test_parse_int_shapes() {
        assert_eq!(parse_int(&json!(12)), 12);
        assert_eq!(parse_int(&json!(12.9)), 12);
        assert_eq!(parse_int(&json!("35 jobs")), 35);
        assert_eq!(parse_int(&json!("n/a")), 0);
        assert_eq!(parse_int(&json!(null)), 0);
    }

    #[test]
    fn test_location_direct_lat_long() {
        let loc = extract_location(&json!({"latitude": 30.2672, "longitude": -97.7431}));
        assert_eq!(loc.coordinates, Coordinates::new(30.2672, -97.7431));
    }

    #[test]
    fn test_location_lat_lng_strings() {
        let loc = extract_location(&json!({"lat": "30.5", "lng": "-97.5"}));
        assert_eq!(loc.coordinates, Coordinates::new(30.5, -97.5));
    }

    #[test]
    fn test_location_null_pair_falls_through() {
        let loc = extract_location(&json!({
            "latitude": null,
            "longitude": null,
            "lat": 30.5,
            "lng": -97.5,
        }));
        assert_eq!(loc.coordinates, Coordinates::new(30.5, -97.5));
    }

    #[test]
    fn test_location_geojson_array() {
        let loc = extract_location(&json!({"coordinates": [-122.4194, 37.7749]}));
        assert_eq!(loc.coordinates, Coordinates::new(37.7749, -122.4194));
    }

    #[test]
    fn test_location_nested_location_object() {
        let loc = extract_location(&json!({"location": {"lat": 41.0, "lng": -87.0}}));
        assert_eq!(loc.coordinates, Coordinates::new(41.0, -87.0));
    }

    #[test]
    fn test_location_geometry() {
        let loc = extract_location(&json!({"geometry": {"coordinates": [-87.6298, 41.8781]}}));
        assert_eq!(loc.coordinates, Coordinates::new(41.8781, -87.6298));
    }

    #[test]
    fn test_location_place() {
        let loc = extract_location(&json!({"place": {"location": {"lat": 47.6, "lng": -122.3}}}));
        assert_eq!(loc.coordinates, Coordinates::new(47.6, -122.3));
    }

    #[test]
    fn test_location_value_nested() {
        let loc = extract_location(&json!({
            "value": {
                "location": {"latitude": 39.7, "longitude": -104.9},
                "formatted_address": "Denver, CO"
            }
        }));
        assert_eq!(loc.coordinates, Coordinates::new(39.7, -104.9));
        assert_eq!(loc.address, "Denver, CO");
    }

    #[test]
    fn test_location_invalid_coordinates_dropped() {
        let loc = extract_location(&json!({"latitude": 120.0, "longitude": 10.0}));
        assert_eq!(loc.coordinates, None);
    }

    #[test]
    fn test_location_formatted_address_wins() {
        let loc = extract_location(&json!({
            "formatted_address": "1 Main St, Austin, TX",
            "address": "ignored",
            "city": "ignored"
        }));
        assert_eq!(loc.address, "1 Main St, Austin, TX");
    }

    #[test]
    fn test_location_from_components() {
        let loc = extract_location(&json!({
            "street": "9 Elm St",
            "address_2": "Suite 4",
            "locality": "Boise",
            "region": "ID",
            "postalCode": "83702",
            "country": "USA"
        }));
        assert_eq!(loc.address, "9 Elm St, Suite 4, Boise, ID, 83702, USA");
        assert_eq!(loc.coordinates, None);
    }

    #[test]
    fn test_location_components_skip_blanks() {
        let loc = extract_location(&json!({"city": "  ", "locality": "Tulsa", "state": "OK"}));
        assert_eq!(loc.address, "Tulsa, OK");
    }

    #[test]
    fn test_location_string_with_coordinates() {
        let loc = extract_location(&json!("Plant site 35.4676, -97.5164"));
        assert_eq!(loc.address, "Plant site 35.4676, -97.5164");
        assert_eq!(loc.coordinates, Coordinates::new(35.4676, -97.5164));
    }

    #[test]
    fn test_location_plain_string() {
        let loc = extract_location(&json!("Columbus, OH"));
        assert_eq!(loc.address, "Columbus, OH");
        assert_eq!(loc.coordinates, None);
    }

    #[test]
    fn test_join_labels_shapes() {
        assert_eq!(join_labels(&json!(["A", {"label": "B"}])), "A, B");
        assert_eq!(join_labels(&json!({"label": "Solo"})), "Solo");
        assert_eq!(join_labels(&json!({"values": "raw"})), "raw");
        assert_eq!(join_labels(&json!(7)), "7");
        assert_eq!(join_labels(&json!(null)), "");
    }

    #[test]
    fn test_single_label_shapes() {
        assert_eq!(single_label(&json!({"label": "New"})), "New");
        assert_eq!(single_label(&json!("Plain")), "Plain");
        assert_eq!(single_label(&json!({"value": "x"})), "");
    }
}
