//! Turns loosely typed caller input into validated [`ServiceParameters`].
//!
//! The input is the host's generic value, seen through `serde_json::Value`.
//! Parsing stops at the first problem and reports it as a [`ParameterError`];
//! nothing partially built ever escapes.

use crate::coordinate::{Bearing, Coordinate, CoordinateError, Hint, Radius};
use crate::error::ParameterError;
use crate::parameters::{
    BaseParameters, MatchParameters, NearestParameters, RouteParameters, Service,
    ServiceParameters, TableParameters, TileParameters, TripParameters,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

type Object = Map<String, Value>;

/// Highest zoom level whose tile grid still fits in `u32`.
const MAX_TILE_ZOOM: u32 = 30;

/// Parse the parameters for `service`.
pub fn parse(service: Service, input: &Value) -> Result<ServiceParameters, ParameterError> {
    Ok(match service {
        Service::Route => ServiceParameters::Route(parse_route(input)?),
        Service::Nearest => ServiceParameters::Nearest(parse_nearest(input)?),
        Service::Table => ServiceParameters::Table(parse_table(input)?),
        Service::Match => ServiceParameters::Match(parse_match(input)?),
        Service::Trip => ServiceParameters::Trip(parse_trip(input)?),
        Service::Tile => ServiceParameters::Tile(parse_tile(input)?),
    })
}

pub fn parse_route(input: &Value) -> Result<RouteParameters, ParameterError> {
    let obj = as_object(input)?;
    let base = parse_base(obj, required_coordinates(obj)?)?;
    let count = base.coordinates.len();

    let mut params = RouteParameters::new(base);
    params.alternatives = flag(obj, "alternatives")?.unwrap_or(false);
    params.steps = flag(obj, "steps")?.unwrap_or(false);
    params.annotations = flag(obj, "annotations")?.unwrap_or(false);
    params.geometries = variant(obj, "geometries", "polyline, geojson")?.unwrap_or_default();
    params.overview = variant(obj, "overview", "simplified, full, false")?.unwrap_or_default();
    params.continue_straight = flag(obj, "continue_straight")?;
    params.uturns = parallel(obj, "uturns", count, |i, v| match v {
        Value::Bool(b) => Ok(*b),
        _ => Err(ParameterError::InvalidUturn(i)),
    })?;
    params.checksum = match obj.get("checksum") {
        None => None,
        Some(v) => Some(
            v.as_u64()
                .and_then(|c| u32::try_from(c).ok())
                .ok_or(ParameterError::WrongType {
                    field: "checksum",
                    expected: "unsigned integer",
                })?,
        ),
    };

    at_least_two(count)?;
    Ok(params)
}

pub fn parse_nearest(input: &Value) -> Result<NearestParameters, ParameterError> {
    let obj = as_object(input)?;
    let base = parse_base(obj, required_coordinates(obj)?)?;

    let number = match obj.get("number") {
        None => 1,
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .filter(|&n| n >= 1)
            .ok_or(ParameterError::WrongType {
                field: "number",
                expected: "positive integer",
            })?,
    };

    match base.coordinates.len() {
        0 => Err(ParameterError::NoCoordinates),
        1 => Ok(NearestParameters { base, number }),
        _ => Err(ParameterError::ExactlyOneCoordinate),
    }
}

pub fn parse_table(input: &Value) -> Result<TableParameters, ParameterError> {
    let obj = as_object(input)?;
    let sources = obj.get("sources");
    let destinations = obj.get("destinations");

    let (base, source_indices, destination_indices) = match (sources, destinations) {
        (None, None) => {
            let base = parse_base(obj, required_coordinates(obj)?)?;
            let all: Vec<usize> = (0..base.coordinates.len()).collect();
            (base, all.clone(), all)
        }
        (Some(_), None) | (None, Some(_)) => {
            return Err(ParameterError::SourcesAndDestinations);
        }
        (Some(sources), Some(destinations)) => match obj.get("coordinates") {
            Some(coordinates) => {
                let coordinates = parse_coordinates("coordinates", coordinates)?;
                let count = coordinates.len();
                let sources = parse_indices("sources", sources, count)?;
                let destinations = parse_indices("destinations", destinations, count)?;
                (parse_base(obj, coordinates)?, sources, destinations)
            }
            None => {
                // Sources come first, then destinations, in one coordinate list.
                let mut coordinates = parse_coordinates("sources", sources)?;
                let source_count = coordinates.len();
                coordinates.extend(parse_coordinates("destinations", destinations)?);
                let total = coordinates.len();
                (
                    parse_base(obj, coordinates)?,
                    (0..source_count).collect(),
                    (source_count..total).collect(),
                )
            }
        },
    };

    at_least_two(base.coordinates.len())?;
    if source_indices.is_empty() {
        return Err(ParameterError::EmptyTableRole("sources"));
    }
    if destination_indices.is_empty() {
        return Err(ParameterError::EmptyTableRole("destinations"));
    }
    Ok(TableParameters::from_indices(
        base,
        source_indices,
        destination_indices,
    ))
}

pub fn parse_match(input: &Value) -> Result<MatchParameters, ParameterError> {
    let obj = as_object(input)?;
    let base = parse_base(obj, required_coordinates(obj)?)?;
    let count = base.coordinates.len();

    let timestamps = parallel(obj, "timestamps", count, |i, v| {
        v.as_u64().ok_or(ParameterError::InvalidTimestamp(i))
    })?;
    let params = MatchParameters {
        base,
        timestamps,
        classify: flag(obj, "classify")?.unwrap_or(false),
        steps: flag(obj, "steps")?.unwrap_or(false),
        geometries: variant(obj, "geometries", "polyline, geojson")?.unwrap_or_default(),
        overview: variant(obj, "overview", "simplified, full, false")?.unwrap_or_default(),
    };

    at_least_two(count)?;
    Ok(params)
}

pub fn parse_trip(input: &Value) -> Result<TripParameters, ParameterError> {
    let obj = as_object(input)?;
    let base = parse_base(obj, required_coordinates(obj)?)?;
    let count = base.coordinates.len();

    let params = TripParameters {
        base,
        steps: flag(obj, "steps")?.unwrap_or(false),
        geometries: variant(obj, "geometries", "polyline, geojson")?.unwrap_or_default(),
        overview: variant(obj, "overview", "simplified, full, false")?.unwrap_or_default(),
    };

    at_least_two(count)?;
    Ok(params)
}

/// Accepts `{x, y, z}` or the `[x, y, z]` shorthand.
pub fn parse_tile(input: &Value) -> Result<TileParameters, ParameterError> {
    let component = |name: &'static str, value: Option<&Value>| -> Result<u32, ParameterError> {
        let value = value.ok_or(ParameterError::MissingField(name))?;
        value
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or(ParameterError::TileField(name))
    };

    let (x, y, z) = match input {
        Value::Object(obj) => (
            component("x", obj.get("x"))?,
            component("y", obj.get("y"))?,
            component("z", obj.get("z"))?,
        ),
        Value::Array(xyz) if xyz.len() == 3 => (
            component("x", xyz.first())?,
            component("y", xyz.get(1))?,
            component("z", xyz.get(2))?,
        ),
        _ => return Err(ParameterError::TileShape),
    };

    if z > MAX_TILE_ZOOM || u64::from(x) >= 1u64 << z || u64::from(y) >= 1u64 << z {
        return Err(ParameterError::TileOutOfRange { x, y, z });
    }
    Ok(TileParameters { x, y, z })
}

fn as_object(input: &Value) -> Result<&Object, ParameterError> {
    input.as_object().ok_or(ParameterError::NotAnObject)
}

fn required_coordinates(obj: &Object) -> Result<Vec<Coordinate>, ParameterError> {
    let coordinates = obj
        .get("coordinates")
        .ok_or(ParameterError::MissingField("coordinates"))?;
    parse_coordinates("coordinates", coordinates)
}

fn at_least_two(count: usize) -> Result<(), ParameterError> {
    match count {
        0 => Err(ParameterError::NoCoordinates),
        1 => Err(ParameterError::TooFewCoordinates),
        _ => Ok(()),
    }
}

/// Parse an array of `[lon, lat]` pairs.
fn parse_coordinates(field: &'static str, value: &Value) -> Result<Vec<Coordinate>, ParameterError> {
    let pairs = value
        .as_array()
        .ok_or(ParameterError::CoordinatesNotArray(field))?;

    pairs
        .iter()
        .enumerate()
        .map(|(index, pair)| {
            let pair = pair
                .as_array()
                .ok_or(ParameterError::CoordinateNotArray { field, index })?;
            if pair.len() != 2 {
                return Err(ParameterError::CoordinateLength {
                    field,
                    index,
                    len: pair.len(),
                });
            }
            let (lon, lat) = match (pair[0].as_f64(), pair[1].as_f64()) {
                (Some(lon), Some(lat)) => (lon, lat),
                _ => return Err(ParameterError::CoordinateNotNumber { field, index }),
            };
            Coordinate::new(lon, lat).map_err(|e| match e {
                CoordinateError::NotFinite => ParameterError::CoordinateNotFinite { field, index },
                CoordinateError::Longitude(value) => ParameterError::LongitudeOutOfRange {
                    field,
                    index,
                    value,
                },
                CoordinateError::Latitude(value) => ParameterError::LatitudeOutOfRange {
                    field,
                    index,
                    value,
                },
            })
        })
        .collect()
}

/// Shared optional fields, validated against an already parsed coordinate list.
fn parse_base(obj: &Object, coordinates: Vec<Coordinate>) -> Result<BaseParameters, ParameterError> {
    let count = coordinates.len();
    let mut base = BaseParameters::new(coordinates);

    base.bearings = parallel(obj, "bearings", count, parse_bearing)?;
    base.hints = parallel(obj, "hints", count, |i, v| {
        let token = v
            .as_str()
            .filter(|s| !s.is_empty())
            .ok_or(ParameterError::InvalidHint(i))?;
        Hint::decode(token).ok_or(ParameterError::UndecodableHint(i))
    })?;
    base.radiuses = parallel(obj, "radiuses", count, |i, v| {
        v.as_f64()
            .and_then(Radius::new)
            .ok_or(ParameterError::InvalidRadius(i))
    })?;
    base.generate_hints = flag(obj, "generate_hints")?.unwrap_or(true);

    Ok(base)
}

/// Parse an optional per-coordinate array. Missing yields an empty vector,
/// `null` elements yield `None`.
fn parallel<T>(
    obj: &Object,
    field: &'static str,
    count: usize,
    element: impl Fn(usize, &Value) -> Result<T, ParameterError>,
) -> Result<Vec<Option<T>>, ParameterError> {
    let Some(value) = obj.get(field) else {
        return Ok(Vec::new());
    };
    let items = value.as_array().ok_or(ParameterError::NotAnArray(field))?;
    if items.len() != count {
        return Err(ParameterError::LengthMismatch {
            field,
            expected: count,
            actual: items.len(),
        });
    }

    items
        .iter()
        .enumerate()
        .map(|(i, v)| match v {
            Value::Null => Ok(None),
            v => element(i, v).map(Some),
        })
        .collect()
}

fn parse_bearing(index: usize, value: &Value) -> Result<Bearing, ParameterError> {
    let component = |v: &Value| -> Result<u16, ParameterError> {
        if !v.is_number() {
            return Err(ParameterError::BearingShape(index));
        }
        v.as_u64()
            .and_then(|n| u16::try_from(n).ok())
            .ok_or(ParameterError::BearingOutOfRange(index))
    };

    let (value, range) = match value {
        Value::Number(_) => (component(value)?, None),
        Value::Array(pair) if pair.len() == 2 => (component(&pair[0])?, Some(component(&pair[1])?)),
        _ => return Err(ParameterError::BearingShape(index)),
    };
    Bearing::new(value, range).ok_or(ParameterError::BearingOutOfRange(index))
}

fn parse_indices(
    field: &'static str,
    value: &Value,
    count: usize,
) -> Result<Vec<usize>, ParameterError> {
    let items = value.as_array().ok_or(ParameterError::NotAnArray(field))?;
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            if item.is_array() {
                // Coordinates by role alongside an explicit coordinate list.
                return Err(ParameterError::SourcesOrCoordinates);
            }
            item.as_u64()
                .and_then(|i| usize::try_from(i).ok())
                .filter(|&i| i < count)
                .ok_or(ParameterError::IndexOutOfRange {
                    field,
                    index,
                    count,
                })
        })
        .collect()
}

fn flag(obj: &Object, field: &'static str) -> Result<Option<bool>, ParameterError> {
    match obj.get(field) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(ParameterError::WrongType {
            field,
            expected: "boolean",
        }),
    }
}

fn variant<T: DeserializeOwned>(
    obj: &Object,
    field: &'static str,
    allowed: &'static str,
) -> Result<Option<T>, ParameterError> {
    obj.get(field)
        .map(|v| {
            serde_json::from_value(v.clone())
                .map_err(|_| ParameterError::UnknownVariant { field, allowed })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::{Geometries, Overview};
    use serde_json::json;

    fn two() -> Value {
        json!([[13.388860, 52.517037], [13.397634, 52.529407]])
    }

    #[test]
    fn test_route_minimal() {
        let params = parse_route(&json!({"coordinates": two()})).unwrap();
        assert_eq!(params.base.coordinates.len(), 2);
        assert_eq!(params.base.coordinates[0].lon(), 13.388860);
        assert_eq!(params.base.coordinates[0].lat(), 52.517037);
        assert!(params.base.bearings.is_empty());
        assert!(!params.alternatives);
    }

    #[test]
    fn test_route_rejects_bad_uturn() {
        let err = parse_route(&json!({
            "coordinates": two(),
            "uturns": [null, "yes"]
        }))
        .unwrap_err();
        assert_eq!(err, ParameterError::InvalidUturn(1));
        assert_eq!(err.to_string(), "uturns[1] must be null or a boolean");
    }

    #[test]
    fn test_route_options() {
        let params = parse_route(&json!({
            "coordinates": two(),
            "alternatives": true,
            "steps": true,
            "geometries": "geojson",
            "overview": "false",
            "continue_straight": false,
            "uturns": [true, null],
            "checksum": 42,
            "unknown": {"is": "ignored"}
        }))
        .unwrap();
        assert!(params.alternatives);
        assert!(params.steps);
        assert_eq!(params.geometries, Geometries::GeoJson);
        assert_eq!(params.overview, Overview::False);
        assert_eq!(params.continue_straight, Some(false));
        assert_eq!(params.uturns, vec![Some(true), None]);
        assert_eq!(params.checksum, Some(42));
    }

    #[test]
    fn test_not_an_object() {
        assert_eq!(parse_route(&Value::Null), Err(ParameterError::NotAnObject));
        assert_eq!(parse_trip(&json!([1, 2])), Err(ParameterError::NotAnObject));
    }

    #[test]
    fn test_coordinate_check_order() {
        assert_eq!(
            parse_route(&json!({})),
            Err(ParameterError::MissingField("coordinates"))
        );
        assert_eq!(
            parse_route(&json!({"coordinates": null})),
            Err(ParameterError::CoordinatesNotArray("coordinates"))
        );
        assert_eq!(
            parse_route(&json!({"coordinates": [13.4, 52.5]})),
            Err(ParameterError::CoordinateNotArray {
                field: "coordinates",
                index: 0
            })
        );
        assert_eq!(
            parse_route(&json!({"coordinates": [[13.4], [52.5]]})),
            Err(ParameterError::CoordinateLength {
                field: "coordinates",
                index: 0,
                len: 1
            })
        );
        assert_eq!(
            parse_route(&json!({"coordinates": [[13.4, 52.5], ["a", 52.5]]})),
            Err(ParameterError::CoordinateNotNumber {
                field: "coordinates",
                index: 1
            })
        );
        assert_eq!(
            parse_route(&json!({"coordinates": [[13.4, 52.5], [13.4, 95.0]]})),
            Err(ParameterError::LatitudeOutOfRange {
                field: "coordinates",
                index: 1,
                value: 95.0
            })
        );
    }

    #[test]
    fn test_out_of_range_coordinates_rejected_for_every_service() {
        for bad in [[-180.5, 0.0], [180.5, 0.0], [0.0, 90.5], [0.0, -90.5]] {
            let input = json!({"coordinates": [bad, [13.4, 52.5]]});
            for service in [Service::Route, Service::Table, Service::Match, Service::Trip] {
                let err = parse(service, &input).unwrap_err();
                assert!(
                    matches!(
                        err,
                        ParameterError::LongitudeOutOfRange { index: 0, .. }
                            | ParameterError::LatitudeOutOfRange { index: 0, .. }
                    ),
                    "{service}: {err}"
                );
            }
        }
    }

    #[test]
    fn test_cardinality() {
        for service in [Service::Route, Service::Table, Service::Match, Service::Trip] {
            assert_eq!(
                parse(service, &json!({"coordinates": [[13.4, 52.5]]})),
                Err(ParameterError::TooFewCoordinates),
                "{service}"
            );
            assert_eq!(
                parse(service, &json!({"coordinates": []})),
                Err(ParameterError::NoCoordinates),
                "{service}"
            );
        }

        assert!(parse_nearest(&json!({"coordinates": [[13.4, 52.5]]})).is_ok());
        assert_eq!(
            parse_nearest(&json!({"coordinates": two()})),
            Err(ParameterError::ExactlyOneCoordinate)
        );
        assert_eq!(
            parse_nearest(&json!({"coordinates": []})),
            Err(ParameterError::NoCoordinates)
        );
    }

    #[test]
    fn test_parallel_array_length_mismatch_names_field() {
        for (field, value) in [
            ("bearings", json!([10])),
            ("hints", json!([null])),
            ("radiuses", json!([1.0, 2.0, 3.0])),
            ("uturns", json!([true, false, null])),
        ] {
            let mut input = json!({"coordinates": two()});
            input[field] = value;
            let err = parse_route(&input).unwrap_err();
            assert!(
                matches!(err, ParameterError::LengthMismatch { field: f, expected: 2, .. } if f == field),
                "{err}"
            );
            assert!(err.to_string().starts_with(field));
        }

        let err = parse_match(&json!({
            "coordinates": two(),
            "timestamps": [1424684612]
        }))
        .unwrap_err();
        assert_eq!(
            err,
            ParameterError::LengthMismatch {
                field: "timestamps",
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_parallel_array_must_be_array() {
        assert_eq!(
            parse_route(&json!({"coordinates": two(), "hints": null})),
            Err(ParameterError::NotAnArray("hints"))
        );
        assert_eq!(
            parse_match(&json!({"coordinates": two(), "timestamps": "timestamps"})),
            Err(ParameterError::NotAnArray("timestamps"))
        );
    }

    #[test]
    fn test_bearings() {
        let params = parse_route(&json!({
            "coordinates": two(),
            "bearings": [200, [250, 180]]
        }))
        .unwrap();
        assert_eq!(
            params.base.bearings,
            vec![
                Some(Bearing { value: 200, range: None }),
                Some(Bearing { value: 250, range: Some(180) })
            ]
        );

        let params = parse_route(&json!({"coordinates": two(), "bearings": [null, 0]})).unwrap();
        assert_eq!(params.base.bearings[0], None);

        assert_eq!(
            parse_route(&json!({"coordinates": two(), "bearings": [[400, 180], [10, 10]]})),
            Err(ParameterError::BearingOutOfRange(0))
        );
        assert_eq!(
            parse_route(&json!({"coordinates": two(), "bearings": [[10, 10], [-250, 180]]})),
            Err(ParameterError::BearingOutOfRange(1))
        );
        assert_eq!(
            parse_route(&json!({"coordinates": two(), "bearings": [[200], [250, 180]]})),
            Err(ParameterError::BearingShape(0))
        );
        assert_eq!(
            parse_route(&json!({"coordinates": two(), "bearings": [12.5, 0]})),
            Err(ParameterError::BearingOutOfRange(0))
        );
        assert_eq!(
            parse_route(&json!({"coordinates": two(), "bearings": ["north", 0]})),
            Err(ParameterError::BearingShape(0))
        );
    }

    #[test]
    fn test_hints() {
        let params = parse_route(&json!({
            "coordinates": two(),
            "hints": ["aGVsbG8gd29ybGQ", null]
        }))
        .unwrap();
        assert_eq!(params.base.hints[0].as_ref().map(Hint::data), Some(&b"hello world"[..]));
        assert_eq!(params.base.hints[1], None);

        assert_eq!(
            parse_route(&json!({"coordinates": two(), "hints": ["", null]})),
            Err(ParameterError::InvalidHint(0))
        );
        assert_eq!(
            parse_route(&json!({"coordinates": two(), "hints": [null, [13.4, 52.5]]})),
            Err(ParameterError::InvalidHint(1))
        );
        assert_eq!(
            parse_route(&json!({"coordinates": two(), "hints": ["%%%", null]})),
            Err(ParameterError::UndecodableHint(0))
        );
    }

    #[test]
    fn test_radiuses_and_timestamps() {
        let params = parse_match(&json!({
            "coordinates": two(),
            "radiuses": [4.07, null],
            "timestamps": [1424684612, 1424684616],
            "classify": true
        }))
        .unwrap();
        assert_eq!(params.base.radiuses[0].map(|r| r.meters()), Some(4.07));
        assert_eq!(params.base.radiuses[1], None);
        assert_eq!(params.timestamps, vec![Some(1424684612), Some(1424684616)]);
        assert!(params.classify);

        assert_eq!(
            parse_match(&json!({"coordinates": two(), "radiuses": [-1, 1]})),
            Err(ParameterError::InvalidRadius(0))
        );
        assert_eq!(
            parse_match(&json!({"coordinates": two(), "timestamps": ["invalid", 1]})),
            Err(ParameterError::InvalidTimestamp(0))
        );
    }

    #[test]
    fn test_scalar_option_types() {
        assert_eq!(
            parse_route(&json!({"coordinates": two(), "steps": "yes"})),
            Err(ParameterError::WrongType {
                field: "steps",
                expected: "boolean"
            })
        );
        assert_eq!(
            parse_trip(&json!({"coordinates": two(), "geometries": "wkt"})),
            Err(ParameterError::UnknownVariant {
                field: "geometries",
                allowed: "polyline, geojson"
            })
        );
        assert!(parse_nearest(&json!({"coordinates": [[0, 0]], "number": 0})).is_err());
        assert_eq!(
            parse_nearest(&json!({"coordinates": [[0, 0]], "number": 3}))
                .unwrap()
                .number,
            3
        );
    }

    #[test]
    fn test_table_all_to_all() {
        let table = parse_table(&json!({"coordinates": two()})).unwrap();
        assert_eq!(table.sources, vec![0, 1]);
        assert_eq!(table.destinations, vec![0, 1]);
        assert_eq!(table.is_source, vec![true, true]);
        assert_eq!(table.is_destination, vec![true, true]);
    }

    #[test]
    fn test_table_sources_and_destinations_by_role() {
        let table = parse_table(&json!({
            "sources": [[13.43864, 52.51993]],
            "destinations": [[13.43864, 52.51993], [13.415852, 52.513191]]
        }))
        .unwrap();
        assert_eq!(table.base.coordinates.len(), 3);
        assert_eq!(table.sources, vec![0]);
        assert_eq!(table.destinations, vec![1, 2]);
        assert_eq!(table.is_source, vec![true, false, false]);
        assert_eq!(table.is_destination, vec![false, true, true]);
        assert_eq!(table.base.coordinates[2].lon(), 13.415852);
    }

    #[test]
    fn test_table_sources_and_destinations_by_index() {
        let table = parse_table(&json!({
            "coordinates": [[13.4, 52.5], [13.41, 52.51], [13.42, 52.52]],
            "sources": [2],
            "destinations": [0, 1]
        }))
        .unwrap();
        assert_eq!(table.sources, vec![2]);
        assert_eq!(table.is_source, vec![false, false, true]);
        assert_eq!(table.is_destination, vec![true, true, false]);

        assert_eq!(
            parse_table(&json!({
                "coordinates": two(),
                "sources": [0],
                "destinations": [2]
            })),
            Err(ParameterError::IndexOutOfRange {
                field: "destinations",
                index: 0,
                count: 2
            })
        );
    }

    #[test]
    fn test_table_role_errors() {
        let pair = json!([[13.393252, 52.542648], [13.393252, 52.542648]]);
        assert_eq!(
            parse_table(&json!({"coordinates": pair, "sources": pair})),
            Err(ParameterError::SourcesAndDestinations)
        );
        assert_eq!(
            parse_table(&json!({"destinations": pair})),
            Err(ParameterError::SourcesAndDestinations)
        );
        assert_eq!(
            parse_table(&json!({"coordinates": pair, "sources": pair, "destinations": pair})),
            Err(ParameterError::SourcesOrCoordinates)
        );
    }

    #[test]
    fn test_table_rejects_empty_roles() {
        let pair = json!([[13.4, 52.5], [13.41, 52.51]]);
        assert_eq!(
            parse_table(&json!({"sources": [], "destinations": pair})),
            Err(ParameterError::EmptyTableRole("sources"))
        );
        assert_eq!(
            parse_table(&json!({"sources": pair, "destinations": []})),
            Err(ParameterError::EmptyTableRole("destinations"))
        );
        assert_eq!(
            parse_table(&json!({"coordinates": pair, "sources": [], "destinations": []})),
            Err(ParameterError::EmptyTableRole("sources"))
        );
        let err = parse_table(&json!({"coordinates": pair, "sources": [0], "destinations": []}))
            .unwrap_err();
        assert_eq!(err.to_string(), "destinations must not be empty");
    }

    #[test]
    fn test_table_parallel_arrays_follow_unified_list() {
        let err = parse_table(&json!({
            "sources": [[13.4, 52.5]],
            "destinations": [[13.41, 52.51]],
            "radiuses": [1.0]
        }))
        .unwrap_err();
        assert_eq!(
            err,
            ParameterError::LengthMismatch {
                field: "radiuses",
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_tile() {
        assert_eq!(
            parse_tile(&json!({"x": 0, "y": 0, "z": 0})),
            Ok(TileParameters { x: 0, y: 0, z: 0 })
        );
        assert_eq!(
            parse_tile(&json!([17603, 10747, 15])),
            Ok(TileParameters {
                x: 17603,
                y: 10747,
                z: 15
            })
        );
        assert_eq!(
            parse_tile(&json!({"x": 0, "y": 0})),
            Err(ParameterError::MissingField("z"))
        );
        assert_eq!(
            parse_tile(&json!({"x": -1, "y": 0, "z": 0})),
            Err(ParameterError::TileField("x"))
        );
        assert_eq!(
            parse_tile(&json!({"x": 1, "y": 0, "z": 0})),
            Err(ParameterError::TileOutOfRange { x: 1, y: 0, z: 0 })
        );
        assert_eq!(parse_tile(&json!("0/0/0")), Err(ParameterError::TileShape));
    }
}
