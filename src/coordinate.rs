//! Per-coordinate value types.
//!
//! Coordinates are stored as floating-point degrees in `(longitude, latitude)`
//! order. Every constructor validates, so a value of these types is always in
//! range.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;

/// Scale of the engine's fixed-point coordinate representation.
pub const COORDINATE_PRECISION: f64 = 1e6;

/// Hints are URL-safe base64, with or without padding.
const HINT_ENCODING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Why a raw coordinate pair was rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordinateError {
    NotFinite,
    Longitude(f64),
    Latitude(f64),
}

/// A WGS84 location in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    lon: f64,
    lat: f64,
}

impl Coordinate {
    pub fn new(lon: f64, lat: f64) -> Result<Self, CoordinateError> {
        if !lon.is_finite() || !lat.is_finite() {
            return Err(CoordinateError::NotFinite);
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(CoordinateError::Longitude(lon));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::Latitude(lat));
        }
        Ok(Self { lon, lat })
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// The coordinate scaled to the engine's integer representation.
    pub fn to_fixed(&self) -> (i32, i32) {
        // In range by construction, so both products fit in i32.
        (
            (self.lon * COORDINATE_PRECISION).round() as i32,
            (self.lat * COORDINATE_PRECISION).round() as i32,
        )
    }
}

/// Constrains snapping to road segments heading roughly in `value` degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bearing {
    pub value: u16,
    /// Allowed deviation from `value`; `None` lets the engine pick its default.
    pub range: Option<u16>,
}

impl Bearing {
    /// Returns `None` if either component is outside `[0, 360)`.
    pub fn new(value: u16, range: Option<u16>) -> Option<Self> {
        let valid = |v: u16| v < 360;
        (valid(value) && range.map_or(true, valid)).then_some(Self { value, range })
    }
}

/// A snapping hint returned by an earlier query.
///
/// The token is opaque to this crate; it is only checked to be decodable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    encoded: String,
    data: Vec<u8>,
}

impl Hint {
    /// Decode a hint token. Empty or malformed tokens yield `None`.
    pub fn decode(encoded: &str) -> Option<Self> {
        if encoded.is_empty() {
            return None;
        }
        let data = HINT_ENCODING.decode(encoded).ok()?;
        if data.is_empty() {
            return None;
        }
        Some(Self {
            encoded: encoded.to_string(),
            data,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Search radius in meters for snapping a coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Radius(f64);

impl Radius {
    pub fn new(meters: f64) -> Option<Self> {
        (meters.is_finite() && meters >= 0.0).then_some(Self(meters))
    }

    pub fn meters(&self) -> f64 {
        self.0
    }
}
