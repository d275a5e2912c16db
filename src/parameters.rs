//! Validated query parameters, one variant per service.
//!
//! A [`ServiceParameters`] value is only ever produced by the parser, so every
//! invariant (coordinate counts, parallel array lengths, index bounds) holds for
//! the whole lifetime of the value.

use crate::coordinate::{Bearing, Coordinate, Hint, Radius};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The query services an engine exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Route,
    Nearest,
    Table,
    Match,
    Trip,
    Tile,
}

impl Service {
    pub const ALL: [Service; 6] = [
        Service::Route,
        Service::Nearest,
        Service::Table,
        Service::Match,
        Service::Trip,
        Service::Tile,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Route => "route",
            Service::Nearest => "nearest",
            Service::Table => "table",
            Service::Match => "match",
            Service::Trip => "trip",
            Service::Tile => "tile",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encoding of returned geometries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Geometries {
    #[default]
    Polyline,
    GeoJson,
}

/// How much of the route geometry to return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Overview {
    #[default]
    Simplified,
    Full,
    #[serde(rename = "false")]
    False,
}

/// Fields shared by every coordinate-based service.
///
/// The parallel vectors are either empty (not supplied) or exactly as long as
/// `coordinates`; a `None` element leaves that coordinate unconstrained.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseParameters {
    pub coordinates: Vec<Coordinate>,
    pub bearings: Vec<Option<Bearing>>,
    pub hints: Vec<Option<Hint>>,
    pub radiuses: Vec<Option<Radius>>,
    pub generate_hints: bool,
}

impl BaseParameters {
    pub fn new(coordinates: Vec<Coordinate>) -> Self {
        Self {
            coordinates,
            bearings: Vec::new(),
            hints: Vec::new(),
            radiuses: Vec::new(),
            generate_hints: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteParameters {
    pub base: BaseParameters,
    pub alternatives: bool,
    pub steps: bool,
    pub annotations: bool,
    pub geometries: Geometries,
    pub overview: Overview,
    pub continue_straight: Option<bool>,
    /// Per-coordinate u-turn permission; empty when not supplied.
    pub uturns: Vec<Option<bool>>,
    /// Dataset checksum the supplied hints were issued against.
    pub checksum: Option<u32>,
}

impl RouteParameters {
    pub fn new(base: BaseParameters) -> Self {
        Self {
            base,
            alternatives: false,
            steps: false,
            annotations: false,
            geometries: Geometries::default(),
            overview: Overview::default(),
            continue_straight: None,
            uturns: Vec::new(),
            checksum: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NearestParameters {
    pub base: BaseParameters,
    /// Number of candidate segments to return.
    pub number: u32,
}

/// Distance table parameters.
///
/// `sources` and `destinations` are always resolved to explicit index lists
/// into `base.coordinates`, and `is_source`/`is_destination` are aligned with
/// the coordinate list position by position.
#[derive(Debug, Clone, PartialEq)]
pub struct TableParameters {
    pub base: BaseParameters,
    pub sources: Vec<usize>,
    pub destinations: Vec<usize>,
    pub is_source: Vec<bool>,
    pub is_destination: Vec<bool>,
}

impl TableParameters {
    /// Build from resolved index lists, deriving the role flags.
    pub(crate) fn from_indices(
        base: BaseParameters,
        sources: Vec<usize>,
        destinations: Vec<usize>,
    ) -> Self {
        let count = base.coordinates.len();
        let mut is_source = vec![false; count];
        let mut is_destination = vec![false; count];
        for &i in &sources {
            is_source[i] = true;
        }
        for &i in &destinations {
            is_destination[i] = true;
        }
        Self {
            base,
            sources,
            destinations,
            is_source,
            is_destination,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchParameters {
    pub base: BaseParameters,
    /// Per-coordinate UNIX timestamps; empty when not supplied.
    pub timestamps: Vec<Option<u64>>,
    /// Ask the engine to classify its confidence in each matching.
    pub classify: bool,
    pub steps: bool,
    pub geometries: Geometries,
    pub overview: Overview,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TripParameters {
    pub base: BaseParameters,
    pub steps: bool,
    pub geometries: Geometries,
    pub overview: Overview,
}

/// A slippy-map tile address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileParameters {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

/// Parameters for exactly one request, tagged by service.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceParameters {
    Route(RouteParameters),
    Nearest(NearestParameters),
    Table(TableParameters),
    Match(MatchParameters),
    Trip(TripParameters),
    Tile(TileParameters),
}

impl ServiceParameters {
    pub fn service(&self) -> Service {
        match self {
            Self::Route(_) => Service::Route,
            Self::Nearest(_) => Service::Nearest,
            Self::Table(_) => Service::Table,
            Self::Match(_) => Service::Match,
            Self::Trip(_) => Service::Trip,
            Self::Tile(_) => Service::Tile,
        }
    }

    /// The shared coordinate fields; `None` for tiles.
    pub fn base(&self) -> Option<&BaseParameters> {
        match self {
            Self::Route(p) => Some(&p.base),
            Self::Nearest(p) => Some(&p.base),
            Self::Table(p) => Some(&p.base),
            Self::Match(p) => Some(&p.base),
            Self::Trip(p) => Some(&p.base),
            Self::Tile(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(n: usize) -> BaseParameters {
        BaseParameters::new(
            (0..n)
                .map(|i| Coordinate::new(i as f64, 0.0).unwrap())
                .collect(),
        )
    }

    #[test]
    fn test_table_role_flags_follow_indices() {
        let table = TableParameters::from_indices(base(3), vec![0], vec![1, 2]);
        assert_eq!(table.is_source, vec![true, false, false]);
        assert_eq!(table.is_destination, vec![false, true, true]);
    }

    #[test]
    fn test_route_defaults() {
        let route = RouteParameters::new(base(2));
        assert!(!route.alternatives);
        assert!(!route.steps);
        assert_eq!(route.geometries, Geometries::Polyline);
        assert_eq!(route.overview, Overview::Simplified);
        assert!(route.base.generate_hints);
    }

    #[test]
    fn test_service_tag() {
        let params = ServiceParameters::Tile(TileParameters { x: 0, y: 0, z: 0 });
        assert_eq!(params.service(), Service::Tile);
        assert!(params.base().is_none());
        assert_eq!(Service::Match.to_string(), "match");
    }

    #[test]
    fn test_service_names_match_serde() {
        for service in Service::ALL {
            let name = serde_json::to_value(service).unwrap();
            assert_eq!(name, service.as_str());
            assert_eq!(serde_json::from_value::<Service>(name).unwrap(), service);
        }
    }
}
