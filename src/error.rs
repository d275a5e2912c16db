//! Error types for the OSRM bindings.
//!
//! Each stage of a request has its own error type so callers can tell a request
//! that was never dispatched apart from one the engine rejected.

use crate::engine::Status;
use thiserror::Error;

/// Errors that can occur while building an engine or the shared registry.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The constructor argument was neither a path string nor an options object.
    #[error("parameter must be a path or options object")]
    InvalidArgument,

    /// `shared_memory` was present but not a boolean.
    #[error("shared_memory option must be a boolean")]
    SharedMemoryNotBool,

    /// `path` was present but not a string.
    #[error("path option must be a string")]
    PathNotString,

    /// `distance_table_limit` was not an unsigned 32-bit integer.
    #[error("the maximum number of locations in the distance table must be an unsigned integer")]
    DistanceTableLimit,

    /// No dataset path was given and shared memory was not requested.
    #[error("shared_memory must be enabled if no path is specified")]
    MissingPath,

    /// Invalid worker count configuration.
    #[error("Invalid worker count: {0}")]
    InvalidWorkerCount(String),

    /// The engine factory refused to open the dataset.
    #[error("{0}")]
    Engine(String),
}

/// Validation failures raised while turning caller input into query parameters.
///
/// The first failure aborts parsing, so a request carries at most one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("first arg must be an object")]
    NotAnObject,

    #[error("must provide a {0} property")]
    MissingField(&'static str),

    #[error("must provide coordinates")]
    NoCoordinates,

    #[error("{0} must be an array of (lon/lat) pairs")]
    CoordinatesNotArray(&'static str),

    #[error("{field}[{index}] must be an array of [lon, lat]")]
    CoordinateNotArray { field: &'static str, index: usize },

    #[error("{field}[{index}] must contain exactly two values, got {len}")]
    CoordinateLength {
        field: &'static str,
        index: usize,
        len: usize,
    },

    #[error("{field}[{index}] must contain numbers")]
    CoordinateNotNumber { field: &'static str, index: usize },

    #[error("{field}[{index}] must contain finite numbers")]
    CoordinateNotFinite { field: &'static str, index: usize },

    #[error("{field}[{index}]: longitude {value} must be within [-180, 180]")]
    LongitudeOutOfRange {
        field: &'static str,
        index: usize,
        value: f64,
    },

    #[error("{field}[{index}]: latitude {value} must be within [-90, 90]")]
    LatitudeOutOfRange {
        field: &'static str,
        index: usize,
        value: f64,
    },

    #[error("at least two coordinates must be provided")]
    TooFewCoordinates,

    #[error("exactly one coordinate must be provided")]
    ExactlyOneCoordinate,

    #[error("{0} must be an array")]
    NotAnArray(&'static str),

    #[error("{field} array must have the same size as the coordinates array ({actual} != {expected})")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("bearings[{0}] must be null, a number or an array of [value, range]")]
    BearingShape(usize),

    #[error("bearings[{0}] needs to be an integer in range [0, 360)")]
    BearingOutOfRange(usize),

    #[error("hints[{0}] must be null or a non-empty string")]
    InvalidHint(usize),

    #[error("hints[{0}] is not a valid hint token")]
    UndecodableHint(usize),

    #[error("radiuses[{0}] must be null or a non-negative number")]
    InvalidRadius(usize),

    #[error("timestamps[{0}] must be null or a non-negative integer")]
    InvalidTimestamp(usize),

    #[error("uturns[{0}] must be null or a boolean")]
    InvalidUturn(usize),

    #[error("{field} must be a {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("{field} must be one of {allowed}")]
    UnknownVariant {
        field: &'static str,
        allowed: &'static str,
    },

    #[error("Both sources and destinations need to be specified")]
    SourcesAndDestinations,

    #[error("You can either specify sources and destinations, or coordinates")]
    SourcesOrCoordinates,

    #[error("{0} must not be empty")]
    EmptyTableRole(&'static str),

    #[error("{field}[{index}] must be a coordinate index below {count}")]
    IndexOutOfRange {
        field: &'static str,
        index: usize,
        count: usize,
    },

    #[error("too many table coordinates: {count} exceeds the limit of {limit}")]
    TableTooLarge { count: usize, limit: u32 },

    #[error("tile {0} must be an unsigned integer")]
    TileField(&'static str),

    #[error("tile must be an object with x, y, z or an array of [x, y, z]")]
    TileShape,

    #[error("tile ({x}, {y}, {z}) is outside the tile grid")]
    TileOutOfRange { x: u32, y: u32, z: u32 },
}

/// Errors that can occur in the worker pool plumbing.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Error sending a task to the worker pool.
    #[error("Channel send error: {0}")]
    ChannelSend(String),

    /// Error receiving a completion from the worker pool.
    #[error("Channel receive error: {0}")]
    ChannelRecv(String),

    /// Thread-related error.
    #[error("Thread error: {0}")]
    Thread(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// What a request reports when it does not produce a result.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The input was rejected before any task was created.
    #[error(transparent)]
    Validation(#[from] ParameterError),

    /// The engine call raised an error or panicked.
    #[error("{0}")]
    Execution(String),

    /// The engine answered with a failure status.
    #[error("{message}")]
    Logical { status: Status, message: String },

    /// The worker pool could not take or return the task.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl QueryError {
    /// Whether the request reached the background phase before failing.
    pub fn was_dispatched(&self) -> bool {
        matches!(self, Self::Execution(_) | Self::Logical { .. })
    }
}
