//! The seam to the routing engine.
//!
//! The engine itself lives outside this crate. It is loaded once from an
//! [`EngineConfig`] by an [`EngineFactory`] and then shared, read-only, by every
//! in-flight request through an [`EngineHandle`].

use crate::config::EngineConfig;
use crate::json::Object;
use crate::parameters::{
    MatchParameters, NearestParameters, RouteParameters, TableParameters, TileParameters,
    TripParameters,
};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Status code returned by every engine call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status(pub u16);

impl Status {
    pub const OK: Status = Status(200);
    /// No route connects the requested coordinates.
    pub const NO_ROUTE: Status = Status(207);
    /// No road segment could be matched to a coordinate.
    pub const NO_SEGMENT: Status = Status(208);
    pub const BAD_REQUEST: Status = Status(400);

    /// Whether this status reports a failed query even though the call returned.
    pub fn is_failure(&self) -> bool {
        (400..500).contains(&self.0) || *self == Self::NO_ROUTE || *self == Self::NO_SEGMENT
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An error raised by the engine while executing a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct EngineError(pub String);

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A loaded routing dataset that can answer queries.
///
/// Implementations must tolerate concurrent calls from several worker threads
/// through a shared reference. Every method blocks until the answer is ready
/// and writes its response into `result`.
pub trait RoutingEngine: Send + Sync {
    fn route(&self, params: &RouteParameters, result: &mut Object) -> Result<Status, EngineError>;

    fn nearest(
        &self,
        params: &NearestParameters,
        result: &mut Object,
    ) -> Result<Status, EngineError>;

    fn table(&self, params: &TableParameters, result: &mut Object) -> Result<Status, EngineError>;

    fn match_trace(
        &self,
        params: &MatchParameters,
        result: &mut Object,
    ) -> Result<Status, EngineError>;

    fn trip(&self, params: &TripParameters, result: &mut Object) -> Result<Status, EngineError>;

    /// Render a vector tile into `result` as raw bytes.
    fn tile(&self, params: &TileParameters, result: &mut Vec<u8>) -> Result<Status, EngineError>;
}

/// Shared ownership of a loaded engine; the engine lives until the last clone drops.
pub type EngineHandle = Arc<dyn RoutingEngine>;

/// Opens engines from configuration.
pub trait EngineFactory: Send + Sync {
    fn open(&self, config: &EngineConfig) -> Result<EngineHandle, EngineError>;
}

impl<F, E> EngineFactory for F
where
    F: Fn(&EngineConfig) -> Result<E, EngineError> + Send + Sync,
    E: RoutingEngine + 'static,
{
    fn open(&self, config: &EngineConfig) -> Result<EngineHandle, EngineError> {
        self(config).map(|engine| Arc::new(engine) as EngineHandle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_statuses() {
        assert!(!Status::OK.is_failure());
        assert!(Status::NO_ROUTE.is_failure());
        assert!(Status::NO_SEGMENT.is_failure());
        assert!(Status::BAD_REQUEST.is_failure());
        assert!(Status(499).is_failure());
        assert!(!Status(206).is_failure());
        assert!(!Status(500).is_failure());
    }
}
