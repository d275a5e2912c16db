//! osrm-bindings - the request lifecycle between a host runtime and a routing engine.
//!
//! A host builds one [`Registry`] at startup, opens an [`Osrm`] per dataset, and
//! issues route, nearest, table, match, trip and tile queries against it. Each
//! query is validated on the caller's thread, executed on a dedicated worker
//! thread, and completed back on the caller's [`EventLoop`].
//!
//! # Quick Start
//!
//! ```ignore
//! use osrm_bindings::prelude::*;
//! use serde_json::json;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = Registry::builder(|config: &EngineConfig| MyEngine::load(config))
//!         .workers(4)
//!         .build()?;
//!
//!     let osrm = registry.open(&json!("./data/berlin.osrm"))?;
//!
//!     osrm.route(
//!         &json!({ "coordinates": [[13.43, 52.51], [13.42, 52.50]] }),
//!         |result| match result {
//!             Ok(response) => println!("{}", response.as_json().unwrap()),
//!             Err(e) => eprintln!("route failed: {}", e),
//!         },
//!     )?;
//!
//!     registry.event_loop().run()?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **Validate** runs synchronously; malformed input is returned as
//!   [`QueryError::Validation`] and no callback is ever invoked
//! - **Execute** runs on the [`WorkerPool`]; engine errors and panics become
//!   [`QueryError::Execution`], failure statuses become [`QueryError::Logical`]
//! - **Complete** runs on the event loop; the result is rendered into
//!   `serde_json::Value` and handed to the callback exactly once

mod config;
mod coordinate;
mod dispatcher;
mod engine;
mod error;
mod event_loop;
mod parameters;
mod parser;
mod pool;
mod registry;
mod service;

pub mod json;

pub use config::{EngineConfig, EngineConfigBuilder};
pub use coordinate::{Bearing, Coordinate, CoordinateError, Hint, Radius, COORDINATE_PRECISION};
pub use dispatcher::{execute, Outcome, Payload, Response, TaskId};
pub use engine::{EngineError, EngineFactory, EngineHandle, RoutingEngine, Status};
pub use error::{ConfigError, ParameterError, QueryError, RuntimeError};
pub use event_loop::EventLoop;
pub use parameters::{
    BaseParameters, Geometries, MatchParameters, NearestParameters, Overview, RouteParameters,
    Service, ServiceParameters, TableParameters, TileParameters, TripParameters,
};
pub use parser::parse;
pub use pool::WorkerPool;
pub use registry::{Registry, RegistryBuilder};
pub use service::Osrm;

/// Prelude module for convenient imports.
///
/// Use `use osrm_bindings::prelude::*;` to import all common types.
pub mod prelude {
    pub use crate::config::{EngineConfig, EngineConfigBuilder};
    pub use crate::dispatcher::Response;
    pub use crate::engine::{EngineError, RoutingEngine, Status};
    pub use crate::error::{ConfigError, ParameterError, QueryError, RuntimeError};
    pub use crate::event_loop::EventLoop;
    pub use crate::json::Object;
    pub use crate::parameters::Service;
    pub use crate::registry::Registry;
    pub use crate::service::Osrm;
}
