//! Service entry points.
//!
//! Every entry point validates its input on the caller's thread and returns the
//! validation error directly; only valid requests become tasks. A queued task
//! always reports back exactly once, through its callback or its future.

use crate::config::EngineConfig;
use crate::dispatcher::{self, Payload, Response, Task, TaskIds};
use crate::engine::EngineHandle;
use crate::error::{ParameterError, QueryError, RuntimeError};
use crate::event_loop::EventLoop;
use crate::parameters::{Service, ServiceParameters};
use crate::parser;
use crate::pool::WorkerPool;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::oneshot;

/// A routing engine bound to a caller's event loop.
///
/// Dropping an `Osrm` does not cancel its requests; each in-flight request
/// keeps the engine alive until its callback has run.
pub struct Osrm {
    engine: EngineHandle,
    config: EngineConfig,
    pool: Arc<WorkerPool>,
    event_loop: EventLoop,
    /// Ids for awaited requests, which never pass through the event loop.
    request_ids: TaskIds,
}

impl Osrm {
    pub(crate) fn new(
        engine: EngineHandle,
        config: EngineConfig,
        pool: Arc<WorkerPool>,
        event_loop: EventLoop,
    ) -> Self {
        Self {
            engine,
            config,
            pool,
            event_loop,
            request_ids: TaskIds::default(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn route<F>(&self, params: &Value, callback: F) -> Result<(), QueryError>
    where
        F: FnOnce(Result<Response, QueryError>) + 'static,
    {
        self.dispatch(Service::Route, params, callback)
    }

    pub fn nearest<F>(&self, params: &Value, callback: F) -> Result<(), QueryError>
    where
        F: FnOnce(Result<Response, QueryError>) + 'static,
    {
        self.dispatch(Service::Nearest, params, callback)
    }

    pub fn table<F>(&self, params: &Value, callback: F) -> Result<(), QueryError>
    where
        F: FnOnce(Result<Response, QueryError>) + 'static,
    {
        self.dispatch(Service::Table, params, callback)
    }

    pub fn match_trace<F>(&self, params: &Value, callback: F) -> Result<(), QueryError>
    where
        F: FnOnce(Result<Response, QueryError>) + 'static,
    {
        self.dispatch(Service::Match, params, callback)
    }

    pub fn trip<F>(&self, params: &Value, callback: F) -> Result<(), QueryError>
    where
        F: FnOnce(Result<Response, QueryError>) + 'static,
    {
        self.dispatch(Service::Trip, params, callback)
    }

    /// Request a vector tile. The callback receives [`Response::Tile`] with
    /// the engine's bytes unmodified.
    pub fn tile<F>(&self, params: &Value, callback: F) -> Result<(), QueryError>
    where
        F: FnOnce(Result<Response, QueryError>) + 'static,
    {
        self.dispatch(Service::Tile, params, callback)
    }

    /// Queue a request whose result is delivered to `callback` on the event loop.
    pub fn dispatch<F>(&self, service: Service, params: &Value, callback: F) -> Result<(), QueryError>
    where
        F: FnOnce(Result<Response, QueryError>) + 'static,
    {
        let params = self.prepare(service, params)?;

        let (id, reply) = self
            .event_loop
            .register(Box::new(move |outcome| callback(outcome.map(Payload::render))));
        let task = Task::new(id, Arc::clone(&self.engine), params, reply);

        if let Err(e) = dispatcher::dispatch(&self.pool, task) {
            self.event_loop.unregister(id);
            return Err(e.into());
        }
        Ok(())
    }

    /// Run a request in the background and await its rendered result.
    pub async fn request(&self, service: Service, params: &Value) -> Result<Response, QueryError> {
        let params = self.prepare(service, params)?;

        let (tx, rx) = oneshot::channel();
        let task = Task::new(
            self.request_ids.next(),
            Arc::clone(&self.engine),
            params,
            dispatcher::Reply::Future(tx),
        );
        dispatcher::dispatch(&self.pool, task)?;

        let completion = rx
            .await
            .map_err(|e| RuntimeError::ChannelRecv(e.to_string()))?;
        completion.outcome.map(Payload::render)
    }

    /// Run a request inline on the calling thread.
    #[deprecated(since = "0.1.0", note = "Use the callback entry points or `request`")]
    pub fn request_sync(&self, service: Service, params: &Value) -> Result<Response, QueryError> {
        let params = self.prepare(service, params)?;
        dispatcher::execute(self.engine.as_ref(), &params).map(Payload::render)
    }

    /// Validate `params` for `service`, including limits from the engine config.
    fn prepare(&self, service: Service, params: &Value) -> Result<ServiceParameters, ParameterError> {
        let params = parser::parse(service, params)?;

        if let (ServiceParameters::Table(table), Some(limit)) =
            (&params, self.config.distance_table_limit)
        {
            let count = table.base.coordinates.len();
            if count > limit as usize {
                return Err(ParameterError::TableTooLarge { count, limit });
            }
        }

        Ok(params)
    }
}
