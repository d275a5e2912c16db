//! The object a host builds once at startup to create engines.
//!
//! It owns the engine factory, the shared worker pool and the caller's event
//! loop, and hands out [`Osrm`] instances wired to all three.

use crate::config::EngineConfig;
use crate::engine::EngineFactory;
use crate::error::{ConfigError, RuntimeError};
use crate::event_loop::EventLoop;
use crate::pool::WorkerPool;
use crate::service::Osrm;
use std::sync::Arc;

pub struct Registry {
    factory: Box<dyn EngineFactory>,
    pool: Arc<WorkerPool>,
    event_loop: EventLoop,
}

impl Registry {
    /// Start building a registry around `factory`.
    pub fn builder<F: EngineFactory + 'static>(factory: F) -> RegistryBuilder {
        RegistryBuilder {
            factory: Box::new(factory),
            workers: None,
        }
    }

    /// Open an engine from the host's constructor argument.
    ///
    /// See [`EngineConfig::from_value`] for the accepted shapes.
    pub fn open(&self, options: &serde_json::Value) -> Result<Osrm, ConfigError> {
        self.open_with_config(EngineConfig::from_value(options)?)
    }

    pub fn open_with_config(&self, config: EngineConfig) -> Result<Osrm, ConfigError> {
        let engine = self
            .factory
            .open(&config)
            .map_err(|e| ConfigError::Engine(e.to_string()))?;

        tracing::info!(
            path = ?config.path,
            shared_memory = config.shared_memory,
            distance_table_limit = ?config.distance_table_limit,
            "Opened routing engine"
        );

        Ok(Osrm::new(
            engine,
            config,
            Arc::clone(&self.pool),
            self.event_loop.clone(),
        ))
    }

    pub fn event_loop(&self) -> &EventLoop {
        &self.event_loop
    }

    pub fn worker_count(&self) -> usize {
        self.pool.worker_count()
    }
}

/// Builder for a [`Registry`].
pub struct RegistryBuilder {
    factory: Box<dyn EngineFactory>,
    workers: Option<usize>,
}

impl RegistryBuilder {
    /// Set the number of background worker threads.
    ///
    /// Default is the available parallelism of the machine.
    pub fn workers(mut self, count: usize) -> Self {
        self.workers = Some(count);
        self
    }

    /// Use an existing event loop instead of creating one.
    pub fn build_with_loop(self, event_loop: EventLoop) -> Result<Registry, RuntimeError> {
        let workers = match self.workers {
            Some(0) => {
                return Err(ConfigError::InvalidWorkerCount(
                    "workers must be at least 1".to_string(),
                )
                .into())
            }
            Some(n) => n,
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
        };

        Ok(Registry {
            factory: self.factory,
            pool: Arc::new(WorkerPool::new(workers)?),
            event_loop,
        })
    }

    pub fn build(self) -> Result<Registry, RuntimeError> {
        self.build_with_loop(EventLoop::new())
    }
}
