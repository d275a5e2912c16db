//! In-flight requests and their background execution.
//!
//! A [`Task`] owns everything one request needs on the worker side: a clone of
//! the engine handle, the validated parameters, and the way back to the caller.
//! The engine handle travels back with the [`Completion`] so it is released
//! only after the caller has consumed the outcome.

use crate::engine::{EngineError, EngineHandle, RoutingEngine, Status};
use crate::error::{QueryError, RuntimeError};
use crate::json::{self, Object};
use crate::parameters::ServiceParameters;
use crate::pool::WorkerPool;
use crossbeam_channel::Sender;
use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use tokio::sync::oneshot;

/// Message used when a failure status carries no `status_message`.
const DEFAULT_FAILURE_MESSAGE: &str = "invalid request";

/// Identifies one request for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

/// Hands out task ids for one owner.
#[derive(Debug, Default)]
pub(crate) struct TaskIds {
    next: Cell<u64>,
}

impl TaskIds {
    pub fn next(&self) -> TaskId {
        let id = self.next.get() + 1;
        self.next.set(id);
        TaskId(id)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What an engine call produced, before rendering.
#[derive(Debug)]
pub enum Payload {
    Json(Object),
    Tile(Vec<u8>),
}

impl Payload {
    /// Convert into the host representation. Tiles pass through untouched.
    pub fn render(self) -> Response {
        match self {
            Payload::Json(object) => Response::Json(json::render_object(object)),
            Payload::Tile(bytes) => Response::Tile(bytes),
        }
    }
}

/// A successful response as the caller sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Json(serde_json::Value),
    Tile(Vec<u8>),
}

impl Response {
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Response::Json(value) => Some(value),
            Response::Tile(_) => None,
        }
    }

    pub fn into_json(self) -> Option<serde_json::Value> {
        match self {
            Response::Json(value) => Some(value),
            Response::Tile(_) => None,
        }
    }

    pub fn as_tile(&self) -> Option<&[u8]> {
        match self {
            Response::Tile(bytes) => Some(bytes),
            Response::Json(_) => None,
        }
    }
}

pub type Outcome = Result<Payload, QueryError>;

/// The result of one task, on its way back to the caller.
pub(crate) struct Completion {
    pub id: TaskId,
    pub outcome: Outcome,
    pub engine: EngineHandle,
}

/// Where a finished task reports to.
pub(crate) enum Reply {
    EventLoop(Sender<Completion>),
    Future(oneshot::Sender<Completion>),
}

pub(crate) struct Task {
    id: TaskId,
    engine: EngineHandle,
    params: ServiceParameters,
    reply: Reply,
}

impl Task {
    pub fn new(id: TaskId, engine: EngineHandle, params: ServiceParameters, reply: Reply) -> Self {
        Self {
            id,
            engine,
            params,
            reply,
        }
    }

    /// Execute phase. Runs on a worker thread.
    fn run(self) {
        let Task {
            id,
            engine,
            params,
            reply,
        } = self;

        let outcome = execute(engine.as_ref(), &params);
        drop(params);

        if let Err(e) = &outcome {
            tracing::debug!("Task {} failed: {}", id, e);
        }

        let completion = Completion {
            id,
            outcome,
            engine,
        };
        let delivered = match reply {
            Reply::EventLoop(tx) => tx.send(completion).is_ok(),
            Reply::Future(tx) => tx.send(completion).is_ok(),
        };
        if !delivered {
            tracing::debug!("Task {} finished after its caller went away", id);
        }
    }
}

/// Queue `task` on the pool.
pub(crate) fn dispatch(pool: &WorkerPool, task: Task) -> Result<(), RuntimeError> {
    let id = task.id;
    let service = task.params.service();
    pool.execute(Box::new(move || task.run()))?;
    tracing::debug!("Task {} queued for {}", id, service);
    Ok(())
}

/// Run one query against `engine` and classify the answer.
///
/// Engine errors and panics are turned into [`QueryError::Execution`]; nothing
/// unwinds out of this function.
pub fn execute(engine: &dyn RoutingEngine, params: &ServiceParameters) -> Outcome {
    panic::catch_unwind(AssertUnwindSafe(|| call(engine, params))).unwrap_or_else(|panic| {
        let message = panic_message(panic.as_ref());
        tracing::warn!("Routing engine panicked during {}: {}", params.service(), message);
        Err(QueryError::Execution(message))
    })
}

fn call(engine: &dyn RoutingEngine, params: &ServiceParameters) -> Outcome {
    let mut result = Object::new();
    let status = match params {
        ServiceParameters::Route(p) => engine.route(p, &mut result),
        ServiceParameters::Nearest(p) => engine.nearest(p, &mut result),
        ServiceParameters::Table(p) => engine.table(p, &mut result),
        ServiceParameters::Match(p) => engine.match_trace(p, &mut result),
        ServiceParameters::Trip(p) => engine.trip(p, &mut result),
        ServiceParameters::Tile(p) => {
            let mut bytes = Vec::new();
            let status = engine.tile(p, &mut bytes).map_err(execution_error)?;
            if status.is_failure() {
                return Err(QueryError::Logical {
                    status,
                    message: DEFAULT_FAILURE_MESSAGE.to_string(),
                });
            }
            return Ok(Payload::Tile(bytes));
        }
    };

    classify(status.map_err(execution_error)?, result).map(Payload::Json)
}

/// Promote failure statuses to errors and drop the redundant status message on success.
fn classify(status: Status, mut result: Object) -> Result<Object, QueryError> {
    let message = result.remove("status_message");

    if status.is_failure() {
        let message = match message {
            Some(json::Value::String(message)) => message,
            _ => DEFAULT_FAILURE_MESSAGE.to_string(),
        };
        return Err(QueryError::Logical { status, message });
    }

    Ok(result)
}

fn execution_error(e: EngineError) -> QueryError {
    tracing::warn!("Routing engine error: {}", e);
    QueryError::Execution(e.0)
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "routing engine panicked".to_string()
    }
}
