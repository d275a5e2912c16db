//! The caller's single-threaded execution context.
//!
//! Completion callbacks never leave the thread that owns the [`EventLoop`];
//! workers only send back a [`Completion`] keyed by task id. Results are
//! rendered and callbacks invoked when the owner drives the loop with
//! [`EventLoop::run`], [`EventLoop::run_once`] or [`EventLoop::poll`].

use crate::dispatcher::{Completion, Outcome, Reply, TaskId, TaskIds};
use crate::error::RuntimeError;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::cell::RefCell;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

pub(crate) type Callback = Box<dyn FnOnce(Outcome) + 'static>;

struct Inner {
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
    pending: RefCell<HashMap<TaskId, Callback>>,
    ids: TaskIds,
}

/// Cheap to clone; all clones drive the same queue.
#[derive(Clone)]
pub struct EventLoop {
    inner: Rc<Inner>,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            inner: Rc::new(Inner {
                sender,
                receiver,
                pending: RefCell::new(HashMap::new()),
                ids: TaskIds::default(),
            }),
        }
    }

    /// Number of requests whose callback has not run yet.
    pub fn pending(&self) -> usize {
        self.inner.pending.borrow().len()
    }

    /// Deliver completions until no request is pending.
    pub fn run(&self) -> Result<(), RuntimeError> {
        while self.run_once()? {}
        Ok(())
    }

    /// Block for the next completion and deliver it.
    ///
    /// Returns `false` without blocking when nothing is pending.
    pub fn run_once(&self) -> Result<bool, RuntimeError> {
        if self.pending() == 0 {
            return Ok(false);
        }
        let completion = self
            .inner
            .receiver
            .recv()
            .map_err(|e| RuntimeError::ChannelRecv(e.to_string()))?;
        self.complete(completion);
        Ok(true)
    }

    /// Deliver every completion that is already available, without blocking.
    pub fn poll(&self) -> usize {
        let mut delivered = 0;
        while let Ok(completion) = self.inner.receiver.try_recv() {
            self.complete(completion);
            delivered += 1;
        }
        delivered
    }

    pub(crate) fn register(&self, callback: Callback) -> (TaskId, Reply) {
        let id = self.inner.ids.next();
        self.inner.pending.borrow_mut().insert(id, callback);
        (id, Reply::EventLoop(self.inner.sender.clone()))
    }

    /// Forget a registration whose task never made it onto the pool.
    pub(crate) fn unregister(&self, id: TaskId) {
        self.inner.pending.borrow_mut().remove(&id);
    }

    /// Completion phase: invoke the callback, then release the engine handle.
    ///
    /// A panicking callback is fatal. It is logged and resumed so it unwinds
    /// out of the loop to the host.
    fn complete(&self, completion: Completion) {
        let Completion {
            id,
            outcome,
            engine,
        } = completion;

        // Released before the callback runs so it may issue new requests.
        let callback = self.inner.pending.borrow_mut().remove(&id);
        let Some(callback) = callback else {
            tracing::warn!("Dropping completion for unknown task {}", id);
            return;
        };

        let result = panic::catch_unwind(AssertUnwindSafe(|| callback(outcome)));
        drop(engine);

        if let Err(panic) = result {
            tracing::error!("Completion callback for task {} panicked", id);
            panic::resume_unwind(panic);
        }
        tracing::debug!("Task {} completed", id);
    }
}
