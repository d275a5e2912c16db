use crate::error::RuntimeError;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::thread::{self, JoinHandle};

/// A unit of background work.
pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;

enum PoolMessage {
    Run(Job),
    Shutdown,
}

/// Dedicated OS threads that run blocking engine calls off the caller's thread.
///
/// The queue is unbounded so submitting never blocks the caller. Dropping the
/// pool lets already queued jobs finish, then joins every worker.
pub struct WorkerPool {
    sender: Sender<PoolMessage>,
    workers: Vec<JoinHandle<()>>,
    worker_count: usize,
}

impl WorkerPool {
    pub fn new(worker_count: usize) -> Result<Self, RuntimeError> {
        let (sender, receiver) = unbounded::<PoolMessage>();

        let mut workers = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            let receiver = receiver.clone();

            let handle = thread::Builder::new()
                .name(format!("osrm-worker-{}", worker_id))
                .spawn(move || {
                    Self::worker_loop(worker_id, receiver);
                })
                .map_err(|e| RuntimeError::Thread(e.to_string()))?;

            workers.push(handle);
        }

        tracing::info!("Started {} routing workers", worker_count);

        Ok(Self {
            sender,
            workers,
            worker_count,
        })
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Queue a job. Never blocks.
    pub(crate) fn execute(&self, job: Job) -> Result<(), RuntimeError> {
        self.sender
            .send(PoolMessage::Run(job))
            .map_err(|e| RuntimeError::ChannelSend(e.to_string()))
    }

    fn worker_loop(worker_id: usize, receiver: Receiver<PoolMessage>) {
        tracing::debug!("Routing worker {} started", worker_id);

        loop {
            match receiver.recv() {
                Ok(PoolMessage::Run(job)) => job(),
                Ok(PoolMessage::Shutdown) => {
                    tracing::debug!("Routing worker {} received shutdown signal", worker_id);
                    break;
                }
                Err(_) => {
                    tracing::debug!("Routing worker {} channel disconnected", worker_id);
                    break;
                }
            }
        }

        tracing::debug!("Routing worker {} exiting", worker_id);
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        for _ in 0..self.worker_count {
            let _ = self.sender.send(PoolMessage::Shutdown);
        }

        for handle in self.workers.drain(..) {
            if let Err(e) = handle.join() {
                tracing::error!("Worker thread panicked: {:?}", e);
            }
        }

        tracing::info!("Routing workers stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_runs_queued_jobs_before_shutdown() {
        let counter = Arc::new(AtomicUsize::new(0));
        let pool = WorkerPool::new(2).unwrap();
        assert_eq!(pool.worker_count(), 2);

        for _ in 0..16 {
            let counter = Arc::clone(&counter);
            pool.execute(Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        }
        drop(pool);

        assert_eq!(counter.load(Ordering::SeqCst), 16);
    }

    #[test]
    fn test_jobs_run_off_the_calling_thread() {
        let pool = WorkerPool::new(1).unwrap();
        let (tx, rx) = crossbeam_channel::bounded(1);
        pool.execute(Box::new(move || {
            let _ = tx.send(thread::current().name().map(str::to_string));
        }))
        .unwrap();

        assert_eq!(rx.recv().unwrap().as_deref(), Some("osrm-worker-0"));
    }
}
