// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Worker pool running read/write jobs off the FUSE session thread.
//!
//! The session loop hands every request to `&mut self` one at a time. Byte
//! I/O is pushed onto a lock-free queue instead, so requests against different
//! nodes run in parallel and requests against the same node contend only on
//! that node's lock.

use crossbeam_queue::SegQueue;
use memfs_core::IoPolicy;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Environment override for the worker count.
pub const IO_THREADS_ENV: &str = "MEMFS_IO_THREADS";

pub struct IoDispatcher {
    queue: Arc<SegQueue<Job>>,
    signal: Arc<(Mutex<bool>, Condvar)>,
    shutdown: Arc<AtomicBool>,
    handles: Vec<JoinHandle<()>>,
}

impl IoDispatcher {
    pub fn new(thread_count: usize) -> Self {
        let queue = Arc::new(SegQueue::<Job>::new());
        let signal = Arc::new((Mutex::new(false), Condvar::new()));
        let shutdown = Arc::new(AtomicBool::new(false));
        let mut handles = Vec::with_capacity(thread_count.max(1));

        for worker in 0..thread_count.max(1) {
            let queue = Arc::clone(&queue);
            let signal = Arc::clone(&signal);
            let shutdown = Arc::clone(&shutdown);
            let spawned = thread::Builder::new()
                .name(format!("memfs-io-{worker}"))
                .spawn(move || Self::worker_loop(&queue, &signal, &shutdown));
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(err) => tracing::warn!("failed to spawn I/O worker {worker}: {err}"),
            }
        }

        Self {
            queue,
            signal,
            shutdown,
            handles,
        }
    }

    // Drains the queue before honouring shutdown so no queued reply is lost.
    fn worker_loop(
        queue: &SegQueue<Job>,
        signal: &(Mutex<bool>, Condvar),
        shutdown: &AtomicBool,
    ) {
        loop {
            if let Some(job) = queue.pop() {
                job();
                continue;
            }
            if shutdown.load(Ordering::Acquire) {
                break;
            }

            let (lock, cvar) = signal;
            let mut pending = lock.lock().unwrap_or_else(PoisonError::into_inner);
            if !*pending {
                pending = cvar
                    .wait_timeout(pending, Duration::from_millis(5))
                    .unwrap_or_else(PoisonError::into_inner)
                    .0;
            }
            *pending = false;
        }
    }

    /// Queue `job`; it runs inline when no worker could be started.
    pub fn submit<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.handles.is_empty() {
            job();
            return;
        }

        self.queue.push(Box::new(job));
        let (lock, cvar) = &*self.signal;
        *lock.lock().unwrap_or_else(PoisonError::into_inner) = true;
        cvar.notify_one();
    }

    pub fn worker_count(&self) -> usize {
        self.handles.len()
    }
}

impl Drop for IoDispatcher {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        let (lock, cvar) = &*self.signal;
        *lock.lock().unwrap_or_else(PoisonError::into_inner) = true;
        cvar.notify_all();
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

/// Worker count: `MEMFS_IO_THREADS`, then the configured value, then one
/// per available CPU.
pub fn worker_count(policy: &IoPolicy) -> usize {
    let from_env = std::env::var(IO_THREADS_ENV).ok().and_then(|v| v.parse::<usize>().ok());
    resolve_worker_count(from_env, policy.worker_threads)
}

fn resolve_worker_count(from_env: Option<usize>, configured: Option<usize>) -> usize {
    from_env
        .filter(|n| *n > 0)
        .or(configured.filter(|n| *n > 0))
        .unwrap_or_else(|| thread::available_parallelism().map(|p| p.get()).unwrap_or(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::mpsc;

    #[test]
    fn runs_every_submitted_job() {
        let dispatcher = IoDispatcher::new(4);
        let done = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::channel();

        for _ in 0..100 {
            let done = Arc::clone(&done);
            let tx = tx.clone();
            dispatcher.submit(move || {
                done.fetch_add(1, Ordering::SeqCst);
                tx.send(()).unwrap();
            });
        }
        for _ in 0..100 {
            rx.recv_timeout(Duration::from_secs(5)).unwrap();
        }
        assert_eq!(done.load(Ordering::SeqCst), 100);
        assert_eq!(dispatcher.worker_count(), 4);
    }

    #[test]
    fn drop_drains_queued_jobs() {
        let done = Arc::new(AtomicUsize::new(0));
        {
            let dispatcher = IoDispatcher::new(1);
            for _ in 0..50 {
                let done = Arc::clone(&done);
                dispatcher.submit(move || {
                    thread::sleep(Duration::from_micros(100));
                    done.fetch_add(1, Ordering::SeqCst);
                });
            }
        }
        assert_eq!(done.load(Ordering::SeqCst), 50);
    }

    #[test]
    fn worker_count_precedence() {
        assert_eq!(resolve_worker_count(Some(3), Some(8)), 3);
        assert_eq!(resolve_worker_count(Some(0), Some(8)), 8);
        assert_eq!(resolve_worker_count(None, Some(2)), 2);
        assert!(resolve_worker_count(None, None) >= 1);
        assert!(resolve_worker_count(None, Some(0)) >= 1);
    }
}
