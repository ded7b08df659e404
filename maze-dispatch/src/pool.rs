//! A small fixed-size thread pool. Jobs are boxed closures; workers pull
//! them off a shared channel and run until the pool (and every sender
//! clone) is dropped.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;

type Job = Box<dyn FnOnce() + Send + 'static>;

pub struct WorkerPool {
    sender: mpsc::Sender<Job>,
    _workers: Vec<thread::JoinHandle<()>>,
}

impl WorkerPool {
    pub fn new(worker_count: usize) -> Self {
        let (sender, receiver) = mpsc::channel::<Job>();
        let receiver = Arc::new(Mutex::new(receiver));

        let workers = (0..worker_count)
            .map(|id| {
                let receiver = Arc::clone(&receiver);
                thread::Builder::new()
                    .name(format!("maze-solver-{id}"))
                    .spawn(move || loop {
                        let job = { receiver.lock().expect("worker pool mutex poisoned").recv() };
                        match job {
                            Ok(job) => job(),
                            Err(_) => break,
                        }
                    })
                    .expect("failed to spawn solver worker thread")
            })
            .collect();

        Self {
            sender,
            _workers: workers,
        }
    }

    pub fn submit<F: FnOnce() + Send + 'static>(&self, job: F) {
        // The receiving end only disappears when the pool itself is
        // dropped, so a send failure here would mean we're dispatching
        // through a pool that's already gone.
        self.sender.send(Box::new(job)).expect("solver worker pool has shut down");
    }
}
