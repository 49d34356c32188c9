use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use log::{debug, error};

use super::outbox::Outbox;

pub type Job = Box<dyn FnOnce(&Outbox) + Send + 'static>;

/// Fixed set of threads for credential work. At most `size` hashes run at
/// once; further jobs queue in the channel.
pub struct WorkerPool {
    sender: Option<Sender<Job>>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn new(size: usize, outbox: Outbox) -> Self {
        let (sender, receiver) = mpsc::channel::<Job>();
        let receiver = Arc::new(Mutex::new(receiver));
        let handles = (0..size.max(1))
            .map(|n| {
                let receiver = Arc::clone(&receiver);
                let outbox = outbox.clone();
                std::thread::spawn(move || run_worker(n, &receiver, &outbox))
            })
            .collect();
        Self {
            sender: Some(sender),
            handles,
        }
    }

    pub fn size(&self) -> usize {
        self.handles.len()
    }

    pub fn submit(&self, job: Job) {
        let Some(sender) = self.sender.as_ref() else {
            error!("worker pool already shut down; dropping job");
            return;
        };
        if sender.send(job).is_err() {
            error!("all workers exited; dropping job");
        }
    }

    /// Closes the queue, lets workers drain what is already queued, and joins
    /// them.
    pub fn shutdown(&mut self) {
        drop(self.sender.take());
        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                error!("worker thread panicked");
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker(n: usize, receiver: &Mutex<Receiver<Job>>, outbox: &Outbox) {
    loop {
        // The lock is released before the job runs.
        let next = match receiver.lock() {
            Ok(rx) => rx.recv(),
            Err(_) => break,
        };
        match next {
            Ok(job) => job(outbox),
            Err(_) => break,
        }
    }
    debug!("worker {} stopped", n);
}
