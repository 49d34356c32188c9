use std::io::Write;
use std::sync::{Arc, Mutex};

use log::error;
use serde::Serialize;

/// Line-oriented response writer shared by the main loop and workers. Each
/// response is written and flushed under the lock, so lines never interleave.
#[derive(Clone)]
pub struct Outbox {
    out: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Outbox {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Arc::new(Mutex::new(out)),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    /// Writes one response line. A response that cannot be serialized is
    /// logged and dropped; the line protocol never carries a reply without an id.
    pub fn send<T: Serialize + ?Sized>(&self, resp: &T) {
        let line = match serde_json::to_string(resp) {
            Ok(line) => line,
            Err(e) => {
                error!("failed to serialize response: {}", e);
                return;
            }
        };
        let Ok(mut out) = self.out.lock() else {
            error!("response writer lock poisoned; dropping response");
            return;
        };
        if let Err(e) = writeln!(out, "{}", line) {
            error!("failed to write response: {}", e);
            return;
        }
        if let Err(e) = out.flush() {
            error!("failed to flush response: {}", e);
        }
    }
}
