//! Transports for tests and offline runs.

use std::sync::{Arc, Mutex, PoisonError};

use stroker_traits::Transport;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Records every written line in memory. Clones share the record, so a test
/// keeps one handle while the scheduler owns the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    lines: Arc<Mutex<Vec<String>>>,
    open: Arc<Mutex<bool>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines written so far, without their newline.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_open(&self) -> bool {
        *self.open.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Transport for RecordingTransport {
    fn open(&mut self) -> Result<(), BoxError> {
        *self.open.lock().unwrap_or_else(PoisonError::into_inner) = true;
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), BoxError> {
        let line = String::from_utf8_lossy(bytes).trim_end().to_string();
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line);
        Ok(())
    }

    fn close(&mut self) -> Result<(), BoxError> {
        *self.open.lock().unwrap_or_else(PoisonError::into_inner) = false;
        Ok(())
    }
}

/// Fails on open or on the first write, depending on construction.
#[derive(Debug, Clone, Copy)]
pub struct FailingTransport {
    fail_open: bool,
}

impl FailingTransport {
    /// Opens fine; every write fails.
    pub fn on_write() -> Self {
        Self { fail_open: false }
    }

    /// Refuses to open.
    pub fn on_open() -> Self {
        Self { fail_open: true }
    }
}

impl Transport for FailingTransport {
    fn open(&mut self) -> Result<(), BoxError> {
        if self.fail_open {
            return Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no such device",
            )));
        }
        Ok(())
    }

    fn write(&mut self, _bytes: &[u8]) -> Result<(), BoxError> {
        Err(Box::new(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "link dropped",
        )))
    }

    fn close(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}
