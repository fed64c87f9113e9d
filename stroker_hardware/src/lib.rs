pub mod error;
#[cfg(feature = "hardware")]
pub mod serial;

#[cfg(feature = "hardware")]
pub use serial::SerialTransport;

use std::io::Write;
use std::time::Instant;
use stroker_traits::Transport;

use crate::error::SerialError;

/// Mock transport used when `transport.debug = true`.
///
/// Prints each T-code line prefixed by milliseconds since `open()`, which is
/// enough to eyeball the dispatch cadence without a device attached.
pub struct SimulatedTransport {
    sink: Box<dyn Write + Send>,
    opened_at: Option<Instant>,
    lines_written: u64,
}

impl SimulatedTransport {
    pub fn new(sink: Box<dyn Write + Send>) -> Self {
        Self {
            sink,
            opened_at: None,
            lines_written: 0,
        }
    }

    /// Simulated transport printing to stdout.
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }
}

impl Transport for SimulatedTransport {
    fn open(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.opened_at = Some(Instant::now());
        tracing::debug!("simulated transport opened");
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let Some(opened_at) = self.opened_at else {
            return Err(Box::new(SerialError::NotOpen));
        };
        let at_ms = opened_at.elapsed().as_millis();
        let line = String::from_utf8_lossy(bytes);
        writeln!(self.sink, "{at_ms}, {}", line.trim_end()).map_err(SerialError::from)?;
        self.sink.flush().map_err(SerialError::from)?;
        self.lines_written += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.opened_at.take().is_some() {
            tracing::debug!(lines = self.lines_written, "simulated transport closed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn simulated_transport_prefixes_lines_with_elapsed_ms() {
        let buf = SharedBuf::default();
        let mut t = SimulatedTransport::new(Box::new(buf.clone()));
        t.open().unwrap();
        t.write(b"L0999I300 R150I300\n").unwrap();
        t.close().unwrap();

        let out = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        let (ms, line) = out.trim_end().split_once(", ").expect("ms prefix");
        assert!(ms.parse::<u64>().is_ok(), "prefix {ms:?} should be a number");
        assert_eq!(line, "L0999I300 R150I300");
        assert_eq!(t.lines_written(), 1);
    }

    #[test]
    fn simulated_transport_rejects_write_before_open() {
        let mut t = SimulatedTransport::new(Box::new(std::io::sink()));
        let err = t.write(b"L050I50\n").expect_err("not open");
        assert!(err.to_string().contains("not open"));
    }
}
