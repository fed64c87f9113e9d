//! Serial-port transport for real devices (feature `hardware`).
use serial2::SerialPort;
use stroker_traits::Transport;
use tracing::trace;

use crate::error::{Result, SerialError};

pub struct SerialTransport {
    port_name: String,
    baud_rate: u32,
    port: Option<SerialPort>,
}

impl SerialTransport {
    pub fn new(port_name: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            port_name: port_name.into(),
            baud_rate,
            port: None,
        }
    }

    fn open_port(&mut self) -> Result<()> {
        let port =
            SerialPort::open(&self.port_name, self.baud_rate).map_err(|source| {
                SerialError::Unavailable {
                    port: self.port_name.clone(),
                    source,
                }
            })?;
        // Stale device chatter is never read; drop it.
        port.discard_input_buffer()?;
        tracing::info!(port = %self.port_name, baud = self.baud_rate, "serial port opened");
        self.port = Some(port);
        Ok(())
    }

    fn write_line(&mut self, bytes: &[u8]) -> Result<()> {
        let port = self.port.as_ref().ok_or(SerialError::NotOpen)?;
        port.write_all(bytes)?;
        trace!(len = bytes.len(), "serial tx");
        Ok(())
    }
}

impl Transport for SerialTransport {
    fn open(&mut self) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.open_port().map_err(Into::into)
    }

    fn write(
        &mut self,
        bytes: &[u8],
    ) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.write_line(bytes).map_err(Into::into)
    }

    fn close(&mut self) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.port.take().is_some() {
            tracing::info!(port = %self.port_name, "serial port closed");
        }
        Ok(())
    }
}
