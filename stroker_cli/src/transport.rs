//! Transport selection from `[transport]`.

use eyre::Result;
use stroker_config::TransportCfg;
use stroker_traits::Transport;

pub type BoxedTransport = Box<dyn Transport + Send>;

/// Mock transport when `debug = true`, the serial port otherwise.
pub fn from_config(cfg: &TransportCfg) -> Result<BoxedTransport> {
    if cfg.debug {
        tracing::info!("transport.debug set; printing frames to stdout");
        return Ok(Box::new(stroker_hardware::SimulatedTransport::stdout()));
    }
    serial(cfg)
}

#[cfg(feature = "hardware")]
fn serial(cfg: &TransportCfg) -> Result<BoxedTransport> {
    tracing::info!(port = %cfg.port, baud = cfg.baud_rate, "using serial transport");
    Ok(Box::new(stroker_hardware::SerialTransport::new(
        cfg.port.clone(),
        cfg.baud_rate,
    )))
}

#[cfg(not(feature = "hardware"))]
fn serial(cfg: &TransportCfg) -> Result<BoxedTransport> {
    Err(eyre::Report::new(stroker_core::StrokerError::Transport(
        format!(
            "open: no serial support in this build for port {}; rebuild with --features hardware or set transport.debug = true",
            cfg.port
        ),
    )))
}
