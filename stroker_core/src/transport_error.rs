//! Maps `Box<dyn Error>` from the `Transport` trait boundary to `StrokerError`.
//!
//! The trait in `stroker_traits` uses `Box<dyn Error + Send + Sync>`; this
//! module converts those to our typed error enum, with an optional
//! feature-gated path for `stroker_hardware::error::SerialError` downcasting.

use crate::error::StrokerError;

/// Map a transport-boundary error to a typed `StrokerError`.
///
/// `op` names the failing operation ("open", "write", "close") and ends up in
/// the message so the owner can tell a missing port from a broken link.
pub fn map_transport_error(op: &str, e: &(dyn std::error::Error + 'static)) -> StrokerError {
    #[cfg(feature = "hardware-errors")]
    {
        use stroker_hardware::error::SerialError;
        if let Some(se) = e.downcast_ref::<SerialError>() {
            return match se {
                SerialError::Unavailable { port, .. } => {
                    StrokerError::Transport(format!("{op}: port {port} unavailable: {se}"))
                }
                other => StrokerError::Transport(format!("{op}: {other}")),
            };
        }
    }

    StrokerError::Transport(format!("{op}: {e}"))
}
