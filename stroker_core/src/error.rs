use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StrokerError {
    /// Caller violated a motion-domain precondition (position outside [0,100],
    /// zero-span range). Never clamped.
    #[error("domain error: {0}")]
    Domain(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid state: {0}")]
    State(String),
}

impl StrokerError {
    pub fn relative_out_of_range(value: i32) -> Self {
        Self::Domain(format!(
            "relative position must be between 0 and 100, got {value}"
        ))
    }
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
