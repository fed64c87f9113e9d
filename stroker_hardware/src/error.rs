use thiserror::Error;

#[derive(Debug, Error)]
pub enum SerialError {
    #[error("serial port {port} unavailable: {source}")]
    Unavailable {
        port: String,
        #[source]
        source: std::io::Error,
    },
    #[error("serial port not open")]
    NotOpen,
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SerialError>;
