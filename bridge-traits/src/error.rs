use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("Ad network error: {0}")]
    AdNetwork(String),

    #[error("Script dispatch failed: {0}")]
    Script(String),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
