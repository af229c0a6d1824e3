use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Core initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error("Ad lifecycle error: {0}")]
    Ads(#[from] core_ads::AdError),

    #[error("Bridge gateway error: {0}")]
    Gateway(#[from] core_bridge::GatewayError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
