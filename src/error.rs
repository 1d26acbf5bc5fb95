//! Store errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Remote wallet service failure (network, timeout, rejected call)
    #[error("wallet api: {0}")]
    Api(String),

    #[error("store lock poisoned")]
    Lock,

    #[error("no active wallet")]
    NoActiveWallet,

    #[error("no wallet creation in progress")]
    NoPendingWallet,

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid route pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl StoreError {
    pub fn api(msg: impl Into<String>) -> Self { Self::Api(msg.into()) }
}

pub type StoreResult<T> = Result<T, StoreError>;
