//! Client for the JSON-RPC 1.0 interface of a bitcoin-style wallet daemon.
//!
//! [`RpcClient`] posts one request per call to `http://{host}:{port}/` with HTTP Basic
//! authentication and hands back the `result` field of the reply. Typed wrappers for the
//! wallet methods used by the terminal shell decode that field into the schemas in
//! [`types`] right at the boundary, so callers never poke at raw JSON.
//!
//! ```rust,ignore
//! use bitcli_client::{RpcClient, RpcConfig};
//!
//! # async fn example() -> bitcli_client::Result<()> {
//! let client = RpcClient::new(&RpcConfig::default())?;
//! let balance = client.get_balance().await?;
//! println!("{balance} BTC");
//! # Ok(())
//! # }
//! ```
pub mod client;
pub mod config;
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
pub mod types;

pub use client::{basic_auth_header, request_body, RpcClient, CLIENT_ID};
pub use config::RpcConfig;
use thiserror::Error;

/// Error type for client operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("failed: {status}: {body}")]
    FailedWithBody {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("invalid JSON in response: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("response has no result field")]
    MissingResult,
    #[error("rpc error: {0}")]
    Rpc(String),
    #[error("unexpected {method} result: {reason}")]
    UnexpectedResult { method: String, reason: String },
    #[error("method name must not be empty")]
    EmptyMethod,
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

/// Coarse classification of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The daemon could not be reached or answered with a non-2xx status.
    Transport,
    /// The daemon answered, but the reply (or the request we were asked to
    /// build) does not follow the JSON-RPC contract.
    Protocol,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Reqwest(_) | Error::FailedWithBody { .. } | Error::Url(_) => {
                ErrorKind::Transport
            }
            Error::InvalidJson(_)
            | Error::MissingResult
            | Error::Rpc(_)
            | Error::UnexpectedResult { .. }
            | Error::EmptyMethod => ErrorKind::Protocol,
        }
    }

    /// HTTP status of a rejected request, if the daemon answered at all.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Error::FailedWithBody { status, .. } => Some(*status),
            Error::Reqwest(err) => err.status(),
            _ => None,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
