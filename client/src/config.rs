use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Regtest RPC port of a stock bitcoind.
pub const DEFAULT_PORT: u16 = 18443;
pub const DEFAULT_USER: &str = "bitcoinrpc";
pub const DEFAULT_PASSWORD: &str = "password";

/// Connection settings for the wallet daemon, built once at startup and handed to
/// [`RpcClient::new`](crate::RpcClient::new).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            user: DEFAULT_USER.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
        }
    }
}

impl fmt::Debug for RpcConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl RpcConfig {
    /// Plain-HTTP endpoint the daemon listens on.
    pub fn endpoint(&self) -> Result<Url> {
        Ok(Url::parse(&format!("http://{}:{}/", self.host, self.port))?)
    }
}
