//! Schemas of the `result` payloads returned by the wallet methods we call.
//!
//! Only the fields the shell renders are declared; anything else the daemon sends is
//! ignored. A required field that is missing or mistyped fails decoding, which
//! [`RpcClient`](crate::RpcClient) reports as a protocol error.
use serde::Deserialize;

/// `getwalletinfo`
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct WalletInfo {
    pub walletname: String,
    pub txcount: u64,
}

/// `getblockchaininfo`
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct BlockchainInfo {
    pub chain: String,
    pub blocks: u64,
    pub headers: u64,
}

/// One element of the `listtransactions` array.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TransactionEntry {
    pub txid: String,
    pub category: String,
    pub amount: f64,
    /// Unix seconds.
    pub time: i64,
    /// Negative for transactions conflicting with the main chain.
    pub confirmations: i64,
    /// Only reported for `send` entries.
    pub fee: Option<f64>,
    pub address: Option<String>,
}
