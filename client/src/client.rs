use crate::types::{BlockchainInfo, TransactionEntry, WalletInfo};
use crate::{Error, Result, RpcConfig};
use base64::{engine::general_purpose, Engine as _};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info};
use url::Url;

/// `id` attached to every request.
pub const CLIENT_ID: &str = "bitcli";

/// Blocking-style JSON-RPC client: one POST per call, no retries, no pooling guarantees.
#[derive(Clone, Debug)]
pub struct RpcClient {
    pub endpoint: Url,
    http_client: reqwest::Client,
    authorization: String,
}

impl RpcClient {
    pub fn new(config: &RpcConfig) -> Result<Self> {
        let endpoint = config.endpoint()?;
        let http_client = reqwest::Client::builder().build()?;
        Ok(Self {
            endpoint,
            http_client,
            authorization: basic_auth_header(&config.user, &config.password),
        })
    }

    /// Invoke `method` and return the `result` field of the reply.
    ///
    /// `params` defaults to an empty array.
    pub async fn call(&self, method: &str, params: Option<Vec<Value>>) -> Result<Value> {
        if method.is_empty() {
            return Err(Error::EmptyMethod);
        }
        let body = request_body(method, params);
        debug!(method, "sending rpc request");

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, &self.authorization)
            .body(body.to_string())
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        info!(method, status = status.as_u16(), body = %text, "rpc response");

        if !status.is_success() {
            return Err(Error::FailedWithBody { status, body: text });
        }
        extract_result(&text)
    }

    /// [`call`](Self::call), then decode the result into `T`.
    pub async fn call_as<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Option<Vec<Value>>,
    ) -> Result<T> {
        let result = self.call(method, params).await?;
        serde_json::from_value(result).map_err(|err| Error::UnexpectedResult {
            method: method.to_string(),
            reason: err.to_string(),
        })
    }

    pub async fn get_wallet_info(&self) -> Result<WalletInfo> {
        self.call_as("getwalletinfo", None).await
    }

    pub async fn get_balance(&self) -> Result<f64> {
        self.call_as("getbalance", None).await
    }

    pub async fn get_blockchain_info(&self) -> Result<BlockchainInfo> {
        self.call_as("getblockchaininfo", None).await
    }

    pub async fn get_new_address(&self) -> Result<String> {
        self.call_as("getnewaddress", None).await
    }

    /// Returns the txid of the broadcast transaction.
    pub async fn send_to_address(&self, address: &str, amount: f64) -> Result<String> {
        self.call_as("sendtoaddress", Some(vec![json!(address), json!(amount)]))
            .await
    }

    pub async fn list_transactions(&self) -> Result<Vec<TransactionEntry>> {
        self.call_as("listtransactions", None).await
    }
}

/// JSON-RPC 1.0 envelope for `method`.
pub fn request_body(method: &str, params: Option<Vec<Value>>) -> Value {
    json!({
        "jsonrpc": "1.0",
        "id": CLIENT_ID,
        "method": method,
        "params": params.unwrap_or_default(),
    })
}

/// Value of the `Authorization` header for HTTP Basic authentication.
pub fn basic_auth_header(user: &str, password: &str) -> String {
    let credentials = general_purpose::STANDARD.encode(format!("{user}:{password}"));
    format!("Basic {credentials}")
}

fn extract_result(body: &str) -> Result<Value> {
    let mut envelope: Value = serde_json::from_str(body).map_err(Error::InvalidJson)?;
    let error = envelope
        .get("error")
        .filter(|error| !error.is_null())
        .map(describe_rpc_error);
    let result = envelope.get_mut("result").map(Value::take);
    match (result, error) {
        (None | Some(Value::Null), Some(message)) => Err(Error::Rpc(message)),
        (Some(result), _) => Ok(result),
        (None, None) => Err(Error::MissingResult),
    }
}

fn describe_rpc_error(error: &Value) -> String {
    match error.get("message").and_then(Value::as_str) {
        Some(message) => message.to_string(),
        None => error.to_string(),
    }
}
