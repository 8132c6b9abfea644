//! In-process stand-in for a wallet daemon's JSON-RPC endpoint.
//!
//! Replies are configured per method; anything unconfigured gets the daemon's
//! "Method not found" 404. Every request is recorded so tests can assert on exactly
//! what went over the wire.
use crate::{RpcClient, RpcConfig, CLIENT_ID};
use axum::{
    extract::State as AxumState,
    http::{header, HeaderMap, StatusCode as AxumStatusCode},
    routing::post,
    Router,
};
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex, MutexGuard},
};

/// Canned HTTP reply for one method.
#[derive(Clone, Debug)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    /// Successful envelope carrying `value`.
    pub fn result(value: Value) -> Self {
        Self {
            status: 200,
            body: json!({ "result": value, "error": null, "id": CLIENT_ID }).to_string(),
        }
    }

    /// RPC failure the way bitcoind reports it over JSON-RPC 1.0: HTTP 500 with the
    /// error object in the body.
    pub fn rpc_error(code: i64, message: &str) -> Self {
        Self {
            status: 500,
            body: json!({
                "result": null,
                "error": { "code": code, "message": message },
                "id": CLIENT_ID,
            })
            .to_string(),
        }
    }

    pub fn raw(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// A request as received by the mock.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

impl RecordedRequest {
    pub fn method(&self) -> Option<&str> {
        self.body.get("method").and_then(Value::as_str)
    }
}

#[derive(Default)]
struct MockState {
    replies: Mutex<HashMap<String, Reply>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct MockDaemon {
    pub config: RpcConfig,
    state: Arc<MockState>,
    server_handle: tokio::task::JoinHandle<()>,
}

impl MockDaemon {
    /// Serve on a random loopback port.
    pub async fn start() -> std::io::Result<Self> {
        let state = Arc::new(MockState::default());
        let router = Router::new()
            .route("/", post(handle_rpc))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;
        let server_handle = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self {
            config: RpcConfig {
                host: addr.ip().to_string(),
                port: addr.port(),
                user: "mockuser".to_string(),
                password: "mockpass".to_string(),
            },
            state,
            server_handle,
        })
    }

    /// Answer every later `method` call with `reply`.
    pub fn reply(&self, method: &str, reply: Reply) {
        lock(&self.state.replies).insert(method.to_string(), reply);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state.requests).clone()
    }

    /// Methods received so far, in arrival order.
    pub fn methods(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter_map(|request| request.method().map(str::to_string))
            .collect()
    }

    pub fn client(&self) -> RpcClient {
        RpcClient::new(&self.config).expect("mock config is always a valid endpoint")
    }
}

impl Drop for MockDaemon {
    fn drop(&mut self) {
        self.server_handle.abort();
    }
}

async fn handle_rpc(
    AxumState(state): AxumState<Arc<MockState>>,
    headers: HeaderMap,
    body: String,
) -> (AxumStatusCode, String) {
    let Ok(body) = serde_json::from_str::<Value>(&body) else {
        return (AxumStatusCode::BAD_REQUEST, "Parse error".to_string());
    };
    let header_text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    let request = RecordedRequest {
        authorization: header_text(header::AUTHORIZATION),
        content_type: header_text(header::CONTENT_TYPE),
        body,
    };
    let method = request.method().unwrap_or_default().to_string();
    lock(&state.requests).push(request);

    let reply = lock(&state.replies).get(&method).cloned().unwrap_or_else(|| Reply {
        status: 404,
        body: json!({
            "result": null,
            "error": { "code": -32601, "message": "Method not found" },
            "id": CLIENT_ID,
        })
        .to_string(),
    });
    let status =
        AxumStatusCode::from_u16(reply.status).unwrap_or(AxumStatusCode::INTERNAL_SERVER_ERROR);
    (status, reply.body)
}
