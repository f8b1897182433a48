//! Shared test helpers: a canned JSON-RPC endpoint and a scripted signing
//! provider.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::Address;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use healthvault_core::{ProviderResponse, SigningProvider};

/// Spawn a minimal HTTP endpoint that answers every JSON-RPC request with
/// the given `result` string. Returns the endpoint URL and a hit counter.
pub async fn spawn_rpc_server(result_hex: String) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = format!("http://{}", listener.local_addr().unwrap());
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            counter.fetch_add(1, Ordering::SeqCst);
            let result = result_hex.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let _ = stream.read(&mut buf).await;
                let body = format!("{{\"jsonrpc\":\"2.0\",\"id\":1,\"result\":\"{result}\"}}");
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });
    (addr, hits)
}

/// Spawn an endpoint that answers every request with the given HTTP error
/// status and an empty body.
pub async fn spawn_http_error_server(status: u16) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = format!("http://{}", listener.local_addr().unwrap());
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let _ = stream.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {status} Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });
    (addr, hits)
}

/// Scripted signing provider. With `response: None` it holds the reply
/// channel open forever, modeling a wallet that never answers.
pub struct ScriptedProvider {
    pub identity: Option<Address>,
    pub chain: Option<u64>,
    pub response: Option<ProviderResponse>,
    pub requests: AtomicUsize,
    pub last_params: Mutex<Option<serde_json::Value>>,
    pub held: Mutex<Vec<oneshot::Sender<ProviderResponse>>>,
}

impl ScriptedProvider {
    pub fn new(response: Option<ProviderResponse>) -> Self {
        Self {
            identity: Some(Address::repeat_byte(0xaa)),
            chain: Some(1),
            response,
            requests: AtomicUsize::new(0),
            last_params: Mutex::new(None),
            held: Mutex::new(Vec::new()),
        }
    }

    /// Take a held reply channel, simulating a provider answering late.
    pub fn take_held(&self) -> Option<oneshot::Sender<ProviderResponse>> {
        self.held.lock().unwrap().pop()
    }
}

impl SigningProvider for ScriptedProvider {
    fn current_identity(&self) -> Option<Address> {
        self.identity
    }

    fn chain_id(&self) -> Option<u64> {
        self.chain
    }

    fn request(
        &self,
        _method: &str,
        params: serde_json::Value,
        reply: oneshot::Sender<ProviderResponse>,
    ) {
        self.requests.fetch_add(1, Ordering::SeqCst);
        *self.last_params.lock().unwrap() = Some(params);
        match self.response.clone() {
            Some(response) => {
                let _ = reply.send(response);
            }
            None => self.held.lock().unwrap().push(reply),
        }
    }
}
