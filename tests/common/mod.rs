//! Shared fakes for integration tests: a scripted wallet, a manual clock, a
//! scripted operator and a recording observer, plus a raw-TCP HTTP backend
//! for exercising the real client.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use nft_bulk_minter::lifecycle::{AutoPrompt, Checkpoint, Clock, Decision, OperatorPrompt};
use nft_bulk_minter::metadata::{read_metadata, MetadataRecord, MintDefaults};
use nft_bulk_minter::observability::{MintEvent, MintObserver};
use nft_bulk_minter::rpc::wallet::ops;
use nft_bulk_minter::rpc::{RpcError, RpcResult, WalletRpc};

#[derive(Default)]
struct Script {
    queued: HashMap<String, VecDeque<RpcResult<Value>>>,
    fallback: HashMap<String, RpcResult<Value>>,
    calls: Vec<(String, Value)>,
}

/// Wallet whose answers are scripted per operation.
///
/// Queued answers are consumed in order; once they run out the operation's
/// fallback answer repeats. An operation with neither is unreachable.
#[derive(Clone, Default)]
pub struct ScriptedWallet {
    script: Arc<Mutex<Script>>,
}

impl ScriptedWallet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A synced mainnet wallet whose mints are indexed at height 100 on the
    /// first poll.
    pub fn healthy() -> Self {
        let wallet = Self::new();
        wallet.always(ops::GET_SYNC_STATUS, Ok(sync(true, false)));
        wallet.always(ops::GET_NETWORK_INFO, Ok(network("mainnet")));
        wallet.always(ops::NFT_MINT_NFT, Ok(json!({"success": true, "nft_id": "nft1minted"})));
        wallet.always(ops::NFT_GET_INFO, Ok(nft_info(100)));
        wallet.always(
            ops::GET_TRANSACTIONS,
            Ok(json!({"success": true, "transactions": [{"confirmed": true}]})),
        );
        wallet
    }

    pub fn push(&self, operation: &str, answer: RpcResult<Value>) -> &Self {
        self.script
            .lock()
            .unwrap()
            .queued
            .entry(operation.to_string())
            .or_default()
            .push_back(answer);
        self
    }

    pub fn always(&self, operation: &str, answer: RpcResult<Value>) -> &Self {
        self.script
            .lock()
            .unwrap()
            .fallback
            .insert(operation.to_string(), answer);
        self
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.script.lock().unwrap().calls.clone()
    }

    /// Payloads sent to one operation, in order.
    pub fn payloads(&self, operation: &str) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter(|(op, _)| op == operation)
            .map(|(_, payload)| payload)
            .collect()
    }

    pub fn count(&self, operation: &str) -> usize {
        self.payloads(operation).len()
    }
}

impl WalletRpc for ScriptedWallet {
    async fn call(&self, operation: &str, payload: Value) -> RpcResult<Value> {
        let mut script = self.script.lock().unwrap();
        script.calls.push((operation.to_string(), payload));
        if let Some(answer) = script
            .queued
            .get_mut(operation)
            .and_then(|queue| queue.pop_front())
        {
            return answer;
        }
        match script.fallback.get(operation) {
            Some(answer) => answer.clone(),
            None => Err(unreachable(operation)),
        }
    }
}

pub fn sync(synced: bool, syncing: bool) -> Value {
    json!({"success": true, "synced": synced, "syncing": syncing, "genesis_initialized": true})
}

pub fn network(name: &str) -> Value {
    json!({"success": true, "network_name": name, "network_prefix": "xch"})
}

pub fn nft_info(height: u64) -> Value {
    json!({"success": true, "nft_info": {"mint_height": height, "nft_coin_id": "0xabc"}})
}

pub fn minted(id: &str) -> Value {
    json!({"success": true, "nft_id": id})
}

pub fn unreachable(operation: &str) -> RpcError {
    RpcError::Unreachable {
        operation: operation.to_string(),
        reason: "connection refused".to_string(),
    }
}

pub fn remote(operation: &str, message: &str) -> RpcError {
    RpcError::Remote {
        operation: operation.to_string(),
        status: 200,
        message: message.to_string(),
    }
}

/// Clock that returns immediately and remembers what it was asked to sleep.
#[derive(Clone, Default)]
pub struct ManualClock {
    slept: Arc<Mutex<Vec<Duration>>>,
}

impl ManualClock {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }

    pub fn total(&self) -> Duration {
        self.sleeps().iter().sum()
    }
}

impl Clock for ManualClock {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
    }
}

/// Operator answering from a script, falling back to the automatic policy.
#[derive(Clone, Default)]
pub struct ScriptedPrompt {
    answers: Arc<Mutex<VecDeque<Decision>>>,
    seen: Arc<Mutex<Vec<Checkpoint>>>,
}

impl ScriptedPrompt {
    pub fn answering(answers: impl IntoIterator<Item = Decision>) -> Self {
        let prompt = Self::default();
        prompt.answers.lock().unwrap().extend(answers);
        prompt
    }

    pub fn seen(&self) -> Vec<Checkpoint> {
        self.seen.lock().unwrap().clone()
    }
}

impl OperatorPrompt for ScriptedPrompt {
    async fn decide(&mut self, checkpoint: &Checkpoint) -> Decision {
        self.seen.lock().unwrap().push(checkpoint.clone());
        let scripted = self.answers.lock().unwrap().pop_front();
        match scripted {
            Some(decision) => decision,
            None => {
                let mut fallback = AutoPrompt;
                fallback.decide(checkpoint).await
            }
        }
    }
}

/// Observer that keeps every event.
#[derive(Clone, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<MintEvent>>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<MintEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Indexes of every Submitting event, in order.
    pub fn submitted_indexes(&self) -> Vec<usize> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                MintEvent::Submitting { index, .. } => Some(index),
                _ => None,
            })
            .collect()
    }
}

impl MintObserver for RecordingObserver {
    fn on_event(&self, event: &MintEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

pub fn defaults() -> MintDefaults {
    MintDefaults {
        wallet_id: 3,
        royalty_address: "xch1royalty".to_string(),
        royalty_percentage: 5,
        fee: 615_000_000,
    }
}

/// Metadata file text: a template row plus `rows` data rows.
pub fn metadata_csv(rows: usize) -> String {
    let mut text = String::from(
        "hash,uris,meta_hash,meta_uris,license_hash,license_uris,edition_number,edition_total\n",
    );
    for i in 1..=rows {
        text.push_str(&format!(
            "h{i},https://img.example/{i}.png,mh{i},https://meta.example/{i}.json,lh,https://license.example/l.txt,{i},{rows}\n"
        ));
    }
    text
}

pub fn records(rows: usize) -> Vec<MetadataRecord> {
    read_metadata(metadata_csv(rows).as_bytes(), &defaults(), false).unwrap()
}

/// Start a programmable HTTP backend on an ephemeral port.
///
/// The handler receives the request path and body and returns a status code,
/// a body and a delay before answering.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String, String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String, Duration)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let Some((path, body)) = read_request(&mut socket).await else {
                            return;
                        };
                        let (status, body, delay) = f(path, body).await;
                        tokio::time::sleep(delay).await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

async fn read_request(socket: &mut TcpStream) -> Option<(String, String)> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();
    let length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();
    Some((path, body))
}
