//! Wallet RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - POST JSON request objects to `<endpoint>/<operation>`
//! - Authenticate with the wallet's client certificate
//! - Enforce the per-call timeout
//! - Classify failures as timeout, unreachable, remote or malformed

use reqwest::Identity;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

use crate::config::WalletRpcConfig;
use crate::rpc::types::{RpcError, RpcResult, WalletRpc};

/// HTTPS JSON client for the wallet RPC service. Stateless per call.
#[derive(Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    base_url: Url,
    timeout_duration: Duration,
}

impl RpcClient {
    /// Create a new client from the connection configuration.
    ///
    /// Certificate material is read once here and shared by every call.
    pub fn new(config: &WalletRpcConfig) -> RpcResult<Self> {
        let mut endpoint = config.endpoint.clone();
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        let base_url: Url = endpoint.parse().map_err(|e| {
            RpcError::Client(format!("Invalid RPC endpoint '{}': {}", config.endpoint, e))
        })?;

        let timeout_duration = Duration::from_secs(config.timeout_secs);
        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .connect_timeout(timeout_duration)
            .danger_accept_invalid_certs(config.accept_invalid_certs);

        if let (Some(cert_path), Some(key_path)) = (&config.cert_path, &config.key_path) {
            builder = builder.identity(load_identity(cert_path, key_path)?);
        }
        if config.accept_invalid_certs {
            tracing::debug!("Wallet RPC server certificate verification disabled");
        }

        let http = builder
            .build()
            .map_err(|e| RpcError::Client(format!("Failed to build HTTP client: {}", e)))?;

        tracing::info!(
            endpoint = %base_url,
            timeout_secs = config.timeout_secs,
            "Wallet RPC client initialized"
        );

        Ok(Self {
            http,
            base_url,
            timeout_duration,
        })
    }

    async fn exchange(&self, operation: &str, payload: &Value) -> RpcResult<Value> {
        let url = self.base_url.join(operation).map_err(|e| RpcError::Client(e.to_string()))?;

        let response = self
            .http
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| self.transport_error(operation, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(operation, e))?;

        if !status.is_success() {
            return Err(RpcError::Remote {
                operation: operation.to_string(),
                status: status.as_u16(),
                message: body,
            });
        }

        let value: Value = serde_json::from_str(&body).map_err(|e| RpcError::Malformed {
            operation: operation.to_string(),
            reason: e.to_string(),
        })?;

        // The wallet answers most failures with 200 and `"success": false`.
        if value.get("success") == Some(&Value::Bool(false)) {
            let message = value
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("success=false")
                .to_string();
            return Err(RpcError::Remote {
                operation: operation.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        Ok(value)
    }

    fn transport_error(&self, operation: &str, err: reqwest::Error) -> RpcError {
        if err.is_timeout() {
            RpcError::Timeout {
                operation: operation.to_string(),
                secs: self.timeout_duration.as_secs(),
            }
        } else {
            RpcError::Unreachable {
                operation: operation.to_string(),
                reason: err.to_string(),
            }
        }
    }
}

impl WalletRpc for RpcClient {
    async fn call(&self, operation: &str, payload: Value) -> RpcResult<Value> {
        match timeout(self.timeout_duration, self.exchange(operation, &payload)).await {
            Ok(result) => {
                if let Err(e) = &result {
                    tracing::debug!(operation, error = %e, "Wallet RPC call failed");
                }
                result
            }
            Err(_) => {
                tracing::debug!(operation, "Wallet RPC call timed out");
                Err(RpcError::Timeout {
                    operation: operation.to_string(),
                    secs: self.timeout_duration.as_secs(),
                })
            }
        }
    }
}

/// Build a client identity from a PEM certificate and PEM private key.
fn load_identity(cert_path: &Path, key_path: &Path) -> RpcResult<Identity> {
    let mut pem = fs::read(cert_path).map_err(|e| {
        RpcError::Client(format!("Certificate file {:?} unreadable: {}", cert_path, e))
    })?;
    let key = fs::read(key_path).map_err(|e| {
        RpcError::Client(format!("Private key file {:?} unreadable: {}", key_path, e))
    })?;
    pem.push(b'\n');
    pem.extend_from_slice(&key);

    Identity::from_pem(&pem)
        .map_err(|e| RpcError::Client(format!("Invalid client certificate or key: {}", e)))
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}
