//! Minimal JSON-RPC client for `eth_call`
//!
//! The dashboard only ever reads, so this is a single-method client bound to
//! one endpoint. Failures are typed but never retried; the next full refresh
//! re-attempts everything.

use alloy_primitives::Address;
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("endpoint returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("response missing result field")]
    MissingResult,

    #[error("result is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    result: Option<String>,
    error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

/// Read-only JSON-RPC client bound to a single endpoint.
#[derive(Debug, Clone)]
pub struct RpcClient {
    endpoint: String,
    client: reqwest::Client,
}

impl RpcClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(endpoint, reqwest::Client::new())
    }

    /// Reuses an existing HTTP client (connection pooling across readers).
    pub fn with_client(endpoint: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Issues an `eth_call` against `to` at the latest block and returns the
    /// raw return data.
    pub async fn call(&self, to: Address, data: Vec<u8>) -> Result<Vec<u8>, RpcError> {
        let body = request_body(to, &data);

        let response = self.client.post(&self.endpoint).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RpcError::Http { status, body });
        }

        let parsed: JsonRpcResponse = response.json().await?;
        if let Some(err) = parsed.error {
            return Err(RpcError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        let result = parsed.result.ok_or(RpcError::MissingResult)?;
        let stripped = result.strip_prefix("0x").unwrap_or(&result);
        Ok(hex::decode(stripped)?)
    }
}

fn request_body(to: Address, data: &[u8]) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "eth_call",
        "params": [
            {
                "to": format!("{to:#x}"),
                "data": format!("0x{}", hex::encode(data)),
            },
            "latest",
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_body_shape() {
        let to: Address = "0xab8254016ba286d0c51a92b2a1b0acec1dc2d7cb"
            .parse()
            .unwrap();
        let body = request_body(to, &[0xd3, 0x30, 0x7a, 0xfa]);

        assert_eq!(body["jsonrpc"], "2.0");
        assert_eq!(body["method"], "eth_call");
        assert_eq!(
            body["params"][0]["to"],
            "0xab8254016ba286d0c51a92b2a1b0acec1dc2d7cb"
        );
        assert_eq!(body["params"][0]["data"], "0xd3307afa");
        assert_eq!(body["params"][1], "latest");
    }

    #[test]
    fn test_rpc_error_display() {
        let err = RpcError::Rpc {
            code: -32000,
            message: "execution reverted".to_string(),
        };
        assert_eq!(err.to_string(), "rpc error -32000: execution reverted");
    }
}
