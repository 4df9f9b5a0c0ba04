use anyhow::{Context, Result};
use async_trait::async_trait;
use mv_api_types::{UpdateWalletRequest, VerifyWalletRequest, WalletStatusResponse};
use mv_wallet_connector::{WalletBackend, WalletError};
use serde::Serialize;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// `reqwest` client for the storefront's wallet endpoints.
///
/// Reads `MINTVERSE_API_URL` from environment at construction time when no
/// endpoint is given (default: `http://localhost:8080`).
pub struct HttpWalletBackend {
    endpoint: String,
    http: reqwest::Client,
}

impl Default for HttpWalletBackend {
    fn default() -> Self {
        Self::new(None)
    }
}

impl HttpWalletBackend {
    pub fn new(endpoint: Option<String>) -> Self {
        let endpoint = endpoint
            .or_else(|| std::env::var("MINTVERSE_API_URL").ok())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    // Error statuses still carry a `{status, message}` body, so it is decoded
    // regardless of the HTTP code.
    async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<WalletStatusResponse> {
        let url = format!("{}{}", self.endpoint, path);

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {path} transport"))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .with_context(|| format!("POST {path} body"))?;
        debug!(%url, %status, "wallet backend responded");

        serde_json::from_str::<WalletStatusResponse>(&text)
            .with_context(|| format!("POST {path} HTTP {status}: unexpected body {text:?}"))
    }
}

#[async_trait(?Send)]
impl WalletBackend for HttpWalletBackend {
    async fn update_wallet(&self, wallet_address: &str) -> Result<WalletStatusResponse, WalletError> {
        let body = UpdateWalletRequest {
            wallet_address: Some(wallet_address.to_owned()),
        };
        self.post("/update_wallet", &body).await.map_err(network_error)
    }

    async fn verify_wallet(&self, address: &str) -> Result<WalletStatusResponse, WalletError> {
        let body = VerifyWalletRequest {
            address: Some(address.to_owned()),
        };
        self.post("/verify_wallet", &body).await.map_err(network_error)
    }
}

fn network_error(err: anyhow::Error) -> WalletError {
    WalletError::Network(format!("{err:#}"))
}
