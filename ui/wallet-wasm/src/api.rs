//! HTTP client for the storefront wallet endpoints.
//!
//! Same-origin by default: the storefront serves both the page and the API.

use async_trait::async_trait;
use gloo_net::http::Request;
use mv_api_types::{UpdateWalletRequest, VerifyWalletRequest, WalletStatusResponse};
use mv_wallet_connector::{WalletBackend, WalletError};
use serde::Serialize;
use tracing::debug;

/// The page origin, e.g. `https://shop.example`.
pub fn base_url() -> String {
    gloo_utils::window().location().origin().unwrap_or_default()
}

pub struct GlooBackend {
    base_url: String,
}

impl GlooBackend {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// POSTs `body` as JSON and decodes the `{status, message}` reply,
    /// including on 4xx answers.
    async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<WalletStatusResponse, WalletError> {
        let url = format!("{}{}", self.base_url, path);

        let response = Request::post(&url)
            .json(body)
            .map_err(|e| network_error(path, e))?
            .send()
            .await
            .map_err(|e| network_error(path, e))?;

        let status = response.status();
        let status_text = response.status_text();
        debug!(%url, status, "wallet backend responded");

        response
            .json::<WalletStatusResponse>()
            .await
            .map_err(|e| WalletError::Network(format!("POST {path} {status} {status_text}: {e}")))
    }
}

#[async_trait(?Send)]
impl WalletBackend for GlooBackend {
    async fn update_wallet(&self, wallet_address: &str) -> Result<WalletStatusResponse, WalletError> {
        let body = UpdateWalletRequest {
            wallet_address: Some(wallet_address.to_owned()),
        };
        self.post("/update_wallet", &body).await
    }

    async fn verify_wallet(&self, address: &str) -> Result<WalletStatusResponse, WalletError> {
        let body = VerifyWalletRequest {
            address: Some(address.to_owned()),
        };
        self.post("/verify_wallet", &body).await
    }
}

fn network_error(path: &str, err: gloo_net::Error) -> WalletError {
    WalletError::Network(format!("POST {path}: {err}"))
}
