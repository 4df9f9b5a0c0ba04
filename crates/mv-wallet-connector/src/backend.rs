use async_trait::async_trait;
use mv_api_types::WalletStatusResponse;

use crate::WalletError;

/// The storefront endpoints the connect flow talks to.
///
/// Implementations return the parsed body whatever the HTTP status was; only
/// transport and decoding failures become [`WalletError::Network`].
#[async_trait(?Send)]
pub trait WalletBackend {
    /// `POST /update_wallet`
    async fn update_wallet(&self, wallet_address: &str) -> Result<WalletStatusResponse, WalletError>;

    /// `POST /verify_wallet`
    async fn verify_wallet(&self, address: &str) -> Result<WalletStatusResponse, WalletError>;
}
