use crate::provider::WalletKind;
use thiserror::Error;

/// Shown when a provider rejects a request without a usable message.
pub const REJECTED_FALLBACK: &str = "MetaMask connection failed. Try again.";

/// Every failure the connect flow can run into.
///
/// `Display` is the short message shown to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WalletError {
    #[error("Unsupported wallet type: {0}")]
    UnsupportedProvider(String),
    #[error("{0} not detected! Install it first.")]
    ProviderUnavailable(WalletKind),
    #[error("No wallet found in {0}. Please create or import a wallet before connecting.")]
    NoAccounts(WalletKind),
    #[error("{0}")]
    ProviderRejected(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Wallet verification rejected ({status})")]
    VerificationRejected {
        status: String,
        message: Option<String>,
    },
    #[error("A wallet connection is already in progress.")]
    ConnectInProgress,
    #[error("Could not access wallet storage: {0}")]
    Storage(String),
}

impl WalletError {
    /// Wraps a provider's own rejection message, falling back to a generic one
    /// when it is absent or blank.
    pub fn provider_rejected(message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| REJECTED_FALLBACK.to_owned());
        WalletError::ProviderRejected(message)
    }
}
