use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

use crate::WalletError;

/// Wallet providers the storefront knows how to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalletKind {
    MetaMask,
}

impl fmt::Display for WalletKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletKind::MetaMask => f.write_str("MetaMask"),
        }
    }
}

impl FromStr for WalletKind {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "metamask" => Ok(WalletKind::MetaMask),
            other => Err(WalletError::UnsupportedProvider(other.to_owned())),
        }
    }
}

/// An injected wallet, e.g. the object a browser extension exposes on `window`.
#[async_trait(?Send)]
pub trait WalletProvider {
    fn kind(&self) -> WalletKind;

    /// Whether the provider is present in the current environment.
    fn is_available(&self) -> bool;

    /// Prompts the user for account access. Ordered as the provider returns them.
    async fn request_accounts(&self) -> Result<Vec<String>, WalletError>;

    /// Accounts the user has already authorized, without prompting.
    async fn authorized_accounts(&self) -> Result<Vec<String>, WalletError>;
}
