//! Wallet connection and verification flow.
//!
//! The connector drives an injected wallet provider, the storefront backend and
//! a status view through the traits below. Every edge is a trait so the flow
//! runs the same in the browser binding and under test.

mod connector;
mod error;
mod provider;
mod backend;
mod store;
mod view;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use backend::WalletBackend;
pub use connector::{ConnectionState, VerificationResult, WalletConnector};
pub use error::{REJECTED_FALLBACK, WalletError};
pub use provider::{WalletKind, WalletProvider};
pub use store::{AddressStore, InMemoryAddressStore, STORED_ADDRESS_KEY};
pub use view::{StatusKind, WalletView};
