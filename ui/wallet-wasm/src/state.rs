//! `localStorage` persistence for the connected address.
//!
//! Stored raw (not JSON-encoded) so pages that read the key directly keep working.

use gloo_storage::{LocalStorage, Storage};
use mv_wallet_connector::{AddressStore, STORED_ADDRESS_KEY, WalletError};

#[derive(Default)]
pub struct LocalAddressStore;

impl AddressStore for LocalAddressStore {
    fn load(&self) -> Option<String> {
        LocalStorage::raw()
            .get_item(STORED_ADDRESS_KEY)
            .ok()
            .flatten()
            .filter(|address| !address.trim().is_empty())
    }

    fn save(&self, address: &str) -> Result<(), WalletError> {
        LocalStorage::raw()
            .set_item(STORED_ADDRESS_KEY, address)
            .map_err(|err| WalletError::Storage(format!("{err:?}")))
    }

    fn clear(&self) -> Result<(), WalletError> {
        LocalStorage::raw()
            .remove_item(STORED_ADDRESS_KEY)
            .map_err(|err| WalletError::Storage(format!("{err:?}")))
    }
}
