use std::cell::RefCell;

use crate::WalletError;

/// Client storage key holding the last connected address.
pub const STORED_ADDRESS_KEY: &str = "walletAddress";

/// Where the last connected address survives a page reload.
pub trait AddressStore {
    fn load(&self) -> Option<String>;
    fn save(&self, address: &str) -> Result<(), WalletError>;
    fn clear(&self) -> Result<(), WalletError>;
}

#[derive(Default)]
pub struct InMemoryAddressStore {
    address: RefCell<Option<String>>,
}

impl InMemoryAddressStore {
    pub fn with_address(address: &str) -> Self {
        Self {
            address: RefCell::new(Some(address.to_owned())),
        }
    }
}

impl AddressStore for InMemoryAddressStore {
    fn load(&self) -> Option<String> {
        self.address
            .borrow()
            .clone()
            .filter(|address| !address.trim().is_empty())
    }

    fn save(&self, address: &str) -> Result<(), WalletError> {
        *self.address.borrow_mut() = Some(address.to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), WalletError> {
        self.address.borrow_mut().take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_stored_address_counts_as_missing() {
        let store = InMemoryAddressStore::with_address("  ");
        assert_eq!(store.load(), None);
    }

    #[test]
    fn save_replaces_and_clear_removes() {
        let store = InMemoryAddressStore::default();
        store.save("0xAA").unwrap();
        store.save("0xBB").unwrap();
        assert_eq!(store.load().as_deref(), Some("0xBB"));
        store.clear().unwrap();
        assert_eq!(store.load(), None);
    }
}
