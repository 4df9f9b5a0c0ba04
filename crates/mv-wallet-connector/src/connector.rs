use mv_crypto::same_address;
use std::cell::{Cell, RefCell};
use tracing::{debug, info, warn};

use crate::{AddressStore, StatusKind, WalletBackend, WalletError, WalletKind, WalletProvider, WalletView};

pub const VERIFIED_TEXT: &str = "✅ Wallet verified!";
pub const INVALID_TEXT: &str = "❌ Invalid wallet!";
pub const UNREACHABLE_TEXT: &str = "❌ Wallet could not be verified";
pub const VERIFYING_TEXT: &str = "Verifying wallet…";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
    Verified,
    VerificationFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationResult {
    Success,
    Invalid,
    Error,
}

#[derive(Debug, Default)]
struct Session {
    state: ConnectionState,
    address: Option<String>,
}

/// Drives one page's wallet connection.
///
/// Holds at most one bound address. Connect and restore flows are serialized:
/// while one is suspended on the provider or the backend, another is refused
/// with [`WalletError::ConnectInProgress`].
pub struct WalletConnector<P, B, V, S> {
    provider: P,
    backend: B,
    view: V,
    store: S,
    session: RefCell<Session>,
    in_flight: Cell<bool>,
}

struct FlightGuard<'a>(&'a Cell<bool>);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<P, B, V, S> WalletConnector<P, B, V, S>
where
    P: WalletProvider,
    B: WalletBackend,
    V: WalletView,
    S: AddressStore,
{
    pub fn new(provider: P, backend: B, view: V, store: S) -> Self {
        Self {
            provider,
            backend,
            view,
            store,
            session: RefCell::new(Session::default()),
            in_flight: Cell::new(false),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.session.borrow().state
    }

    pub fn address(&self) -> Option<String> {
        self.session.borrow().address.clone()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Connects the wallet named by `wallet_type`, then notifies and verifies it.
    ///
    /// Failures are logged and alerted here; the returned error is informational.
    pub async fn connect(&self, wallet_type: &str) -> Result<ConnectionState, WalletError> {
        let result = self.run_connect(wallet_type).await;
        match &result {
            Ok(state) => info!(wallet_type, ?state, "wallet connect finished"),
            Err(err) => self.fail(err),
        }
        result
    }

    async fn run_connect(&self, wallet_type: &str) -> Result<ConnectionState, WalletError> {
        let kind: WalletKind = wallet_type.parse()?;
        if kind != self.provider.kind() {
            return Err(WalletError::UnsupportedProvider(wallet_type.to_owned()));
        }

        let _guard = self.begin()?;
        let address = self.request_accounts().await?;
        self.bind(&address);
        self.notify_backend(&address).await;
        self.verify(&address).await;

        Ok(self.state())
    }

    /// Prompts the provider and returns the primary (first) account.
    pub async fn request_accounts(&self) -> Result<String, WalletError> {
        let kind = self.provider.kind();
        if !self.provider.is_available() {
            return Err(WalletError::ProviderUnavailable(kind));
        }

        let mut accounts = self.provider.request_accounts().await?.into_iter();
        let primary = accounts
            .next()
            .filter(|account| !account.trim().is_empty())
            .ok_or(WalletError::NoAccounts(kind))?;

        let ignored = accounts.len();
        if ignored > 0 {
            debug!(ignored, "provider returned several accounts, binding the first");
        }
        Ok(primary)
    }

    /// Best-effort `update_wallet`; never fails the caller.
    pub async fn notify_backend(&self, address: &str) {
        match self.backend.update_wallet(address).await {
            Ok(response) if response.is_success() => {
                info!(wallet_address = address, message = ?response.message, "wallet stored by backend");
            }
            Ok(response) => {
                warn!(
                    wallet_address = address,
                    status = %response.status,
                    message = ?response.message,
                    "backend did not store wallet"
                );
            }
            Err(err) => {
                warn!(wallet_address = address, error = %err, "failed to send wallet to backend");
            }
        }
    }

    /// Asks the backend to verify `address` and reflects the answer in the view.
    pub async fn verify(&self, address: &str) -> VerificationResult {
        let result = match self.backend.verify_wallet(address).await {
            Ok(response) if response.is_success() => {
                info!(wallet_address = address, "wallet verified");
                self.view.set_status(VERIFIED_TEXT, StatusKind::Verified);
                VerificationResult::Success
            }
            Ok(response) => {
                let err = WalletError::VerificationRejected {
                    status: response.status,
                    message: response.message,
                };
                warn!(wallet_address = address, error = %err, detail = ?err, "wallet rejected by backend");
                self.view.set_status(INVALID_TEXT, StatusKind::Invalid);
                VerificationResult::Invalid
            }
            Err(err) => {
                warn!(wallet_address = address, error = %err, "wallet verification request failed");
                self.view.set_status(UNREACHABLE_TEXT, StatusKind::Invalid);
                self.view.alert(&err.to_string());
                VerificationResult::Error
            }
        };

        self.record_verification(address, result);
        result
    }

    /// Re-verifies a previously connected wallet without prompting the user.
    pub async fn restore_on_load(&self) -> ConnectionState {
        let Some(stored) = self.store.load() else {
            debug!("no stored wallet address, skipping restore");
            return self.state();
        };

        if !self.provider.is_available() {
            info!(provider = %self.provider.kind(), "provider not present, skipping wallet restore");
            return self.state();
        }

        let Ok(_guard) = self.begin() else {
            debug!("wallet flow already running, skipping restore");
            return self.state();
        };

        let accounts = match self.provider.authorized_accounts().await {
            Ok(accounts) => accounts,
            Err(err) => {
                warn!(error = %err, "failed to read authorized accounts");
                return self.state();
            }
        };

        let Some(address) = accounts.into_iter().find(|account| same_address(account, &stored)) else {
            info!(wallet_address = %stored, "stored wallet is no longer authorized, forgetting it");
            if let Err(err) = self.store.clear() {
                warn!(error = %err, "failed to clear stored wallet address");
            }
            return self.state();
        };

        self.bind(&address);
        self.verify(&address).await;
        self.state()
    }

    fn begin(&self) -> Result<FlightGuard<'_>, WalletError> {
        if self.in_flight.replace(true) {
            return Err(WalletError::ConnectInProgress);
        }
        Ok(FlightGuard(&self.in_flight))
    }

    fn bind(&self, address: &str) {
        {
            let mut session = self.session.borrow_mut();
            session.state = ConnectionState::Connected;
            session.address = Some(address.to_owned());
        }

        self.view.show_address(Some(address));
        self.view.set_status(VERIFYING_TEXT, StatusKind::Neutral);
        if let Err(err) = self.store.save(address) {
            warn!(wallet_address = address, error = %err, "failed to persist wallet address");
        }
    }

    fn record_verification(&self, address: &str, result: VerificationResult) {
        let mut session = self.session.borrow_mut();
        let bound = session
            .address
            .as_deref()
            .is_some_and(|bound| same_address(bound, address));
        if bound {
            session.state = match result {
                VerificationResult::Success => ConnectionState::Verified,
                VerificationResult::Invalid | VerificationResult::Error => ConnectionState::VerificationFailed,
            };
        }
    }

    fn fail(&self, err: &WalletError) {
        warn!(error = %err, detail = ?err, "wallet connect failed");

        // the running flow owns the session
        if *err != WalletError::ConnectInProgress {
            *self.session.borrow_mut() = Session::default();
            self.view.show_address(None);
        }
        self.view.alert(&err.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryAddressStore;
    use crate::testing::{BackendCall, RecordingView, ScriptedBackend, ScriptedProvider};
    use mv_api_types::WalletStatusResponse;

    type TestConnector = WalletConnector<ScriptedProvider, ScriptedBackend, RecordingView, InMemoryAddressStore>;

    fn connector(provider: ScriptedProvider, backend: ScriptedBackend) -> TestConnector {
        WalletConnector::new(provider, backend, RecordingView::default(), InMemoryAddressStore::default())
    }

    #[tokio::test]
    async fn unsupported_provider_never_touches_the_provider() {
        let connector = connector(ScriptedProvider::with_accounts(&["0xAA"]), ScriptedBackend::default());

        for id in ["trustwallet", "binancewallet", "walletconnect", "MetaMask", ""] {
            let result = connector.connect(id).await;
            assert_eq!(result, Err(WalletError::UnsupportedProvider(id.to_owned())));
        }

        assert_eq!(connector.provider().request_calls(), 0);
        assert!(connector.backend().calls().is_empty());
        assert_eq!(connector.view().alerts().len(), 5);
        assert_eq!(connector.view().alerts()[0], "Unsupported wallet type: trustwallet");
        assert_eq!(connector.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn absent_provider_reports_unavailable_without_backend_calls() {
        let connector = connector(ScriptedProvider::absent(), ScriptedBackend::default());

        let result = connector.connect("metamask").await;

        assert_eq!(result, Err(WalletError::ProviderUnavailable(WalletKind::MetaMask)));
        assert_eq!(connector.provider().request_calls(), 0);
        assert!(connector.backend().calls().is_empty());
        assert_eq!(connector.view().alerts(), vec!["MetaMask not detected! Install it first."]);
    }

    #[tokio::test]
    async fn empty_account_list_reports_no_accounts() {
        let connector = connector(ScriptedProvider::with_accounts(&[]), ScriptedBackend::default());

        let result = connector.connect("metamask").await;

        assert_eq!(result, Err(WalletError::NoAccounts(WalletKind::MetaMask)));
        assert!(connector.backend().calls().is_empty());
        assert_eq!(connector.state(), ConnectionState::Disconnected);
        assert_eq!(connector.address(), None);
        assert_eq!(connector.store().load(), None);
    }

    #[tokio::test]
    async fn binds_first_account_then_notifies_and_verifies_it() {
        let connector = connector(ScriptedProvider::with_accounts(&["0xAA", "0xBB"]), ScriptedBackend::default());

        let result = connector.connect("metamask").await;

        assert_eq!(result, Ok(ConnectionState::Verified));
        assert_eq!(
            connector.backend().calls(),
            vec![
                BackendCall::UpdateWallet("0xAA".to_owned()),
                BackendCall::VerifyWallet("0xAA".to_owned()),
            ]
        );
        assert_eq!(connector.address().as_deref(), Some("0xAA"));
        assert_eq!(connector.view().shown_address().as_deref(), Some("0xAA"));
        assert_eq!(connector.store().load().as_deref(), Some("0xAA"));
        assert_eq!(
            connector.view().last_status(),
            Some((VERIFIED_TEXT.to_owned(), StatusKind::Verified))
        );
        assert!(connector.view().alerts().is_empty());
    }

    #[tokio::test]
    async fn failed_notify_still_verifies() {
        let backend = ScriptedBackend::default().failing_update(WalletError::Network("connection refused".into()));
        let connector = connector(ScriptedProvider::with_accounts(&["0xAA"]), backend);

        let result = connector.connect("metamask").await;

        assert_eq!(result, Ok(ConnectionState::Verified));
        assert!(
            connector
                .backend()
                .calls()
                .contains(&BackendCall::VerifyWallet("0xAA".to_owned()))
        );
        assert!(connector.view().alerts().is_empty());
    }

    #[tokio::test]
    async fn non_success_status_shows_invalid_and_keeps_binding() {
        let backend = ScriptedBackend::default().verify_responds(WalletStatusResponse::error("Invalid wallet address!"));
        let connector = connector(ScriptedProvider::with_accounts(&["0xAA"]), backend);

        let result = connector.connect("metamask").await;

        assert_eq!(result, Ok(ConnectionState::VerificationFailed));
        assert_eq!(connector.address().as_deref(), Some("0xAA"));
        assert_eq!(
            connector.view().last_status(),
            Some((INVALID_TEXT.to_owned(), StatusKind::Invalid))
        );
    }

    #[tokio::test]
    async fn any_status_other_than_success_is_invalid() {
        for status in ["error", "pending", "Success", ""] {
            let response = WalletStatusResponse {
                status: status.to_owned(),
                message: None,
                data: None,
            };
            let backend = ScriptedBackend::default().verify_responds(response);
            let connector = connector(ScriptedProvider::with_accounts(&["0xAA"]), backend);

            assert_eq!(connector.verify("0xAA").await, VerificationResult::Invalid);
            assert_eq!(connector.view().last_status().map(|(_, kind)| kind), Some(StatusKind::Invalid));
        }
    }

    #[tokio::test]
    async fn unreachable_verifier_alerts_and_fails_verification() {
        let backend = ScriptedBackend::default().failing_verify(WalletError::Network("timed out".into()));
        let connector = connector(ScriptedProvider::with_accounts(&["0xAA"]), backend);

        let result = connector.connect("metamask").await;

        assert_eq!(result, Ok(ConnectionState::VerificationFailed));
        assert_eq!(connector.view().alerts(), vec!["Network error: timed out"]);
        assert_eq!(
            connector.view().last_status(),
            Some((UNREACHABLE_TEXT.to_owned(), StatusKind::Invalid))
        );
    }

    #[tokio::test]
    async fn provider_rejection_is_alerted_and_resets_session() {
        let connector = connector(
            ScriptedProvider::rejecting("User rejected the request."),
            ScriptedBackend::default(),
        );

        let result = connector.connect("metamask").await;

        assert_eq!(result, Err(WalletError::ProviderRejected("User rejected the request.".into())));
        assert_eq!(connector.view().alerts(), vec!["User rejected the request."]);
        assert_eq!(connector.view().shown_address(), None);
        assert!(connector.backend().calls().is_empty());
    }

    #[tokio::test]
    async fn overlapping_connects_run_the_provider_once() {
        let connector = connector(
            ScriptedProvider::with_accounts(&["0xAA"]).pausing(),
            ScriptedBackend::default(),
        );

        let (first, second) = tokio::join!(connector.connect("metamask"), connector.connect("metamask"));

        let mut outcomes = [first, second];
        outcomes.sort_by_key(|outcome| outcome.is_err());
        assert_eq!(outcomes[0], Ok(ConnectionState::Verified));
        assert_eq!(outcomes[1], Err(WalletError::ConnectInProgress));
        assert_eq!(connector.provider().request_calls(), 1);
        assert_eq!(connector.state(), ConnectionState::Verified);
    }

    #[tokio::test]
    async fn guard_is_released_after_a_flow_finishes() {
        let connector = connector(ScriptedProvider::with_accounts(&["0xAA"]), ScriptedBackend::default());

        assert!(connector.connect("metamask").await.is_ok());
        assert!(connector.connect("metamask").await.is_ok());
        assert_eq!(connector.provider().request_calls(), 2);
    }

    #[tokio::test]
    async fn restore_verifies_stored_address_without_prompting() {
        let connector = WalletConnector::new(
            ScriptedProvider::with_accounts(&["0xAA"]).authorized(&["0xAA"]),
            ScriptedBackend::default(),
            RecordingView::default(),
            InMemoryAddressStore::with_address("0xAA"),
        );

        let state = connector.restore_on_load().await;

        assert_eq!(state, ConnectionState::Verified);
        assert_eq!(connector.provider().request_calls(), 0);
        assert_eq!(
            connector.backend().calls(),
            vec![BackendCall::VerifyWallet("0xAA".to_owned())]
        );
        assert_eq!(connector.view().shown_address().as_deref(), Some("0xAA"));
    }

    #[tokio::test]
    async fn restore_matches_stored_address_case_insensitively() {
        let connector = WalletConnector::new(
            ScriptedProvider::with_accounts(&[]).authorized(&["0xBB", "0xaa"]),
            ScriptedBackend::default(),
            RecordingView::default(),
            InMemoryAddressStore::with_address("0xAA"),
        );

        connector.restore_on_load().await;

        assert_eq!(
            connector.backend().calls(),
            vec![BackendCall::VerifyWallet("0xaa".to_owned())]
        );
    }

    #[tokio::test]
    async fn restore_forgets_address_that_is_no_longer_authorized() {
        let connector = WalletConnector::new(
            ScriptedProvider::with_accounts(&[]).authorized(&["0xBB"]),
            ScriptedBackend::default(),
            RecordingView::default(),
            InMemoryAddressStore::with_address("0xAA"),
        );

        let state = connector.restore_on_load().await;

        assert_eq!(state, ConnectionState::Disconnected);
        assert!(connector.backend().calls().is_empty());
        assert_eq!(connector.store().load(), None);
        assert!(connector.view().alerts().is_empty());
    }

    #[tokio::test]
    async fn restore_without_stored_address_stays_quiet() {
        let connector = connector(ScriptedProvider::with_accounts(&["0xAA"]).authorized(&["0xAA"]), ScriptedBackend::default());

        let state = connector.restore_on_load().await;

        assert_eq!(state, ConnectionState::Disconnected);
        assert_eq!(connector.provider().authorized_calls(), 0);
        assert!(connector.backend().calls().is_empty());
    }

    #[tokio::test]
    async fn restore_skips_when_provider_is_missing() {
        let connector = WalletConnector::new(
            ScriptedProvider::absent(),
            ScriptedBackend::default(),
            RecordingView::default(),
            InMemoryAddressStore::with_address("0xAA"),
        );

        assert_eq!(connector.restore_on_load().await, ConnectionState::Disconnected);
        assert_eq!(connector.provider().authorized_calls(), 0);
        assert!(connector.view().alerts().is_empty());
    }

    #[tokio::test]
    async fn restore_failure_is_logged_not_alerted() {
        let connector = WalletConnector::new(
            ScriptedProvider::with_accounts(&[])
                .failing_authorized(WalletError::ProviderRejected("Request of type 'eth_accounts' failed".into())),
            ScriptedBackend::default(),
            RecordingView::default(),
            InMemoryAddressStore::with_address("0xAA"),
        );

        let state = connector.restore_on_load().await;

        assert_eq!(state, ConnectionState::Disconnected);
        assert_eq!(connector.provider().authorized_calls(), 1);
        assert!(connector.backend().calls().is_empty());
        assert!(connector.view().alerts().is_empty());
        assert_eq!(connector.view().last_status(), None);
        assert_eq!(connector.store().load().as_deref(), Some("0xAA"));
    }

    #[tokio::test]
    async fn restore_is_skipped_while_a_connect_is_running() {
        let connector = WalletConnector::new(
            ScriptedProvider::with_accounts(&["0xCC"]).authorized(&["0xAA"]).pausing(),
            ScriptedBackend::default(),
            RecordingView::default(),
            InMemoryAddressStore::with_address("0xAA"),
        );

        let (connected, restored) = tokio::join!(connector.connect("metamask"), connector.restore_on_load());

        assert_eq!(connected, Ok(ConnectionState::Verified));
        assert_eq!(restored, ConnectionState::Disconnected);
        assert_eq!(connector.provider().authorized_calls(), 0);
        assert_eq!(
            connector.backend().calls(),
            vec![
                BackendCall::UpdateWallet("0xCC".to_owned()),
                BackendCall::VerifyWallet("0xCC".to_owned()),
            ]
        );
        assert!(connector.view().alerts().is_empty());
        assert_eq!(connector.address().as_deref(), Some("0xCC"));
    }

    #[tokio::test]
    async fn reconnect_replaces_the_bound_address() {
        let connector = WalletConnector::new(
            ScriptedProvider::with_accounts(&["0xCC"]),
            ScriptedBackend::default(),
            RecordingView::default(),
            InMemoryAddressStore::with_address("0xAA"),
        );

        connector.connect("metamask").await.unwrap();

        assert_eq!(connector.address().as_deref(), Some("0xCC"));
        assert_eq!(connector.store().load().as_deref(), Some("0xCC"));
    }
}
