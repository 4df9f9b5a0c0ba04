//! Scripted stand-ins for the connector's edges.

use async_trait::async_trait;
use mv_api_types::WalletStatusResponse;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::{StatusKind, WalletBackend, WalletError, WalletKind, WalletProvider, WalletView};

pub struct ScriptedProvider {
    available: bool,
    accounts: Result<Vec<String>, WalletError>,
    authorized: Result<Vec<String>, WalletError>,
    pause_on_request: bool,
    request_calls: Cell<usize>,
    authorized_calls: Cell<usize>,
}

impl ScriptedProvider {
    pub fn with_accounts(accounts: &[&str]) -> Self {
        Self {
            available: true,
            accounts: Ok(owned(accounts)),
            authorized: Ok(Vec::new()),
            pause_on_request: false,
            request_calls: Cell::new(0),
            authorized_calls: Cell::new(0),
        }
    }

    pub fn absent() -> Self {
        Self {
            available: false,
            ..Self::with_accounts(&[])
        }
    }

    pub fn rejecting(message: &str) -> Self {
        Self {
            accounts: Err(WalletError::ProviderRejected(message.to_owned())),
            ..Self::with_accounts(&[])
        }
    }

    pub fn authorized(mut self, accounts: &[&str]) -> Self {
        self.authorized = Ok(owned(accounts));
        self
    }

    pub fn failing_authorized(mut self, err: WalletError) -> Self {
        self.authorized = Err(err);
        self
    }

    /// Suspends once inside `request_accounts` so a second flow can interleave.
    pub fn pausing(mut self) -> Self {
        self.pause_on_request = true;
        self
    }

    pub fn request_calls(&self) -> usize {
        self.request_calls.get()
    }

    pub fn authorized_calls(&self) -> usize {
        self.authorized_calls.get()
    }
}

#[async_trait(?Send)]
impl WalletProvider for ScriptedProvider {
    fn kind(&self) -> WalletKind {
        WalletKind::MetaMask
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn request_accounts(&self) -> Result<Vec<String>, WalletError> {
        self.request_calls.set(self.request_calls.get() + 1);
        if self.pause_on_request {
            YieldOnce(false).await;
        }
        self.accounts.clone()
    }

    async fn authorized_accounts(&self) -> Result<Vec<String>, WalletError> {
        self.authorized_calls.set(self.authorized_calls.get() + 1);
        self.authorized.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    UpdateWallet(String),
    VerifyWallet(String),
}

pub struct ScriptedBackend {
    update: Result<WalletStatusResponse, WalletError>,
    verify: Result<WalletStatusResponse, WalletError>,
    calls: RefCell<Vec<BackendCall>>,
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self {
            update: Ok(WalletStatusResponse::success("Wallet stored!")),
            verify: Ok(WalletStatusResponse::success("Wallet verified!")),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl ScriptedBackend {
    pub fn failing_update(mut self, err: WalletError) -> Self {
        self.update = Err(err);
        self
    }

    pub fn verify_responds(mut self, response: WalletStatusResponse) -> Self {
        self.verify = Ok(response);
        self
    }

    pub fn failing_verify(mut self, err: WalletError) -> Self {
        self.verify = Err(err);
        self
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.borrow().clone()
    }
}

#[async_trait(?Send)]
impl WalletBackend for ScriptedBackend {
    async fn update_wallet(&self, wallet_address: &str) -> Result<WalletStatusResponse, WalletError> {
        self.calls
            .borrow_mut()
            .push(BackendCall::UpdateWallet(wallet_address.to_owned()));
        self.update.clone()
    }

    async fn verify_wallet(&self, address: &str) -> Result<WalletStatusResponse, WalletError> {
        self.calls
            .borrow_mut()
            .push(BackendCall::VerifyWallet(address.to_owned()));
        self.verify.clone()
    }
}

#[derive(Default)]
pub struct RecordingView {
    statuses: RefCell<Vec<(String, StatusKind)>>,
    address: RefCell<Option<String>>,
    alerts: RefCell<Vec<String>>,
}

impl RecordingView {
    pub fn last_status(&self) -> Option<(String, StatusKind)> {
        self.statuses.borrow().last().cloned()
    }

    pub fn shown_address(&self) -> Option<String> {
        self.address.borrow().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }
}

impl WalletView for RecordingView {
    fn set_status(&self, text: &str, kind: StatusKind) {
        self.statuses.borrow_mut().push((text.to_owned(), kind));
    }

    fn show_address(&self, address: Option<&str>) {
        *self.address.borrow_mut() = address.map(ToOwned::to_owned);
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_owned());
    }
}

fn owned(accounts: &[&str]) -> Vec<String> {
    accounts.iter().map(|a| (*a).to_owned()).collect()
}

struct YieldOnce(bool);

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            return Poll::Ready(());
        }
        self.0 = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}
