//! The `window.ethereum` provider injected by MetaMask.

use async_trait::async_trait;
use js_sys::{Function, Promise, Reflect};
use mv_wallet_connector::{WalletError, WalletKind, WalletProvider};
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

const REQUEST_ACCOUNTS: &str = "eth_requestAccounts";
const ACCOUNTS: &str = "eth_accounts";

#[derive(Serialize)]
struct RpcRequest<'a> {
    method: &'a str,
}

/// Looks the provider up on every call, so an extension injected after
/// startup is still picked up.
#[derive(Default)]
pub struct EthereumProvider;

impl EthereumProvider {
    fn injected() -> Option<JsValue> {
        let window = web_sys::window()?;
        let ethereum = Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
        (!ethereum.is_undefined() && !ethereum.is_null()).then_some(ethereum)
    }

    /// `ethereum.request({ method })`, decoded as a list of accounts.
    async fn accounts(&self, method: &str) -> Result<Vec<String>, WalletError> {
        let ethereum = Self::injected().ok_or(WalletError::ProviderUnavailable(WalletKind::MetaMask))?;

        let request: Function = Reflect::get(&ethereum, &JsValue::from_str("request"))
            .ok()
            .and_then(|f| f.dyn_into().ok())
            .ok_or_else(|| WalletError::ProviderRejected("wallet provider does not support request()".into()))?;

        let args = RpcRequest { method }
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|err| WalletError::ProviderRejected(err.to_string()))?;

        let promise: Promise = request
            .call1(&ethereum, &args)
            .map_err(rejected)?
            .dyn_into()
            .map_err(|_| WalletError::provider_rejected(None))?;

        let value = JsFuture::from(promise).await.map_err(rejected)?;
        if value.is_null() || value.is_undefined() {
            return Ok(Vec::new());
        }

        serde_wasm_bindgen::from_value::<Vec<String>>(value)
            .map_err(|err| WalletError::ProviderRejected(format!("unexpected {method} result: {err}")))
    }
}

#[async_trait(?Send)]
impl WalletProvider for EthereumProvider {
    fn kind(&self) -> WalletKind {
        WalletKind::MetaMask
    }

    fn is_available(&self) -> bool {
        Self::injected().is_some()
    }

    async fn request_accounts(&self) -> Result<Vec<String>, WalletError> {
        self.accounts(REQUEST_ACCOUNTS).await
    }

    async fn authorized_accounts(&self) -> Result<Vec<String>, WalletError> {
        self.accounts(ACCOUNTS).await
    }
}

/// Provider errors are `{ code, message }` objects; surface the message.
fn rejected(err: JsValue) -> WalletError {
    let message = Reflect::get(&err, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .or_else(|| err.as_string());
    WalletError::provider_rejected(message)
}
