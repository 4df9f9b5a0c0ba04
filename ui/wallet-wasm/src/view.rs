//! Status indicator and alerts backed by the page DOM.

use mv_wallet_connector::{StatusKind, WalletView};
use tracing::warn;

use crate::dom::{self, Elements};

pub struct DomView {
    els: Elements,
}

impl DomView {
    pub fn new(els: Elements) -> Self {
        Self { els }
    }
}

impl WalletView for DomView {
    fn set_status(&self, text: &str, kind: StatusKind) {
        if let Some(el) = &self.els.wallet_status {
            dom::set_text(el, text);
            dom::set_color(el, kind.color());
        }
    }

    fn show_address(&self, address: Option<&str>) {
        if let Some(el) = &self.els.wallet_address {
            match address {
                Some(address) => dom::set_text(el, &format!("Connected: {address}")),
                None => dom::set_text(el, ""),
            }
        }
    }

    fn alert(&self, message: &str) {
        if let Err(err) = gloo_utils::window().alert_with_message(message) {
            warn!(?err, message, "failed to show alert");
        }
    }
}
