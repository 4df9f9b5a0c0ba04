//! MintVerse wallet connect, browser side.
//!
//! Binds the storefront's connect buttons and status widgets to a
//! [`WalletConnector`] backed by the injected MetaMask provider, the page's
//! origin API and `localStorage`.

pub mod api;
pub mod dom;
pub mod events;
pub mod logging;
pub mod provider;
pub mod state;
pub mod view;

use mv_wallet_connector::WalletConnector;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::api::GlooBackend;
use crate::provider::EthereumProvider;
use crate::state::LocalAddressStore;
use crate::view::DomView;

pub type PageConnector = WalletConnector<EthereumProvider, GlooBackend, DomView, LocalAddressStore>;

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub fn start() {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();
    logging::init();

    if gloo_utils::document().ready_state() == "complete" {
        wasm_bindgen_futures::spawn_local(init());
        return;
    }

    // Restore needs the widgets, so wait for the page like the storefront scripts do.
    let cb = Closure::<dyn FnMut(web_sys::Event)>::once(move |_: web_sys::Event| {
        wasm_bindgen_futures::spawn_local(init());
    });
    let opts = web_sys::AddEventListenerOptions::new();
    opts.set_once(true);
    if let Err(err) = gloo_utils::window().add_event_listener_with_callback_and_add_event_listener_options(
        "load",
        cb.as_ref().unchecked_ref(),
        &opts,
    ) {
        tracing::error!(?err, "failed to wait for page load");
    }
    cb.forget();
}

/// Main initialisation sequence.
async fn init() {
    let els = dom::Elements::bind();

    let connector = Rc::new(WalletConnector::new(
        EthereumProvider,
        GlooBackend::new(api::base_url()),
        DomView::new(els.clone()),
        LocalAddressStore,
    ));

    events::bind_connect_buttons(&els, &connector);
    connector.restore_on_load().await;
}
