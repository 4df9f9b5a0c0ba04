//! Event binding.
//!
//! Each `[data-wallet]` element starts a connect for the provider it names,
//! e.g. `<button data-wallet="metamask">`.

use std::rc::Rc;
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::PageConnector;
use crate::dom::{Elements, WALLET_ATTR};

/// Bind connect buttons. Call once after init.
pub fn bind_connect_buttons(els: &Elements, connector: &Rc<PageConnector>) {
    for button in &els.connect_buttons {
        let wallet_type = button.get_attribute(WALLET_ATTR).unwrap_or_default();
        let connector = Rc::clone(connector);

        let cb = Closure::wrap(Box::new(move |event: web_sys::MouseEvent| {
            event.prevent_default();
            let connector = Rc::clone(&connector);
            let wallet_type = wallet_type.clone();
            wasm_bindgen_futures::spawn_local(async move {
                // failures were already alerted and logged by the connector
                let _ = connector.connect(&wallet_type).await;
            });
        }) as Box<dyn FnMut(_)>);

        if let Err(err) = button.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref()) {
            warn!(?err, "failed to bind wallet connect button");
        }
        cb.forget();
    }
}
