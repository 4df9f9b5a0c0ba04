//! DOM element bindings.
//!
//! Every wallet widget is optional: storefront pages include only the ones they
//! render, and the connector simply skips what is missing.

use gloo_utils::document;
use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

pub const ADDRESS_ID: &str = "wallet-address";
pub const STATUS_ID: &str = "wallet-status";
pub const CONNECT_SELECTOR: &str = "[data-wallet]";
pub const WALLET_ATTR: &str = "data-wallet";

// ── Helpers ──

pub fn by_id(id: &str) -> Option<Element> {
    document().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn query_all(selector: &str) -> Vec<Element> {
    let Ok(nl) = document().query_selector_all(selector) else {
        return Vec::new();
    };
    let mut v = Vec::new();
    for i in 0..nl.length() {
        if let Some(e) = nl.item(i) {
            if let Ok(el) = e.dyn_into::<Element>() {
                v.push(el);
            }
        }
    }
    v
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

/// Empty `color` drops the inline style so the stylesheet applies again.
pub fn set_color(el: &HtmlElement, color: &str) {
    let style = el.style();
    let result = if color.is_empty() {
        style.remove_property("color").map(|_| ())
    } else {
        style.set_property("color", color)
    };
    if let Err(err) = result {
        warn!(?err, color, "failed to set status color");
    }
}

// ── Elements struct ──

/// Wallet widgets present on the current page.
/// Clone-friendly (all inner types are reference-counted via JS GC).
#[derive(Clone)]
pub struct Elements {
    pub wallet_address: Option<Element>,
    pub wallet_status: Option<HtmlElement>,
    pub connect_buttons: Vec<Element>,
}

impl Elements {
    /// Resolve all DOM references. Call once the document has loaded.
    pub fn bind() -> Elements {
        Elements {
            wallet_address: by_id(ADDRESS_ID),
            wallet_status: by_id_typed::<HtmlElement>(STATUS_ID),
            connect_buttons: query_all(CONNECT_SELECTOR),
        }
    }
}
