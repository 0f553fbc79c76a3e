//! Document level state: visibility, color scheme, and the root element
use gloo_utils::{document, document_element};
use tracing::error;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use vista_common::view::View;

/// Is the page currently visible?
#[must_use]
pub fn is_visible() -> bool {
    !document().hidden()
}

/// Does the user's system prefer a dark color scheme?
#[must_use]
pub fn prefers_dark() -> bool {
    web_sys::window()
        .and_then(|window| window.match_media("(prefers-color-scheme: dark)").ok())
        .flatten()
        .is_some_and(|query| query.matches())
}

/// Apply the theme, language and layout of a view to the root element.
pub fn apply_view(view: &View) {
    let root = document_element();
    let attributes = [
        ("data-theme", view.theme.tag()),
        ("lang", view.language.html_lang()),
        ("data-lang", view.language.tag()),
    ];
    for (name, value) in attributes {
        if let Err(err) = root.set_attribute(name, value) {
            error!("Failed to set {name}: {err:?}");
        }
    }

    let Ok(root) = root.dyn_into::<HtmlElement>() else {
        error!("Document element is not an HTML element");
        return;
    };
    let style = root.style();
    for (name, value) in &view.css_vars {
        if let Err(err) = style.set_property(name, value) {
            error!("Failed to set {name}: {err:?}");
        }
    }
}
