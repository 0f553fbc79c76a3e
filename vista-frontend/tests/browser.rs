#![allow(clippy::unwrap_used)]

use vista_common::{
    i18n::Language,
    preferences::{KeyValueStore, PrefKey, PreferenceStore, Preferences, Theme},
    view::{render, AppState},
};
use vista_frontend::services::{page, storage::LocalStorage};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn local_storage_round_trip() {
    let mut storage = LocalStorage::open().unwrap();
    storage.set("vista-test", "1").unwrap();
    assert_eq!(storage.get("vista-test").unwrap().as_deref(), Some("1"));
    storage.remove("vista-test").unwrap();
    assert_eq!(storage.get("vista-test").unwrap(), None);
    assert_eq!(storage.get("__vista__").unwrap(), None);
}

#[wasm_bindgen_test]
fn preferences_survive_reopen() {
    let mut store = PreferenceStore::new(LocalStorage::open().unwrap());
    store.set(PrefKey::Theme, "dark");

    let store = PreferenceStore::new(LocalStorage::open().unwrap());
    assert!(store.is_persistent());
    assert_eq!(store.get(PrefKey::Theme).as_deref(), Some("dark"));

    let mut store = store;
    store.remove(PrefKey::Theme);
    assert_eq!(store.get(PrefKey::Theme), None);
}

#[wasm_bindgen_test]
fn view_applies_to_document() {
    let mut preferences = Preferences::default();
    preferences.language = Language::En;
    preferences.theme = Theme::Dark;
    preferences.layout.module_gap = 40;
    let view = render(&AppState {
        reading: None,
        status: vista_common::position::Status::Requesting,
        preferences,
        settings_open: false,
    });

    page::apply_view(&view);

    let root = gloo_utils::document_element();
    assert_eq!(root.get_attribute("data-theme").as_deref(), Some("dark"));
    assert_eq!(root.get_attribute("lang").as_deref(), Some("en"));
    assert_eq!(root.get_attribute("data-lang").as_deref(), Some("en"));
    let style = root.get_attribute("style").unwrap();
    assert!(style.contains("--gap-y: 40px"));
    assert!(style.contains("--big-size: 48px"));
}
