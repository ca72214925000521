#![cfg(target_arch = "wasm32")]

use wasm_bindgen::JsValue;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

fn init_with_key(api_key: &str) {
    let options = js_sys::Object::new();
    let _ = js_sys::Reflect::set(
        &options,
        &JsValue::from_str("apiKey"),
        &JsValue::from_str(api_key),
    );
    tgo_widget_embed::init(options.into());
}

fn named_iframe_count(name: &str) -> usize {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return 0;
    };
    let iframes = document.get_elements_by_tag_name("iframe");
    (0..iframes.length())
        .filter_map(|index| iframes.item(index))
        .filter(|element| element.get_attribute("name").as_deref() == Some(name))
        .count()
}

#[wasm_bindgen_test]
fn repeated_init_keeps_one_instance() {
    tgo_widget_embed::shutdown();
    init_with_key("test-key");
    init_with_key("other-key");

    assert_eq!(named_iframe_count("tgo-controller-frame"), 1);
    assert_eq!(named_iframe_count("tgo-ui-frame"), 1);
    assert!(tgo_widget_embed::widget_diagnostics_json().contains("\"phase\":\"ready\""));
    tgo_widget_embed::shutdown();
}

#[wasm_bindgen_test]
fn pre_init_calls_replay_in_order() {
    tgo_widget_embed::shutdown();
    // hide() then show() recorded before boot must leave the widget open.
    tgo_widget_embed::hide();
    tgo_widget_embed::show();
    init_with_key("test-key");

    assert!(tgo_widget_embed::widget_diagnostics_json().contains("\"open\":true"));
    tgo_widget_embed::shutdown();
}

#[wasm_bindgen_test]
fn show_is_idempotent() {
    tgo_widget_embed::shutdown();
    init_with_key("test-key");
    tgo_widget_embed::show();
    tgo_widget_embed::show();
    assert!(tgo_widget_embed::widget_diagnostics_json().contains("\"open\":true"));

    tgo_widget_embed::hide();
    assert!(tgo_widget_embed::widget_diagnostics_json().contains("\"open\":false"));
    tgo_widget_embed::shutdown();
}

#[wasm_bindgen_test]
fn shutdown_removes_all_owned_nodes() {
    tgo_widget_embed::shutdown();
    init_with_key("test-key");
    assert_eq!(named_iframe_count("tgo-controller-frame"), 1);

    tgo_widget_embed::shutdown();
    assert_eq!(named_iframe_count("tgo-controller-frame"), 0);
    assert_eq!(named_iframe_count("tgo-ui-frame"), 0);
}
