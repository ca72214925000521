use super::*;

// Mounting is deferred, never failed, when the script runs before the body
// exists (loader tags commonly sit in <head>).
pub(super) fn run_when_document_ready(callback: fn()) {
    if document_body_ready() {
        callback();
        return;
    }
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };
    DOM_READY_HANDLER.with(|slot| {
        if slot.borrow().is_some() {
            return;
        }
        let closure = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_event| {
            callback();
        }));
        let _ = document
            .add_event_listener_with_callback("DOMContentLoaded", closure.as_ref().unchecked_ref());
        *slot.borrow_mut() = Some(closure);
    });
}

pub(super) fn remove_dom_ready_handler() {
    let document = web_sys::window().and_then(|window| window.document());
    DOM_READY_HANDLER.with(|slot| {
        if let Some(closure) = slot.borrow_mut().take() {
            if let Some(document) = document {
                let _ = document.remove_event_listener_with_callback(
                    "DOMContentLoaded",
                    closure.as_ref().unchecked_ref(),
                );
            }
        }
    });
}

fn document_body_ready() -> bool {
    web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.body())
        .is_some()
}

// The only pending -> mounted transition in the runtime.
pub(super) fn mark_mounted() {
    let previous = MOUNT_STATE.with(Cell::get);
    if previous == MountState::Mounted {
        console_warn("mount transition repeated; instance already mounted");
        return;
    }
    MOUNT_STATE.with(|cell| cell.set(MountState::Mounted));
    DIAGNOSTICS.with(|state| state.borrow_mut().set_phase("mounted"));
}

pub(super) fn set_phase(phase: &str) {
    DIAGNOSTICS.with(|state| state.borrow_mut().set_phase(phase));
}

pub(super) fn set_boot_error(message: &str) {
    DIAGNOSTICS.with(|state| state.borrow_mut().record_error(message));
    console_error(message);
}

pub(super) fn console_error(message: &str) {
    web_sys::console::error_1(&JsValue::from_str(&format!("tgo-widget: {message}")));
}

pub(super) fn console_warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(&format!("tgo-widget: {message}")));
}

pub(super) fn epoch_millis_now() -> u64 {
    let now = js_sys::Date::now();
    if !now.is_finite() || now.is_sign_negative() {
        return 0;
    }
    now.floor().min(u64::MAX as f64) as u64
}

// Probes the loader's own <script> tag for an api key; hosts drop the tag in
// with the key inline and never call init() themselves.
pub(super) fn detect_script_api_key() -> Option<String> {
    let document = web_sys::window()?.document()?;
    let scripts = document.get_elements_by_tag_name("script");
    for index in 0..scripts.length() {
        let Some(element) = scripts.item(index) else {
            continue;
        };
        let Some(src) = element.get_attribute("src") else {
            continue;
        };
        if !src.contains(SCRIPT_SRC_HINT) {
            continue;
        }
        if let Some(api_key) = api_key_from_script_src(&src) {
            return Some(api_key);
        }
    }
    None
}
