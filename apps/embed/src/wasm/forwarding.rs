use super::*;

// Host navigation is observed non-invasively: the history mutators are
// wrapped with call-through, the rest comes from plain events. Installed at
// most once per instance so repeated mount attempts never stack listeners.
pub(super) fn install_page_forwarding() {
    if PAGE_FORWARDING_INITED.with(Cell::get) {
        return;
    }
    PAGE_FORWARDING_INITED.with(|cell| cell.set(true));

    let Some(window) = web_sys::window() else {
        return;
    };

    wrap_history_method("pushState", &PUSH_STATE_ORIGINAL, &PUSH_STATE_WRAPPER);
    wrap_history_method("replaceState", &REPLACE_STATE_ORIGINAL, &REPLACE_STATE_WRAPPER);

    install_window_event(&window, "popstate", &POPSTATE_HANDLER, || {
        schedule_page_info_notify();
    });
    install_window_event(&window, "hashchange", &HASHCHANGE_HANDLER, || {
        schedule_page_info_notify();
    });
    install_window_event(&window, "beforeunload", &BEFOREUNLOAD_HANDLER, || {
        notify_page_exit();
    });

    if let Some(document) = window.document() {
        VISIBILITYCHANGE_HANDLER.with(|slot| {
            if slot.borrow().is_some() {
                return;
            }
            let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_event| {
                schedule_page_info_notify();
            }));
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                callback.as_ref().unchecked_ref(),
            );
            *slot.borrow_mut() = Some(callback);
        });
    }

    // Tell the controller where it just got embedded.
    schedule_page_info_notify();
}

pub(super) fn remove_page_forwarding() {
    if !PAGE_FORWARDING_INITED.with(Cell::get) {
        return;
    }
    PAGE_FORWARDING_INITED.with(|cell| cell.set(false));

    restore_history_method("pushState", &PUSH_STATE_ORIGINAL, &PUSH_STATE_WRAPPER);
    restore_history_method("replaceState", &REPLACE_STATE_ORIGINAL, &REPLACE_STATE_WRAPPER);

    let Some(window) = web_sys::window() else {
        return;
    };
    remove_window_event(&window, "popstate", &POPSTATE_HANDLER);
    remove_window_event(&window, "hashchange", &HASHCHANGE_HANDLER);
    remove_window_event(&window, "beforeunload", &BEFOREUNLOAD_HANDLER);
    if let Some(document) = window.document() {
        VISIBILITYCHANGE_HANDLER.with(|slot| {
            if let Some(callback) = slot.borrow_mut().take() {
                let _ = document.remove_event_listener_with_callback(
                    "visibilitychange",
                    callback.as_ref().unchecked_ref(),
                );
            }
        });
    }
}

fn wrap_history_method(
    name: &'static str,
    original_slot: &'static LocalKey<RefCell<Option<js_sys::Function>>>,
    wrapper_slot: &'static LocalKey<RefCell<Option<HistoryClosure>>>,
) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(history) = window.history() else {
        return;
    };
    let history_value = JsValue::from(history);
    let Ok(original_value) = js_sys::Reflect::get(&history_value, &JsValue::from_str(name)) else {
        return;
    };
    let Ok(original) = original_value.dyn_into::<js_sys::Function>() else {
        return;
    };

    wrapper_slot.with(|slot| {
        if slot.borrow().is_some() {
            return;
        }
        original_slot.with(|original_ref| *original_ref.borrow_mut() = Some(original.clone()));

        let history_for_call = history_value.clone();
        let callback = Closure::<dyn FnMut(JsValue, JsValue, JsValue)>::wrap(Box::new(
            move |state: JsValue, title: JsValue, url: JsValue| {
                // Call through first; the host page's own navigation must
                // behave exactly as before.
                let arguments = js_sys::Array::of3(&state, &title, &url);
                if let Err(error) = original.apply(&history_for_call, &arguments) {
                    console_warn(&format!("history call-through failed: {error:?}"));
                }
                schedule_page_info_notify();
            },
        ));
        let _ = js_sys::Reflect::set(&history_value, &JsValue::from_str(name), callback.as_ref());
        *slot.borrow_mut() = Some(callback);
    });
}

fn restore_history_method(
    name: &'static str,
    original_slot: &'static LocalKey<RefCell<Option<js_sys::Function>>>,
    wrapper_slot: &'static LocalKey<RefCell<Option<HistoryClosure>>>,
) {
    let wrapper = wrapper_slot.with(|slot| slot.borrow_mut().take());
    if wrapper.is_none() {
        return;
    }
    let original = original_slot.with(|slot| slot.borrow_mut().take());
    let Some(original) = original else {
        return;
    };
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(history) = window.history() else {
        return;
    };
    let _ = js_sys::Reflect::set(
        &JsValue::from(history),
        &JsValue::from_str(name),
        original.as_ref(),
    );
}

fn install_window_event(
    window: &web_sys::Window,
    event_name: &'static str,
    slot: &'static LocalKey<RefCell<Option<EventClosure>>>,
    handler: fn(),
) {
    slot.with(|slot| {
        if slot.borrow().is_some() {
            return;
        }
        let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_event| {
            handler();
        }));
        let _ = window.add_event_listener_with_callback(event_name, callback.as_ref().unchecked_ref());
        *slot.borrow_mut() = Some(callback);
    });
}

fn remove_window_event(
    window: &web_sys::Window,
    event_name: &'static str,
    slot: &'static LocalKey<RefCell<Option<EventClosure>>>,
) {
    slot.with(|slot| {
        if let Some(callback) = slot.borrow_mut().take() {
            let _ = window
                .remove_event_listener_with_callback(event_name, callback.as_ref().unchecked_ref());
        }
    });
}

// Arms a fresh debounce generation and pushes page info only if no newer
// navigation superseded this one while the timer slept. SPA routers fire
// several history and hash events per logical navigation; the controller
// should see one update.
pub(super) fn schedule_page_info_notify() {
    let generation = PAGE_INFO_COALESCER.with(|coalescer| coalescer.borrow_mut().arm());
    spawn_local(async move {
        gloo_timers::future::sleep(PAGE_INFO_DEBOUNCE).await;
        let still_current =
            PAGE_INFO_COALESCER.with(|coalescer| coalescer.borrow().should_fire(generation));
        if !still_current {
            return;
        }
        if let Err(error) = post_to_controller(&HostMessage::PageInfo {
            payload: current_page_info(),
        }) {
            console_warn(&format!("page info push not delivered: {error}"));
        }
    });
}

pub(super) fn notify_page_exit() {
    let due = EXIT_THROTTLE.with(|throttle| throttle.borrow_mut().try_fire(epoch_millis_now()));
    if !due {
        return;
    }
    if let Err(error) = post_to_controller(&HostMessage::PageExit {
        payload: current_page_info(),
    }) {
        console_warn(&format!("page exit push not delivered: {error}"));
    }
}

pub(super) fn current_page_info() -> HostPageInfo {
    let Some(window) = web_sys::window() else {
        return HostPageInfo::default();
    };
    let page_url = window.location().href().unwrap_or_default();
    let document = window.document();
    HostPageInfo {
        page_url,
        title: document.as_ref().map(|d| d.title()).unwrap_or_default(),
        referrer: document.as_ref().map(|d| d.referrer()).unwrap_or_default(),
    }
}
