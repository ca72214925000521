use super::*;

pub(super) fn post_to_controller(message: &HostMessage) -> Result<(), String> {
    let controller = WIDGET.with(|slot| {
        slot.borrow()
            .as_ref()
            .map(|instance| instance.controller.clone())
    });
    let Some(controller) = controller else {
        return Err("widget is not mounted".to_string());
    };
    let Some(content_window) = controller.content_window() else {
        return Err("controller window is unavailable".to_string());
    };

    let encoded = encode_host_message(message).map_err(|error| error.to_string())?;
    let value = js_sys::JSON::parse(&encoded)
        .map_err(|_| "bridge payload could not cross the js boundary".to_string())?;
    content_window
        .post_message(&value, "*")
        .map_err(|_| "postMessage to controller failed".to_string())?;

    DIAGNOSTICS.with(|state| state.borrow_mut().record_sent());
    Ok(())
}

pub(super) fn send_track(payload: &TrackPayload) -> Result<(), String> {
    if !CONTROLLER_READY.with(Cell::get) {
        // Fire-and-forget by contract: nothing buffers between init() and
        // the controller's ready signal, but the drop is made visible.
        console_warn(&format!(
            "track event '{}' dropped, controller not ready yet",
            payload.activity_type
        ));
        DIAGNOSTICS.with(|state| state.borrow_mut().record_dropped());
        return Ok(());
    }
    post_to_controller(&HostMessage::TrackEvent {
        payload: payload.clone(),
    })
}

pub(super) fn install_message_listener() {
    let Some(window) = web_sys::window() else {
        return;
    };
    MESSAGE_HANDLER.with(|slot| {
        if slot.borrow().is_some() {
            return;
        }
        let callback = Closure::<dyn FnMut(web_sys::MessageEvent)>::wrap(Box::new(
            move |event: web_sys::MessageEvent| {
                handle_inbound_message(&event);
            },
        ));
        let _ = window.add_event_listener_with_callback("message", callback.as_ref().unchecked_ref());
        *slot.borrow_mut() = Some(callback);
    });
}

pub(super) fn remove_message_listener() {
    let Some(window) = web_sys::window() else {
        return;
    };
    MESSAGE_HANDLER.with(|slot| {
        if let Some(callback) = slot.borrow_mut().take() {
            let _ = window
                .remove_event_listener_with_callback("message", callback.as_ref().unchecked_ref());
        }
    });
}

fn handle_inbound_message(event: &web_sys::MessageEvent) {
    let Some(raw) = js_value_to_json(&event.data()) else {
        return;
    };
    match parse_inbound(&raw) {
        InboundMessage::Controller(message) => {
            DIAGNOSTICS.with(|state| state.borrow_mut().record_received());
            match message {
                ControllerMessage::Hide => {
                    if let Err(error) = apply_open(false) {
                        console_error(&format!("inbound hide failed: {error}"));
                    }
                }
                ControllerMessage::Show => {
                    if let Err(error) = apply_open(true) {
                        console_error(&format!("inbound show failed: {error}"));
                    }
                }
                ControllerMessage::WidgetConfig { payload } => apply_widget_config(&payload),
                ControllerMessage::RequestPageInfo => {
                    // On-demand pull, bypassing the debounce window.
                    if let Err(error) = post_to_controller(&HostMessage::PageInfo {
                        payload: current_page_info(),
                    }) {
                        console_warn(&format!("page info pull not delivered: {error}"));
                    }
                }
            }
        }
        InboundMessage::Unknown { message_type } => {
            // The window hears every postMessage on the page; unknown types
            // are only counted, never acted on.
            DIAGNOSTICS.with(|state| {
                state.borrow_mut().record_unknown(message_type.as_deref());
            });
        }
    }
}

pub(super) fn install_controller_load_handler() {
    let controller = WIDGET.with(|slot| {
        slot.borrow()
            .as_ref()
            .map(|instance| instance.controller.clone())
    });
    let Some(controller) = controller else {
        return;
    };
    CONTROLLER_LOAD_HANDLER.with(|slot| {
        if slot.borrow().is_some() {
            return;
        }
        let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_event| {
            on_controller_loaded();
        }));
        let _ =
            controller.add_event_listener_with_callback("load", callback.as_ref().unchecked_ref());
        *slot.borrow_mut() = Some(callback);
    });
}

pub(super) fn remove_controller_load_handler() {
    let controller = WIDGET.with(|slot| {
        slot.borrow()
            .as_ref()
            .map(|instance| instance.controller.clone())
    });
    CONTROLLER_LOAD_HANDLER.with(|slot| {
        if let Some(callback) = slot.borrow_mut().take() {
            if let Some(controller) = controller {
                let _ = controller
                    .remove_event_listener_with_callback("load", callback.as_ref().unchecked_ref());
            }
        }
    });
}

// One handshake per instance, on the controller's first load: names the ui
// iframe so the app knows where rendering is projected.
fn on_controller_loaded() {
    if CONTROLLER_HANDSHAKE_SENT.with(Cell::get) {
        return;
    }
    CONTROLLER_HANDSHAKE_SENT.with(|cell| cell.set(true));
    CONTROLLER_READY.with(|cell| cell.set(true));

    if let Err(error) = post_to_controller(&HostMessage::UiReady {
        name: UI_FRAME_NAME.to_string(),
    }) {
        console_error(&format!("ui-ready handshake failed: {error}"));
    }
}

pub(super) fn js_value_to_json(value: &JsValue) -> Option<serde_json::Value> {
    if value.is_undefined() || value.is_null() {
        return None;
    }
    let raw = js_sys::JSON::stringify(value).ok()?;
    serde_json::from_str(&String::from(raw)).ok()
}
