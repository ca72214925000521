use super::*;

pub(super) fn install_launcher_handlers() {
    let launcher = WIDGET.with(|slot| {
        slot.borrow()
            .as_ref()
            .map(|instance| instance.launcher.clone())
    });
    let Some(launcher) = launcher else {
        return;
    };

    install_pointer_handler(&launcher, "mouseenter", &LAUNCHER_ENTER_HANDLER, |state| {
        state.hovered = true;
    });
    install_pointer_handler(&launcher, "mouseleave", &LAUNCHER_LEAVE_HANDLER, |state| {
        state.hovered = false;
        state.pressed = false;
    });
    install_pointer_handler(&launcher, "mousedown", &LAUNCHER_DOWN_HANDLER, |state| {
        state.pressed = true;
    });
    install_pointer_handler(&launcher, "mouseup", &LAUNCHER_UP_HANDLER, |state| {
        state.pressed = false;
    });
    install_pointer_handler(
        &launcher,
        "touchstart",
        &LAUNCHER_TOUCHSTART_HANDLER,
        |state| {
            state.pressed = true;
        },
    );
    install_pointer_handler(
        &launcher,
        "touchend",
        &LAUNCHER_TOUCHEND_HANDLER,
        |state| {
            state.pressed = false;
        },
    );

    LAUNCHER_CLICK_HANDLER.with(|slot| {
        if slot.borrow().is_some() {
            return;
        }
        let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_event| {
            toggle_from_launcher();
        }));
        let _ = launcher.add_event_listener_with_callback("click", callback.as_ref().unchecked_ref());
        *slot.borrow_mut() = Some(callback);
    });

    // A press that starts on the button but releases anywhere else must
    // still reset the pressed visual.
    if let Some(window) = web_sys::window() {
        install_pointer_handler(&window, "mouseup", &WINDOW_MOUSEUP_HANDLER, |state| {
            state.release();
        });
        install_pointer_handler(&window, "touchend", &WINDOW_TOUCHEND_HANDLER, |state| {
            state.release();
        });
    }
}

pub(super) fn remove_launcher_handlers() {
    let launcher = WIDGET.with(|slot| {
        slot.borrow()
            .as_ref()
            .map(|instance| instance.launcher.clone())
    });
    if let Some(launcher) = launcher {
        remove_target_event(&launcher, "mouseenter", &LAUNCHER_ENTER_HANDLER);
        remove_target_event(&launcher, "mouseleave", &LAUNCHER_LEAVE_HANDLER);
        remove_target_event(&launcher, "mousedown", &LAUNCHER_DOWN_HANDLER);
        remove_target_event(&launcher, "mouseup", &LAUNCHER_UP_HANDLER);
        remove_target_event(&launcher, "touchstart", &LAUNCHER_TOUCHSTART_HANDLER);
        remove_target_event(&launcher, "touchend", &LAUNCHER_TOUCHEND_HANDLER);
        remove_target_event(&launcher, "click", &LAUNCHER_CLICK_HANDLER);
    }
    if let Some(window) = web_sys::window() {
        remove_target_event(&window, "mouseup", &WINDOW_MOUSEUP_HANDLER);
        remove_target_event(&window, "touchend", &WINDOW_TOUCHEND_HANDLER);
    }
}

fn install_pointer_handler(
    target: &web_sys::EventTarget,
    event_name: &'static str,
    slot: &'static LocalKey<RefCell<Option<EventClosure>>>,
    mutate: fn(&mut LauncherVisualState),
) {
    slot.with(|slot| {
        if slot.borrow().is_some() {
            return;
        }
        let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_event| {
            LAUNCHER_STATE.with(|state| mutate(&mut state.borrow_mut()));
            sync_launcher_style();
        }));
        let _ = target.add_event_listener_with_callback(event_name, callback.as_ref().unchecked_ref());
        *slot.borrow_mut() = Some(callback);
    });
}

fn remove_target_event(
    target: &web_sys::EventTarget,
    event_name: &'static str,
    slot: &'static LocalKey<RefCell<Option<EventClosure>>>,
) {
    slot.with(|slot| {
        if let Some(callback) = slot.borrow_mut().take() {
            let _ = target
                .remove_event_listener_with_callback(event_name, callback.as_ref().unchecked_ref());
        }
    });
}

fn toggle_from_launcher() {
    let open = WIDGET.with(|slot| {
        slot.borrow()
            .as_ref()
            .is_some_and(|instance| instance.is_open)
    });
    if let Err(error) = apply_open(!open) {
        console_error(&format!("launcher toggle failed: {error}"));
    }
}

/// Recomputes every derived visual from the current state; nothing visual
/// is stored on its own.
pub(super) fn sync_launcher_style() {
    let state = LAUNCHER_STATE.with(|state| *state.borrow());
    let theme_color = WIDGET_CONFIG.with(|config| config.borrow().theme_color.clone());

    WIDGET.with(|slot| {
        if let Some(instance) = slot.borrow().as_ref() {
            let style = instance.launcher.style();
            let _ = style.set_property("transform", &format!("scale({})", state.scale()));
            let _ = style.set_property("background", &state.background(&theme_color));
            let _ = style.set_property("color", &state.foreground(&theme_color));

            let (glyph_name, glyph_svg, label) = match state.glyph() {
                LauncherGlyph::Brand => ("brand", BRAND_GLYPH_SVG, "Open chat"),
                LauncherGlyph::Close => ("close", CLOSE_GLYPH_SVG, "Close chat"),
            };
            // Pointer events arrive in bursts; only rewrite the icon when it
            // actually flips.
            let current = instance.launcher.get_attribute("data-tgo-glyph");
            if current.as_deref() != Some(glyph_name) {
                instance.launcher.set_inner_html(glyph_svg);
                let _ = instance.launcher.set_attribute("data-tgo-glyph", glyph_name);
                let _ = instance.launcher.set_attribute("aria-label", label);
            }
        }
    });
}
