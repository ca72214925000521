use super::*;

pub(super) fn mount_widget(api_key: Option<&str>) -> Result<WidgetInstance, String> {
    let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
    let document = window
        .document()
        .ok_or_else(|| "document is unavailable".to_string())?;
    let body = document
        .body()
        .ok_or_else(|| "document body is unavailable".to_string())?;

    let config = WIDGET_CONFIG.with(|config| config.borrow().clone());

    let container = document
        .create_element("div")
        .map_err(|_| "failed to create ui container".to_string())?
        .dyn_into::<HtmlElement>()
        .map_err(|_| "ui container is not HtmlElement".to_string())?;
    container.set_id(UI_CONTAINER_ID);
    apply_styles(
        &container,
        &[
            ("position", "fixed"),
            ("background", "#ffffff"),
            ("border-radius", "16px"),
            ("box-shadow", "0 12px 40px rgba(15, 23, 42, 0.22)"),
            ("overflow", "hidden"),
            ("z-index", CONTAINER_Z_INDEX),
            ("max-width", "calc(100vw - 48px)"),
            ("max-height", "calc(100vh - 120px)"),
            ("transition", CONTAINER_TRANSITION),
            // Mounted closed; apply_open flips these four together.
            ("opacity", "0"),
            ("visibility", "hidden"),
            ("transform", CONTAINER_HIDDEN_TRANSFORM),
            ("pointer-events", "none"),
        ],
    );
    position_container(&container, config.corner);
    size_container(&container, config.expanded);
    body.append_child(&container)
        .map_err(|_| "failed to append ui container".to_string())?;

    let ui_iframe = document
        .create_element("iframe")
        .map_err(|_| "failed to create ui iframe".to_string())?
        .dyn_into::<HtmlIFrameElement>()
        .map_err(|_| "ui iframe is not HtmlIFrameElement".to_string())?;
    ui_iframe.set_name(UI_FRAME_NAME);
    let _ = ui_iframe.set_attribute("title", "TGO chat");
    apply_styles(
        &ui_iframe,
        &[
            ("width", "100%"),
            ("height", "100%"),
            ("border", "none"),
            ("display", "block"),
        ],
    );
    container
        .append_child(&ui_iframe)
        .map_err(|_| "failed to append ui iframe".to_string())?;
    write_ui_shell(&ui_iframe);

    let launcher = document
        .create_element("button")
        .map_err(|_| "failed to create launcher".to_string())?
        .dyn_into::<HtmlElement>()
        .map_err(|_| "launcher is not HtmlElement".to_string())?;
    launcher.set_id(LAUNCHER_ID);
    let _ = launcher.set_attribute("type", "button");
    let _ = launcher.set_attribute("aria-label", "Open chat");
    apply_styles(
        &launcher,
        &[
            ("position", "fixed"),
            ("width", LAUNCHER_SIZE),
            ("height", LAUNCHER_SIZE),
            ("border", "none"),
            ("border-radius", "50%"),
            ("cursor", "pointer"),
            ("display", "flex"),
            ("align-items", "center"),
            ("justify-content", "center"),
            ("padding", "0"),
            ("box-shadow", "0 6px 20px rgba(15, 23, 42, 0.25)"),
            ("z-index", LAUNCHER_Z_INDEX),
            ("transition", LAUNCHER_TRANSITION),
            ("background", &config.theme_color),
            ("color", LAUNCHER_FOREGROUND),
        ],
    );
    launcher.set_inner_html(BRAND_GLYPH_SVG);
    let _ = launcher.set_attribute("data-tgo-glyph", "brand");
    position_launcher(&launcher, config.corner);
    body.append_child(&launcher)
        .map_err(|_| "failed to append launcher".to_string())?;

    let controller = document
        .create_element("iframe")
        .map_err(|_| "failed to create controller iframe".to_string())?
        .dyn_into::<HtmlIFrameElement>()
        .map_err(|_| "controller iframe is not HtmlIFrameElement".to_string())?;
    controller.set_name(CONTROLLER_FRAME_NAME);
    let _ = controller.set_attribute("aria-hidden", "true");
    apply_styles(
        &controller,
        &[
            ("position", "absolute"),
            ("width", "0"),
            ("height", "0"),
            ("border", "none"),
            ("visibility", "hidden"),
        ],
    );
    // The entry URL carries the api key from the very first navigation so
    // the app never boots unauthenticated. On failure the iframe stays
    // unnavigated rather than pointing somewhere half-built.
    match api_key {
        Some(api_key) => match controller_entry_url(DEFAULT_CONTROLLER_ENTRY_URL, api_key) {
            Ok(entry_url) => controller.set_src(&entry_url),
            Err(error) => console_error(&format!(
                "controller entry url rejected, leaving controller unnavigated: {error}"
            )),
        },
        None => console_error("no api key configured, leaving controller unnavigated"),
    }
    body.append_child(&controller)
        .map_err(|_| "failed to append controller iframe".to_string())?;

    Ok(WidgetInstance {
        container,
        ui_iframe,
        controller,
        launcher,
        is_open: false,
    })
}

// Overwrites the ui iframe's blank document with a static shell right away,
// instead of waiting on a `load` event that dynamic iframes fire
// inconsistently across browsers. Failures leave the iframe as the browser
// made it.
fn write_ui_shell(ui_iframe: &HtmlIFrameElement) {
    let Some(shell_document) = ui_iframe.content_document() else {
        console_error("ui iframe document unavailable, skipping shell write");
        return;
    };

    let written = (|| -> Result<(), String> {
        let shell_body = shell_document
            .body()
            .ok_or_else(|| "ui shell body is unavailable".to_string())?;
        apply_styles(
            &shell_body,
            &[
                ("margin", "0"),
                ("height", "100vh"),
                ("display", "flex"),
                ("align-items", "center"),
                ("justify-content", "center"),
                ("background", "#f8fafc"),
                ("color", "#94a3b8"),
                (
                    "font-family",
                    "-apple-system, BlinkMacSystemFont, \"Segoe UI\", sans-serif",
                ),
                ("font-size", "14px"),
            ],
        );
        let root = shell_document
            .create_element("div")
            .map_err(|_| "failed to create ui shell root".to_string())?
            .dyn_into::<HtmlElement>()
            .map_err(|_| "ui shell root is not HtmlElement".to_string())?;
        root.set_id(UI_SHELL_ROOT_ID);
        root.set_inner_text("Loading chat\u{2026}");
        shell_body
            .append_child(&root)
            .map_err(|_| "failed to append ui shell root".to_string())?;
        Ok(())
    })();

    if let Err(error) = written {
        console_error(&format!("ui shell write failed: {error}"));
    }
}

/// Open/close touches only the container in the host document; the iframe's
/// internal layout never reflows on a toggle. Safe to repeat.
pub(super) fn apply_open(open: bool) -> Result<(), String> {
    WIDGET.with(|slot| {
        let mut slot = slot.borrow_mut();
        let instance = slot
            .as_mut()
            .ok_or_else(|| "widget is not mounted".to_string())?;
        instance.is_open = open;
        let style = instance.container.style();
        let _ = style.set_property("opacity", if open { "1" } else { "0" });
        let _ = style.set_property("visibility", if open { "visible" } else { "hidden" });
        let _ = style.set_property(
            "transform",
            if open {
                CONTAINER_VISIBLE_TRANSFORM
            } else {
                CONTAINER_HIDDEN_TRANSFORM
            },
        );
        let _ = style.set_property("pointer-events", if open { "auto" } else { "none" });
        Ok(())
    })?;

    LAUNCHER_STATE.with(|state| state.borrow_mut().open = open);
    sync_launcher_style();
    DIAGNOSTICS.with(|state| state.borrow_mut().open = open);

    // Best-effort hint so the embedded app can pause polling while hidden;
    // the host makes no guarantee the app acts on it.
    if let Err(error) = post_to_controller(&HostMessage::Visibility { open }) {
        console_warn(&format!("visibility hint not delivered: {error}"));
    }
    Ok(())
}

/// Applies a `TGO_WIDGET_CONFIG` payload live; nothing remounts.
pub(super) fn apply_widget_config(payload: &WidgetConfigPayload) {
    WIDGET_CONFIG.with(|config| {
        let mut config = config.borrow_mut();
        if let Some(position) = payload.position {
            config.corner = position;
        }
        if let Some(theme_color) = payload
            .theme_color
            .as_deref()
            .and_then(normalize_theme_color)
        {
            config.theme_color = theme_color;
        }
        if let Some(expanded) = payload.expanded {
            config.expanded = expanded;
        }
    });

    let config = WIDGET_CONFIG.with(|config| config.borrow().clone());
    WIDGET.with(|slot| {
        if let Some(instance) = slot.borrow().as_ref() {
            position_container(&instance.container, config.corner);
            size_container(&instance.container, config.expanded);
            position_launcher(&instance.launcher, config.corner);
        }
    });
    sync_launcher_style();
}

fn position_container(container: &HtmlElement, corner: Corner) {
    let style = container.style();
    if corner.is_bottom() {
        let _ = style.set_property("bottom", CONTAINER_EDGE_OFFSET);
        let _ = style.set_property("top", "auto");
    } else {
        let _ = style.set_property("top", CONTAINER_EDGE_OFFSET);
        let _ = style.set_property("bottom", "auto");
    }
    if corner.is_right() {
        let _ = style.set_property("right", EDGE_OFFSET);
        let _ = style.set_property("left", "auto");
    } else {
        let _ = style.set_property("left", EDGE_OFFSET);
        let _ = style.set_property("right", "auto");
    }
}

fn size_container(container: &HtmlElement, expanded: bool) {
    let style = container.style();
    let (width, height) = if expanded {
        (CONTAINER_EXPANDED_WIDTH, CONTAINER_EXPANDED_HEIGHT)
    } else {
        (CONTAINER_WIDTH, CONTAINER_HEIGHT)
    };
    let _ = style.set_property("width", width);
    let _ = style.set_property("height", height);
}

fn position_launcher(launcher: &HtmlElement, corner: Corner) {
    let style = launcher.style();
    if corner.is_bottom() {
        let _ = style.set_property("bottom", EDGE_OFFSET);
        let _ = style.set_property("top", "auto");
    } else {
        let _ = style.set_property("top", EDGE_OFFSET);
        let _ = style.set_property("bottom", "auto");
    }
    if corner.is_right() {
        let _ = style.set_property("right", EDGE_OFFSET);
        let _ = style.set_property("left", "auto");
    } else {
        let _ = style.set_property("left", EDGE_OFFSET);
        let _ = style.set_property("right", "auto");
    }
}

pub(super) fn apply_styles(element: &HtmlElement, styles: &[(&str, &str)]) {
    let style = element.style();
    for (property, value) in styles {
        let _ = style.set_property(property, value);
    }
}
