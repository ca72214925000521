#![allow(clippy::needless_pass_by_value)]

#[cfg(any(target_arch = "wasm32", test))]
mod diagnostics;
#[cfg(target_arch = "wasm32")]
mod wasm_constants;

#[cfg(target_arch = "wasm32")]
pub use wasm::{hide, init, show, shutdown, track, widget_diagnostics_json};

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::{Cell, RefCell};
    use std::thread::LocalKey;

    use tgo_widget_core::bridge::{
        ControllerMessage, HostMessage, InboundMessage, WidgetConfigPayload, encode_host_message,
        parse_inbound,
    };
    use tgo_widget_core::command::{CallQueue, WidgetCommand};
    use tgo_widget_core::config::{
        Corner, DEFAULT_CONTROLLER_ENTRY_URL, WidgetOptions, api_key_from_script_src,
        controller_entry_url,
    };
    use tgo_widget_core::launcher::{
        DEFAULT_THEME_COLOR, LAUNCHER_FOREGROUND, LauncherGlyph, LauncherVisualState,
        normalize_theme_color,
    };
    use tgo_widget_core::page::{ExitThrottle, HostPageInfo, PageInfoCoalescer};
    use tgo_widget_core::track::{TrackPayload, normalize_track_input};
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{HtmlElement, HtmlIFrameElement};

    use crate::diagnostics::WidgetDiagnostics;
    use crate::wasm_constants::*;

    mod bridge;
    mod dom;
    mod forwarding;
    mod launcher;
    mod lifecycle;

    use bridge::*;
    use dom::*;
    use forwarding::*;
    use launcher::*;
    use lifecycle::*;

    type EventClosure = Closure<dyn FnMut(web_sys::Event)>;
    type HistoryClosure = Closure<dyn FnMut(JsValue, JsValue, JsValue)>;

    thread_local! {
        static WIDGET: RefCell<Option<WidgetInstance>> = const { RefCell::new(None) };
        static BOOTED: Cell<bool> = const { Cell::new(false) };
        static MOUNT_STATE: Cell<MountState> = const { Cell::new(MountState::Pending) };
        static API_KEY: RefCell<Option<String>> = const { RefCell::new(None) };
        static CALL_QUEUE: RefCell<CallQueue> = RefCell::new(CallQueue::default());
        static DIAGNOSTICS: RefCell<WidgetDiagnostics> = RefCell::new(WidgetDiagnostics::default());
        static WIDGET_CONFIG: RefCell<AppliedConfig> = RefCell::new(AppliedConfig::default());
        static LAUNCHER_STATE: RefCell<LauncherVisualState> = RefCell::new(LauncherVisualState::default());
        static CONTROLLER_READY: Cell<bool> = const { Cell::new(false) };
        static CONTROLLER_HANDSHAKE_SENT: Cell<bool> = const { Cell::new(false) };
        static PAGE_FORWARDING_INITED: Cell<bool> = const { Cell::new(false) };
        static PAGE_INFO_COALESCER: RefCell<PageInfoCoalescer> = RefCell::new(PageInfoCoalescer::default());
        static EXIT_THROTTLE: RefCell<ExitThrottle> = RefCell::new(ExitThrottle::default());
        static DOM_READY_HANDLER: RefCell<Option<EventClosure>> = const { RefCell::new(None) };
        static MESSAGE_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::MessageEvent)>>> = const { RefCell::new(None) };
        static CONTROLLER_LOAD_HANDLER: RefCell<Option<EventClosure>> = const { RefCell::new(None) };
        static POPSTATE_HANDLER: RefCell<Option<EventClosure>> = const { RefCell::new(None) };
        static HASHCHANGE_HANDLER: RefCell<Option<EventClosure>> = const { RefCell::new(None) };
        static VISIBILITYCHANGE_HANDLER: RefCell<Option<EventClosure>> = const { RefCell::new(None) };
        static BEFOREUNLOAD_HANDLER: RefCell<Option<EventClosure>> = const { RefCell::new(None) };
        static PUSH_STATE_ORIGINAL: RefCell<Option<js_sys::Function>> = const { RefCell::new(None) };
        static REPLACE_STATE_ORIGINAL: RefCell<Option<js_sys::Function>> = const { RefCell::new(None) };
        static PUSH_STATE_WRAPPER: RefCell<Option<HistoryClosure>> = const { RefCell::new(None) };
        static REPLACE_STATE_WRAPPER: RefCell<Option<HistoryClosure>> = const { RefCell::new(None) };
        static LAUNCHER_ENTER_HANDLER: RefCell<Option<EventClosure>> = const { RefCell::new(None) };
        static LAUNCHER_LEAVE_HANDLER: RefCell<Option<EventClosure>> = const { RefCell::new(None) };
        static LAUNCHER_DOWN_HANDLER: RefCell<Option<EventClosure>> = const { RefCell::new(None) };
        static LAUNCHER_UP_HANDLER: RefCell<Option<EventClosure>> = const { RefCell::new(None) };
        static LAUNCHER_TOUCHSTART_HANDLER: RefCell<Option<EventClosure>> = const { RefCell::new(None) };
        static LAUNCHER_TOUCHEND_HANDLER: RefCell<Option<EventClosure>> = const { RefCell::new(None) };
        static LAUNCHER_CLICK_HANDLER: RefCell<Option<EventClosure>> = const { RefCell::new(None) };
        static WINDOW_MOUSEUP_HANDLER: RefCell<Option<EventClosure>> = const { RefCell::new(None) };
        static WINDOW_TOUCHEND_HANDLER: RefCell<Option<EventClosure>> = const { RefCell::new(None) };
    }

    /// Singleton runtime handle owning the injected DOM. At most one per
    /// page; a repeated `init()` keeps the existing one.
    struct WidgetInstance {
        container: HtmlElement,
        ui_iframe: HtmlIFrameElement,
        controller: HtmlIFrameElement,
        launcher: HtmlElement,
        is_open: bool,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum MountState {
        Pending,
        Mounted,
    }

    #[derive(Debug, Clone)]
    struct AppliedConfig {
        corner: Corner,
        theme_color: String,
        expanded: bool,
    }

    impl Default for AppliedConfig {
        fn default() -> Self {
            Self {
                corner: Corner::default(),
                theme_color: DEFAULT_THEME_COLOR.to_string(),
                expanded: false,
            }
        }
    }

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        // Dropping the loader script onto a page with an api key in its own
        // src is enough; no explicit init() call required.
        if let Some(api_key) = detect_script_api_key() {
            init_with_options(WidgetOptions {
                api_key: Some(api_key),
            });
        }
    }

    #[wasm_bindgen]
    pub fn init(options: JsValue) {
        init_with_options(widget_options_from_js(&options));
    }

    #[wasm_bindgen]
    pub fn show() {
        queue_or_execute(WidgetCommand::Show);
    }

    #[wasm_bindgen]
    pub fn hide() {
        queue_or_execute(WidgetCommand::Hide);
    }

    #[wasm_bindgen]
    pub fn track(event: JsValue, title: Option<String>, extra: JsValue) {
        let Some(event) = js_value_to_json(&event) else {
            console_error("track event must be a string or a plain object");
            return;
        };
        let extra = js_value_to_json(&extra);
        match normalize_track_input(&event, title.as_deref(), extra.as_ref()) {
            Ok(payload) => queue_or_execute(WidgetCommand::Track(payload)),
            Err(error) => console_error(&error.to_string()),
        }
    }

    #[wasm_bindgen]
    pub fn shutdown() {
        remove_page_forwarding();
        remove_message_listener();
        remove_launcher_handlers();
        remove_controller_load_handler();
        remove_dom_ready_handler();

        if let Some(instance) = WIDGET.with(|slot| slot.borrow_mut().take()) {
            instance.ui_iframe.remove();
            instance.container.remove();
            instance.controller.remove();
            instance.launcher.remove();
        }

        BOOTED.with(|cell| cell.set(false));
        MOUNT_STATE.with(|cell| cell.set(MountState::Pending));
        CONTROLLER_READY.with(|cell| cell.set(false));
        CONTROLLER_HANDSHAKE_SENT.with(|cell| cell.set(false));
        API_KEY.with(|slot| slot.borrow_mut().take());
        CALL_QUEUE.with(|queue| *queue.borrow_mut() = CallQueue::default());
        LAUNCHER_STATE.with(|state| *state.borrow_mut() = LauncherVisualState::default());
        WIDGET_CONFIG.with(|config| *config.borrow_mut() = AppliedConfig::default());
        DIAGNOSTICS.with(|state| {
            let mut state = state.borrow_mut();
            state.open = false;
            state.queued_calls = 0;
            state.set_phase("shutdown");
        });
    }

    #[wasm_bindgen]
    pub fn widget_diagnostics_json() -> String {
        DIAGNOSTICS.with(|state| {
            serde_json::to_string(&*state.borrow()).unwrap_or_else(|_| {
                "{\"phase\":\"error\",\"last_error\":\"diagnostics serialization failed\"}"
                    .to_string()
            })
        })
    }

    fn widget_options_from_js(options: &JsValue) -> WidgetOptions {
        let api_key = js_sys::Reflect::get(options, &JsValue::from_str("apiKey"))
            .ok()
            .and_then(|value| value.as_string())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        WidgetOptions { api_key }
    }

    fn init_with_options(options: WidgetOptions) {
        if BOOTED.with(Cell::get) {
            // Idempotent re-init: the existing singleton stays as-is.
            return;
        }

        let api_key = options.api_key.or_else(detect_script_api_key);
        if let Some(api_key) = api_key {
            API_KEY.with(|slot| *slot.borrow_mut() = Some(api_key));
        }

        set_phase("booting");
        run_when_document_ready(mount_widget_now);
    }

    fn mount_widget_now() {
        let already_mounted = WIDGET.with(|slot| slot.borrow().is_some());
        if already_mounted {
            finish_boot();
            return;
        }

        let api_key = API_KEY.with(|slot| slot.borrow().clone());
        match mount_widget(api_key.as_deref()) {
            Ok(instance) => {
                WIDGET.with(|slot| *slot.borrow_mut() = Some(instance));
                mark_mounted();
                install_message_listener();
                install_controller_load_handler();
                install_launcher_handlers();
                install_page_forwarding();
                finish_boot();
            }
            Err(error) => set_boot_error(&error),
        }
    }

    fn finish_boot() {
        BOOTED.with(|cell| cell.set(true));
        set_phase("ready");
        flush_call_queue();
    }

    fn queue_or_execute(command: WidgetCommand) {
        if !BOOTED.with(Cell::get) {
            CALL_QUEUE.with(|queue| {
                queue.borrow_mut().record(command);
            });
            sync_queue_depth();
            return;
        }

        if let Err(error) = execute_command(&command) {
            console_error(&format!("{} failed: {error}", command.name()));
        }
    }

    fn flush_call_queue() {
        let drained = CALL_QUEUE.with(|queue| queue.borrow_mut().drain());
        for command in drained {
            // One bad queued call must not block the calls behind it.
            if let Err(error) = execute_command(&command) {
                console_error(&format!("queued {} call failed: {error}", command.name()));
            }
        }
        sync_queue_depth();
    }

    fn execute_command(command: &WidgetCommand) -> Result<(), String> {
        match command {
            WidgetCommand::Show => apply_open(true),
            WidgetCommand::Hide => apply_open(false),
            WidgetCommand::Track(payload) => send_track(payload),
        }
    }

    fn sync_queue_depth() {
        let depth = CALL_QUEUE.with(|queue| queue.borrow().len());
        DIAGNOSTICS.with(|state| state.borrow_mut().queued_calls = depth);
    }
}
