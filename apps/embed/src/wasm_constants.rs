use web_time::Duration;

use tgo_widget_core::page::PAGE_INFO_DEBOUNCE_MS;

pub(crate) const UI_CONTAINER_ID: &str = "tgo-ui-container";
pub(crate) const UI_FRAME_NAME: &str = "tgo-ui-frame";
pub(crate) const UI_SHELL_ROOT_ID: &str = "tgo-ui-shell";
pub(crate) const CONTROLLER_FRAME_NAME: &str = "tgo-controller-frame";
pub(crate) const LAUNCHER_ID: &str = "tgo-widget-launcher";

// Filename fragment identifying the loader's own <script> tag when probing
// for an api key in its src query string.
pub(crate) const SCRIPT_SRC_HINT: &str = "tgo-widget";

pub(crate) const PAGE_INFO_DEBOUNCE: Duration = Duration::from_millis(PAGE_INFO_DEBOUNCE_MS);

pub(crate) const EDGE_OFFSET: &str = "24px";
// Clears the launcher plus a small gap at the anchored edge.
pub(crate) const CONTAINER_EDGE_OFFSET: &str = "92px";
pub(crate) const CONTAINER_WIDTH: &str = "380px";
pub(crate) const CONTAINER_HEIGHT: &str = "640px";
pub(crate) const CONTAINER_EXPANDED_WIDTH: &str = "720px";
pub(crate) const CONTAINER_EXPANDED_HEIGHT: &str = "82vh";
pub(crate) const LAUNCHER_SIZE: &str = "56px";

// Below every sane host z-index war, above almost everything in practice.
pub(crate) const CONTAINER_Z_INDEX: &str = "2147483000";
pub(crate) const LAUNCHER_Z_INDEX: &str = "2147483001";

pub(crate) const CONTAINER_TRANSITION: &str = "opacity 160ms ease, transform 160ms ease";
pub(crate) const LAUNCHER_TRANSITION: &str = "transform 120ms ease, background 120ms ease";
pub(crate) const CONTAINER_HIDDEN_TRANSFORM: &str = "translateY(12px) scale(0.98)";
pub(crate) const CONTAINER_VISIBLE_TRANSFORM: &str = "translateY(0) scale(1)";

pub(crate) const BRAND_GLYPH_SVG: &str = "<svg width=\"26\" height=\"26\" viewBox=\"0 0 24 24\" fill=\"currentColor\" aria-hidden=\"true\"><path d=\"M12 3C6.9 3 3 6.5 3 10.8c0 2.4 1.2 4.5 3.2 5.9-.1.8-.5 2-1.6 3.1-.2.2 0 .6.3.6 2 0 3.6-.9 4.6-1.6.8.2 1.6.3 2.5.3 5.1 0 9-3.5 9-7.8S17.1 3 12 3z\"/></svg>";
pub(crate) const CLOSE_GLYPH_SVG: &str = "<svg width=\"22\" height=\"22\" viewBox=\"0 0 24 24\" fill=\"none\" stroke=\"currentColor\" stroke-width=\"2.4\" stroke-linecap=\"round\" aria-hidden=\"true\"><path d=\"M6 6l12 12M18 6L6 18\"/></svg>";
