//! Platform-independent logic for the TGO widget embed runtime.
//!
//! Everything here compiles and tests natively. The `tgo-widget-embed`
//! crate layers the browser surface (DOM, iframes, `postMessage`) on top.

pub mod bridge;
pub mod command;
pub mod config;
pub mod error;
pub mod launcher;
pub mod page;
pub mod track;

pub use bridge::{
    ControllerMessage, HostMessage, InboundMessage, WidgetConfigPayload, encode_host_message,
    parse_inbound,
};
pub use command::{CallQueue, WidgetCommand};
pub use config::{Corner, WidgetOptions, api_key_from_script_src, controller_entry_url};
pub use error::WidgetError;
pub use launcher::{LauncherGlyph, LauncherVisualState};
pub use page::{ExitThrottle, HostPageInfo, PageInfoCoalescer};
pub use track::{TrackPayload, normalize_track_input};
