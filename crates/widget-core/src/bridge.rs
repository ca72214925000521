use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Corner;
use crate::error::WidgetError;
use crate::page::HostPageInfo;
use crate::track::TrackPayload;

/// Messages the host page posts into the controller iframe.
///
/// Delivery is fire-and-forget `postMessage`; every variant is advisory and
/// safe to repeat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostMessage {
    #[serde(rename = "tgo:ui-ready")]
    UiReady { name: String },
    #[serde(rename = "tgo:visibility")]
    Visibility { open: bool },
    #[serde(rename = "TGO_HOST_PAGE_INFO")]
    PageInfo { payload: HostPageInfo },
    #[serde(rename = "TGO_HOST_PAGE_EXIT")]
    PageExit { payload: HostPageInfo },
    #[serde(rename = "TGO_TRACK_EVENT")]
    TrackEvent { payload: TrackPayload },
}

/// Messages the controller iframe posts back to the host page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ControllerMessage {
    #[serde(rename = "tgo:hide")]
    Hide,
    #[serde(rename = "tgo:show")]
    Show,
    #[serde(rename = "TGO_WIDGET_CONFIG")]
    WidgetConfig { payload: WidgetConfigPayload },
    #[serde(rename = "TGO_REQUEST_PAGE_INFO")]
    RequestPageInfo,
}

/// Live-applied configuration pushed from inside the embedded app.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfigPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Corner>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
}

/// Decoded inbound message, with an explicit branch for types this runtime
/// does not recognize so gaps stay visible in diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    Controller(ControllerMessage),
    Unknown { message_type: Option<String> },
}

pub fn parse_inbound(raw: &Value) -> InboundMessage {
    match ControllerMessage::deserialize(raw) {
        Ok(message) => InboundMessage::Controller(message),
        Err(_) => InboundMessage::Unknown {
            message_type: raw
                .get("type")
                .and_then(Value::as_str)
                .map(ToString::to_string),
        },
    }
}

pub fn encode_host_message(message: &HostMessage) -> Result<String, WidgetError> {
    serde_json::to_string(message).map_err(|error| WidgetError::Encode(error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn host_messages_carry_exact_wire_tags() {
        let encoded = encode_host_message(&HostMessage::UiReady {
            name: "tgo-ui-frame".to_string(),
        })
        .unwrap_or_default();
        assert!(encoded.contains("\"type\":\"tgo:ui-ready\""));
        assert!(encoded.contains("\"name\":\"tgo-ui-frame\""));

        let encoded = encode_host_message(&HostMessage::Visibility { open: true }).unwrap_or_default();
        assert!(encoded.contains("\"type\":\"tgo:visibility\""));
        assert!(encoded.contains("\"open\":true"));

        let encoded = encode_host_message(&HostMessage::PageInfo {
            payload: HostPageInfo {
                page_url: "https://shop.example/checkout".to_string(),
                title: "Checkout".to_string(),
                referrer: String::new(),
            },
        })
        .unwrap_or_default();
        assert!(encoded.contains("\"type\":\"TGO_HOST_PAGE_INFO\""));
        assert!(encoded.contains("\"page_url\":\"https://shop.example/checkout\""));
    }

    #[test]
    fn inbound_visibility_commands_parse() {
        assert_eq!(
            parse_inbound(&json!({ "type": "tgo:hide" })),
            InboundMessage::Controller(ControllerMessage::Hide)
        );
        assert_eq!(
            parse_inbound(&json!({ "type": "tgo:show" })),
            InboundMessage::Controller(ControllerMessage::Show)
        );
        assert_eq!(
            parse_inbound(&json!({ "type": "TGO_REQUEST_PAGE_INFO" })),
            InboundMessage::Controller(ControllerMessage::RequestPageInfo)
        );
    }

    #[test]
    fn widget_config_parses_partial_payloads() {
        let parsed = parse_inbound(&json!({
            "type": "TGO_WIDGET_CONFIG",
            "payload": { "position": "top-left" }
        }));
        assert_eq!(
            parsed,
            InboundMessage::Controller(ControllerMessage::WidgetConfig {
                payload: WidgetConfigPayload {
                    position: Some(Corner::TopLeft),
                    theme_color: None,
                    expanded: None,
                },
            })
        );

        let parsed = parse_inbound(&json!({
            "type": "TGO_WIDGET_CONFIG",
            "payload": { "theme_color": "#10b981", "expanded": true }
        }));
        assert_eq!(
            parsed,
            InboundMessage::Controller(ControllerMessage::WidgetConfig {
                payload: WidgetConfigPayload {
                    position: None,
                    theme_color: Some("#10b981".to_string()),
                    expanded: Some(true),
                },
            })
        );
    }

    #[test]
    fn unrecognized_types_fall_through_with_their_tag() {
        assert_eq!(
            parse_inbound(&json!({ "type": "TGO_FUTURE_FEATURE", "payload": {} })),
            InboundMessage::Unknown {
                message_type: Some("TGO_FUTURE_FEATURE".to_string()),
            }
        );
        assert_eq!(
            parse_inbound(&json!({ "data": 42 })),
            InboundMessage::Unknown { message_type: None }
        );
        assert_eq!(
            parse_inbound(&json!("not an object")),
            InboundMessage::Unknown { message_type: None }
        );
    }
}
