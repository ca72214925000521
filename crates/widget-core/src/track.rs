use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::WidgetError;

/// Normalized payload for `TGO_TRACK_EVENT`.
///
/// The public `track()` surface accepts either a string event name with an
/// optional title and extra-fields object, or one structured object; both
/// forms collapse into this shape before they reach the bridge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackPayload {
    pub activity_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub fn normalize_track_input(
    event: &Value,
    title: Option<&str>,
    extra: Option<&Value>,
) -> Result<TrackPayload, WidgetError> {
    match event {
        Value::String(name) => {
            let activity_type = non_empty(name).ok_or(WidgetError::InvalidTrackEvent)?;
            let extra = match extra {
                Some(Value::Object(fields)) => reserved_free(fields),
                _ => Map::new(),
            };
            Ok(TrackPayload {
                activity_type,
                title: title.and_then(non_empty),
                extra,
            })
        }
        Value::Object(fields) => {
            let activity_type = fields
                .get("activity_type")
                .and_then(Value::as_str)
                .and_then(non_empty)
                .ok_or(WidgetError::InvalidTrackEvent)?;
            let title = fields.get("title").and_then(Value::as_str).and_then(non_empty);
            Ok(TrackPayload {
                activity_type,
                title,
                extra: reserved_free(fields),
            })
        }
        _ => Err(WidgetError::InvalidTrackEvent),
    }
}

// Keys that map onto dedicated payload fields; everything else rides along.
const RESERVED_KEYS: [&str; 3] = ["activity_type", "title", "type"];

fn reserved_free(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn name_form_and_object_form_normalize_identically() {
        let from_name = normalize_track_input(
            &json!("click"),
            Some("Buy Now"),
            Some(&json!({ "sku": "X" })),
        );
        let from_object = normalize_track_input(
            &json!({ "activity_type": "click", "title": "Buy Now", "sku": "X" }),
            None,
            None,
        );
        assert_eq!(from_name, from_object);
        assert_eq!(
            from_name,
            Ok(TrackPayload {
                activity_type: "click".to_string(),
                title: Some("Buy Now".to_string()),
                extra: [("sku".to_string(), json!("X"))].into_iter().collect(),
            })
        );
    }

    #[test]
    fn title_and_extra_are_optional() {
        assert_eq!(
            normalize_track_input(&json!("page_view"), None, None),
            Ok(TrackPayload {
                activity_type: "page_view".to_string(),
                title: None,
                extra: Map::new(),
            })
        );
    }

    #[test]
    fn reserved_keys_never_duplicate_into_extra() {
        let normalized = normalize_track_input(
            &json!({ "activity_type": "click", "title": "Go", "type": "TGO_TRACK_EVENT", "step": 2 }),
            None,
            None,
        );
        assert_eq!(
            normalized,
            Ok(TrackPayload {
                activity_type: "click".to_string(),
                title: Some("Go".to_string()),
                extra: [("step".to_string(), json!(2))].into_iter().collect(),
            })
        );
    }

    #[test]
    fn payload_serializes_extra_fields_inline() {
        let payload = TrackPayload {
            activity_type: "click".to_string(),
            title: Some("Buy Now".to_string()),
            extra: [("sku".to_string(), json!("X"))].into_iter().collect(),
        };
        let encoded = serde_json::to_string(&payload).unwrap_or_default();
        assert!(encoded.contains("\"activity_type\":\"click\""));
        assert!(encoded.contains("\"sku\":\"X\""));
        assert!(!encoded.contains("extra"));
    }

    #[test]
    fn rejects_empty_and_non_object_events() {
        assert_eq!(
            normalize_track_input(&json!(""), None, None),
            Err(WidgetError::InvalidTrackEvent)
        );
        assert_eq!(
            normalize_track_input(&json!({ "title": "no type" }), None, None),
            Err(WidgetError::InvalidTrackEvent)
        );
        assert_eq!(
            normalize_track_input(&json!(42), None, None),
            Err(WidgetError::InvalidTrackEvent)
        );
    }
}
