use serde::{Deserialize, Serialize};

use crate::error::WidgetError;

/// Entry document the controller iframe boots; the api key is appended as a
/// query parameter at construction time and never re-navigated afterwards.
pub const DEFAULT_CONTROLLER_ENTRY_URL: &str = "https://widget.tgo.chat/controller.html";

/// Query parameters on the loader script's own `src` that trigger auto-init.
pub const API_KEY_PARAMS: [&str; 3] = ["api_key", "apiKey", "platform_api_key"];

/// Options accepted by `init()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetOptions {
    pub api_key: Option<String>,
}

/// Host-page corner the container and launcher anchor to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    #[default]
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

impl Corner {
    pub fn from_keyword(raw: &str) -> Option<Corner> {
        match raw.trim() {
            "bottom-right" => Some(Corner::BottomRight),
            "bottom-left" => Some(Corner::BottomLeft),
            "top-right" => Some(Corner::TopRight),
            "top-left" => Some(Corner::TopLeft),
            _ => None,
        }
    }

    pub fn as_keyword(&self) -> &'static str {
        match self {
            Corner::BottomRight => "bottom-right",
            Corner::BottomLeft => "bottom-left",
            Corner::TopRight => "top-right",
            Corner::TopLeft => "top-left",
        }
    }

    pub fn is_bottom(&self) -> bool {
        matches!(self, Corner::BottomRight | Corner::BottomLeft)
    }

    pub fn is_right(&self) -> bool {
        matches!(self, Corner::BottomRight | Corner::TopRight)
    }
}

/// Pulls an api key out of a script `src` URL, e.g.
/// `https://cdn.tgo.chat/tgo-widget.js?api_key=abc123`.
pub fn api_key_from_script_src(src: &str) -> Option<String> {
    let (_, query) = src.split_once('?')?;
    let query = query.split('#').next().unwrap_or(query);

    for wanted in API_KEY_PARAMS {
        for pair in query.split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            if key == wanted && !value.trim().is_empty() {
                return Some(value.trim().to_string());
            }
        }
    }
    None
}

/// Builds the controller iframe entry URL with the api key embedded, so the
/// embedded app authenticates before any bridge message flows.
pub fn controller_entry_url(base: &str, api_key: &str) -> Result<String, WidgetError> {
    let base = normalize_entry_base(base)?;
    let key = api_key.trim();
    if key.is_empty() {
        return Err(WidgetError::EmptyApiKey);
    }
    let separator = if base.contains('?') { '&' } else { '?' };
    Ok(format!("{base}{separator}apiKey={key}"))
}

fn normalize_entry_base(raw: &str) -> Result<String, WidgetError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(WidgetError::InvalidControllerBaseUrl);
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(WidgetError::InvalidControllerBaseUrl);
    }
    let Some((_, remainder)) = trimmed.split_once("://") else {
        return Err(WidgetError::InvalidControllerBaseUrl);
    };
    if remainder.trim().is_empty() || remainder.starts_with('/') {
        return Err(WidgetError::InvalidControllerBaseUrl);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_api_key_under_all_accepted_names() {
        assert_eq!(
            api_key_from_script_src("https://cdn.tgo.chat/tgo-widget.js?api_key=abc123"),
            Some("abc123".to_string())
        );
        assert_eq!(
            api_key_from_script_src("https://cdn.tgo.chat/tgo-widget.js?v=2&apiKey=k1"),
            Some("k1".to_string())
        );
        assert_eq!(
            api_key_from_script_src("/static/tgo-widget.js?platform_api_key=p9#frag"),
            Some("p9".to_string())
        );
    }

    #[test]
    fn missing_or_empty_keys_do_not_auto_init() {
        assert_eq!(
            api_key_from_script_src("https://cdn.tgo.chat/tgo-widget.js"),
            None
        );
        assert_eq!(
            api_key_from_script_src("https://cdn.tgo.chat/tgo-widget.js?api_key="),
            None
        );
        assert_eq!(
            api_key_from_script_src("https://cdn.tgo.chat/tgo-widget.js?other=1"),
            None
        );
    }

    #[test]
    fn canonical_name_wins_over_aliases() {
        assert_eq!(
            api_key_from_script_src("x.js?apiKey=alias&api_key=canonical"),
            Some("canonical".to_string())
        );
    }

    #[test]
    fn controller_url_embeds_the_key() {
        assert_eq!(
            controller_entry_url(DEFAULT_CONTROLLER_ENTRY_URL, "abc123"),
            Ok("https://widget.tgo.chat/controller.html?apiKey=abc123".to_string())
        );
        assert_eq!(
            controller_entry_url("https://widget.tgo.chat/controller.html?env=dev", "k"),
            Ok("https://widget.tgo.chat/controller.html?env=dev&apiKey=k".to_string())
        );
    }

    #[test]
    fn controller_url_rejects_bad_inputs() {
        assert_eq!(
            controller_entry_url("", "abc"),
            Err(WidgetError::InvalidControllerBaseUrl)
        );
        assert_eq!(
            controller_entry_url("ftp://widget.tgo.chat", "abc"),
            Err(WidgetError::InvalidControllerBaseUrl)
        );
        assert_eq!(
            controller_entry_url("https:///controller.html", "abc"),
            Err(WidgetError::InvalidControllerBaseUrl)
        );
        assert_eq!(
            controller_entry_url(DEFAULT_CONTROLLER_ENTRY_URL, "  "),
            Err(WidgetError::EmptyApiKey)
        );
    }

    #[test]
    fn corners_round_trip_their_keywords() {
        for corner in [
            Corner::BottomRight,
            Corner::BottomLeft,
            Corner::TopRight,
            Corner::TopLeft,
        ] {
            assert_eq!(Corner::from_keyword(corner.as_keyword()), Some(corner));
        }
        assert_eq!(Corner::from_keyword("center"), None);
    }
}
