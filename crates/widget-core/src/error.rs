#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WidgetError {
    #[error("api key must not be empty")]
    EmptyApiKey,
    #[error("controller base url must use http:// or https:// and include a host")]
    InvalidControllerBaseUrl,
    #[error("track event must be a non-empty name or an object with activity_type")]
    InvalidTrackEvent,
    #[error("bridge payload could not be encoded: {0}")]
    Encode(String),
    #[error("widget dom mutation failed: {0}")]
    Dom(String),
}
