use serde::Serialize;

/// Runtime snapshot exported through `widget_diagnostics_json()` for
/// debugging embeds in the field. Purely observational; nothing reads it
/// back on the hot path.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct WidgetDiagnostics {
    pub(crate) phase: String,
    pub(crate) open: bool,
    pub(crate) queued_calls: usize,
    pub(crate) bridge_sent: u64,
    pub(crate) bridge_received: u64,
    pub(crate) bridge_dropped: u64,
    pub(crate) unknown_inbound: u64,
    pub(crate) last_unknown_type: Option<String>,
    pub(crate) last_error: Option<String>,
}

impl Default for WidgetDiagnostics {
    fn default() -> Self {
        Self {
            phase: "idle".to_string(),
            open: false,
            queued_calls: 0,
            bridge_sent: 0,
            bridge_received: 0,
            bridge_dropped: 0,
            unknown_inbound: 0,
            last_unknown_type: None,
            last_error: None,
        }
    }
}

impl WidgetDiagnostics {
    pub(crate) fn set_phase(&mut self, phase: &str) {
        self.phase = phase.to_string();
        if phase != "error" {
            self.last_error = None;
        }
    }

    pub(crate) fn record_error(&mut self, message: &str) {
        self.phase = "error".to_string();
        self.last_error = Some(message.to_string());
    }

    pub(crate) fn record_sent(&mut self) {
        self.bridge_sent = self.bridge_sent.saturating_add(1);
    }

    pub(crate) fn record_received(&mut self) {
        self.bridge_received = self.bridge_received.saturating_add(1);
    }

    pub(crate) fn record_dropped(&mut self) {
        self.bridge_dropped = self.bridge_dropped.saturating_add(1);
    }

    pub(crate) fn record_unknown(&mut self, message_type: Option<&str>) {
        self.unknown_inbound = self.unknown_inbound.saturating_add(1);
        if let Some(message_type) = message_type {
            self.last_unknown_type = Some(message_type.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_and_clean() {
        let diagnostics = WidgetDiagnostics::default();
        assert_eq!(diagnostics.phase, "idle");
        assert!(!diagnostics.open);
        assert_eq!(diagnostics.bridge_sent, 0);
        assert_eq!(diagnostics.last_error, None);
    }

    #[test]
    fn leaving_the_error_phase_clears_the_error() {
        let mut diagnostics = WidgetDiagnostics::default();
        diagnostics.record_error("mount failed");
        assert_eq!(diagnostics.phase, "error");
        assert_eq!(diagnostics.last_error.as_deref(), Some("mount failed"));

        diagnostics.set_phase("ready");
        assert_eq!(diagnostics.phase, "ready");
        assert_eq!(diagnostics.last_error, None);
    }

    #[test]
    fn unknown_inbound_keeps_the_latest_tag() {
        let mut diagnostics = WidgetDiagnostics::default();
        diagnostics.record_unknown(Some("TGO_FUTURE"));
        diagnostics.record_unknown(None);
        assert_eq!(diagnostics.unknown_inbound, 2);
        assert_eq!(diagnostics.last_unknown_type.as_deref(), Some("TGO_FUTURE"));
    }

    #[test]
    fn serializes_to_flat_json() {
        let diagnostics = WidgetDiagnostics::default();
        let encoded = serde_json::to_string(&diagnostics).unwrap_or_default();
        assert!(encoded.contains("\"phase\":\"idle\""));
        assert!(encoded.contains("\"queued_calls\":0"));
    }
}
