use serde::{Deserialize, Serialize};

pub const PRESSED_SCALE: f64 = 0.92;
pub const HOVERED_SCALE: f64 = 1.06;
pub const RESTING_SCALE: f64 = 1.0;
pub const DEFAULT_THEME_COLOR: &str = "#2563eb";
pub const LAUNCHER_FOREGROUND: &str = "#ffffff";

/// Which icon the launcher shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LauncherGlyph {
    Brand,
    Close,
}

/// Visual state of the floating toggle button: two orthogonal pointer
/// dimensions plus the open/closed dimension. Everything derived from it is
/// recomputed on each pointer event, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LauncherVisualState {
    pub hovered: bool,
    pub pressed: bool,
    pub open: bool,
}

impl LauncherVisualState {
    /// Transform scale with priority pressed > hovered > resting.
    pub fn scale(&self) -> f64 {
        if self.pressed {
            PRESSED_SCALE
        } else if self.hovered {
            HOVERED_SCALE
        } else {
            RESTING_SCALE
        }
    }

    /// Window-level release fallback: a press started on the button but
    /// released elsewhere must not leave the button stuck at pressed scale.
    pub fn release(&mut self) {
        self.pressed = false;
    }

    pub fn glyph(&self) -> LauncherGlyph {
        if self.open {
            LauncherGlyph::Close
        } else {
            LauncherGlyph::Brand
        }
    }

    pub fn background(&self, theme_color: &str) -> String {
        if self.open {
            LAUNCHER_FOREGROUND.to_string()
        } else {
            theme_color.to_string()
        }
    }

    pub fn foreground(&self, theme_color: &str) -> String {
        if self.open {
            theme_color.to_string()
        } else {
            LAUNCHER_FOREGROUND.to_string()
        }
    }
}

/// Accepts `#rgb` and `#rrggbb`; anything else keeps the current theme.
pub fn normalize_theme_color(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let hex = trimmed.strip_prefix('#')?;
    if !(hex.len() == 3 || hex.len() == 6) {
        return None;
    }
    if !hex.chars().all(|character| character.is_ascii_hexdigit()) {
        return None;
    }
    Some(trimmed.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressed_wins_over_hovered() {
        let state = LauncherVisualState {
            hovered: true,
            pressed: true,
            open: false,
        };
        assert_eq!(state.scale(), PRESSED_SCALE);
    }

    #[test]
    fn hovered_wins_over_resting() {
        let state = LauncherVisualState {
            hovered: true,
            pressed: false,
            open: true,
        };
        assert_eq!(state.scale(), HOVERED_SCALE);
        assert_eq!(LauncherVisualState::default().scale(), RESTING_SCALE);
    }

    #[test]
    fn release_clears_pressed_but_keeps_hover() {
        let mut state = LauncherVisualState {
            hovered: true,
            pressed: true,
            open: false,
        };
        state.release();
        assert!(!state.pressed);
        assert!(state.hovered);
        assert_eq!(state.scale(), HOVERED_SCALE);
    }

    #[test]
    fn open_state_swaps_glyph_and_colors() {
        let closed = LauncherVisualState::default();
        assert_eq!(closed.glyph(), LauncherGlyph::Brand);
        assert_eq!(closed.background("#10b981"), "#10b981");
        assert_eq!(closed.foreground("#10b981"), LAUNCHER_FOREGROUND);

        let open = LauncherVisualState {
            open: true,
            ..LauncherVisualState::default()
        };
        assert_eq!(open.glyph(), LauncherGlyph::Close);
        assert_eq!(open.background("#10b981"), LAUNCHER_FOREGROUND);
        assert_eq!(open.foreground("#10b981"), "#10b981");
    }

    #[test]
    fn theme_colors_validate_as_hex() {
        assert_eq!(
            normalize_theme_color(" #10B981 "),
            Some("#10b981".to_string())
        );
        assert_eq!(normalize_theme_color("#fff"), Some("#fff".to_string()));
        assert_eq!(normalize_theme_color("red"), None);
        assert_eq!(normalize_theme_color("#12345"), None);
        assert_eq!(normalize_theme_color("#gggggg"), None);
    }
}
