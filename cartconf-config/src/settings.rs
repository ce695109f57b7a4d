//! In-memory settings consumed by the host.
//!
//! Every field has a compiled-in fallback (see [`crate::defaults`]).
//! Extraction only ever overwrites fields; it never clears them.

use serde::Serialize;

/// Names of the syntax-highlight color fields under `THEME.CODE`, in
/// declaration order.
pub const CODE_COLORS: [&str; 8] = [
    "BG", "FG", "STRING", "NUMBER", "KEYWORD", "API", "COMMENT", "SIGN",
];

/// Effective configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// Maximum GIF recording length in seconds.
    pub gif_length: i32,

    /// Upscale factor for recorded GIFs.
    pub gif_scale: i32,

    pub check_new_version: bool,

    pub no_sound: bool,

    /// CRT post-processing. Only read from scripts when shader support is compiled in.
    pub crt_monitor: bool,

    pub ui_scale: i32,

    pub shader: CrtShader,

    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gif_length: crate::defaults::gif_length(),
            gif_scale: crate::defaults::gif_scale(),
            check_new_version: crate::defaults::bool_false(),
            no_sound: crate::defaults::bool_false(),
            crt_monitor: crate::defaults::bool_false(),
            ui_scale: crate::defaults::ui_scale(),
            shader: CrtShader::default(),
            theme: Theme::default(),
        }
    }
}

/// Optional CRT shader sources. Absent unless a script defines them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrtShader {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pixel: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub cursor: CursorTheme,
    pub code: CodeTheme,
    pub gamepad: GamepadTheme,
}

/// Mouse cursor sprites. An index of `-1` selects the built-in shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CursorTheme {
    pub arrow: i32,
    pub hand: i32,
    pub ibeam: i32,
    pub pixel_perfect: bool,
}

impl Default for CursorTheme {
    fn default() -> Self {
        Self {
            arrow: crate::defaults::cursor_icon(),
            hand: crate::defaults::cursor_icon(),
            ibeam: crate::defaults::cursor_icon(),
            pixel_perfect: crate::defaults::bool_false(),
        }
    }
}

/// Code editor palette indices and rendering flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CodeTheme {
    pub bg: u8,
    pub fg: u8,
    pub string: u8,
    pub number: u8,
    pub keyword: u8,
    pub api: u8,
    pub comment: u8,
    pub sign: u8,

    /// Selection highlight color.
    pub select: u8,
    /// Text cursor color.
    pub cursor: u8,

    pub shadow: bool,
    pub alt_font: bool,
    pub match_delimiters: bool,
}

impl CodeTheme {
    /// Syntax colors paired with their script names, in [`CODE_COLORS`] order.
    pub fn colors_mut(&mut self) -> [(&'static str, &mut u8); 8] {
        [
            (CODE_COLORS[0], &mut self.bg),
            (CODE_COLORS[1], &mut self.fg),
            (CODE_COLORS[2], &mut self.string),
            (CODE_COLORS[3], &mut self.number),
            (CODE_COLORS[4], &mut self.keyword),
            (CODE_COLORS[5], &mut self.api),
            (CODE_COLORS[6], &mut self.comment),
            (CODE_COLORS[7], &mut self.sign),
        ]
    }

    /// Look up a syntax color by its script name (e.g. `"KEYWORD"`).
    pub fn color(&self, name: &str) -> Option<u8> {
        let value = match name {
            "BG" => self.bg,
            "FG" => self.fg,
            "STRING" => self.string,
            "NUMBER" => self.number,
            "KEYWORD" => self.keyword,
            "API" => self.api,
            "COMMENT" => self.comment,
            "SIGN" => self.sign,
            _ => return None,
        };
        Some(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GamepadTheme {
    pub touch: TouchTheme,
}

/// On-screen touch gamepad.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TouchTheme {
    pub alpha: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.ui_scale, 4);
        assert_eq!(settings.theme.cursor.arrow, -1);
        assert_eq!(settings.theme.cursor.hand, -1);
        assert_eq!(settings.theme.cursor.ibeam, -1);
        assert!(!settings.theme.cursor.pixel_perfect);
        assert_eq!(settings.gif_length, 0);
        assert!(settings.shader.vertex.is_none());
        assert!(settings.shader.pixel.is_none());
        assert_eq!(settings.theme.gamepad.touch.alpha, 0);
    }

    #[test]
    fn test_colors_mut_matches_color_lookup() {
        let mut code = CodeTheme::default();
        for (i, (_, value)) in code.colors_mut().into_iter().enumerate() {
            *value = i as u8 + 1;
        }
        for (i, name) in CODE_COLORS.iter().enumerate() {
            assert_eq!(code.color(name), Some(i as u8 + 1));
        }
        assert_eq!(code.color("SELECT"), None);
    }

    #[test]
    fn test_serialize_skips_absent_shaders() {
        let json = serde_json::to_value(Settings::default()).expect("serializes");
        assert_eq!(json["shader"], serde_json::json!({}));
        assert_eq!(json["theme"]["cursor"]["arrow"], -1);
    }
}
