//! Chat overlay geometry and the persisted settings snapshot.

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reference frame width the overlay fractions are expressed against.
pub const REFERENCE_WIDTH: u32 = 1920;
/// Reference frame height the overlay fractions are expressed against.
pub const REFERENCE_HEIGHT: u32 = 1080;

/// Errors from validating or persisting settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("overlay fraction out of range: {field} = {value}")]
    FractionOutOfRange { field: &'static str, value: f64 },

    #[error("font size must be positive")]
    InvalidFontSize,

    #[error("background color must be 8 hex digits (AARRGGBB), got {0:?}")]
    InvalidBackgroundColor(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Chat overlay geometry and style, as fractions of the reference frame.
///
/// Read-only during a batch run: the scheduler's caller takes a snapshot at
/// batch start and every pipeline sees that snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChatOverlaySettings {
    /// Horizontal overlay position (0.0 = left edge, 1.0 = right edge).
    #[serde(default = "default_chat_x")]
    pub chat_x: f64,

    /// Vertical overlay position (0.0 = top edge, 1.0 = bottom edge).
    #[serde(default = "default_chat_y")]
    pub chat_y: f64,

    /// Overlay width as a fraction of the frame width.
    #[serde(default = "default_chat_width")]
    pub chat_width: f64,

    /// Overlay height as a fraction of the frame height.
    #[serde(default = "default_chat_height")]
    pub chat_height: f64,

    /// Chat font size in points.
    #[serde(default = "default_font_size")]
    pub font_size: u32,

    /// Overlay background as 8 hex digits, AARRGGBB.
    #[serde(default = "default_background_color")]
    pub background_color: String,
}

fn default_chat_x() -> f64 {
    0.7611111111111111
}

fn default_chat_y() -> f64 {
    0.38765432098765434
}

fn default_chat_width() -> f64 {
    0.2388888888888889
}

fn default_chat_height() -> f64 {
    0.6123456790123457
}

fn default_font_size() -> u32 {
    24
}

fn default_background_color() -> String {
    "40808080".to_string()
}

impl Default for ChatOverlaySettings {
    fn default() -> Self {
        Self {
            chat_x: default_chat_x(),
            chat_y: default_chat_y(),
            chat_width: default_chat_width(),
            chat_height: default_chat_height(),
            font_size: default_font_size(),
            background_color: default_background_color(),
        }
    }
}

impl ChatOverlaySettings {
    /// Check value ranges: fractions in `[0, 1]`, positive font size,
    /// 8-hex-digit background color.
    pub fn validate(&self) -> Result<(), SettingsError> {
        for (field, value) in [
            ("chat_x", self.chat_x),
            ("chat_y", self.chat_y),
            ("chat_width", self.chat_width),
            ("chat_height", self.chat_height),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SettingsError::FractionOutOfRange { field, value });
            }
        }
        if self.font_size == 0 {
            return Err(SettingsError::InvalidFontSize);
        }
        if self.background_color.len() != 8
            || !self.background_color.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(SettingsError::InvalidBackgroundColor(
                self.background_color.clone(),
            ));
        }
        Ok(())
    }

    /// Convert the fractions to pixel coordinates against the reference
    /// frame. Computed at each call site; nothing is cached across
    /// settings changes.
    pub fn pixel_rect(&self) -> PixelRect {
        PixelRect {
            x: (self.chat_x * REFERENCE_WIDTH as f64) as u32,
            y: (self.chat_y * REFERENCE_HEIGHT as f64) as u32,
            width: (self.chat_width * REFERENCE_WIDTH as f64) as u32,
            height: (self.chat_height * REFERENCE_HEIGHT as f64) as u32,
        }
    }

    /// Background color argument for the chat renderer (`#AARRGGBB`).
    pub fn background_color_arg(&self) -> String {
        format!("#{}", self.background_color)
    }
}

/// Pixel-space overlay rectangle derived from [`ChatOverlaySettings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Persisted configuration snapshot (`settings.json`).
///
/// Missing keys take their defaults, so a file written by an older build
/// still loads.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Settings {
    #[serde(default)]
    pub chat_settings: ChatOverlaySettings,

    /// Item-level worker count for batch runs.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
}

fn default_max_workers() -> usize {
    3
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            chat_settings: ChatOverlaySettings::default(),
            max_workers: default_max_workers(),
        }
    }
}

impl Settings {
    /// Load from disk, falling back to defaults when the file is missing.
    pub fn load_or_default(path: &Path) -> Result<Self, SettingsError> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the snapshot back, pretty-printed.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pixel_rect() {
        let rect = ChatOverlaySettings::default().pixel_rect();
        assert_eq!(rect.x, 1461);
        assert_eq!(rect.y, 418);
        assert_eq!(rect.width, 458);
        assert_eq!(rect.height, 661);
    }

    #[test]
    fn test_pixel_rect_tracks_settings() {
        let mut settings = ChatOverlaySettings::default();
        settings.chat_x = 0.5;
        settings.chat_y = 0.5;
        let rect = settings.pixel_rect();
        assert_eq!(rect.x, 960);
        assert_eq!(rect.y, 540);
    }

    #[test]
    fn test_validate() {
        assert!(ChatOverlaySettings::default().validate().is_ok());

        let mut bad = ChatOverlaySettings::default();
        bad.chat_x = 1.5;
        assert!(matches!(
            bad.validate(),
            Err(SettingsError::FractionOutOfRange { field: "chat_x", .. })
        ));

        let mut bad = ChatOverlaySettings::default();
        bad.font_size = 0;
        assert!(matches!(bad.validate(), Err(SettingsError::InvalidFontSize)));

        let mut bad = ChatOverlaySettings::default();
        bad.background_color = "80gg80".to_string();
        assert!(matches!(
            bad.validate(),
            Err(SettingsError::InvalidBackgroundColor(_))
        ));
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.max_workers, 3);
        assert_eq!(settings.chat_settings.font_size, 24);

        let settings: Settings =
            serde_json::from_str(r#"{"chat_settings":{"font_size":32}}"#).unwrap();
        assert_eq!(settings.chat_settings.font_size, 32);
        assert_eq!(settings.chat_settings.background_color, "40808080");
        assert_eq!(settings.max_workers, 3);
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let missing = Settings::load_or_default(&path).unwrap();
        assert_eq!(missing.max_workers, 3);

        let mut settings = Settings::default();
        settings.max_workers = 5;
        settings.save(&path).unwrap();

        let loaded = Settings::load_or_default(&path).unwrap();
        assert_eq!(loaded.max_workers, 5);
    }

    #[test]
    fn test_background_color_arg() {
        assert_eq!(
            ChatOverlaySettings::default().background_color_arg(),
            "#40808080"
        );
    }
}
