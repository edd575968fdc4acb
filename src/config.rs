//! Terminal configuration
//!
//! Geometry, scrollback capacity and the palette used to turn symbolic
//! colors into RGB at the render boundary. Loaded from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Color, MIN_COLUMNS, MIN_ROWS};
use crate::error::{Error, Result};

/// Terminal configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Grid width in columns
    pub columns: usize,
    /// Grid height in rows
    pub rows: usize,
    /// Maximum scrollback lines
    pub scrollback_lines: usize,
    /// Color palette
    pub palette: Palette,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            columns: 80,
            rows: 24,
            scrollback_lines: 500,
            palette: Palette::default(),
        }
    }
}

impl TerminalConfig {
    /// Parse configuration from a JSON string. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: TerminalConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values that cannot describe a grid at all
    pub fn validate(&self) -> Result<()> {
        if self.columns == 0 || self.rows == 0 {
            return Err(Error::InvalidConfig(format!(
                "grid size must be non-zero, got {}x{}",
                self.columns, self.rows
            )));
        }
        Ok(())
    }

    /// Copy with the geometry raised to the minimum grid size
    pub fn normalized(&self) -> Self {
        Self {
            columns: self.columns.max(MIN_COLUMNS),
            rows: self.rows.max(MIN_ROWS),
            ..self.clone()
        }
    }
}

/// Color palette used to resolve [`Color`] values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Default foreground color
    pub foreground: (u8, u8, u8),
    /// Default background color
    pub background: (u8, u8, u8),
    /// The 16 ANSI colors (0-15)
    pub ansi: [(u8, u8, u8); 16],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            foreground: (229, 229, 229),
            background: (0, 0, 0),
            // xterm defaults
            ansi: [
                (0, 0, 0),       // 0: Black
                (205, 0, 0),     // 1: Red
                (0, 205, 0),     // 2: Green
                (205, 205, 0),   // 3: Yellow
                (0, 0, 238),     // 4: Blue
                (205, 0, 205),   // 5: Magenta
                (0, 205, 205),   // 6: Cyan
                (229, 229, 229), // 7: White
                (127, 127, 127), // 8: Bright Black
                (255, 0, 0),     // 9: Bright Red
                (0, 255, 0),     // 10: Bright Green
                (255, 255, 0),   // 11: Bright Yellow
                (92, 92, 255),   // 12: Bright Blue
                (255, 0, 255),   // 13: Bright Magenta
                (0, 255, 255),   // 14: Bright Cyan
                (255, 255, 255), // 15: Bright White
            ],
        }
    }
}

impl Palette {
    /// RGB for an entry of the 256-color table
    pub fn get_indexed(&self, index: u8) -> (u8, u8, u8) {
        match index {
            0..=15 => self.ansi[index as usize],
            // 6x6x6 color cube
            16..=231 => {
                let n = index - 16;
                let to_component = |c: u8| if c == 0 { 0 } else { 55 + c * 40 };
                (to_component(n / 36), to_component((n / 6) % 6), to_component(n % 6))
            }
            // Grayscale ramp
            232..=255 => {
                let gray = 8 + (index - 232) * 10;
                (gray, gray, gray)
            }
        }
    }

    /// Convert a Color to RGB
    pub fn color_to_rgb(&self, color: Color, is_foreground: bool) -> (u8, u8, u8) {
        match color {
            Color::DefaultForeground | Color::DefaultBackground => {
                if is_foreground {
                    self.foreground
                } else {
                    self.background
                }
            }
            Color::Indexed(i) | Color::Extended(i) => self.get_indexed(i),
            Color::Rgb(r, g, b) => (r, g, b),
        }
    }
}
