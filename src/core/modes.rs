//! Terminal mode flags
//!
//! Manages the DEC private and ANSI modes the emulator understands.

use serde::{Deserialize, Serialize};

/// Mouse tracking mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MouseMode {
    /// No mouse reporting
    #[default]
    Off,
    /// Normal tracking (DECSET 1000) - report button press and release
    Click,
    /// Button-event tracking (DECSET 1002) - press, release and drag motion
    Drag,
}

/// Mouse encoding format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MouseEncoding {
    /// Single-byte X10 style encoding. Accepted but never emitted.
    #[default]
    Legacy,
    /// SGR encoding (DECSET 1006): `CSI < b ; x ; y M/m`
    Sgr,
}

/// Terminal mode flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modes {
    /// DECAWM - Auto wrap mode
    /// When enabled, characters written past the right margin wrap to the next line
    pub autowrap: bool,

    /// DECOM - Origin mode
    /// When enabled, cursor positions are relative to the scroll region
    pub origin: bool,

    /// IRM - Insert/Replace mode
    /// When enabled, characters are inserted rather than overwriting
    pub insert: bool,

    /// DECCKM - Cursor key mode
    /// When enabled, cursor keys send application sequences (ESC O ...)
    pub cursor_keys_application: bool,

    /// Bracketed paste mode (DECSET 2004)
    pub bracketed_paste: bool,

    /// Mouse tracking mode
    pub mouse_mode: MouseMode,

    /// Mouse encoding format
    pub mouse_encoding: MouseEncoding,

    /// Alternate screen buffer active (DECSET 1049)
    pub alternate_screen: bool,
}

impl Default for Modes {
    fn default() -> Self {
        Self {
            autowrap: true,
            origin: false,
            insert: false,
            cursor_keys_application: false,
            bracketed_paste: false,
            mouse_mode: MouseMode::Off,
            mouse_encoding: MouseEncoding::Legacy,
            alternate_screen: false,
        }
    }
}

impl Modes {
    /// Reset all modes to defaults
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Current mouse mode and encoding as one value, for change detection
    pub fn mouse_state(&self) -> (MouseMode, MouseEncoding) {
        (self.mouse_mode, self.mouse_encoding)
    }

    /// Whether pointer events should be reported to the application
    pub fn mouse_reporting(&self) -> bool {
        self.mouse_mode != MouseMode::Off
    }
}
