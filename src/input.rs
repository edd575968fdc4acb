//! Input Encoding Module
//!
//! Encodes host-side pointer events and pasted text into the byte
//! sequences a terminal program expects on its input.
//!
//! # Mouse Encoding
//!
//! Pointer events are reported only while a tracking mode is active and
//! the program negotiated SGR encoding (DECSET 1006):
//! - Click (1000): button press and release
//! - Drag (1002): press, release and motion with a button held
//!
//! Legacy single-byte encoding is accepted as a mode but never emitted.

use serde::{Deserialize, Serialize};

use crate::core::{MouseEncoding, MouseMode};

/// Mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseButton {
    /// Button number used in the report
    pub fn code(self) -> u16 {
        match self {
            MouseButton::Left => 0,
            MouseButton::Middle => 1,
            MouseButton::Right => 2,
        }
    }
}

/// Mouse event type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseEventKind {
    Press,
    Release,
    /// Motion with the button held
    Drag,
}

/// Motion flag added to the button code of drag reports
const MOTION_BIT: u16 = 32;

const PASTE_START: &str = "\x1b[200~";
const PASTE_END: &str = "\x1b[201~";

/// Encode a mouse event at a 0-based grid position.
///
/// Returns `None` when the current modes say the event must not be
/// reported.
pub fn encode_mouse(
    mode: MouseMode,
    encoding: MouseEncoding,
    button: MouseButton,
    kind: MouseEventKind,
    col: usize,
    row: usize,
) -> Option<Vec<u8>> {
    match mode {
        MouseMode::Off => return None,
        MouseMode::Click if kind == MouseEventKind::Drag => return None,
        MouseMode::Click | MouseMode::Drag => {}
    }
    if encoding != MouseEncoding::Sgr {
        return None;
    }

    let mut code = button.code();
    if kind == MouseEventKind::Drag {
        code += MOTION_BIT;
    }
    let final_char = if kind == MouseEventKind::Release {
        'm'
    } else {
        'M'
    };

    // SGR encoding: CSI < Pb ; Px ; Py M/m
    Some(
        format!(
            "\x1b[<{};{};{}{}",
            code,
            col.saturating_add(1),
            row.saturating_add(1),
            final_char
        )
        .into_bytes(),
    )
}

/// Wrap pasted text in bracketed-paste markers when the mode is enabled
pub fn wrap_paste(text: &str, enabled: bool) -> Vec<u8> {
    if !enabled {
        return text.as_bytes().to_vec();
    }
    let mut out = Vec::with_capacity(text.len() + PASTE_START.len() + PASTE_END.len());
    out.extend_from_slice(PASTE_START.as_bytes());
    out.extend_from_slice(text.as_bytes());
    out.extend_from_slice(PASTE_END.as_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_sgr_encoding() {
        let result = encode_mouse(
            MouseMode::Click,
            MouseEncoding::Sgr,
            MouseButton::Left,
            MouseEventKind::Press,
            5,
            2,
        );
        assert_eq!(result, Some(b"\x1b[<0;6;3M".to_vec()));

        let result = encode_mouse(
            MouseMode::Click,
            MouseEncoding::Sgr,
            MouseButton::Left,
            MouseEventKind::Release,
            5,
            2,
        );
        assert_eq!(result, Some(b"\x1b[<0;6;3m".to_vec()));
    }

    #[test]
    fn test_mouse_buttons() {
        let result = encode_mouse(
            MouseMode::Click,
            MouseEncoding::Sgr,
            MouseButton::Right,
            MouseEventKind::Press,
            0,
            0,
        );
        assert_eq!(result, Some(b"\x1b[<2;1;1M".to_vec()));
    }

    #[test]
    fn test_mouse_mode_filtering() {
        // Tracking off
        let result = encode_mouse(
            MouseMode::Off,
            MouseEncoding::Sgr,
            MouseButton::Left,
            MouseEventKind::Press,
            0,
            0,
        );
        assert_eq!(result, None);

        // Click mode doesn't report motion
        let result = encode_mouse(
            MouseMode::Click,
            MouseEncoding::Sgr,
            MouseButton::Left,
            MouseEventKind::Drag,
            3,
            3,
        );
        assert_eq!(result, None);

        // Drag mode does, with the motion bit
        let result = encode_mouse(
            MouseMode::Drag,
            MouseEncoding::Sgr,
            MouseButton::Left,
            MouseEventKind::Drag,
            3,
            3,
        );
        assert_eq!(result, Some(b"\x1b[<32;4;4M".to_vec()));
    }

    #[test]
    fn test_mouse_legacy_encoding_not_emitted() {
        let result = encode_mouse(
            MouseMode::Drag,
            MouseEncoding::Legacy,
            MouseButton::Left,
            MouseEventKind::Press,
            1,
            1,
        );
        assert_eq!(result, None);
    }

    #[test]
    fn test_wrap_paste() {
        assert_eq!(wrap_paste("ls -la", false), b"ls -la".to_vec());
        assert_eq!(wrap_paste("ls -la", true), b"\x1b[200~ls -la\x1b[201~".to_vec());
    }
}
