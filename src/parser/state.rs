//! Parser State Machine
//!
//! Classifies each Unicode scalar as text, a control character, or part of
//! an escape sequence, and emits an [`Action`] for every completed unit.
//! The parser handles arbitrary chunk boundaries: a sequence split across
//! `parse` calls completes on the call that delivers its final byte.
//!
//! States:
//! - Normal: text and C0 controls
//! - Escape: after ESC, waiting for the next byte
//! - EscapeIntermediate: ESC followed by intermediate bytes (charset
//!   designations and the like), consumed and ignored
//! - Csi: after ESC [, collecting parameters until a final byte
//! - Osc: after ESC ], swallowing the payload until BEL or ESC
//!
//! Processing is total: unknown or malformed sequences are discarded and
//! the parameter state is always cleared before returning to Normal.

use super::actions::{Action, CsiAction, EscAction, Params};
use super::decoder::Utf8Decoder;

/// Longest OSC payload kept for logging; the rest is discarded
const MAX_OSC_LEN: usize = 1024;

const BEL: char = '\x07';
const ESC: char = '\x1b';
const CAN: char = '\x18';
const SUB: char = '\x1a';
const DEL: char = '\x7f';

/// Parser state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    Escape,
    EscapeIntermediate,
    Csi,
    Osc,
}

/// The terminal parser
#[derive(Debug)]
pub struct Parser {
    state: State,
    decoder: Utf8Decoder,
    /// Completed CSI parameters
    params: Params,
    /// Parameter being built; `None` until a digit arrives
    current_param: Option<u16>,
    /// Whether this is a private sequence (`?`)
    private_marker: bool,
    /// Sequence carries a marker or intermediate we don't support
    ignore: bool,
    /// OSC string payload
    osc_string: String,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Create a new parser in the normal state
    pub fn new() -> Self {
        Self {
            state: State::Normal,
            decoder: Utf8Decoder::new(),
            params: Params::new(),
            current_param: None,
            private_marker: false,
            ignore: false,
            osc_string: String::new(),
        }
    }

    /// Reset the parser to initial state
    pub fn reset(&mut self) {
        self.state = State::Normal;
        self.decoder.reset();
        self.clear_params();
        self.osc_string.clear();
    }

    /// Check whether the parser is between sequences
    pub fn is_normal(&self) -> bool {
        self.state == State::Normal
    }

    /// Clear parameter state
    fn clear_params(&mut self) {
        self.params.clear();
        self.current_param = None;
        self.private_marker = false;
        self.ignore = false;
    }

    /// Process a chunk of bytes, returning actions
    pub fn parse(&mut self, data: &[u8]) -> Vec<Action> {
        let mut actions = Vec::new();
        let mut decoder = std::mem::take(&mut self.decoder);
        decoder.decode(data, |c| {
            if let Some(action) = self.advance(c) {
                actions.push(action);
            }
        });
        self.decoder = decoder;
        actions
    }

    /// Process a single scalar
    pub fn advance(&mut self, c: char) -> Option<Action> {
        // CAN and SUB abort any sequence in progress
        if c == CAN || c == SUB {
            self.state = State::Normal;
            self.clear_params();
            return None;
        }

        match self.state {
            State::Normal => self.process_normal(c),
            State::Escape => self.process_escape(c),
            State::EscapeIntermediate => self.process_escape_intermediate(c),
            State::Csi => self.process_csi(c),
            State::Osc => self.process_osc(c),
        }
    }

    fn enter_escape(&mut self) {
        self.state = State::Escape;
        self.clear_params();
    }

    /// Leave a sequence because a non-ASCII scalar arrived; it is printed
    fn abort_with(&mut self, c: char) -> Option<Action> {
        tracing::trace!(?c, "non-ASCII scalar inside escape sequence");
        self.state = State::Normal;
        self.clear_params();
        Some(Action::Print(c))
    }

    /// Process scalars in normal state
    fn process_normal(&mut self, c: char) -> Option<Action> {
        match c {
            ESC => {
                self.enter_escape();
                None
            }
            DEL => None,
            '\0'..='\x1f' => Some(Action::Control(c as u8)),
            _ => Some(Action::Print(c)),
        }
    }

    /// Process scalars in escape state
    fn process_escape(&mut self, c: char) -> Option<Action> {
        let action = match c {
            ESC => {
                self.enter_escape();
                return None;
            }
            // C0 controls execute without ending the sequence
            '\0'..='\x1f' => return Some(Action::Control(c as u8)),
            DEL => return None,
            '[' => {
                self.state = State::Csi;
                self.clear_params();
                return None;
            }
            ']' => {
                self.state = State::Osc;
                self.osc_string.clear();
                return None;
            }
            ' '..='/' => {
                self.state = State::EscapeIntermediate;
                return None;
            }
            // String terminator after an OSC payload
            '\\' => {
                self.state = State::Normal;
                return None;
            }
            '7' => EscAction::SaveCursor,
            '8' => EscAction::RestoreCursor,
            'D' => EscAction::Index,
            'E' => EscAction::NextLine,
            'H' => EscAction::TabSet,
            'M' => EscAction::ReverseIndex,
            'c' => EscAction::FullReset,
            c if c.is_ascii() => {
                tracing::debug!(?c, "ignoring unsupported ESC sequence");
                self.state = State::Normal;
                return None;
            }
            _ => return self.abort_with(c),
        };
        self.state = State::Normal;
        Some(Action::Esc(action))
    }

    /// Process scalars after ESC and an intermediate byte
    fn process_escape_intermediate(&mut self, c: char) -> Option<Action> {
        match c {
            ESC => {
                self.enter_escape();
                None
            }
            '\0'..='\x1f' => Some(Action::Control(c as u8)),
            ' '..='/' | DEL => None,
            '0'..='~' => {
                tracing::trace!(?c, "ignoring ESC sequence with intermediate");
                self.state = State::Normal;
                None
            }
            _ => self.abort_with(c),
        }
    }

    /// Process scalars in CSI state
    fn process_csi(&mut self, c: char) -> Option<Action> {
        match c {
            '0'..='9' => {
                let digit = u16::from(c as u8 - b'0');
                let value = self.current_param.unwrap_or(0);
                self.current_param = Some(value.saturating_mul(10).saturating_add(digit));
                None
            }
            ';' | ':' => {
                self.params.push(self.current_param.take());
                None
            }
            '?' => {
                self.private_marker = true;
                None
            }
            '<' | '=' | '>' | ' '..='/' => {
                self.ignore = true;
                None
            }
            '@'..='~' => {
                self.state = State::Normal;
                let action = self.dispatch_csi(c);
                self.clear_params();
                action
            }
            ESC => {
                self.enter_escape();
                None
            }
            '\0'..='\x1f' => Some(Action::Control(c as u8)),
            DEL => None,
            _ => self.abort_with(c),
        }
    }

    /// Dispatch a completed CSI sequence
    fn dispatch_csi(&mut self, final_char: char) -> Option<Action> {
        if self.current_param.is_some() || !self.params.is_empty() {
            self.params.push(self.current_param.take());
        }
        if self.ignore {
            tracing::trace!(final_char = ?final_char, "ignoring CSI sequence with marker");
            return None;
        }
        Some(Action::Csi(CsiAction {
            final_char,
            params: std::mem::take(&mut self.params),
            private: self.private_marker,
        }))
    }

    /// Process scalars in an OSC string
    fn process_osc(&mut self, c: char) -> Option<Action> {
        match c {
            BEL => {
                self.state = State::Normal;
                Some(self.terminate_osc())
            }
            ESC => {
                // ESC \ (ST) ends the string; the backslash is consumed as an
                // ignored ESC sequence
                let action = self.terminate_osc();
                self.enter_escape();
                Some(action)
            }
            _ => {
                if self.osc_string.len() < MAX_OSC_LEN {
                    self.osc_string.push(c);
                }
                None
            }
        }
    }

    fn terminate_osc(&mut self) -> Action {
        Action::Osc(std::mem::take(&mut self.osc_string))
    }
}
