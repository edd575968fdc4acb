//! Terminal Actions
//!
//! Semantic operations produced by the parser that should be applied to the
//! screen.

use serde::{Deserialize, Serialize};

/// Maximum number of parameters we'll track
pub const MAX_PARAMS: usize = 32;

/// A terminal action produced by the parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Print a character to the screen
    Print(char),

    /// Execute a C0 control character (BEL, BS, HT, LF, VT, FF, CR, ...)
    Control(u8),

    /// Execute a CSI (Control Sequence Introducer) command
    Csi(CsiAction),

    /// Execute an ESC sequence (non-CSI)
    Esc(EscAction),

    /// OSC string, consumed and otherwise ignored
    Osc(String),
}

/// CSI parameters.
///
/// One entry per `;`/`:` separated token; `None` marks an empty token so
/// each command can apply its own default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params(Vec<Option<u16>>);

impl Params {
    /// Create empty params
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Create params from explicit values
    pub fn from_slice(values: &[u16]) -> Self {
        Self(values.iter().map(|&v| Some(v)).collect())
    }

    /// Append a token, dropping it once [`MAX_PARAMS`] are held
    pub fn push(&mut self, value: Option<u16>) {
        if self.0.len() < MAX_PARAMS {
            self.0.push(value);
        }
    }

    /// Get parameter at index, returning None if absent or empty
    pub fn get(&self, index: usize) -> Option<u16> {
        self.0.get(index).copied().flatten()
    }

    /// Get parameter at index with default value for absent or empty tokens
    pub fn get_or(&self, index: usize, default: u16) -> u16 {
        self.get(index).unwrap_or(default)
    }

    /// Count-style parameter: absent, empty and 0 all mean 1
    pub fn count(&self, index: usize) -> usize {
        usize::from(self.get_or(index, 1).max(1))
    }

    /// All tokens, in order
    pub fn as_slice(&self) -> &[Option<u16>] {
        &self.0
    }

    /// Get number of parameters
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Remove all tokens
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// CSI (Control Sequence Introducer) actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsiAction {
    /// The final character that identifies the command
    pub final_char: char,
    /// Parameters
    pub params: Params,
    /// `?` marker: DEC private sequence
    pub private: bool,
}

/// ESC sequence actions (non-CSI)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscAction {
    /// ESC 7 - Save cursor (DECSC)
    SaveCursor,

    /// ESC 8 - Restore cursor (DECRC)
    RestoreCursor,

    /// ESC D - Index (IND) - move cursor down, scroll if at bottom
    Index,

    /// ESC E - Next Line (NEL) - move to beginning of next line
    NextLine,

    /// ESC H - Horizontal Tab Set (HTS)
    TabSet,

    /// ESC M - Reverse Index (RI) - move cursor up, scroll if at top
    ReverseIndex,

    /// ESC c - Full Reset (RIS)
    FullReset,
}
