//! Terminal escape sequence parser
//!
//! A stateful parser that converts bytes into terminal actions.
//! Based on the VT500-series parser model from <https://vt100.net/emu/dec_ansi_parser>,
//! reduced to the subset a shell-oriented terminal needs.

mod actions;
mod decoder;
mod state;

pub use actions::{Action, CsiAction, EscAction, Params, MAX_PARAMS};
pub use decoder::Utf8Decoder;
pub use state::Parser;
