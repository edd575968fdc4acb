//! PocketTerm Terminal Core
//!
//! The terminal emulation engine behind a mobile terminal front end, built
//! without any terminal emulation libraries. This crate provides:
//!
//! - `core`: Screen model, cells, cursor, scrollback buffer, snapshots
//! - `parser`: UTF-8 decoding and the VT/xterm escape sequence parser
//! - `terminal`: The engine applying parsed actions and queuing replies
//! - `shared`: A mutex-serialized handle with owner callbacks
//! - `input`: Mouse report and bracketed paste encoding
//! - `config`: Geometry, scrollback and palette configuration
//!
//! Rendering and the PTY transport live outside this crate; they exchange
//! bytes, snapshots and callbacks with it.

pub mod config;
pub mod core;
pub mod error;
pub mod input;
pub mod parser;
pub mod shared;
pub mod terminal;

pub use config::{Palette, TerminalConfig};
pub use error::{Error, Result};
pub use shared::{Callbacks, SharedTerminal};
pub use terminal::{Terminal, TerminalEvent};
