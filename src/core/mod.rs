//! Terminal Core Module
//!
//! Display-independent terminal state. This module contains:
//! - Cell representation with attributes and symbolic colors
//! - SGR attribute handling
//! - Cursor state and mode flags
//! - Screen model (grid, scroll region, alternate screen, resize)
//! - Scrollback buffer
//! - Render snapshot projection
//!
//! The core is deterministic: given the same sequence of operations, it
//! always produces the same state.

mod cell;
mod cursor;
mod modes;
mod screen;
mod scrollback;
mod sgr;
mod snapshot;

pub use cell::{Attributes, Cell, Color, MAX_COMBINING};
pub use cursor::{Cursor, SavedCursor};
pub use modes::{Modes, MouseEncoding, MouseMode};
pub use screen::{Screen, MIN_COLUMNS, MIN_ROWS};
pub use scrollback::{Line, Scrollback};
pub use sgr::{apply_sgr, parse_extended_color};
pub use snapshot::{CursorInfo, Snapshot, StyledLine, StyledRun};
