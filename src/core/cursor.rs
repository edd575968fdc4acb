//! Cursor state management
//!
//! The cursor tracks position, visibility and the pending-wrap flag. Save
//! and restore (DECSC/DECRC and CSI s/u) use a single slot: a new save
//! overwrites the previous one, as on xterm.

use serde::{Deserialize, Serialize};

/// Saved cursor position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCursor {
    pub row: usize,
    pub col: usize,
}

/// Cursor state including position, visibility, and saved position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Row position (0-indexed)
    pub row: usize,
    /// Column position (0-indexed)
    pub col: usize,
    /// Hidden via DECTCEM (`CSI ? 25 l`)
    pub hidden: bool,
    /// Pending wrap - cursor is at the right margin, next char will wrap
    pub pending_wrap: bool,
    /// Single-slot saved position
    pub saved: Option<SavedCursor>,
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

impl Cursor {
    /// Create a new cursor at the home position
    pub fn new() -> Self {
        Self {
            row: 0,
            col: 0,
            hidden: false,
            pending_wrap: false,
            saved: None,
        }
    }

    /// Move cursor to absolute position, clamping to bounds
    pub fn move_to(&mut self, row: usize, col: usize, rows: usize, cols: usize) {
        self.row = row.min(rows.saturating_sub(1));
        self.col = col.min(cols.saturating_sub(1));
        self.pending_wrap = false;
    }

    /// Move cursor up by n rows, stopping at `min_row`
    pub fn move_up(&mut self, n: usize, min_row: usize) {
        self.row = self.row.saturating_sub(n).max(min_row.min(self.row));
        self.pending_wrap = false;
    }

    /// Move cursor down by n rows, stopping at `max_row`
    pub fn move_down(&mut self, n: usize, max_row: usize) {
        self.row = self.row.saturating_add(n).min(max_row.max(self.row));
        self.pending_wrap = false;
    }

    /// Move cursor left by n columns, stopping at column 0
    pub fn move_left(&mut self, n: usize) {
        self.col = self.col.saturating_sub(n);
        self.pending_wrap = false;
    }

    /// Move cursor right by n columns, stopping at the last column
    pub fn move_right(&mut self, n: usize, cols: usize) {
        self.col = self.col.saturating_add(n).min(cols.saturating_sub(1));
        self.pending_wrap = false;
    }

    /// Carriage return - move to column 0
    pub fn carriage_return(&mut self) {
        self.col = 0;
        self.pending_wrap = false;
    }

    /// Save the current position, replacing any earlier save
    pub fn save(&mut self) {
        self.saved = Some(SavedCursor {
            row: self.row,
            col: self.col,
        });
    }

    /// Restore the saved position, if any. Without a save this is a no-op.
    pub fn restore(&mut self, rows: usize, cols: usize) {
        if let Some(saved) = self.saved {
            self.move_to(saved.row, saved.col, rows, cols);
        }
    }

    /// Re-clamp position and saved position into a `rows` x `cols` grid
    pub fn clamp(&mut self, rows: usize, cols: usize) {
        self.row = self.row.min(rows.saturating_sub(1));
        self.col = self.col.min(cols.saturating_sub(1));
        if let Some(saved) = self.saved.as_mut() {
            saved.row = saved.row.min(rows.saturating_sub(1));
            saved.col = saved.col.min(cols.saturating_sub(1));
        }
        self.pending_wrap = false;
    }

    /// Shift the cursor and saved cursor up after `n` rows left the top
    pub fn shift_up(&mut self, n: usize) {
        self.row = self.row.saturating_sub(n);
        if let Some(saved) = self.saved.as_mut() {
            saved.row = saved.row.saturating_sub(n);
        }
    }

    /// Reset cursor to default state
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
