//! Scrollback buffer implementation
//!
//! The scrollback buffer stores rows that have left the top of the visible
//! grid, oldest first. It holds at most `capacity` rows; pushing past that
//! bound evicts the oldest row.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::cell::{Attributes, Cell};

/// A row of cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// The cells in this line
    pub cells: Vec<Cell>,
}

impl Line {
    /// Create a blank line with the given number of columns
    pub fn new(cols: usize) -> Self {
        Self::blank(cols, Attributes::default())
    }

    /// Create a line of blanks carrying `attrs` (erase semantics)
    pub fn blank(cols: usize, attrs: Attributes) -> Self {
        Self {
            cells: vec![Cell::blank(attrs); cols],
        }
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the line has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Pad with default blanks or truncate to `cols`
    pub fn resize(&mut self, cols: usize) {
        self.cells.resize(cols, Cell::default());
    }

    /// Blank every cell with `attrs`
    pub fn fill(&mut self, attrs: Attributes) {
        self.fill_range(0, self.cells.len(), attrs);
    }

    /// Blank cells in `[start, end)` with `attrs`, clamped to the line
    pub fn fill_range(&mut self, start: usize, end: usize, attrs: Attributes) {
        let end = end.min(self.cells.len());
        let start = start.min(end);
        for cell in &mut self.cells[start..end] {
            *cell = Cell::blank(attrs);
        }
    }

    /// Check whether every cell is a space (attributes ignored)
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Cell::is_blank)
    }

    /// Get a cell at the given column
    pub fn get(&self, col: usize) -> Option<&Cell> {
        self.cells.get(col)
    }

    /// Get a mutable cell at the given column
    pub fn get_mut(&mut self, col: usize) -> Option<&mut Cell> {
        self.cells.get_mut(col)
    }

    /// Plain text of the line with trailing spaces removed
    pub fn text(&self) -> String {
        let s: String = self.cells.iter().map(|c| c.content.as_str()).collect();
        s.trim_end_matches(' ').to_string()
    }
}

/// Bounded FIFO of evicted rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scrollback {
    lines: VecDeque<Line>,
    capacity: usize,
}

impl Scrollback {
    /// Create a new scrollback buffer with the given capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            // Don't pre-allocate too much
            lines: VecDeque::with_capacity(capacity.min(1000)),
            capacity,
        }
    }

    /// Get the number of lines in the scrollback
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the scrollback is empty
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the maximum capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Push a line, evicting the oldest once the capacity is exceeded
    pub fn push(&mut self, line: Line) {
        if self.capacity == 0 {
            return;
        }
        while self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    /// Get a line by index (0 = oldest line in scrollback)
    pub fn get(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    /// Get a line by index from the end (0 = most recent line)
    pub fn get_from_end(&self, index: usize) -> Option<&Line> {
        let idx = self.lines.len().checked_sub(index + 1)?;
        self.lines.get(idx)
    }

    /// Clear all lines from the scrollback
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Iterate over all lines from oldest to newest
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Line> + DoubleEndedIterator {
        self.lines.iter()
    }

    /// Pad or truncate every stored line to `cols`
    pub fn resize_columns(&mut self, cols: usize) {
        for line in &mut self.lines {
            line.resize(cols);
        }
    }
}
