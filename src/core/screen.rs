//! Screen model implementation
//!
//! The screen is the visible terminal grid plus the state that shapes how
//! writes land in it: the cursor, the current pen attributes, the scroll
//! region, tab stops and mode flags. Rows that scroll off the top of a
//! full-screen region are pushed into the bounded scrollback.
//!
//! Every operation here clamps instead of failing. After any call, each row
//! holds exactly `cols` cells and the cursor lies inside the grid.

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthChar;

use super::cell::{Attributes, Cell};
use super::cursor::Cursor;
use super::modes::Modes;
use super::scrollback::{Line, Scrollback};

/// Smallest grid width accepted by [`Screen::new`] and [`Screen::resize`]
pub const MIN_COLUMNS: usize = 10;
/// Smallest grid height accepted by [`Screen::new`] and [`Screen::resize`]
pub const MIN_ROWS: usize = 4;

const TAB_WIDTH: usize = 8;

/// Primary screen state parked while the alternate screen is shown
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PrimaryState {
    grid: Vec<Line>,
    scrollback: Scrollback,
    cursor: Cursor,
    attrs: Attributes,
    tab_stops: Vec<bool>,
    scroll_top: usize,
    scroll_bottom: usize,
    origin: bool,
    insert: bool,
    autowrap: bool,
    cols: usize,
    rows: usize,
}

/// The main screen structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Screen {
    /// Number of columns
    cols: usize,
    /// Number of rows
    rows: usize,
    /// Visible rows, top to bottom
    grid: Vec<Line>,
    /// Rows evicted from the top of the grid
    scrollback: Scrollback,
    cursor: Cursor,
    /// Pen used for newly written and erased cells
    pub attrs: Attributes,
    /// Terminal modes
    pub modes: Modes,
    /// Scroll region top (0-indexed, inclusive)
    scroll_top: usize,
    /// Scroll region bottom (0-indexed, inclusive)
    scroll_bottom: usize,
    /// Tab stops (one flag per column)
    tab_stops: Vec<bool>,
    /// Last printed character, for REP
    last_printed: Option<char>,
    /// Saved primary screen while the alternate screen is active
    saved_primary: Option<Box<PrimaryState>>,
}

fn default_tab_stops(cols: usize) -> Vec<bool> {
    (0..cols).map(|i| i > 0 && i % TAB_WIDTH == 0).collect()
}

impl Screen {
    /// Create a new screen. Dimensions below the minimum are raised to it.
    pub fn new(cols: usize, rows: usize, scrollback_capacity: usize) -> Self {
        let cols = cols.max(MIN_COLUMNS);
        let rows = rows.max(MIN_ROWS);
        Self {
            cols,
            rows,
            grid: (0..rows).map(|_| Line::new(cols)).collect(),
            scrollback: Scrollback::new(scrollback_capacity),
            cursor: Cursor::new(),
            attrs: Attributes::default(),
            modes: Modes::default(),
            scroll_top: 0,
            scroll_bottom: rows - 1,
            tab_stops: default_tab_stops(cols),
            last_printed: None,
            saved_primary: None,
        }
    }

    /// Get the number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get the number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Get the cursor
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Show or hide the cursor (DECTCEM)
    pub fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor.hidden = !visible;
    }

    /// Get the scrollback buffer
    pub fn scrollback(&self) -> &Scrollback {
        &self.scrollback
    }

    /// Get scroll region top
    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    /// Get scroll region bottom
    pub fn scroll_bottom(&self) -> usize {
        self.scroll_bottom
    }

    /// Whether the scroll region spans the whole screen
    pub fn is_full_scroll_region(&self) -> bool {
        self.scroll_top == 0 && self.scroll_bottom == self.rows - 1
    }

    /// Whether the alternate screen is showing
    pub fn is_alternate(&self) -> bool {
        self.saved_primary.is_some()
    }

    /// Iterate over the visible rows, top to bottom
    pub fn lines(&self) -> impl ExactSizeIterator<Item = &Line> {
        self.grid.iter()
    }

    /// Get a line at the given row
    pub fn line(&self, row: usize) -> Option<&Line> {
        self.grid.get(row)
    }

    /// Get a cell at the given position
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.grid.get(row).and_then(|line| line.get(col))
    }

    /// Check whether `col` is a tab stop
    pub fn is_tab_stop(&self, col: usize) -> bool {
        self.tab_stops.get(col).copied().unwrap_or(false)
    }

    fn blank_line(&self) -> Line {
        Line::blank(self.cols, self.attrs)
    }

    /// Print a character at the current cursor position
    pub fn print(&mut self, c: char) {
        match c.width() {
            // C1 controls take a cell as the replacement character
            None if c > '\x7f' => {
                self.print(char::REPLACEMENT_CHARACTER);
                return;
            }
            None => return,
            Some(0) => {
                self.push_combining(c);
                return;
            }
            Some(_) => {}
        }

        if self.cursor.pending_wrap {
            self.cursor.pending_wrap = false;
            if self.modes.autowrap {
                self.newline();
            }
        }

        let row = self.cursor.row;
        let col = self.cursor.col;
        let cols = self.cols;
        let cell = Cell::new(c, self.attrs);
        let insert = self.modes.insert;
        let line = &mut self.grid[row];
        if insert {
            line.cells.insert(col, cell);
            line.cells.truncate(cols);
        } else {
            line.cells[col] = cell;
        }
        self.last_printed = Some(c);

        if col + 1 >= cols {
            // Stay on the last column; with autowrap the next print wraps first
            self.cursor.pending_wrap = self.modes.autowrap;
        } else {
            self.cursor.col = col + 1;
        }
    }

    fn push_combining(&mut self, c: char) {
        let row = self.cursor.row;
        let col = if self.cursor.pending_wrap {
            self.cursor.col
        } else if self.cursor.col > 0 {
            self.cursor.col - 1
        } else {
            return;
        };
        if let Some(cell) = self.grid[row].get_mut(col) {
            cell.push_combining(c);
        }
    }

    /// Repeat the last printed character `n` times (REP)
    pub fn repeat_last(&mut self, n: usize) {
        if let Some(c) = self.last_printed {
            for _ in 0..n.min(self.cols * self.rows) {
                self.print(c);
            }
        }
    }

    /// Move down one row, scrolling at the bottom of the scroll region (IND)
    pub fn linefeed(&mut self) {
        self.cursor.pending_wrap = false;
        let row = self.cursor.row;
        let in_region = row >= self.scroll_top && row <= self.scroll_bottom;
        if in_region && row == self.scroll_bottom {
            self.scroll_region_up(1);
        } else if row + 1 < self.rows {
            self.cursor.row = row + 1;
        }
    }

    /// Line feed followed by carriage return (NEL)
    pub fn newline(&mut self) {
        self.linefeed();
        self.cursor.carriage_return();
    }

    /// Handle carriage return (CR)
    pub fn carriage_return(&mut self) {
        self.cursor.carriage_return();
    }

    /// Handle backspace (BS)
    pub fn backspace(&mut self) {
        self.cursor.move_left(1);
    }

    /// Advance to the n-th next tab stop, or the last column (HT/CHT)
    pub fn tab(&mut self, n: usize) {
        self.cursor.pending_wrap = false;
        for _ in 0..n {
            let col = self.cursor.col;
            self.cursor.col = ((col + 1)..self.cols)
                .find(|&i| self.is_tab_stop(i))
                .unwrap_or(self.cols - 1);
        }
    }

    /// Go back to the n-th previous tab stop, or column 0 (CBT)
    pub fn back_tab(&mut self, n: usize) {
        self.cursor.pending_wrap = false;
        for _ in 0..n {
            let col = self.cursor.col;
            self.cursor.col = (0..col).rev().find(|&i| self.is_tab_stop(i)).unwrap_or(0);
        }
    }

    /// Set a tab stop at the current column (HTS)
    pub fn set_tab_stop(&mut self) {
        let col = self.cursor.col;
        self.tab_stops[col] = true;
    }

    /// Clear tab stops (TBC): 0 clears the current column, 3 clears all
    pub fn clear_tab_stop(&mut self, mode: u16) {
        match mode {
            0 => {
                let col = self.cursor.col;
                self.tab_stops[col] = false;
            }
            3 => self.tab_stops.iter_mut().for_each(|t| *t = false),
            _ => tracing::trace!(mode, "ignoring unsupported TBC mode"),
        }
    }

    /// Move up one row, scrolling down at the top of the scroll region (RI)
    pub fn reverse_index(&mut self) {
        self.cursor.pending_wrap = false;
        let row = self.cursor.row;
        if row == self.scroll_top {
            self.scroll_region_down(1);
        } else {
            self.cursor.row = row.saturating_sub(1);
        }
    }

    /// Shift the scroll region up by `n` rows (SU).
    ///
    /// Rows leave through the top of the region and enter scrollback only
    /// when the region covers the whole primary screen.
    pub fn scroll_region_up(&mut self, n: usize) {
        let top = self.scroll_top;
        let bottom = self.scroll_bottom;
        let n = n.clamp(1, bottom - top + 1);
        let track = self.is_full_scroll_region() && !self.is_alternate();
        for _ in 0..n {
            let removed = self.grid.remove(top);
            if track {
                self.scrollback.push(removed);
            }
            let blank = self.blank_line();
            self.grid.insert(bottom, blank);
        }
    }

    /// Shift the scroll region down by `n` rows (SD)
    pub fn scroll_region_down(&mut self, n: usize) {
        let top = self.scroll_top;
        let bottom = self.scroll_bottom;
        let n = n.clamp(1, bottom - top + 1);
        for _ in 0..n {
            self.grid.remove(bottom);
            let blank = self.blank_line();
            self.grid.insert(top, blank);
        }
    }

    /// Set the scroll region from 1-based bounds and home the cursor (DECSTBM)
    pub fn set_scroll_region(&mut self, top: Option<u16>, bottom: Option<u16>) {
        let max_row = self.rows - 1;
        let top = (usize::from(top.unwrap_or(1).max(1)) - 1).min(max_row);
        let bottom = bottom
            .filter(|&b| b > 0)
            .map_or(max_row, |b| usize::from(b) - 1)
            .clamp(top, max_row);
        self.scroll_top = top;
        self.scroll_bottom = bottom;
        let home = if self.modes.origin { top } else { 0 };
        self.cursor.move_to(home, 0, self.rows, self.cols);
    }

    /// Enable or disable origin mode (DECOM); either way the cursor homes
    pub fn set_origin_mode(&mut self, on: bool) {
        self.modes.origin = on;
        let home = if on { self.scroll_top } else { 0 };
        self.cursor.move_to(home, 0, self.rows, self.cols);
    }

    /// Rows the cursor may reach vertically: the region in origin mode
    fn vertical_bounds(&self) -> (usize, usize) {
        if self.modes.origin {
            (self.scroll_top, self.scroll_bottom)
        } else {
            (0, self.rows - 1)
        }
    }

    /// Move cursor to a 0-based position (CUP/HVP), relative to the region
    /// in origin mode
    pub fn move_cursor_to(&mut self, row: usize, col: usize) {
        let row = self.resolve_row(row);
        self.cursor.move_to(row, col, self.rows, self.cols);
    }

    fn resolve_row(&self, row: usize) -> usize {
        if self.modes.origin {
            let height = self.scroll_bottom - self.scroll_top;
            self.scroll_top + row.min(height)
        } else {
            row.min(self.rows - 1)
        }
    }

    /// Move cursor to a 0-based row, keeping the column (VPA)
    pub fn move_cursor_to_row(&mut self, row: usize) {
        let row = self.resolve_row(row);
        let col = self.cursor.col;
        self.cursor.move_to(row, col, self.rows, self.cols);
    }

    /// Move cursor to a 0-based column, keeping the row (CHA)
    pub fn move_cursor_to_col(&mut self, col: usize) {
        let row = self.cursor.row;
        self.cursor.move_to(row, col, self.rows, self.cols);
    }

    /// Move cursor up (CUU)
    pub fn move_cursor_up(&mut self, n: usize) {
        let (top, _) = self.vertical_bounds();
        self.cursor.move_up(n, top);
    }

    /// Move cursor down (CUD)
    pub fn move_cursor_down(&mut self, n: usize) {
        let (_, bottom) = self.vertical_bounds();
        self.cursor.move_down(n, bottom);
    }

    /// Move cursor forward/right (CUF)
    pub fn move_cursor_forward(&mut self, n: usize) {
        self.cursor.move_right(n, self.cols);
    }

    /// Move cursor backward/left (CUB)
    pub fn move_cursor_backward(&mut self, n: usize) {
        self.cursor.move_left(n);
    }

    /// Save cursor position (DECSC)
    pub fn save_cursor(&mut self) {
        self.cursor.save();
    }

    /// Restore cursor position (DECRC)
    pub fn restore_cursor(&mut self) {
        self.cursor.restore(self.rows, self.cols);
    }

    /// Erase in display (ED).
    ///
    /// Modes 2 and 3 also drop the scrollback and home the cursor.
    pub fn erase_in_display(&mut self, mode: u16) {
        self.cursor.pending_wrap = false;
        let row = self.cursor.row;
        let attrs = self.attrs;
        match mode {
            0 => {
                self.erase_in_line(0);
                for line in &mut self.grid[row + 1..] {
                    line.fill(attrs);
                }
            }
            1 => {
                self.erase_in_line(1);
                for line in &mut self.grid[..row] {
                    line.fill(attrs);
                }
            }
            2 | 3 => {
                for line in &mut self.grid {
                    line.fill(attrs);
                }
                self.scrollback.clear();
                self.cursor.move_to(0, 0, self.rows, self.cols);
            }
            _ => tracing::trace!(mode, "ignoring unsupported ED mode"),
        }
    }

    /// Erase in line (EL)
    pub fn erase_in_line(&mut self, mode: u16) {
        self.cursor.pending_wrap = false;
        let row = self.cursor.row;
        let col = self.cursor.col;
        let attrs = self.attrs;
        let line = &mut self.grid[row];
        match mode {
            0 => line.fill_range(col, usize::MAX, attrs),
            1 => line.fill_range(0, col + 1, attrs),
            2 => line.fill(attrs),
            _ => tracing::trace!(mode, "ignoring unsupported EL mode"),
        }
    }

    /// Erase characters (ECH)
    pub fn erase_chars(&mut self, n: usize) {
        let row = self.cursor.row;
        let col = self.cursor.col;
        let attrs = self.attrs;
        self.grid[row].fill_range(col, col.saturating_add(n), attrs);
    }

    /// Insert blank characters at the cursor, shifting the rest right (ICH)
    pub fn insert_chars(&mut self, n: usize) {
        let row = self.cursor.row;
        let col = self.cursor.col;
        let cols = self.cols;
        let n = n.clamp(1, cols - col);
        let blank = Cell::blank(self.attrs);
        let line = &mut self.grid[row];
        for _ in 0..n {
            line.cells.insert(col, blank.clone());
        }
        line.cells.truncate(cols);
    }

    /// Delete characters at the cursor, shifting the rest left (DCH)
    pub fn delete_chars(&mut self, n: usize) {
        let row = self.cursor.row;
        let col = self.cursor.col;
        let cols = self.cols;
        let n = n.clamp(1, cols - col);
        let blank = Cell::blank(self.attrs);
        let line = &mut self.grid[row];
        line.cells.drain(col..col + n);
        line.cells.resize(cols, blank);
    }

    /// Insert blank lines at the cursor inside the scroll region (IL)
    pub fn insert_lines(&mut self, n: usize) {
        let row = self.cursor.row;
        if row < self.scroll_top || row > self.scroll_bottom {
            return;
        }
        let n = n.clamp(1, self.scroll_bottom - row + 1);
        for _ in 0..n {
            self.grid.remove(self.scroll_bottom);
            let blank = self.blank_line();
            self.grid.insert(row, blank);
        }
        self.cursor.carriage_return();
    }

    /// Delete lines at the cursor inside the scroll region (DL)
    pub fn delete_lines(&mut self, n: usize) {
        let row = self.cursor.row;
        if row < self.scroll_top || row > self.scroll_bottom {
            return;
        }
        let n = n.clamp(1, self.scroll_bottom - row + 1);
        for _ in 0..n {
            self.grid.remove(row);
            let blank = self.blank_line();
            self.grid.insert(self.scroll_bottom, blank);
        }
        self.cursor.carriage_return();
    }

    /// Attributes of the cell under the cursor
    pub fn attrs_at_cursor(&self) -> Attributes {
        self.cell(self.cursor.row, self.cursor.col)
            .map_or(self.attrs, |cell| cell.attrs)
    }

    /// Step left and blank the cell there, keeping its attributes
    pub fn backspace_erase(&mut self) {
        if self.cursor.col == 0 {
            return;
        }
        self.backspace();
        let row = self.cursor.row;
        let col = self.cursor.col;
        if let Some(cell) = self.grid[row].get_mut(col) {
            *cell = Cell::blank(cell.attrs);
        }
    }

    /// Switch to the alternate screen (DECSET 1049).
    ///
    /// The primary grid, scrollback, cursor, pen and layout are parked and
    /// a blank grid without scrollback takes their place.
    pub fn enter_alternate_screen(&mut self) {
        if self.is_alternate() {
            return;
        }
        let capacity = self.scrollback.capacity();
        let blank_grid: Vec<Line> = (0..self.rows).map(|_| self.blank_line()).collect();
        let state = PrimaryState {
            grid: std::mem::replace(&mut self.grid, blank_grid),
            scrollback: std::mem::replace(&mut self.scrollback, Scrollback::new(capacity)),
            cursor: self.cursor.clone(),
            attrs: self.attrs,
            tab_stops: std::mem::replace(&mut self.tab_stops, default_tab_stops(self.cols)),
            scroll_top: self.scroll_top,
            scroll_bottom: self.scroll_bottom,
            origin: self.modes.origin,
            insert: self.modes.insert,
            autowrap: self.modes.autowrap,
            cols: self.cols,
            rows: self.rows,
        };
        self.saved_primary = Some(Box::new(state));
        self.modes.alternate_screen = true;

        let hidden = self.cursor.hidden;
        self.cursor.reset();
        self.cursor.hidden = hidden;
        self.scroll_top = 0;
        self.scroll_bottom = self.rows - 1;
        self.last_printed = None;
    }

    /// Switch back to the primary screen, refitting it to the current size
    pub fn exit_alternate_screen(&mut self) {
        let Some(state) = self.saved_primary.take() else {
            return;
        };
        let target_cols = self.cols;
        let target_rows = self.rows;
        let state = *state;

        self.grid = state.grid;
        self.scrollback = state.scrollback;
        self.cursor = state.cursor;
        self.attrs = state.attrs;
        self.tab_stops = state.tab_stops;
        self.scroll_top = state.scroll_top;
        self.scroll_bottom = state.scroll_bottom;
        self.modes.origin = state.origin;
        self.modes.insert = state.insert;
        self.modes.autowrap = state.autowrap;
        self.modes.alternate_screen = false;
        self.cols = state.cols;
        self.rows = state.rows;
        self.last_printed = None;

        let was_full = self.is_full_scroll_region();
        if self.cols != target_cols {
            self.adjust_columns(target_cols);
        }
        if self.rows != target_rows {
            self.adjust_rows(target_rows);
        }
        if was_full {
            self.scroll_top = 0;
            self.scroll_bottom = self.rows - 1;
        }
        self.clamp_scroll_region();
    }

    /// Resize the grid, returning whether anything changed.
    ///
    /// Sizes below the minimum are raised to it. Columns pad or truncate
    /// every row, scrollback included. Shrinking rows pushes the top rows
    /// into scrollback and shifts the cursor (and saved cursor) up with
    /// them.
    pub fn resize(&mut self, cols: usize, rows: usize) -> bool {
        let cols = cols.max(MIN_COLUMNS);
        let rows = rows.max(MIN_ROWS);
        if cols == self.cols && rows == self.rows {
            return false;
        }

        let was_full = self.is_full_scroll_region();
        if cols != self.cols {
            self.adjust_columns(cols);
        }
        if rows != self.rows {
            self.adjust_rows(rows);
        }
        if was_full {
            self.scroll_top = 0;
            self.scroll_bottom = self.rows - 1;
        }
        self.clamp_scroll_region();
        tracing::debug!(cols, rows, "screen resized");
        true
    }

    fn adjust_columns(&mut self, cols: usize) {
        for line in &mut self.grid {
            line.resize(cols);
        }
        self.scrollback.resize_columns(cols);
        self.cols = cols;
        self.tab_stops = default_tab_stops(cols);
        self.cursor.clamp(self.rows, cols);
    }

    fn adjust_rows(&mut self, rows: usize) {
        if rows > self.rows {
            let cols = self.cols;
            self.grid.extend((self.rows..rows).map(|_| Line::new(cols)));
        } else {
            let trim = self.rows - rows;
            let track = !self.is_alternate();
            for line in self.grid.drain(..trim) {
                if track {
                    self.scrollback.push(line);
                }
            }
            self.cursor.shift_up(trim);
        }
        self.rows = rows;
        self.cursor.clamp(rows, self.cols);
    }

    fn clamp_scroll_region(&mut self) {
        let max_row = self.rows - 1;
        self.scroll_top = self.scroll_top.min(max_row);
        self.scroll_bottom = self.scroll_bottom.clamp(self.scroll_top, max_row);
        let (top, bottom) = self.vertical_bounds();
        self.cursor.row = self.cursor.row.clamp(top, bottom);
        self.cursor.pending_wrap = false;
    }

    /// Reset the screen to its initial state, keeping the current size
    pub fn reset(&mut self) {
        let capacity = self.scrollback.capacity();
        *self = Self::new(self.cols, self.rows, capacity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cell::Color;

    fn print_str(screen: &mut Screen, s: &str) {
        for c in s.chars() {
            screen.print(c);
        }
    }

    fn row_text(screen: &Screen, row: usize) -> String {
        screen.line(row).unwrap().text()
    }

    #[test]
    fn test_screen_new() {
        let screen = Screen::new(80, 24, 1000);
        assert_eq!(screen.cols(), 80);
        assert_eq!(screen.rows(), 24);
        assert_eq!(screen.cursor().col, 0);
        assert_eq!(screen.cursor().row, 0);
        assert!(screen.is_full_scroll_region());
    }

    #[test]
    fn test_screen_minimum_size() {
        let screen = Screen::new(2, 1, 10);
        assert_eq!(screen.cols(), MIN_COLUMNS);
        assert_eq!(screen.rows(), MIN_ROWS);
    }

    #[test]
    fn test_print_char() {
        let mut screen = Screen::new(80, 24, 1000);
        screen.print('H');
        screen.print('i');

        assert_eq!(screen.cell(0, 0).unwrap().display_char(), 'H');
        assert_eq!(screen.cell(0, 1).unwrap().display_char(), 'i');
        assert_eq!(screen.cursor().col, 2);
    }

    #[test]
    fn test_autowrap_is_deferred() {
        let mut screen = Screen::new(10, 4, 100);
        print_str(&mut screen, "0123456789");
        assert_eq!(screen.cursor().row, 0);
        assert_eq!(screen.cursor().col, 9);
        assert!(screen.cursor().pending_wrap);

        screen.print('X');
        assert_eq!(row_text(&screen, 0), "0123456789");
        assert_eq!(row_text(&screen, 1), "X");
        assert_eq!((screen.cursor().row, screen.cursor().col), (1, 1));
    }

    #[test]
    fn test_no_autowrap_overwrites_last_column() {
        let mut screen = Screen::new(10, 4, 100);
        screen.modes.autowrap = false;
        print_str(&mut screen, "0123456789AB");
        assert_eq!(row_text(&screen, 0), "012345678B");
        assert_eq!(screen.cursor().row, 0);
    }

    #[test]
    fn test_combining_mark_joins_previous_cell() {
        let mut screen = Screen::new(10, 4, 100);
        print_str(&mut screen, "e\u{301}x");
        assert_eq!(screen.cell(0, 0).unwrap().content, "e\u{301}");
        assert_eq!(screen.cell(0, 1).unwrap().content, "x");
    }

    #[test]
    fn test_linefeed_and_scroll() {
        let mut screen = Screen::new(10, 4, 100);
        for i in 0..6 {
            if i > 0 {
                screen.newline();
            }
            print_str(&mut screen, &format!("line{i}"));
        }
        assert_eq!(screen.scrollback().len(), 2);
        assert_eq!(screen.scrollback().get(0).unwrap().text(), "line0");
        assert_eq!(screen.scrollback().get(1).unwrap().text(), "line1");
        assert_eq!(row_text(&screen, 0), "line2");
        assert_eq!(row_text(&screen, 3), "line5");
    }

    #[test]
    fn test_erase_in_display() {
        let mut screen = Screen::new(10, 4, 100);
        for row in 0..4 {
            screen.move_cursor_to(row, 0);
            print_str(&mut screen, "abcdef");
        }
        screen.move_cursor_to(1, 2);
        screen.erase_in_display(0);
        assert_eq!(row_text(&screen, 0), "abcdef");
        assert_eq!(row_text(&screen, 1), "ab");
        assert_eq!(row_text(&screen, 2), "");

        screen.move_cursor_to(0, 3);
        screen.erase_in_display(1);
        assert_eq!(row_text(&screen, 0), "    ef");
    }

    #[test]
    fn test_erase_display_all_clears_scrollback_and_homes() {
        let mut screen = Screen::new(10, 4, 100);
        for _ in 0..8 {
            print_str(&mut screen, "x");
            screen.newline();
        }
        assert!(!screen.scrollback().is_empty());
        screen.erase_in_display(2);
        assert!(screen.scrollback().is_empty());
        assert_eq!((screen.cursor().row, screen.cursor().col), (0, 0));
        assert!(screen.lines().all(Line::is_blank));
    }

    #[test]
    fn test_erase_uses_current_background() {
        let mut screen = Screen::new(10, 4, 100);
        screen.attrs.bg = Color::Indexed(4);
        screen.erase_in_line(2);
        assert_eq!(screen.cell(0, 5).unwrap().attrs.bg, Color::Indexed(4));
        assert!(screen.cell(0, 5).unwrap().is_blank());
    }

    #[test]
    fn test_erase_in_line() {
        let mut screen = Screen::new(10, 4, 100);
        print_str(&mut screen, "0123456789");
        screen.move_cursor_to(0, 4);
        screen.erase_in_line(0);
        assert_eq!(row_text(&screen, 0), "0123");

        print_str(&mut screen, "456");
        screen.move_cursor_to(0, 1);
        screen.erase_in_line(1);
        assert_eq!(row_text(&screen, 0), "  23456");
    }

    #[test]
    fn test_scroll_region() {
        let mut screen = Screen::new(10, 6, 100);
        for row in 0..6 {
            screen.move_cursor_to(row, 0);
            print_str(&mut screen, &format!("r{row}"));
        }
        screen.set_scroll_region(Some(2), Some(4));
        assert_eq!((screen.scroll_top(), screen.scroll_bottom()), (1, 3));
        assert_eq!(screen.cursor().row, 0);

        screen.move_cursor_to(3, 0);
        screen.linefeed();
        assert_eq!(row_text(&screen, 0), "r0");
        assert_eq!(row_text(&screen, 1), "r2");
        assert_eq!(row_text(&screen, 2), "r3");
        assert_eq!(row_text(&screen, 3), "");
        assert_eq!(row_text(&screen, 4), "r4");
        // Partial regions never feed scrollback
        assert!(screen.scrollback().is_empty());
    }

    #[test]
    fn test_scroll_region_invalid_bounds() {
        let mut screen = Screen::new(10, 6, 100);
        screen.set_scroll_region(Some(5), Some(2));
        assert_eq!((screen.scroll_top(), screen.scroll_bottom()), (4, 4));
        screen.set_scroll_region(None, None);
        assert!(screen.is_full_scroll_region());
    }

    #[test]
    fn test_origin_mode() {
        let mut screen = Screen::new(10, 8, 100);
        screen.set_scroll_region(Some(3), Some(6));
        screen.set_origin_mode(true);
        assert_eq!(screen.cursor().row, 2);
        screen.move_cursor_to(10, 0);
        assert_eq!(screen.cursor().row, 5);
        screen.move_cursor_up(10);
        assert_eq!(screen.cursor().row, 2);
    }

    #[test]
    fn test_reverse_index_at_top() {
        let mut screen = Screen::new(10, 4, 100);
        print_str(&mut screen, "top");
        screen.reverse_index();
        assert_eq!(row_text(&screen, 0), "");
        assert_eq!(row_text(&screen, 1), "top");
    }

    #[test]
    fn test_insert_delete_lines() {
        let mut screen = Screen::new(10, 4, 100);
        for row in 0..4 {
            screen.move_cursor_to(row, 0);
            print_str(&mut screen, &format!("r{row}"));
        }
        screen.move_cursor_to(1, 3);
        screen.insert_lines(2);
        assert_eq!(row_text(&screen, 0), "r0");
        assert_eq!(row_text(&screen, 1), "");
        assert_eq!(row_text(&screen, 3), "r1");
        assert_eq!(screen.cursor().col, 0);

        screen.delete_lines(2);
        assert_eq!(row_text(&screen, 1), "r1");
        assert_eq!(row_text(&screen, 3), "");
        assert_eq!(screen.lines().len(), 4);
    }

    #[test]
    fn test_insert_delete_chars() {
        let mut screen = Screen::new(10, 4, 100);
        print_str(&mut screen, "abcdefghij");
        screen.move_cursor_to(0, 2);
        screen.insert_chars(3);
        assert_eq!(row_text(&screen, 0), "ab   cdefg");
        assert_eq!(screen.line(0).unwrap().len(), 10);

        screen.delete_chars(4);
        assert_eq!(row_text(&screen, 0), "abdefg");
        assert_eq!(screen.line(0).unwrap().len(), 10);

        screen.move_cursor_to(0, 8);
        screen.delete_chars(100);
        assert_eq!(screen.line(0).unwrap().len(), 10);
    }

    #[test]
    fn test_insert_mode_print() {
        let mut screen = Screen::new(10, 4, 100);
        print_str(&mut screen, "world");
        screen.move_cursor_to(0, 0);
        screen.modes.insert = true;
        print_str(&mut screen, "hi ");
        assert_eq!(row_text(&screen, 0), "hi world");
        assert_eq!(screen.line(0).unwrap().len(), 10);
    }

    #[test]
    fn test_erase_chars() {
        let mut screen = Screen::new(10, 4, 100);
        print_str(&mut screen, "abcdefghij");
        screen.move_cursor_to(0, 7);
        screen.erase_chars(50);
        assert_eq!(row_text(&screen, 0), "abcdefg");
    }

    #[test]
    fn test_tab_stops() {
        let mut screen = Screen::new(30, 4, 100);
        screen.tab(1);
        assert_eq!(screen.cursor().col, 8);
        screen.tab(2);
        assert_eq!(screen.cursor().col, 24);
        screen.tab(1);
        assert_eq!(screen.cursor().col, 29);

        screen.back_tab(1);
        assert_eq!(screen.cursor().col, 24);

        screen.move_cursor_to_col(3);
        screen.set_tab_stop();
        screen.move_cursor_to_col(0);
        screen.tab(1);
        assert_eq!(screen.cursor().col, 3);

        screen.clear_tab_stop(3);
        screen.move_cursor_to_col(0);
        screen.tab(1);
        assert_eq!(screen.cursor().col, 29);
    }

    #[test]
    fn test_c1_scalar_prints_replacement() {
        let mut screen = Screen::new(10, 2, 0);
        screen.print('a');
        screen.print('\u{85}');
        screen.print('\x07');
        screen.print('b');
        assert_eq!(row_text(&screen, 0), "a\u{fffd}b");
        assert_eq!(screen.cursor().col, 3);
    }

    #[test]
    fn test_repeat_last() {
        let mut screen = Screen::new(10, 4, 100);
        screen.print('=');
        screen.repeat_last(4);
        assert_eq!(row_text(&screen, 0), "=====");
    }

    #[test]
    fn test_alternate_screen() {
        let mut screen = Screen::new(10, 4, 100);
        print_str(&mut screen, "primary");
        screen.attrs.bold = true;

        screen.enter_alternate_screen();
        assert!(screen.is_alternate());
        assert!(screen.modes.alternate_screen);
        assert_eq!(row_text(&screen, 0), "");
        assert_eq!(screen.cursor().col, 0);
        print_str(&mut screen, "alt");
        for _ in 0..6 {
            screen.newline();
        }
        assert!(screen.scrollback().is_empty());

        screen.exit_alternate_screen();
        assert!(!screen.is_alternate());
        assert_eq!(row_text(&screen, 0), "primary");
        assert_eq!(screen.cursor().col, 7);
        assert!(screen.attrs.bold);
    }

    #[test]
    fn test_alternate_screen_exit_refits_size() {
        let mut screen = Screen::new(20, 6, 100);
        screen.move_cursor_to(5, 15);
        screen.enter_alternate_screen();
        screen.resize(12, 4);
        screen.exit_alternate_screen();
        assert_eq!(screen.cols(), 12);
        assert_eq!(screen.rows(), 4);
        assert!(screen.lines().all(|l| l.len() == 12));
        assert_eq!(screen.lines().len(), 4);
        assert_eq!((screen.cursor().row, screen.cursor().col), (3, 11));
        assert!(screen.is_full_scroll_region());
    }

    #[test]
    fn test_resize() {
        let mut screen = Screen::new(80, 24, 100);
        assert!(screen.resize(100, 30));
        assert_eq!(screen.cols(), 100);
        assert_eq!(screen.rows(), 30);
        assert!(screen.lines().all(|l| l.len() == 100));
        assert!(!screen.resize(100, 30));
        assert!(screen.is_full_scroll_region());
    }

    #[test]
    fn test_resize_clamps_to_minimum() {
        let mut screen = Screen::new(10, 4, 100);
        assert!(!screen.resize(3, 1));
        assert_eq!((screen.cols(), screen.rows()), (10, 4));
    }

    #[test]
    fn test_resize_shrink_rows_feeds_scrollback() {
        let mut screen = Screen::new(10, 24, 100);
        for row in 0..24 {
            screen.move_cursor_to(row, 0);
            print_str(&mut screen, &format!("{row}"));
        }
        screen.move_cursor_to(20, 3);
        screen.save_cursor();

        assert!(screen.resize(10, 10));
        assert_eq!(screen.cursor().row, 6);
        assert_eq!(screen.cursor().saved.unwrap().row, 6);
        assert_eq!(screen.scrollback().len(), 14);
        assert_eq!(screen.scrollback().get(0).unwrap().text(), "0");
        assert_eq!(screen.scrollback().get(13).unwrap().text(), "13");
        assert_eq!(row_text(&screen, 0), "14");
    }

    #[test]
    fn test_resize_columns_touches_scrollback() {
        let mut screen = Screen::new(20, 4, 100);
        for _ in 0..6 {
            print_str(&mut screen, "abcdefghijklmnop");
            screen.newline();
        }
        screen.move_cursor_to(0, 19);
        assert!(screen.resize(12, 4));
        assert!(screen.scrollback().iter().all(|l| l.len() == 12));
        assert_eq!(screen.scrollback().get(0).unwrap().text(), "abcdefghijkl");
        assert_eq!(screen.cursor().col, 11);
    }

    #[test]
    fn test_resize_keeps_partial_region_in_bounds() {
        let mut screen = Screen::new(10, 20, 100);
        screen.set_scroll_region(Some(5), Some(18));
        assert!(screen.resize(10, 8));
        assert_eq!(screen.scroll_top(), 4);
        assert_eq!(screen.scroll_bottom(), 7);
    }

    #[test]
    fn test_save_restore_cursor() {
        let mut screen = Screen::new(80, 24, 100);
        screen.move_cursor_to(5, 10);
        screen.save_cursor();
        screen.move_cursor_to(0, 0);
        screen.restore_cursor();
        assert_eq!((screen.cursor().row, screen.cursor().col), (5, 10));
    }

    #[test]
    fn test_backspace_erase_keeps_attrs() {
        let mut screen = Screen::new(10, 4, 100);
        screen.attrs.fg = Color::Indexed(1);
        print_str(&mut screen, "ab");
        screen.backspace_erase();
        assert_eq!(screen.cursor().col, 1);
        assert!(screen.cell(0, 1).unwrap().is_blank());
        assert_eq!(screen.cell(0, 1).unwrap().attrs.fg, Color::Indexed(1));
    }

    #[test]
    fn test_reset() {
        let mut screen = Screen::new(10, 4, 100);
        print_str(&mut screen, "text");
        screen.attrs.bold = true;
        screen.modes.bracketed_paste = true;
        screen.set_cursor_visible(false);
        screen.reset();
        assert!(screen.lines().all(Line::is_blank));
        assert!(screen.attrs.is_default());
        assert!(!screen.modes.bracketed_paste);
        assert!(!screen.cursor().hidden);
        assert_eq!(screen.scrollback().capacity(), 100);
    }
}
