//! Render snapshots
//!
//! A snapshot is an immutable, line-oriented projection of the screen for a
//! display layer: each line is a list of styled runs, where a run is a
//! maximal span of consecutive cells sharing the same [`Attributes`].
//! Given the same screen state, capture always produces the same snapshot.

use serde::{Deserialize, Serialize};

use super::cell::{Attributes, Cell};
use super::screen::Screen;
use super::scrollback::Line;
use crate::config::Palette;
use crate::error::Result;

/// A span of text drawn with one set of attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledRun {
    pub text: String,
    pub attrs: Attributes,
}

impl StyledRun {
    /// Foreground and background RGB for this run.
    ///
    /// Inverse video is applied here by swapping the resolved pair.
    pub fn colors(&self, palette: &Palette) -> ((u8, u8, u8), (u8, u8, u8)) {
        let (fg, bg) = self.attrs.display_colors();
        // Resolve by the role each color was written for
        let fg_is_fg = !self.attrs.inverse;
        (
            palette.color_to_rgb(fg, fg_is_fg),
            palette.color_to_rgb(bg, !fg_is_fg),
        )
    }
}

/// One rendered row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledLine {
    pub runs: Vec<StyledRun>,
}

impl StyledLine {
    /// Plain text of the line
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// Length of the line in chars
    pub fn char_len(&self) -> usize {
        self.runs.iter().map(|run| run.text.chars().count()).sum()
    }

    /// Check whether the line renders as nothing
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// Cursor location inside a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorInfo {
    /// Row index into [`Snapshot::lines`]
    pub row: usize,
    /// Grid column
    pub column: usize,
    /// Char offset into [`Snapshot::text`]
    pub offset: usize,
}

/// Immutable projection of the screen for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Rendered lines, scrollback first when it was requested
    pub lines: Vec<StyledLine>,
    /// Cursor, or `None` while it is hidden
    pub cursor: Option<CursorInfo>,
    /// Grid width at capture time
    pub columns: usize,
    /// Grid height at capture time
    pub rows: usize,
}

impl Snapshot {
    /// Capture the screen, optionally prefixed by its scrollback
    pub fn capture(screen: &Screen, include_scrollback: bool) -> Self {
        let scrollback: Vec<&Line> = if include_scrollback {
            screen.scrollback().iter().collect()
        } else {
            Vec::new()
        };
        let cursor_row = scrollback.len() + screen.cursor().row;
        let cursor_col = screen.cursor().col;
        let show_cursor = !screen.cursor().hidden;

        let mut lines = Vec::with_capacity(scrollback.len() + screen.rows());
        // Rendered cell count of the cursor's row
        let mut cursor_cells = 0;
        for (index, line) in scrollback.into_iter().chain(screen.lines()).enumerate() {
            let (styled, cells) = render_line(&line.cells);
            if index == cursor_row {
                cursor_cells = cells;
            }
            lines.push(styled);
        }

        let keep_at_least = if show_cursor { cursor_row + 1 } else { 1 };
        while lines.len() > keep_at_least && lines.last().is_some_and(StyledLine::is_empty) {
            lines.pop();
        }

        let cursor = show_cursor.then(|| {
            let mut offset: usize = lines[..cursor_row].iter().map(|l| l.char_len() + 1).sum();
            offset += screen
                .line(screen.cursor().row)
                .map(|line| {
                    line.cells[..cursor_col.min(cursor_cells)]
                        .iter()
                        .map(|c| c.content.chars().count())
                        .sum::<usize>()
                })
                .unwrap_or(0);
            let total = lines.iter().map(StyledLine::char_len).sum::<usize>() + lines.len() - 1;
            CursorInfo {
                row: cursor_row,
                column: cursor_col,
                offset: offset.min(total),
            }
        });

        Self {
            lines,
            cursor,
            columns: screen.cols(),
            rows: screen.rows(),
        }
    }

    /// All lines joined with `\n`
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(StyledLine::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Render one row into runs; returns the line and how many cells it kept.
///
/// A row of nothing but spaces renders empty. Otherwise trailing spaces
/// with default attributes are dropped, so a colored background survives.
fn render_line(cells: &[Cell]) -> (StyledLine, usize) {
    if cells.iter().all(Cell::is_blank) {
        return (StyledLine::default(), 0);
    }
    let kept = cells
        .iter()
        .rposition(|c| !c.is_default_blank())
        .map_or(0, |i| i + 1);

    let mut runs: Vec<StyledRun> = Vec::new();
    for cell in &cells[..kept] {
        match runs.last_mut() {
            Some(run) if run.attrs == cell.attrs => run.text.push_str(&cell.content),
            _ => runs.push(StyledRun {
                text: cell.content.clone(),
                attrs: cell.attrs,
            }),
        }
    }
    (StyledLine { runs }, kept)
}
