//! Terminal Cell
//!
//! Represents a single cell in the terminal grid, containing a grapheme
//! and the attributes it was written with. Colors stay symbolic here;
//! turning them into concrete RGB happens at the render boundary.

use serde::{Deserialize, Serialize};

/// Color representation for cell foreground and background
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// The display's default foreground color
    DefaultForeground,
    /// The display's default background color
    DefaultBackground,
    /// ANSI base and bright colors (0-15)
    Indexed(u8),
    /// xterm 256-color palette entry (cube and grayscale ramp)
    Extended(u8),
    /// 24-bit truecolor
    Rgb(u8, u8, u8),
}

impl Color {
    /// Build a 256-color palette entry, rejecting indices above 255
    pub fn extended(index: u16) -> Option<Color> {
        u8::try_from(index).ok().map(Color::Extended)
    }

    /// Build an RGB color, rejecting components above 255
    pub fn rgb(r: u16, g: u16, b: u16) -> Option<Color> {
        Some(Color::Rgb(
            u8::try_from(r).ok()?,
            u8::try_from(g).ok()?,
            u8::try_from(b).ok()?,
        ))
    }
}

/// Text attributes applied to newly written cells (the SGR state)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attributes {
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
    pub underline: bool,
    pub inverse: bool,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            fg: Color::DefaultForeground,
            bg: Color::DefaultBackground,
            bold: false,
            underline: false,
            inverse: false,
        }
    }
}

impl Attributes {
    /// Reset to defaults (SGR 0)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Check whether these are the default attributes
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Foreground and background as they should be displayed.
    ///
    /// Inverse video swaps the pair here rather than when the cell is
    /// written, so toggling SGR 7/27 never loses the original colors.
    pub fn display_colors(&self) -> (Color, Color) {
        if self.inverse {
            (self.bg, self.fg)
        } else {
            (self.fg, self.bg)
        }
    }
}

/// A single cell in the terminal grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// The grapheme shown in this cell. A base character optionally
    /// followed by combining marks; a space when blank.
    pub content: String,
    /// Attributes the cell was written with
    pub attrs: Attributes,
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank(Attributes::default())
    }
}

/// Most combining marks kept on one cell
pub const MAX_COMBINING: usize = 16;

impl Cell {
    /// Create a cell holding a single character
    pub fn new(c: char, attrs: Attributes) -> Self {
        Self {
            content: c.to_string(),
            attrs,
        }
    }

    /// Create a blank cell carrying the given attributes (erase semantics)
    pub fn blank(attrs: Attributes) -> Self {
        Self {
            content: " ".to_string(),
            attrs,
        }
    }

    /// Replace the content with a single character
    pub fn set_char(&mut self, c: char) {
        self.content.clear();
        self.content.push(c);
    }

    /// Attach a combining mark to the grapheme in this cell.
    ///
    /// Marks beyond [`MAX_COMBINING`] are dropped.
    pub fn push_combining(&mut self, c: char) {
        if self.content.chars().count() > MAX_COMBINING {
            return;
        }
        self.content.push(c);
    }

    /// Check whether the cell shows nothing but a space
    pub fn is_blank(&self) -> bool {
        self.content == " "
    }

    /// Check whether the cell is a space with default attributes
    pub fn is_default_blank(&self) -> bool {
        self.is_blank() && self.attrs.is_default()
    }

    /// First character of the grapheme (for tests and debugging)
    pub fn display_char(&self) -> char {
        self.content.chars().next().unwrap_or(' ')
    }
}
