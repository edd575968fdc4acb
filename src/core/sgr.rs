//! SGR (Select Graphic Rendition) handling
//!
//! Walks the parameter list of a `CSI ... m` sequence and folds it into
//! the current [`Attributes`]. Extended colors (38/48) consume however many
//! parameters are actually present, so a truncated sequence never shifts
//! the interpretation of the parameters that follow it.

use super::cell::{Attributes, Color};

/// Apply an SGR parameter list to `attrs`.
///
/// `None` entries are empty tokens and read as 0. An empty list resets.
pub fn apply_sgr(attrs: &mut Attributes, params: &[Option<u16>]) {
    if params.is_empty() {
        attrs.reset();
        return;
    }

    let mut i = 0;
    while i < params.len() {
        let code = params[i].unwrap_or(0);
        match code {
            0 => attrs.reset(),
            1 => attrs.bold = true,
            4 => attrs.underline = true,
            7 => attrs.inverse = true,
            22 => attrs.bold = false,
            24 => attrs.underline = false,
            27 => attrs.inverse = false,
            30..=37 => attrs.fg = Color::Indexed((code - 30) as u8),
            39 => attrs.fg = Color::DefaultForeground,
            40..=47 => attrs.bg = Color::Indexed((code - 40) as u8),
            49 => attrs.bg = Color::DefaultBackground,
            90..=97 => attrs.fg = Color::Indexed((code - 90 + 8) as u8),
            100..=107 => attrs.bg = Color::Indexed((code - 100 + 8) as u8),
            38 | 48 => {
                let (color, consumed) = parse_extended_color(&params[i + 1..]);
                if let Some(color) = color {
                    if code == 38 {
                        attrs.fg = color;
                    } else {
                        attrs.bg = color;
                    }
                }
                i += consumed;
            }
            _ => {
                tracing::trace!(code, "ignoring unsupported SGR code");
            }
        }
        i += 1;
    }
}

/// Parse the tail of a 38/48 sequence.
///
/// Returns the color (if well formed and in range) and how many parameters
/// after the 38/48 introducer were consumed.
pub fn parse_extended_color(rest: &[Option<u16>]) -> (Option<Color>, usize) {
    let Some(mode) = rest.first() else {
        return (None, 0);
    };
    let value = |idx: usize| rest.get(idx).map(|p| p.unwrap_or(0));

    match mode.unwrap_or(0) {
        5 => match value(1) {
            Some(index) => (Color::extended(index), 2),
            None => (None, 1),
        },
        2 => match (value(1), value(2), value(3)) {
            (Some(r), Some(g), Some(b)) => (Color::rgb(r, g, b), 4),
            _ => (None, rest.len()),
        },
        _ => (None, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(values: &[u16]) -> Vec<Option<u16>> {
        values.iter().map(|&v| Some(v)).collect()
    }

    #[test]
    fn test_sgr_empty_resets() {
        let mut attrs = Attributes {
            bold: true,
            fg: Color::Indexed(1),
            ..Default::default()
        };
        apply_sgr(&mut attrs, &[]);
        assert!(attrs.is_default());
    }

    #[test]
    fn test_sgr_basic_flags() {
        let mut attrs = Attributes::default();
        apply_sgr(&mut attrs, &p(&[1, 4, 7]));
        assert!(attrs.bold && attrs.underline && attrs.inverse);
        apply_sgr(&mut attrs, &p(&[22, 24, 27]));
        assert!(!attrs.bold && !attrs.underline && !attrs.inverse);
    }

    #[test]
    fn test_sgr_indexed_colors() {
        let mut attrs = Attributes::default();
        apply_sgr(&mut attrs, &p(&[31, 42]));
        assert_eq!(attrs.fg, Color::Indexed(1));
        assert_eq!(attrs.bg, Color::Indexed(2));

        apply_sgr(&mut attrs, &p(&[97, 100]));
        assert_eq!(attrs.fg, Color::Indexed(15));
        assert_eq!(attrs.bg, Color::Indexed(8));

        apply_sgr(&mut attrs, &p(&[39, 49]));
        assert_eq!(attrs.fg, Color::DefaultForeground);
        assert_eq!(attrs.bg, Color::DefaultBackground);
    }

    #[test]
    fn test_sgr_256_and_truecolor() {
        let mut attrs = Attributes::default();
        apply_sgr(&mut attrs, &p(&[38, 5, 196, 48, 2, 10, 20, 30]));
        assert_eq!(attrs.fg, Color::Extended(196));
        assert_eq!(attrs.bg, Color::Rgb(10, 20, 30));
    }

    #[test]
    fn test_sgr_extended_followed_by_flag() {
        let mut attrs = Attributes::default();
        apply_sgr(&mut attrs, &p(&[38, 5, 100, 1]));
        assert_eq!(attrs.fg, Color::Extended(100));
        assert!(attrs.bold);
    }

    #[test]
    fn test_sgr_out_of_range_extended_is_ignored() {
        let mut attrs = Attributes::default();
        apply_sgr(&mut attrs, &p(&[38, 5, 300, 4]));
        assert_eq!(attrs.fg, Color::DefaultForeground);
        assert!(attrs.underline);

        apply_sgr(&mut attrs, &p(&[48, 2, 1, 999, 3, 1]));
        assert_eq!(attrs.bg, Color::DefaultBackground);
        assert!(attrs.bold);
    }

    #[test]
    fn test_sgr_truncated_extended() {
        let mut attrs = Attributes::default();
        apply_sgr(&mut attrs, &p(&[38, 2, 255]));
        assert_eq!(attrs.fg, Color::DefaultForeground);

        apply_sgr(&mut attrs, &p(&[1, 48, 5]));
        assert!(attrs.bold);
        assert_eq!(attrs.bg, Color::DefaultBackground);

        apply_sgr(&mut attrs, &p(&[38]));
        assert_eq!(attrs.fg, Color::DefaultForeground);
    }

    #[test]
    fn test_sgr_unknown_submode_skips_one() {
        let mut attrs = Attributes::default();
        // 38;9 is unknown; 4 is still applied
        apply_sgr(&mut attrs, &p(&[38, 9, 4]));
        assert!(attrs.underline);
    }

    #[test]
    fn test_sgr_empty_token_is_reset() {
        let mut attrs = Attributes {
            bold: true,
            ..Default::default()
        };
        apply_sgr(&mut attrs, &[None, Some(4)]);
        assert!(!attrs.bold);
        assert!(attrs.underline);
    }

    #[test]
    fn test_parse_extended_color_counts() {
        assert_eq!(parse_extended_color(&[]), (None, 0));
        assert_eq!(parse_extended_color(&p(&[5])), (None, 1));
        assert_eq!(
            parse_extended_color(&p(&[5, 12])),
            (Some(Color::Extended(12)), 2)
        );
        assert_eq!(parse_extended_color(&p(&[2, 1, 2])), (None, 3));
        assert_eq!(
            parse_extended_color(&p(&[2, 1, 2, 3, 9])),
            (Some(Color::Rgb(1, 2, 3)), 4)
        );
    }
}
