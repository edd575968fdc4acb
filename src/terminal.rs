//! Terminal Executor
//!
//! Ties together the parser and the screen model and applies parsed
//! actions to update the terminal state. This is the main integration
//! point between parsing and the screen model.
//!
//! Side effects meant for the owner (replies to DSR/DA queries, encoded
//! mouse reports, resize requests and mouse mode changes) are queued as
//! [`TerminalEvent`]s and collected with [`Terminal::take_events`].

use serde::{Deserialize, Serialize};

use crate::config::TerminalConfig;
use crate::core::{apply_sgr, MouseEncoding, MouseMode, Screen, Snapshot};
use crate::input::{encode_mouse, wrap_paste, MouseButton, MouseEventKind};
use crate::parser::{Action, CsiAction, EscAction, Parser};

/// Something the owner of a terminal has to act on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminalEvent {
    /// The running program asked for a new window size (CSI 8 ; rows ; cols t)
    ResizeRequest { columns: usize, rows: usize },
    /// A DEC private mode toggle touched mouse tracking
    MouseModeChanged {
        mode: MouseMode,
        encoding: MouseEncoding,
    },
    /// Bytes to write back to the transport
    Response(Vec<u8>),
}

/// Terminal executor that processes parsed actions and updates the screen
#[derive(Debug)]
pub struct Terminal {
    /// The terminal screen
    screen: Screen,
    /// The escape sequence parser
    parser: Parser,
    /// Events waiting for the owner
    events: Vec<TerminalEvent>,
    /// A locally echoed LF swallows the next LF from the transport
    suppress_next_remote_lf: bool,
}

impl Terminal {
    /// Create a new terminal with the given dimensions.
    ///
    /// Dimensions below the minimum grid size are raised to it.
    pub fn new(cols: usize, rows: usize, scrollback_capacity: usize) -> Self {
        Self {
            screen: Screen::new(cols, rows, scrollback_capacity),
            parser: Parser::new(),
            events: Vec::new(),
            suppress_next_remote_lf: false,
        }
    }

    /// Create a terminal from configuration
    pub fn from_config(config: &TerminalConfig) -> Self {
        Self::new(config.columns, config.rows, config.scrollback_lines)
    }

    /// Get a reference to the screen
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Process output bytes from the transport
    pub fn append(&mut self, data: &[u8]) {
        let actions = self.parser.parse(data);
        for action in actions {
            if self.suppress_next_remote_lf {
                match action {
                    Action::Control(b'\n') => {
                        self.suppress_next_remote_lf = false;
                        continue;
                    }
                    Action::Control(b'\r') => {}
                    _ => self.suppress_next_remote_lf = false,
                }
            }
            self.apply_action(action);
        }
    }

    /// Write locally typed text straight into the grid.
    ///
    /// Printable text takes the attributes of the cell under the cursor.
    /// Only line-editing controls are honoured; ESC and other C0 controls
    /// are dropped, so echoed text can never start an escape sequence.
    pub fn echo_user_input(&mut self, text: &str) {
        for c in text.chars() {
            match c {
                '\n' => {
                    self.with_cursor_attrs(|screen| screen.newline());
                    self.suppress_next_remote_lf = true;
                }
                '\r' => self.screen.carriage_return(),
                '\t' => self.screen.tab(1),
                '\x08' => self.screen.backspace(),
                '\x7f' => self.screen.backspace_erase(),
                '\0'..='\x1f' => {}
                _ => self.with_cursor_attrs(|screen| screen.print(c)),
            }
        }
    }

    /// Run `f` with the pen set to the attributes under the cursor
    fn with_cursor_attrs(&mut self, f: impl FnOnce(&mut Screen)) {
        let pen = self.screen.attrs;
        self.screen.attrs = self.screen.attrs_at_cursor();
        f(&mut self.screen);
        self.screen.attrs = pen;
    }

    /// Resize the terminal, returning whether anything changed
    pub fn resize(&mut self, cols: usize, rows: usize) -> bool {
        self.screen.resize(cols, rows)
    }

    /// Hard reset: blank grid, empty scrollback, default cursor, pen and
    /// modes. Always announces the (now disabled) mouse mode.
    pub fn reset(&mut self) {
        self.parser.reset();
        self.reset_state();
    }

    /// Reset everything but the parser (RIS arrives between sequences)
    fn reset_state(&mut self) {
        self.screen.reset();
        self.suppress_next_remote_lf = false;
        self.notify_mouse_change();
    }

    /// Capture a render snapshot
    pub fn snapshot(&self, include_scrollback: bool) -> Snapshot {
        Snapshot::capture(&self.screen, include_scrollback)
    }

    /// Report a pointer event at a 0-based grid position, clamped to the grid.
    ///
    /// Returns whether a report was queued for the transport.
    pub fn mouse_event(
        &mut self,
        button: MouseButton,
        kind: MouseEventKind,
        col: usize,
        row: usize,
    ) -> bool {
        if !self.screen.modes.mouse_reporting() {
            return false;
        }
        let (mode, encoding) = self.screen.modes.mouse_state();
        let col = col.min(self.screen.cols() - 1);
        let row = row.min(self.screen.rows() - 1);
        match encode_mouse(mode, encoding, button, kind, col, row) {
            Some(bytes) => {
                self.events.push(TerminalEvent::Response(bytes));
                true
            }
            None => false,
        }
    }

    /// Whether the program enabled bracketed paste (DECSET 2004)
    pub fn bracketed_paste_enabled(&self) -> bool {
        self.screen.modes.bracketed_paste
    }

    /// Bytes to send for pasted text, wrapped when bracketed paste is on
    pub fn paste_bytes(&self, text: &str) -> Vec<u8> {
        wrap_paste(text, self.bracketed_paste_enabled())
    }

    /// Drain queued events, oldest first
    pub fn take_events(&mut self) -> Vec<TerminalEvent> {
        std::mem::take(&mut self.events)
    }

    fn respond(&mut self, response: String) {
        self.events.push(TerminalEvent::Response(response.into_bytes()));
    }

    fn notify_mouse_change(&mut self) {
        let (mode, encoding) = self.screen.modes.mouse_state();
        tracing::debug!(?mode, ?encoding, "mouse mode changed");
        self.events.push(TerminalEvent::MouseModeChanged { mode, encoding });
    }

    /// Apply a single parsed action to the screen
    fn apply_action(&mut self, action: Action) {
        match action {
            Action::Print(c) => self.screen.print(c),
            Action::Control(byte) => self.execute_c0(byte),
            Action::Csi(csi) => self.execute_csi(&csi),
            Action::Esc(esc) => self.execute_esc(esc),
            Action::Osc(payload) => {
                tracing::trace!(%payload, "OSC ignored");
            }
        }
    }

    /// Execute a C0 control character
    fn execute_c0(&mut self, byte: u8) {
        match byte {
            0x07 => tracing::trace!("bell"),
            0x08 => self.screen.backspace(),
            0x09 => self.screen.tab(1),
            // LF, VT, FF: the transport sends bare LF for a new line
            0x0A..=0x0C => self.screen.newline(),
            0x0D => self.screen.carriage_return(),
            _ => tracing::trace!(byte, "C0 control ignored"),
        }
    }

    /// Execute a CSI sequence
    fn execute_csi(&mut self, csi: &CsiAction) {
        let params = &csi.params;
        // 1-based absolute position parameter, as a 0-based index
        let position = |index: usize| usize::from(params.get_or(index, 1).max(1)) - 1;

        match csi.final_char {
            // Cursor movement
            'A' => self.screen.move_cursor_up(params.count(0)),
            'B' | 'e' => self.screen.move_cursor_down(params.count(0)),
            'C' | 'a' => self.screen.move_cursor_forward(params.count(0)),
            'D' => self.screen.move_cursor_backward(params.count(0)),
            'E' => {
                // CNL - Cursor Next Line
                self.screen.move_cursor_down(params.count(0));
                self.screen.carriage_return();
            }
            'F' => {
                // CPL - Cursor Previous Line
                self.screen.move_cursor_up(params.count(0));
                self.screen.carriage_return();
            }
            'G' => self.screen.move_cursor_to_col(position(0)),
            'H' | 'f' => self.screen.move_cursor_to(position(0), position(1)),
            'd' => self.screen.move_cursor_to_row(position(0)),

            // Tabs
            'I' => self.screen.tab(params.count(0)),
            'Z' => self.screen.back_tab(params.count(0)),
            'g' => self.screen.clear_tab_stop(params.get_or(0, 0)),

            // Erase operations
            'J' => self.screen.erase_in_display(params.get_or(0, 0)),
            'K' => self.screen.erase_in_line(params.get_or(0, 0)),
            'X' => self.screen.erase_chars(params.count(0)),

            // Insert/Delete
            '@' => self.screen.insert_chars(params.count(0)),
            'P' => self.screen.delete_chars(params.count(0)),
            'L' => self.screen.insert_lines(params.count(0)),
            'M' => self.screen.delete_lines(params.count(0)),

            // Scroll
            'S' => self.screen.scroll_region_up(params.count(0)),
            'T' => self.screen.scroll_region_down(params.count(0)),
            'r' => self.screen.set_scroll_region(params.get(0), params.get(1)),

            // REP - Repeat preceding character
            'b' => self.screen.repeat_last(params.count(0)),

            // SGR - Select Graphic Rendition
            'm' => apply_sgr(&mut self.screen.attrs, params.as_slice()),

            // Cursor save/restore (ANSI)
            's' => self.screen.save_cursor(),
            'u' => self.screen.restore_cursor(),

            // Mode set/reset
            'h' | 'l' => {
                let enable = csi.final_char == 'h';
                for mode in params.as_slice().iter().flatten() {
                    if csi.private {
                        self.set_dec_mode(*mode, enable);
                    } else {
                        self.set_ansi_mode(*mode, enable);
                    }
                }
            }

            // Reports
            'n' => self.device_status_report(params.get(0)),
            'c' => {
                // DA - Primary Device Attributes
                if params.get_or(0, 0) == 0 {
                    self.respond("\x1b[?1;0c".to_string());
                }
            }
            't' => self.window_op(csi),

            _ => {
                tracing::debug!(
                    final_char = %csi.final_char,
                    params = ?params.as_slice(),
                    private = csi.private,
                    "unhandled CSI"
                );
            }
        }
    }

    /// Set or reset a DEC private mode
    fn set_dec_mode(&mut self, mode: u16, enable: bool) {
        match mode {
            1 => {
                // DECCKM - Application Cursor Keys
                self.screen.modes.cursor_keys_application = enable;
            }
            6 => {
                // DECOM - Origin Mode
                self.screen.set_origin_mode(enable);
            }
            7 => {
                // DECAWM - Autowrap Mode
                self.screen.modes.autowrap = enable;
            }
            25 => {
                // DECTCEM - Text Cursor Enable Mode
                self.screen.set_cursor_visible(enable);
            }
            1000 => {
                // Normal mouse tracking
                self.screen.modes.mouse_mode = if enable {
                    MouseMode::Click
                } else {
                    MouseMode::Off
                };
                self.notify_mouse_change();
            }
            1002 => {
                // Button-event mouse tracking
                self.screen.modes.mouse_mode = if enable {
                    MouseMode::Drag
                } else {
                    MouseMode::Off
                };
                self.notify_mouse_change();
            }
            1006 => {
                // SGR mouse encoding
                self.screen.modes.mouse_encoding = if enable {
                    MouseEncoding::Sgr
                } else {
                    MouseEncoding::Legacy
                };
                self.notify_mouse_change();
            }
            1049 => {
                // Alternate screen buffer
                if enable {
                    self.screen.enter_alternate_screen();
                } else {
                    self.screen.exit_alternate_screen();
                }
            }
            2004 => {
                // Bracketed paste mode
                self.screen.modes.bracketed_paste = enable;
            }
            _ => {
                tracing::debug!(mode, enable, "unknown DEC mode");
            }
        }
    }

    /// Set or reset an ANSI mode
    fn set_ansi_mode(&mut self, mode: u16, enable: bool) {
        match mode {
            // IRM - Insert Mode
            4 => self.screen.modes.insert = enable,
            _ => tracing::debug!(mode, enable, "unknown ANSI mode"),
        }
    }

    /// DSR - Device Status Report
    fn device_status_report(&mut self, request: Option<u16>) {
        match request {
            Some(5) => self.respond("\x1b[0n".to_string()),
            Some(6) => {
                let cursor = self.screen.cursor();
                let response = format!("\x1b[{};{}R", cursor.row + 1, cursor.col + 1);
                self.respond(response);
            }
            // Unsupported reports get no answer
            _ => tracing::debug!(?request, "DSR ignored"),
        }
    }

    /// Window manipulation; only the resize request is honoured
    fn window_op(&mut self, csi: &CsiAction) {
        let params = &csi.params;
        match params.get(0) {
            Some(8) if params.len() >= 3 => {
                let rows = usize::from(params.get_or(1, 0));
                let columns = usize::from(params.get_or(2, 0));
                tracing::debug!(columns, rows, "resize requested by program");
                self.events.push(TerminalEvent::ResizeRequest { columns, rows });
            }
            op => tracing::debug!(?op, "window op ignored"),
        }
    }

    /// Execute an ESC sequence
    fn execute_esc(&mut self, esc: EscAction) {
        match esc {
            EscAction::SaveCursor => self.screen.save_cursor(),
            EscAction::RestoreCursor => self.screen.restore_cursor(),
            EscAction::Index => self.screen.linefeed(),
            EscAction::NextLine => self.screen.newline(),
            EscAction::TabSet => self.screen.set_tab_stop(),
            EscAction::ReverseIndex => self.screen.reverse_index(),
            EscAction::FullReset => self.reset_state(),
        }
    }
}
