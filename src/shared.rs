//! Thread-safe terminal handle
//!
//! [`SharedTerminal`] serializes every operation on one [`Terminal`] behind
//! a mutex, so a transport reader, a render loop and the host UI can use
//! the same instance from different threads.
//!
//! Events are appended to a pending queue while the terminal lock is held,
//! so the queue order is the order in which state changed. One thread at a
//! time drains the queue into the registered [`Callbacks`] with no lock
//! held. An operation issued while another thread is dispatching (or from
//! inside a callback) only queues its events and leaves delivery to the
//! dispatching thread.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

use crate::config::TerminalConfig;
use crate::core::{MouseEncoding, MouseMode, Snapshot};
use crate::input::{MouseButton, MouseEventKind};
use crate::terminal::{Terminal, TerminalEvent};

type ResizeCallback = Box<dyn Fn(usize, usize) + Send + Sync>;
type MouseModeCallback = Box<dyn Fn(MouseMode, MouseEncoding) + Send + Sync>;
type ResponseCallback = Box<dyn Fn(&[u8]) + Send + Sync>;

/// Owner hooks invoked for terminal events
#[derive(Default)]
pub struct Callbacks {
    on_resize_request: Option<ResizeCallback>,
    on_mouse_mode_change: Option<MouseModeCallback>,
    on_response: Option<ResponseCallback>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with `(columns, rows)` when the program asks for a new size
    pub fn on_resize_request(mut self, f: impl Fn(usize, usize) + Send + Sync + 'static) -> Self {
        self.on_resize_request = Some(Box::new(f));
        self
    }

    /// Called whenever a mouse tracking mode or encoding toggle arrives
    pub fn on_mouse_mode_change(
        mut self,
        f: impl Fn(MouseMode, MouseEncoding) + Send + Sync + 'static,
    ) -> Self {
        self.on_mouse_mode_change = Some(Box::new(f));
        self
    }

    /// Called with bytes that must be written to the transport
    pub fn on_response(mut self, f: impl Fn(&[u8]) + Send + Sync + 'static) -> Self {
        self.on_response = Some(Box::new(f));
        self
    }

    fn dispatch(&self, event: TerminalEvent) {
        match event {
            TerminalEvent::ResizeRequest { columns, rows } => {
                if let Some(f) = &self.on_resize_request {
                    f(columns, rows);
                }
            }
            TerminalEvent::MouseModeChanged { mode, encoding } => {
                if let Some(f) = &self.on_mouse_mode_change {
                    f(mode, encoding);
                }
            }
            TerminalEvent::Response(bytes) => match &self.on_response {
                Some(f) => f(&bytes),
                None => tracing::debug!(len = bytes.len(), "response dropped, no writer"),
            },
        }
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_resize_request", &self.on_resize_request.is_some())
            .field("on_mouse_mode_change", &self.on_mouse_mode_change.is_some())
            .field("on_response", &self.on_response.is_some())
            .finish()
    }
}

/// Events waiting for delivery
#[derive(Debug, Default)]
struct Pending {
    events: VecDeque<TerminalEvent>,
    /// Set while some thread is draining `events`
    dispatching: bool,
}

/// Releases the dispatch flag if a callback panics
struct DispatchGuard<'a>(&'a Mutex<Pending>);

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            let mut pending = self.0.lock().unwrap_or_else(PoisonError::into_inner);
            pending.dispatching = false;
        }
    }
}

/// Cloneable, thread-safe handle to one terminal instance
#[derive(Debug, Clone)]
pub struct SharedTerminal {
    inner: Arc<Mutex<Terminal>>,
    pending: Arc<Mutex<Pending>>,
    callbacks: Arc<Callbacks>,
}

impl SharedTerminal {
    pub fn new(terminal: Terminal, callbacks: Callbacks) -> Self {
        Self {
            inner: Arc::new(Mutex::new(terminal)),
            pending: Arc::new(Mutex::new(Pending::default())),
            callbacks: Arc::new(callbacks),
        }
    }

    /// Create a handle for a terminal built from configuration
    pub fn from_config(config: &TerminalConfig, callbacks: Callbacks) -> Self {
        Self::new(Terminal::from_config(config), callbacks)
    }

    /// The terminal state is consistent between operations, so a panic in
    /// another holder does not invalidate it.
    fn lock(&self) -> MutexGuard<'_, Terminal> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_pending(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` under the lock, then deliver pending events
    fn with_terminal<R>(&self, f: impl FnOnce(&mut Terminal) -> R) -> R {
        let result = {
            let mut terminal = self.lock();
            let result = f(&mut terminal);
            let events = terminal.take_events();
            if !events.is_empty() {
                // Lock order: terminal, then pending
                self.lock_pending().events.extend(events);
            }
            result
        };
        self.dispatch_pending();
        result
    }

    /// Drain the pending queue in order unless another call already is
    fn dispatch_pending(&self) {
        {
            let mut pending = self.lock_pending();
            if pending.dispatching || pending.events.is_empty() {
                return;
            }
            pending.dispatching = true;
        }
        let _guard = DispatchGuard(&self.pending);
        loop {
            let event = {
                let mut pending = self.lock_pending();
                match pending.events.pop_front() {
                    Some(event) => event,
                    None => {
                        pending.dispatching = false;
                        return;
                    }
                }
            };
            self.callbacks.dispatch(event);
        }
    }

    /// Feed bytes from the transport
    pub fn append(&self, data: &[u8]) {
        self.with_terminal(|t| t.append(data));
    }

    /// Resize the grid, returning whether anything changed
    pub fn resize(&self, cols: usize, rows: usize) -> bool {
        self.with_terminal(|t| t.resize(cols, rows))
    }

    /// Hard reset
    pub fn reset(&self) {
        self.with_terminal(Terminal::reset);
    }

    /// Capture a consistent snapshot
    pub fn snapshot(&self, include_scrollback: bool) -> Snapshot {
        self.lock().snapshot(include_scrollback)
    }

    /// Write locally typed text into the grid
    pub fn echo_user_input(&self, text: &str) {
        self.with_terminal(|t| t.echo_user_input(text));
    }

    /// Report a pointer event; the encoded bytes go to the response callback
    pub fn mouse_event(
        &self,
        button: MouseButton,
        kind: MouseEventKind,
        col: usize,
        row: usize,
    ) -> bool {
        self.with_terminal(|t| t.mouse_event(button, kind, col, row))
    }

    pub fn bracketed_paste_enabled(&self) -> bool {
        self.lock().bracketed_paste_enabled()
    }

    /// Bytes to send for pasted text under the current paste mode
    pub fn paste_bytes(&self, text: &str) -> Vec<u8> {
        self.lock().paste_bytes(text)
    }
}
