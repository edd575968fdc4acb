//! Streaming UTF-8 decoder
//!
//! Turns raw transport bytes into Unicode scalars. A multi-byte sequence
//! split across chunks is held until its remaining bytes arrive. Invalid
//! input never fails the chunk: it decodes to U+FFFD, and a byte that
//! interrupts a pending sequence is decoded again on its own.

const REPLACEMENT: char = '\u{FFFD}';

/// Incremental UTF-8 decoder state
#[derive(Debug, Clone, Default)]
pub struct Utf8Decoder {
    /// Code point bits collected so far
    codepoint: u32,
    /// Continuation bytes still expected
    remaining: u8,
    /// Total length of the pending sequence
    length: u8,
}

impl Utf8Decoder {
    /// Create a decoder with no pending sequence
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a partial sequence is buffered
    pub fn has_pending(&self) -> bool {
        self.remaining > 0
    }

    /// Drop any partial sequence
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Decode a chunk, calling `emit` for each scalar in order
    pub fn decode<F: FnMut(char)>(&mut self, data: &[u8], mut emit: F) {
        for &byte in data {
            self.push(byte, &mut emit);
        }
    }

    /// Decode a chunk into a vector of scalars
    pub fn decode_to_vec(&mut self, data: &[u8]) -> Vec<char> {
        let mut out = Vec::with_capacity(data.len());
        self.decode(data, |c| out.push(c));
        out
    }

    fn push<F: FnMut(char)>(&mut self, byte: u8, emit: &mut F) {
        if self.remaining > 0 {
            if byte & 0xC0 != 0x80 {
                // Interrupted sequence: replace it, then start over with this byte
                self.reset();
                emit(REPLACEMENT);
                self.push(byte, emit);
                return;
            }
            self.codepoint = (self.codepoint << 6) | u32::from(byte & 0x3F);
            self.remaining -= 1;
            if self.remaining == 0 {
                let c = self.finish();
                self.reset();
                emit(c);
            }
            return;
        }

        match byte {
            0x00..=0x7F => emit(char::from(byte)),
            0xC2..=0xDF => self.start(byte & 0x1F, 2),
            0xE0..=0xEF => self.start(byte & 0x0F, 3),
            0xF0..=0xF4 => self.start(byte & 0x07, 4),
            // Stray continuation bytes and invalid leads
            _ => emit(REPLACEMENT),
        }
    }

    fn start(&mut self, bits: u8, length: u8) {
        self.codepoint = u32::from(bits);
        self.length = length;
        self.remaining = length - 1;
    }

    /// Validate a completed sequence, rejecting overlong forms and
    /// surrogates
    fn finish(&self) -> char {
        let min = match self.length {
            2 => 0x80,
            3 => 0x800,
            _ => 0x1_0000,
        };
        if self.codepoint < min {
            return REPLACEMENT;
        }
        char::from_u32(self.codepoint).unwrap_or(REPLACEMENT)
    }
}
