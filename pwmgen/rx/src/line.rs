//! Line collector
//!
//! Assembles received bytes into one bounded line per call. A line ends when
//! the last received byte is a carriage return or newline, when the buffer is
//! full, or when the receiver stays idle for longer than the timeout. Bytes
//! that do not fit are not carried over to the next line.

use core::fmt;

use hal::ByteSource;
use heapless::Vec;
use pwmgen_core::command::line_text;
use pwmgen_core::config::{IDLE_TIMEOUT_POLLS, RX_BUFFER_LEN};

/// A collected line with terminators replaced by NUL
#[derive(Clone, PartialEq, Eq)]
pub struct Line<const N: usize = RX_BUFFER_LEN> {
    buf: Vec<u8, N>,
}

impl<const N: usize> Line<N> {
    const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Every received byte, terminators included as NUL
    pub fn raw(&self) -> &[u8] {
        &self.buf
    }

    /// Bytes before the first terminator
    pub fn text(&self) -> &[u8] {
        line_text(&self.buf)
    }

    /// Number of bytes received for this line
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether no byte was received
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Whether the line hit the buffer capacity
    pub fn is_full(&self) -> bool {
        self.buf.is_full()
    }

    fn ends_with_terminator(&self) -> bool {
        matches!(self.buf.last(), Some(b'\r' | b'\n'))
    }

    /// Replace every CR and LF in the buffer, not just the trailing one
    fn sanitize(&mut self) {
        for byte in self.buf.iter_mut() {
            if *byte == b'\r' || *byte == b'\n' {
                *byte = 0;
            }
        }
    }
}

impl<const N: usize> fmt::Debug for Line<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Line(\"")?;
        for &byte in self.raw() {
            write!(f, "{}", core::ascii::escape_default(byte))?;
        }
        f.write_str("\")")
    }
}

/// How a collection cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineResult<'a, const N: usize = RX_BUFFER_LEN> {
    /// A received byte ended the line: a terminator or the last free slot
    Complete(&'a Line<N>),
    /// The receiver went idle; holds whatever arrived before that
    TimedOut(&'a Line<N>),
}

impl<'a, const N: usize> LineResult<'a, N> {
    /// The collected line
    pub fn line(&self) -> &'a Line<N> {
        match *self {
            LineResult::Complete(line) | LineResult::TimedOut(line) => line,
        }
    }

    /// Whether the line is echoed back to the operator
    ///
    /// Only lines ended by a received byte are echoed, never a timeout.
    pub fn should_echo(&self) -> bool {
        matches!(self, LineResult::Complete(_))
    }
}

/// Collects one line per [`collect`](LineCollector::collect) call
pub struct LineCollector<const N: usize = RX_BUFFER_LEN> {
    line: Line<N>,
    timeout_polls: u16,
}

impl<const N: usize> LineCollector<N> {
    /// Collector with the default idle timeout
    pub const fn new() -> Self {
        Self::with_timeout(IDLE_TIMEOUT_POLLS)
    }

    /// Collector that times out after `timeout_polls` idle poll iterations
    pub const fn with_timeout(timeout_polls: u16) -> Self {
        Self {
            line: Line::new(),
            timeout_polls,
        }
    }

    /// Idle poll iterations tolerated before a line is force-completed
    pub const fn timeout_polls(&self) -> u16 {
        self.timeout_polls
    }

    /// Poll `source` until a line completes or times out
    ///
    /// `idle` runs once per poll iteration that found no byte; targets use it
    /// to pace the loop.
    pub fn collect<S, F>(&mut self, source: &mut S, mut idle: F) -> LineResult<'_, N>
    where
        S: ByteSource,
        F: FnMut(),
    {
        self.line.buf.clear();
        let mut idle_polls: u32 = 0;

        let timed_out = loop {
            match source.read() {
                Ok(byte) => {
                    // Completion is checked after every byte, so there is
                    // always room here
                    let _ = self.line.buf.push(byte);
                    idle_polls = 0;
                }
                Err(nb::Error::WouldBlock) => idle(),
                Err(nb::Error::Other(err)) => {
                    log::warn!("rx: receive error: {}", err);
                    idle();
                }
            }

            if self.line.ends_with_terminator() || self.line.is_full() {
                break false;
            }
            // Wider than the threshold so every u16 timeout is reachable
            if idle_polls > u32::from(self.timeout_polls) {
                break true;
            }
            idle_polls += 1;
        };

        self.line.sanitize();

        if timed_out {
            log::trace!("rx: timed out with {} bytes", self.line.len());
            LineResult::TimedOut(&self.line)
        } else {
            log::trace!("rx: line complete, {} bytes", self.line.len());
            LineResult::Complete(&self.line)
        }
    }
}

impl<const N: usize> Default for LineCollector<N> {
    fn default() -> Self {
        Self::new()
    }
}
