//! Terminal transport
//!
//! Transmit goes to any `io::Write` (stdout in the binary). Receive runs on a
//! reader thread that stands in for the UART receive interrupt: it posts one
//! byte at a time into the shared [`RxMailbox`], paced at the configured
//! character time.
//!
//! The reader waits for the previous byte to be consumed before posting the
//! next one. On hardware this is the documented arrival-rate precondition;
//! an OS scheduler cannot guarantee it, so the host enforces it here.

use std::io::{BufReader, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use hal::{HalError, HalResult, UartConfig, UartPort};
use pwmgen_rx::RxMailbox;

use crate::sim::SimError;

/// Serial transmit side backed by a byte stream
pub struct StreamPort<W> {
    out: W,
    config: UartConfig,
}

impl<W: Write> StreamPort<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            config: UartConfig::default(),
        }
    }

    /// Borrow the underlying stream
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Line settings the port was configured with
    pub fn config(&self) -> &UartConfig {
        &self.config
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> UartPort for StreamPort<W> {
    fn configure(&mut self, config: &UartConfig) -> HalResult<()> {
        if !config.is_valid() {
            return Err(HalError::InvalidParameter);
        }
        self.config = config.clone();
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> HalResult<usize> {
        let written = self.out.write(data).map_err(|err| {
            log::warn!("transport: write failed: {}", err);
            HalError::HardwareError
        })?;
        // Blocking transmit: every message is on the wire before returning
        self.flush()?;
        Ok(written)
    }

    fn flush(&mut self) -> HalResult<()> {
        self.out.flush().map_err(|_| HalError::HardwareError)
    }
}

/// Running receive thread
pub struct ReaderHandle {
    finished: Arc<AtomicBool>,
    thread: JoinHandle<Result<u64, SimError>>,
}

impl ReaderHandle {
    /// Whether the input reached end of file
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    /// Wait for the reader; returns the number of bytes delivered
    pub fn join(self) -> Result<u64, SimError> {
        match self.thread.join() {
            Ok(result) => result,
            Err(_) => Err(SimError::Io(std::io::Error::other("reader thread panicked"))),
        }
    }
}

/// Start delivering `input` into `rx`, one byte per `char_time`
pub fn spawn_reader<R>(input: R, rx: &'static RxMailbox, char_time: Duration) -> ReaderHandle
where
    R: Read + Send + 'static,
{
    let finished = Arc::new(AtomicBool::new(false));
    let done = Arc::clone(&finished);

    let thread = thread::spawn(move || {
        let mut delivered = 0u64;
        let result = pump(input, rx, char_time, &mut delivered);
        done.store(true, Ordering::Release);
        log::debug!("transport: input closed after {} bytes", delivered);
        result
    });

    ReaderHandle { finished, thread }
}

fn pump<R: Read>(
    input: R,
    rx: &RxMailbox,
    char_time: Duration,
    delivered: &mut u64,
) -> Result<u64, SimError> {
    for byte in BufReader::new(input).bytes() {
        let byte = byte?;
        while rx.is_pending() {
            thread::sleep(char_time);
        }
        thread::sleep(char_time);
        rx.post(byte);
        *delivered += 1;
    }
    Ok(*delivered)
}
