//! Single-byte receive mailbox shared with the UART interrupt

use core::cell::Cell;
use core::convert::Infallible;

use critical_section::Mutex;
use hal::{ByteSource, HalError};

#[derive(Debug, Clone, Copy)]
struct Slot {
    byte: u8,
    pending: bool,
    overruns: u32,
}

impl Slot {
    const EMPTY: Self = Self {
        byte: 0,
        pending: false,
        overruns: 0,
    };
}

/// Latest received byte plus a pending flag
///
/// Single producer (the receive interrupt), single consumer (the main loop).
/// Posting while a byte is still pending overwrites it and counts an overrun;
/// there is no backpressure.
///
/// ```
/// use pwmgen_rx::RxMailbox;
///
/// static RX: RxMailbox = RxMailbox::new();
///
/// RX.post(b'P');
/// assert_eq!(RX.try_take(), Some(b'P'));
/// assert_eq!(RX.try_take(), None);
/// ```
pub struct RxMailbox {
    slot: Mutex<Cell<Slot>>,
}

impl RxMailbox {
    /// Create an empty mailbox
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Cell::new(Slot::EMPTY)),
        }
    }

    /// Store a received byte; called from the receive interrupt
    pub fn post(&self, byte: u8) {
        critical_section::with(|cs| {
            let cell = self.slot.borrow(cs);
            let mut slot = cell.get();
            if slot.pending {
                slot.overruns = slot.overruns.wrapping_add(1);
            }
            slot.byte = byte;
            slot.pending = true;
            cell.set(slot);
        });
    }

    /// Take the pending byte, clearing the flag
    pub fn take(&self) -> nb::Result<u8, Infallible> {
        self.try_take().ok_or(nb::Error::WouldBlock)
    }

    /// Take the pending byte if there is one
    pub fn try_take(&self) -> Option<u8> {
        critical_section::with(|cs| {
            let cell = self.slot.borrow(cs);
            let mut slot = cell.get();
            if !slot.pending {
                return None;
            }
            slot.pending = false;
            cell.set(slot);
            Some(slot.byte)
        })
    }

    /// Whether a byte is waiting
    pub fn is_pending(&self) -> bool {
        critical_section::with(|cs| self.slot.borrow(cs).get().pending)
    }

    /// Drop any pending byte without reading it
    pub fn discard(&self) {
        critical_section::with(|cs| {
            let cell = self.slot.borrow(cs);
            let mut slot = cell.get();
            slot.pending = false;
            cell.set(slot);
        });
    }

    /// Bytes overwritten before the consumer read them
    pub fn overruns(&self) -> u32 {
        critical_section::with(|cs| self.slot.borrow(cs).get().overruns)
    }
}

impl Default for RxMailbox {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteSource for &RxMailbox {
    fn read(&mut self) -> nb::Result<u8, HalError> {
        self.try_take().ok_or(nb::Error::WouldBlock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mailbox_would_block() {
        let rx = RxMailbox::new();
        assert!(!rx.is_pending());
        assert_eq!(rx.take(), Err(nb::Error::WouldBlock));
    }

    #[test]
    fn test_take_clears_pending() {
        let rx = RxMailbox::new();
        rx.post(b'A');
        assert!(rx.is_pending());
        assert_eq!(rx.take(), Ok(b'A'));
        assert!(!rx.is_pending());
        assert_eq!(rx.try_take(), None);
    }

    #[test]
    fn test_last_write_wins() {
        let rx = RxMailbox::new();
        rx.post(b'A');
        rx.post(b'B');
        assert_eq!(rx.try_take(), Some(b'B'));
        assert_eq!(rx.overruns(), 1);
    }

    #[test]
    fn test_discard() {
        let rx = RxMailbox::new();
        rx.post(b'\n');
        rx.discard();
        assert!(!rx.is_pending());
        assert_eq!(rx.overruns(), 0);
    }

    #[test]
    fn test_byte_source_view() {
        let rx = RxMailbox::new();
        let mut source = &rx;
        assert_eq!(source.read(), Err(nb::Error::WouldBlock));
        rx.post(b'F');
        assert_eq!(source.read(), Ok(b'F'));
    }
}
