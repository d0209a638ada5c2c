//! UART (Universal Asynchronous Receiver/Transmitter) abstraction
//!
//! Reception is interrupt driven and delivered one byte at a time through a
//! [`ByteSource`]; transmission is synchronous through a [`UartPort`].

use crate::error::HalResult;

/// UART data bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBits {
    Seven,
    Eight,
}

/// UART stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBits {
    One,
    Two,
}

/// UART parity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// UART configuration
///
/// The default is the command session's framing: 250000 baud, 8N1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UartConfig {
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub stop_bits: StopBits,
    pub parity: Parity,
}

impl UartConfig {
    /// Default session baud rate
    pub const DEFAULT_BAUD: u32 = 250_000;

    /// Configuration with the given baud rate and 8N1 framing
    pub const fn with_baud(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            data_bits: DataBits::Eight,
            stop_bits: StopBits::One,
            parity: Parity::None,
        }
    }

    /// Bits on the wire per character, including start and stop bits
    pub const fn frame_bits(&self) -> u32 {
        let data = match self.data_bits {
            DataBits::Seven => 7,
            DataBits::Eight => 8,
        };
        let stop = match self.stop_bits {
            StopBits::One => 1,
            StopBits::Two => 2,
        };
        let parity = match self.parity {
            Parity::None => 0,
            Parity::Even | Parity::Odd => 1,
        };
        1 + data + parity + stop
    }

    /// Whether a port can run with these settings
    pub const fn is_valid(&self) -> bool {
        self.baud_rate != 0
    }

    /// Time between two back-to-back characters, in nanoseconds
    ///
    /// Only meaningful for a valid config.
    pub const fn char_time_ns(&self) -> u64 {
        (self.frame_bits() as u64 * 1_000_000_000) / self.baud_rate as u64
    }
}

impl Default for UartConfig {
    fn default() -> Self {
        Self::with_baud(Self::DEFAULT_BAUD)
    }
}

/// UART transmit side
pub trait UartPort {
    /// Configure UART parameters
    fn configure(&mut self, config: &UartConfig) -> HalResult<()>;

    /// Write data (blocking until the transmitter accepted it)
    fn write(&mut self, data: &[u8]) -> HalResult<usize>;

    /// Flush TX buffer
    fn flush(&mut self) -> HalResult<()>;

    /// Write the whole slice, retrying partial writes
    fn write_all(&mut self, mut data: &[u8]) -> HalResult<()> {
        while !data.is_empty() {
            let written = self.write(data)?;
            if written == 0 {
                return Err(crate::HalError::Busy);
            }
            data = &data[written..];
        }
        Ok(())
    }
}

/// UART receive side, one byte at a time
///
/// `read` returns `nb::Error::WouldBlock` when no byte has arrived since the
/// last call.
pub trait ByteSource {
    /// Take the most recently received byte
    fn read(&mut self) -> nb::Result<u8, crate::HalError>;
}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    fn read(&mut self) -> nb::Result<u8, crate::HalError> {
        (**self).read()
    }
}
