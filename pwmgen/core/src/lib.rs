#![no_std]
#![forbid(unsafe_code)]

//! # PWM Generator Core
//!
//! Types shared by every layer of the PWM generator: the compile-time
//! configuration, the PWM setting and its register image, the serial command
//! parser and the duty-resolution arithmetic.

use core::fmt;

use hal::HalError;

pub mod command;
pub mod config;
pub mod resolution;
pub mod setting;

pub use command::{parse, parse_all, Command};
pub use setting::{PwmSetting, Registers};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type used throughout the PWM generator
pub type PwmResult<T> = Result<T, PwmError>;

/// Errors raised by the PWM generator's collaborators
///
/// None of these reach the serial session; the command loop logs them and
/// keeps running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmError {
    /// Timer or transport failure
    Hal(HalError),
    /// Formatted message does not fit the transmit buffer
    TxOverflow,
    /// Computed register value does not fit 16 bits
    RegisterRange,
}

impl From<HalError> for PwmError {
    fn from(err: HalError) -> Self {
        PwmError::Hal(err)
    }
}

impl fmt::Display for PwmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PwmError::Hal(err) => write!(f, "hardware: {}", err),
            PwmError::TxOverflow => write!(f, "message exceeds transmit buffer"),
            PwmError::RegisterRange => write!(f, "register value out of range"),
        }
    }
}

#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "std")]
impl std::error::Error for PwmError {}

#[cfg(feature = "defmt")]
impl defmt::Format for PwmError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            PwmError::Hal(err) => defmt::write!(fmt, "Hal({})", err),
            PwmError::TxOverflow => defmt::write!(fmt, "TxOverflow"),
            PwmError::RegisterRange => defmt::write!(fmt, "RegisterRange"),
        }
    }
}
