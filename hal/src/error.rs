//! Common error types for HAL operations

use core::fmt;

/// HAL operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalError {
    /// Invalid parameter provided (e.g. a zero baud rate)
    InvalidParameter,
    /// Peripheral is busy
    Busy,
    /// Output pin could not be driven
    PinError,
    /// Hardware error occurred
    HardwareError,
}

impl fmt::Display for HalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter => write!(f, "invalid parameter"),
            Self::Busy => write!(f, "peripheral busy"),
            Self::PinError => write!(f, "output pin error"),
            Self::HardwareError => write!(f, "hardware error"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HalError {}

#[cfg(feature = "defmt")]
impl defmt::Format for HalError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidParameter => defmt::write!(fmt, "InvalidParameter"),
            Self::Busy => defmt::write!(fmt, "Busy"),
            Self::PinError => defmt::write!(fmt, "PinError"),
            Self::HardwareError => defmt::write!(fmt, "HardwareError"),
        }
    }
}

/// Result type for HAL operations
pub type HalResult<T> = Result<T, HalError>;

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::string::ToString;

    #[test]
    fn messages() {
        assert_eq!(HalError::InvalidParameter.to_string(), "invalid parameter");
        assert_eq!(HalError::Busy.to_string(), "peripheral busy");
        assert_eq!(HalError::PinError.to_string(), "output pin error");
        assert_eq!(HalError::HardwareError.to_string(), "hardware error");
    }
}
