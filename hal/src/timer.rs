//! Compare timer abstraction
//!
//! The PWM output is produced by a free-running counter with two registers:
//!
//! - the *period* register is the top count; the counter wraps after
//!   `period + 1` ticks, so `frequency = clock_hz / (period + 1)`
//! - the *compare* register is the count at which the output is deasserted
//!   within a cycle, so `duty = compare / period`
//!
//! Each wrap raises [`TimerEdge::PeriodElapsed`], which asserts the output,
//! and each compare match raises [`TimerEdge::CompareMatched`], which
//! deasserts it. [`OutputStage`] performs exactly that mapping.

use embedded_hal::digital::OutputPin;

use crate::error::{HalError, HalResult};

/// Edge events raised by a compare timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEdge {
    /// Counter reached the period register and wrapped
    PeriodElapsed,
    /// Counter reached the compare register
    CompareMatched,
}

/// Two-register compare timer
pub trait PwmTimer {
    /// Counting rate after the prescaler, in counts per second
    fn clock_hz(&self) -> u32;

    /// Current period register value
    fn period(&self) -> u16;

    /// Current compare register value
    fn compare(&self) -> u16;

    /// Write the period register
    fn set_period(&mut self, top: u16) -> HalResult<()>;

    /// Write the compare register
    fn set_compare(&mut self, value: u16) -> HalResult<()>;
}

/// Drives an output pin from timer edge events
///
/// This is the body of the two timer interrupt handlers. It never touches
/// command engine state.
pub struct OutputStage<P> {
    pin: P,
}

impl<P: OutputPin> OutputStage<P> {
    /// Wrap an output pin; the pin is left as configured by the caller
    pub const fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Handle one timer edge
    pub fn on_edge(&mut self, edge: TimerEdge) -> HalResult<()> {
        match edge {
            TimerEdge::PeriodElapsed => self.pin.set_high(),
            TimerEdge::CompareMatched => self.pin.set_low(),
        }
        .map_err(|_| HalError::PinError)
    }

    /// Borrow the underlying pin
    pub fn pin(&self) -> &P {
        &self.pin
    }

    /// Release the underlying pin
    pub fn release(self) -> P {
        self.pin
    }
}
