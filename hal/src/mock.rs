//! In-memory collaborators for host tests
//!
//! Records every register write and transmitted byte so tests can assert on
//! exactly what the firmware did to the hardware.

use std::string::String;
use std::vec::Vec;

use crate::error::{HalError, HalResult};
use crate::interrupt::TimerEvents;
use crate::timer::PwmTimer;
use crate::uart::{UartConfig, UartPort};

/// Timer register that was written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    Period,
    Compare,
}

/// One recorded register write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterWrite {
    pub register: Register,
    pub value: u16,
    /// Whether edge events were masked when the write happened
    pub masked: bool,
}

/// Mock compare timer
#[derive(Debug)]
pub struct MockTimer {
    clock_hz: u32,
    period: u16,
    compare: u16,
    masked: bool,
    mask_calls: u32,
    writes: Vec<RegisterWrite>,
    fail_next: Option<HalError>,
}

impl MockTimer {
    /// Timer counting at `clock_hz` with the given power-on registers
    pub fn new(clock_hz: u32, period: u16, compare: u16) -> Self {
        Self {
            clock_hz,
            period,
            compare,
            masked: false,
            mask_calls: 0,
            writes: Vec::new(),
            fail_next: None,
        }
    }

    /// Every register write so far, oldest first
    pub fn writes(&self) -> &[RegisterWrite] {
        &self.writes
    }

    /// Forget recorded writes
    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }

    /// Number of `mask_events` calls
    pub fn mask_calls(&self) -> u32 {
        self.mask_calls
    }

    /// Make the next register write fail with `err`
    pub fn fail_next_write(&mut self, err: HalError) {
        self.fail_next = Some(err);
    }

    fn record(&mut self, register: Register, value: u16) -> HalResult<()> {
        if let Some(err) = self.fail_next.take() {
            return Err(err);
        }
        self.writes.push(RegisterWrite {
            register,
            value,
            masked: self.masked,
        });
        Ok(())
    }
}

impl PwmTimer for MockTimer {
    fn clock_hz(&self) -> u32 {
        self.clock_hz
    }

    fn period(&self) -> u16 {
        self.period
    }

    fn compare(&self) -> u16 {
        self.compare
    }

    fn set_period(&mut self, top: u16) -> HalResult<()> {
        self.record(Register::Period, top)?;
        self.period = top;
        Ok(())
    }

    fn set_compare(&mut self, value: u16) -> HalResult<()> {
        self.record(Register::Compare, value)?;
        self.compare = value;
        Ok(())
    }
}

impl TimerEvents for MockTimer {
    fn mask_events(&mut self) -> HalResult<()> {
        self.masked = true;
        self.mask_calls += 1;
        Ok(())
    }

    fn unmask_events(&mut self) -> HalResult<()> {
        self.masked = false;
        Ok(())
    }

    fn events_masked(&self) -> bool {
        self.masked
    }
}

/// Mock UART that captures transmitted bytes
#[derive(Debug, Default)]
pub struct MockUart {
    config: UartConfig,
    tx: Vec<u8>,
    fail_writes: bool,
}

impl MockUart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transmitted bytes, lossily decoded
    pub fn tx_string(&self) -> String {
        String::from_utf8_lossy(&self.tx).into_owned()
    }

    /// Transmitted bytes
    pub fn tx(&self) -> &[u8] {
        &self.tx
    }

    /// Take and clear the transmitted text
    pub fn take_tx(&mut self) -> String {
        let text = self.tx_string();
        self.tx.clear();
        text
    }

    /// Make every following write fail
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Last applied configuration
    pub fn config(&self) -> &UartConfig {
        &self.config
    }
}

impl UartPort for MockUart {
    fn configure(&mut self, config: &UartConfig) -> HalResult<()> {
        self.config = config.clone();
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> HalResult<usize> {
        if self.fail_writes {
            return Err(HalError::HardwareError);
        }
        self.tx.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> HalResult<()> {
        Ok(())
    }
}
