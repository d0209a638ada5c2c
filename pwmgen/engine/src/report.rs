//! Status reporter
//!
//! Every acknowledgement is formatted into a bounded transmit buffer and then
//! written to the port in one blocking call, so messages leave in the order
//! they were produced.

use core::fmt::{self, Write};

use hal::UartPort;
use heapless::String;
use pwmgen_core::config::{BANNER, TX_BUFFER_LEN};
use pwmgen_core::{PwmError, PwmResult};

use crate::engine::{Applied, DutyReport, FrequencyReport};

/// Writes acknowledgements to the serial transport
pub struct Reporter<P> {
    port: P,
}

impl<P: UartPort> Reporter<P> {
    pub const fn new(port: P) -> Self {
        Self { port }
    }

    /// `Init done.`, sent once before the command loop starts
    pub fn banner(&mut self) -> PwmResult<()> {
        self.port.write_all(BANNER.as_bytes())?;
        Ok(())
    }

    /// Duty acknowledgement followed by both register values
    pub fn duty(&mut self, report: &DutyReport) -> PwmResult<()> {
        self.send(format_args!("PWM set to {}%\n", report.percent))?;
        self.send(format_args!(
            "Match A\t{}\nMatch B\t{}\n",
            report.registers.period, report.registers.compare
        ))
    }

    /// Frequency acknowledgement, after the duty rescale it triggered
    pub fn frequency(&mut self, report: &FrequencyReport) -> PwmResult<()> {
        self.duty(&report.duty)?;
        self.send(format_args!("Frequency set to {} Hz\n", report.frequency_hz))
    }

    /// Report whatever a command did; ignored commands produce nothing
    pub fn applied(&mut self, applied: &Applied) -> PwmResult<()> {
        match applied {
            Applied::Duty(report) => self.duty(report),
            Applied::Frequency(report) => self.frequency(report),
            Applied::Ignored => Ok(()),
        }
    }

    /// Echo a received line followed by CR LF
    pub fn echo(&mut self, text: &[u8]) -> PwmResult<()> {
        self.port.write_all(text)?;
        self.port.write_all(b"\r\n")?;
        Ok(())
    }

    /// Borrow the port
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Mutably borrow the port
    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Release the port
    pub fn release(self) -> P {
        self.port
    }

    fn send(&mut self, args: fmt::Arguments<'_>) -> PwmResult<()> {
        let mut buf: String<TX_BUFFER_LEN> = String::new();
        buf.write_fmt(args).map_err(|_| PwmError::TxOverflow)?;
        self.port.write_all(buf.as_bytes())?;
        Ok(())
    }
}
