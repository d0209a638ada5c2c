//! POSIX port of the PWM generator.
//!
//! Hosts the unmodified command engine on Linux/Unix: the compare timer is
//! simulated in software, the serial link is the process's stdin/stdout, and
//! a reader thread plays the part of the UART receive interrupt.

pub mod logger;
pub mod sim;
pub mod transport;

use std::io::Write;

use hal::{UartConfig, UartPort};
use pwmgen_core::config::{BAUD_RATE, RESET_COMPARE, RESET_PERIOD, TIMER_CLOCK_HZ};
use pwmgen_engine::{EngineConfig, Reporter, Session, TimerEngine, UpdatePolicy};
use pwmgen_rx::LineCollector;

pub use sim::{SimError, SimPin, SimTimer, Waveform};
pub use transport::{spawn_reader, ReaderHandle, StreamPort};

/// Session type hosted by this port
pub type PosixSession<W> = Session<SimTimer, StreamPort<W>>;

/// Runtime options for a hosted session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PosixConfig {
    pub policy: UpdatePolicy,
    pub timeout_polls: u16,
    /// Serial line rate the transport is configured for
    pub baud_rate: u32,
}

impl Default for PosixConfig {
    fn default() -> Self {
        Self {
            policy: UpdatePolicy::default(),
            timeout_polls: pwmgen_core::config::IDLE_TIMEOUT_POLLS,
            baud_rate: BAUD_RATE,
        }
    }
}

/// Build a session over a power-on simulated timer, reporting to `out`
pub fn session<W: Write>(out: W, config: PosixConfig) -> Result<PosixSession<W>, SimError> {
    let mut port = StreamPort::new(out);
    port.configure(&UartConfig::with_baud(config.baud_rate))?;

    let timer = SimTimer::new(TIMER_CLOCK_HZ, RESET_PERIOD, RESET_COMPARE);
    let engine = TimerEngine::with_config(timer, EngineConfig::default().policy(config.policy));
    Ok(Session::with_collector(
        engine,
        Reporter::new(port),
        LineCollector::with_timeout(config.timeout_polls),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pwmgen_rx::RxMailbox;

    #[test]
    fn session_reports_to_stream() {
        let mut session = session(Vec::new(), PosixConfig::default()).unwrap();
        let rx = RxMailbox::new();

        session.start();
        let mut bytes = b"PWM=64\n".iter().copied();
        rx.post(bytes.next().unwrap());
        let outcome = session
            .poll(&rx, || {
                if let Some(byte) = bytes.next() {
                    rx.post(byte);
                }
            })
            .expect("line should be collected");

        assert!(outcome.echoed);
        let out = String::from_utf8(session.reporter().port().get_ref().clone()).unwrap();
        assert_eq!(
            out,
            "Init done.\nPWM set to 25%\nMatch A\t1999\nMatch B\t501\nPWM=64\r\n"
        );
    }

    #[test]
    fn session_configures_transport() {
        let config = PosixConfig {
            baud_rate: 115_200,
            ..PosixConfig::default()
        };
        let session = session(Vec::new(), config).unwrap();
        assert_eq!(session.reporter().port().config().baud_rate, 115_200);
    }

    #[test]
    fn session_rejects_zero_baud() {
        let config = PosixConfig {
            baud_rate: 0,
            ..PosixConfig::default()
        };
        assert!(matches!(
            session(Vec::new(), config),
            Err(SimError::Hal(hal::HalError::InvalidParameter))
        ));
    }
}
