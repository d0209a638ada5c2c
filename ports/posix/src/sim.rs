//! Software compare timer
//!
//! Counts in CTC fashion: the counter runs `0..=period`, wraps to zero with a
//! period-elapsed edge and raises a compare-matched edge when it equals the
//! compare register. Edges are dropped while masked.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};
use hal::{HalError, HalResult, OutputStage, PwmTimer, TimerEdge, TimerEvents};
use pwmgen_core::Registers;
use thiserror::Error;

/// Errors raised by the POSIX port
#[derive(Debug, Error)]
pub enum SimError {
    #[error("hal: {0}")]
    Hal(#[from] HalError),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Output pin that remembers its level
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SimPin {
    high: bool,
}

impl SimPin {
    pub fn is_high(&self) -> bool {
        self.high
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high = true;
        Ok(())
    }
}

/// One output cycle as produced by a register pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Waveform {
    pub frequency_hz: u32,
    /// Counts per cycle, `period + 1`
    pub cycle_counts: u32,
    /// Counts the output was high
    pub high_counts: u32,
}

impl Waveform {
    /// Run one full cycle of `registers` through an output stage
    pub fn of(registers: Registers, clock_hz: u32) -> Self {
        let mut timer = SimTimer::new(clock_hz, registers.period, registers.compare);
        let mut stage = OutputStage::new(SimPin::default());
        let cycle_counts = registers.period as u32 + 1;

        // Align to the start of a cycle
        timer.counter = registers.period;
        let mut high_counts = 0;
        for _ in 0..cycle_counts {
            timer.tick(&mut stage);
            if stage.pin().is_high() {
                high_counts += 1;
            }
        }

        Self {
            frequency_hz: registers.frequency_hz(clock_hz),
            cycle_counts,
            high_counts,
        }
    }

    /// High time as a fraction of the cycle, in per mille
    pub fn duty_permille(&self) -> u32 {
        self.high_counts * 1000 / self.cycle_counts
    }
}

/// Simulated compare timer
#[derive(Debug, Clone)]
pub struct SimTimer {
    clock_hz: u32,
    period: u16,
    compare: u16,
    counter: u16,
    masked: bool,
    dropped_edges: u64,
}

impl SimTimer {
    pub fn new(clock_hz: u32, period: u16, compare: u16) -> Self {
        Self {
            clock_hz,
            period,
            compare,
            counter: 0,
            masked: false,
            dropped_edges: 0,
        }
    }

    /// Advance one count, delivering any edges to `stage`
    pub fn tick<P: OutputPin>(&mut self, stage: &mut OutputStage<P>) -> Option<TimerEdge> {
        let mut last = None;
        if self.counter >= self.period {
            self.counter = 0;
            last = self.raise(TimerEdge::PeriodElapsed, stage).or(last);
        } else {
            self.counter += 1;
        }
        if self.counter == self.compare {
            last = self.raise(TimerEdge::CompareMatched, stage).or(last);
        }
        last
    }

    /// Advance `counts` counts
    pub fn advance<P: OutputPin>(&mut self, counts: u32, stage: &mut OutputStage<P>) {
        for _ in 0..counts {
            self.tick(stage);
        }
    }

    /// Current counter value
    pub fn counter(&self) -> u16 {
        self.counter
    }

    /// Edges suppressed while events were masked
    pub fn dropped_edges(&self) -> u64 {
        self.dropped_edges
    }

    /// The waveform the current registers produce
    pub fn waveform(&self) -> Waveform {
        Waveform::of(
            Registers {
                period: self.period,
                compare: self.compare,
            },
            self.clock_hz,
        )
    }

    fn raise<P: OutputPin>(
        &mut self,
        edge: TimerEdge,
        stage: &mut OutputStage<P>,
    ) -> Option<TimerEdge> {
        if self.masked {
            self.dropped_edges += 1;
            return None;
        }
        if let Err(err) = stage.on_edge(edge) {
            log::warn!("sim: {:?} not delivered: {}", edge, err);
        }
        Some(edge)
    }
}

impl PwmTimer for SimTimer {
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
        self.period = top;
        Ok(())
    }

    fn set_compare(&mut self, value: u16) -> HalResult<()> {
        self.compare = value;
        Ok(())
    }
}

impl TimerEvents for SimTimer {
    fn mask_events(&mut self) -> HalResult<()> {
        self.masked = true;
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
