//! Timer reconfiguration engine
//!
//! Two operations change the output:
//!
//! - [`TimerEngine::set_duty_cycle`] clamps the request to `0..=254` and writes
//!   `compare = duty * period / 255`. It is the only writer of the compare
//!   register.
//! - [`TimerEngine::set_frequency`] clamps the request to `40..=65000` Hz,
//!   writes `period = clock / frequency - 1` and then re-derives the compare
//!   register from the *stored* duty, so `compare <= period` holds after every
//!   operation.
//!
//! Both run to completion synchronously. With [`UpdatePolicy::Masked`] the
//! timer's edge events are held off for the duration of the register writes,
//! so the output stage never sees a half-updated period/compare pair.

use hal::{PwmTimer, TimerEvents};
use pwmgen_core::command::Command;
use pwmgen_core::resolution::{duty_levels, has_full_resolution};
use pwmgen_core::setting::percent_of;
use pwmgen_core::{PwmResult, PwmSetting, Registers};

/// How register writes are protected against the timer's own edge events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdatePolicy {
    /// Mask edge events while registers are written
    #[default]
    Masked,
    /// Write registers while edges keep firing; a cycle straddling the update
    /// may come out inverted or skipped
    Torn,
}

/// Engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub policy: UpdatePolicy,
    /// Setting the device assumes at power-on
    pub initial: PwmSetting,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            policy: UpdatePolicy::default(),
            initial: PwmSetting::DEFAULT,
        }
    }
}

impl EngineConfig {
    /// Sets the register update policy.
    pub fn policy(mut self, policy: UpdatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the assumed power-on setting.
    pub fn initial(mut self, initial: PwmSetting) -> Self {
        self.initial = initial;
        self
    }
}

/// Result of a duty change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DutyReport {
    /// Effective (clamped) duty value
    pub duty_cycle: u8,
    /// `duty_cycle * 100 / 255`, truncated
    pub percent: u32,
    /// Registers after the write
    pub registers: Registers,
}

/// Result of a frequency change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyReport {
    /// The duty rescale that ran as part of the change
    pub duty: DutyReport,
    /// Effective (clamped) frequency
    pub frequency_hz: u32,
}

/// What applying a command did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Duty(DutyReport),
    Frequency(FrequencyReport),
    Ignored,
}

/// Owns the PWM setting and the timer it is programmed into
pub struct TimerEngine<T> {
    timer: T,
    setting: PwmSetting,
    policy: UpdatePolicy,
}

impl<T: PwmTimer + TimerEvents> TimerEngine<T> {
    /// Engine over a timer that already holds its power-on registers
    pub fn new(timer: T) -> Self {
        Self::with_config(timer, EngineConfig::default())
    }

    /// Engine with an explicit configuration
    pub fn with_config(timer: T, config: EngineConfig) -> Self {
        Self {
            timer,
            setting: config.initial,
            policy: config.policy,
        }
    }

    /// Set the duty cycle; `raw` is clamped to `0..=254`
    pub fn set_duty_cycle(&mut self, raw: u32) -> PwmResult<DutyReport> {
        let duty = PwmSetting::clamp_duty(raw);
        let report = self.guarded(|timer| write_compare(timer, duty))?;
        self.setting.duty_cycle = duty;
        Ok(report)
    }

    /// Set the output frequency; `raw` is clamped to `40..=65000` Hz
    ///
    /// The compare register is rescaled against the new period using the
    /// stored duty cycle; the duty value itself does not change.
    pub fn set_frequency(&mut self, raw: u32) -> PwmResult<FrequencyReport> {
        let frequency_hz = PwmSetting::clamp_frequency(raw);
        let period = Registers::period_for(frequency_hz, self.timer.clock_hz())?;
        let duty = self.setting.duty_cycle;

        let report = self.guarded(|timer| {
            timer.set_period(period)?;
            write_compare(timer, duty)
        })?;
        self.setting.frequency_hz = frequency_hz;

        if !has_full_resolution(period) {
            log::debug!(
                "engine: {} Hz leaves {} of 255 duty levels",
                frequency_hz,
                duty_levels(period)
            );
        }

        Ok(FrequencyReport {
            duty: report,
            frequency_hz,
        })
    }

    /// Apply a parsed command
    pub fn apply(&mut self, command: Command) -> PwmResult<Applied> {
        match command {
            Command::SetDuty(raw) => self.set_duty_cycle(raw).map(Applied::Duty),
            Command::SetFrequency(raw) => self.set_frequency(raw).map(Applied::Frequency),
            Command::Unrecognized => Ok(Applied::Ignored),
        }
    }

    /// Current effective setting
    pub fn setting(&self) -> PwmSetting {
        self.setting
    }

    /// Current register values, read back from the timer
    pub fn registers(&self) -> Registers {
        Registers {
            period: self.timer.period(),
            compare: self.timer.compare(),
        }
    }

    /// Register update policy in force
    pub fn policy(&self) -> UpdatePolicy {
        self.policy
    }

    /// Borrow the timer
    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Mutably borrow the timer
    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    /// Release the timer
    pub fn release(self) -> T {
        self.timer
    }

    /// Run a register update under the configured policy
    ///
    /// Events are unmasked again even when the update fails.
    fn guarded<R>(&mut self, update: impl FnOnce(&mut T) -> PwmResult<R>) -> PwmResult<R> {
        match self.policy {
            UpdatePolicy::Torn => update(&mut self.timer),
            UpdatePolicy::Masked => {
                self.timer.mask_events()?;
                let result = update(&mut self.timer);
                let unmasked = self.timer.unmask_events();
                let value = result?;
                unmasked?;
                Ok(value)
            }
        }
    }
}

/// Write `duty * period / 255` against the timer's current period
fn write_compare<T: PwmTimer>(timer: &mut T, duty: u8) -> PwmResult<DutyReport> {
    let period = timer.period();
    let compare = Registers::compare_for(duty, period);
    timer.set_compare(compare)?;
    log::debug!("engine: duty {} -> period={} compare={}", duty, period, compare);

    Ok(DutyReport {
        duty_cycle: duty,
        percent: percent_of(duty),
        registers: Registers { period, compare },
    })
}
