//! PWM setting and timer register image

use core::fmt;

use crate::config::{
    DEFAULT_DUTY, DEFAULT_FREQUENCY_HZ, DUTY_SCALE, MAX_DUTY, MAX_FREQUENCY_HZ, MIN_FREQUENCY_HZ,
    RESET_COMPARE, RESET_PERIOD,
};
use crate::{PwmError, PwmResult};

/// Effective PWM setting
///
/// `frequency_hz` always lies in `MIN_FREQUENCY_HZ..=MAX_FREQUENCY_HZ` and
/// `duty_cycle` in `0..=MAX_DUTY`, where 255 would mean 100%.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwmSetting {
    pub frequency_hz: u32,
    pub duty_cycle: u8,
}

impl PwmSetting {
    /// Power-on setting: 1 kHz, 50% duty
    pub const DEFAULT: Self = Self {
        frequency_hz: DEFAULT_FREQUENCY_HZ,
        duty_cycle: DEFAULT_DUTY,
    };

    /// Clamp a requested duty value to `0..=MAX_DUTY`
    pub const fn clamp_duty(raw: u32) -> u8 {
        if raw > MAX_DUTY as u32 {
            MAX_DUTY
        } else {
            raw as u8
        }
    }

    /// Clamp a requested frequency to `MIN_FREQUENCY_HZ..=MAX_FREQUENCY_HZ`
    pub const fn clamp_frequency(raw: u32) -> u32 {
        if raw < MIN_FREQUENCY_HZ {
            MIN_FREQUENCY_HZ
        } else if raw > MAX_FREQUENCY_HZ {
            MAX_FREQUENCY_HZ
        } else {
            raw
        }
    }

    /// Duty cycle as a whole percentage, truncated
    pub const fn duty_percent(&self) -> u32 {
        percent_of(self.duty_cycle)
    }
}

impl Default for PwmSetting {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for PwmSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz @ {}/255", self.frequency_hz, self.duty_cycle)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PwmSetting {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{} Hz @ {}/255", self.frequency_hz, self.duty_cycle);
    }
}

/// Duty value expressed as a whole percentage, truncated
pub const fn percent_of(duty: u8) -> u32 {
    (duty as u32 * 100) / DUTY_SCALE
}

/// Period and compare register image
///
/// Invariant: `compare <= period` once any command has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pub period: u16,
    pub compare: u16,
}

impl Registers {
    /// Register values programmed at power-on
    pub const RESET: Self = Self {
        period: RESET_PERIOD,
        compare: RESET_COMPARE,
    };

    /// Period register that yields `frequency_hz` on a timer counting at
    /// `clock_hz`: `clock_hz / frequency_hz - 1`
    pub fn period_for(frequency_hz: u32, clock_hz: u32) -> PwmResult<u16> {
        if frequency_hz == 0 || frequency_hz > clock_hz {
            return Err(PwmError::RegisterRange);
        }
        let top = clock_hz / frequency_hz - 1;
        u16::try_from(top).map_err(|_| PwmError::RegisterRange)
    }

    /// Compare register for `duty` against `period`: `duty * period / 255`
    ///
    /// Computed in 32 bits; the result never exceeds `period`.
    pub const fn compare_for(duty: u8, period: u16) -> u16 {
        ((duty as u32 * period as u32) / DUTY_SCALE) as u16
    }

    /// Output frequency these registers produce on a timer counting at
    /// `clock_hz`
    pub const fn frequency_hz(&self, clock_hz: u32) -> u32 {
        clock_hz / (self.period as u32 + 1)
    }

    /// Whether the compare register lies within the period
    pub const fn is_consistent(&self) -> bool {
        self.compare <= self.period
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::RESET
    }
}

impl fmt::Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "period={} compare={}", self.period, self.compare)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Registers {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "period={} compare={}", self.period, self.compare);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TIMER_CLOCK_HZ;

    #[test]
    fn test_duty_clamp() {
        assert_eq!(PwmSetting::clamp_duty(0), 0);
        assert_eq!(PwmSetting::clamp_duty(254), 254);
        assert_eq!(PwmSetting::clamp_duty(255), 254);
        assert_eq!(PwmSetting::clamp_duty(999), 254);
    }

    #[test]
    fn test_frequency_clamp() {
        assert_eq!(PwmSetting::clamp_frequency(0), 40);
        assert_eq!(PwmSetting::clamp_frequency(39), 40);
        assert_eq!(PwmSetting::clamp_frequency(40), 40);
        assert_eq!(PwmSetting::clamp_frequency(65_000), 65_000);
        assert_eq!(PwmSetting::clamp_frequency(99_999), 65_000);
    }

    #[test]
    fn test_percent_truncates() {
        assert_eq!(percent_of(127), 49);
        assert_eq!(percent_of(128), 50);
        assert_eq!(percent_of(254), 99);
        assert_eq!(PwmSetting::DEFAULT.duty_percent(), 49);
    }

    #[test]
    fn test_period_for_reference_clock() {
        assert_eq!(Registers::period_for(2000, TIMER_CLOCK_HZ), Ok(999));
        assert_eq!(Registers::period_for(1000, TIMER_CLOCK_HZ), Ok(1999));
        assert_eq!(Registers::period_for(40, TIMER_CLOCK_HZ), Ok(49_999));
        assert_eq!(Registers::period_for(65_000, TIMER_CLOCK_HZ), Ok(29));
    }

    #[test]
    fn test_period_for_out_of_range() {
        assert_eq!(
            Registers::period_for(0, TIMER_CLOCK_HZ),
            Err(PwmError::RegisterRange)
        );
        // 2 MHz / 30 Hz does not fit 16 bits
        assert_eq!(
            Registers::period_for(30, TIMER_CLOCK_HZ),
            Err(PwmError::RegisterRange)
        );
    }

    #[test]
    fn test_compare_never_exceeds_period() {
        for period in [0u16, 1, 29, 254, 255, 999, 49_999, u16::MAX] {
            for duty in 0..=u8::MAX {
                assert!(Registers::compare_for(duty, period) <= period);
            }
        }
    }

    #[test]
    fn test_reset_registers_match_one_kilohertz() {
        assert_eq!(Registers::RESET.frequency_hz(TIMER_CLOCK_HZ), 1000);
    }
}
