//! Duty-cycle resolution
//!
//! The compare register is `duty * period / 255`. Once the period register
//! drops below 255 the step between adjacent duty values is less than one
//! count and neighbouring duty values collapse onto the same compare value.
//! On the reference 2 MHz timer that happens above 7812 Hz. This is a
//! property of the hardware, reported here and never compensated.

use crate::config::{DUTY_SCALE, MAX_DUTY};
use crate::setting::Registers;

/// Number of distinct compare values reachable by duty `0..=MAX_DUTY`
pub fn duty_levels(period: u16) -> u16 {
    let mut levels = 0;
    let mut last = None;
    for duty in 0..=MAX_DUTY {
        let compare = Registers::compare_for(duty, period);
        if last != Some(compare) {
            levels += 1;
            last = Some(compare);
        }
    }
    levels
}

/// Whether every duty value maps to its own compare value
pub const fn has_full_resolution(period: u16) -> bool {
    period as u32 >= DUTY_SCALE
}

/// Highest frequency that keeps full duty resolution on a timer counting at
/// `clock_hz`
pub const fn full_resolution_limit_hz(clock_hz: u32) -> u32 {
    clock_hz / (DUTY_SCALE + 1)
}
