//! Register arithmetic properties of the timer engine

use hal::mock::MockTimer;
use pwmgen_core::config::{RESET_COMPARE, RESET_PERIOD, TIMER_CLOCK_HZ};
use pwmgen_engine::TimerEngine;

fn engine() -> TimerEngine<MockTimer> {
    TimerEngine::new(MockTimer::new(TIMER_CLOCK_HZ, RESET_PERIOD, RESET_COMPARE))
}

const FREQUENCIES: [u32; 8] = [0, 40, 55, 1000, 2000, 7812, 40_436, 65_000];

#[test]
fn duty_compare_follows_formula_at_every_frequency() {
    let mut engine = engine();
    for frequency in FREQUENCIES {
        engine.set_frequency(frequency).unwrap();
        let period = engine.registers().period as u32;

        for raw in 0..=300u32 {
            let report = engine.set_duty_cycle(raw).unwrap();
            let expected = raw.min(254) * period / 255;

            assert_eq!(report.registers.compare as u32, expected);
            assert!(report.registers.compare <= report.registers.period);
        }
    }
}

#[test]
fn frequency_period_follows_formula_and_keeps_duty() {
    let mut engine = engine();
    engine.set_duty_cycle(77).unwrap();

    for raw in [0u32, 39, 40, 41, 999, 1000, 2000, 30_000, 65_000, 65_001, 99_999] {
        let report = engine.set_frequency(raw).unwrap();
        let effective = raw.clamp(40, 65_000);
        let period = 2_000_000 / effective - 1;

        assert_eq!(report.frequency_hz, effective);
        assert_eq!(report.duty.registers.period as u32, period);
        assert_eq!(report.duty.registers.compare as u32, 77 * period / 255);
        assert_eq!(engine.setting().duty_cycle, 77);
    }
}

#[test]
fn first_command_replaces_power_on_compare() {
    let mut engine = engine();
    assert_eq!(engine.registers().compare, 1000);

    // Default duty 127 against the power-on period
    let report = engine.set_duty_cycle(127).unwrap();
    assert_eq!(report.registers.compare, 995);
}
