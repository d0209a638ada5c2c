//! Command parser tests for pwmgen-core
//! These tests run on the host with std, against no_std compatible code

use pwmgen_core::command::{parse, parse_all, Command};

#[test]
fn test_duty_command() {
    assert_eq!(parse(b"PWM=128"), Command::SetDuty(128));
}

#[test]
fn test_frequency_command() {
    assert_eq!(parse(b"FREQ=40436"), Command::SetFrequency(40436));
}

#[test]
fn test_overlong_duty_is_not_rejected() {
    // Range enforcement is the engine's job
    assert_eq!(parse(b"PWM=999"), Command::SetDuty(999));
}

#[test]
fn test_sanitized_line_with_trailing_terminators() {
    let mut line = [0u8; 50];
    line[..8].copy_from_slice(b"FREQ=55\0");
    assert_eq!(parse(&line), Command::SetFrequency(55));
}

#[test]
fn test_partial_prefix_is_unrecognized() {
    assert_eq!(parse(b"FR"), Command::Unrecognized);
    assert_eq!(parse_all(b"FR").count(), 0);
}

#[test]
fn test_leading_space_is_not_a_command() {
    assert_eq!(parse(b" PWM=10"), Command::Unrecognized);
}

#[test]
fn test_command_display() {
    assert_eq!(format!("{}", Command::SetDuty(12)), "PWM=12");
    assert_eq!(format!("{}", Command::SetFrequency(2000)), "FREQ=2000");
}
