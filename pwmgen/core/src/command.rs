//! Serial command parser
//!
//! A line is classified by literal, case-sensitive prefix. The numeric
//! argument is read from a fixed-width window after the prefix with C `atoi`
//! rules: leading whitespace skipped, optional sign, digits up to the first
//! non-digit, no digits meaning zero. Nothing is ever rejected; range
//! enforcement is left to the engine's clamping.

use core::fmt;

/// A classified command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `PWM=<n>`: set the duty cycle to `n`/255
    SetDuty(u32),
    /// `FREQ=<n>`: set the output frequency to `n` Hz
    SetFrequency(u32),
    /// Anything else; silently ignored
    Unrecognized,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::SetDuty(raw) => write!(f, "PWM={}", raw),
            Command::SetFrequency(raw) => write!(f, "FREQ={}", raw),
            Command::Unrecognized => write!(f, "<unrecognized>"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Command {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Command::SetDuty(raw) => defmt::write!(fmt, "SetDuty({})", raw),
            Command::SetFrequency(raw) => defmt::write!(fmt, "SetFrequency({})", raw),
            Command::Unrecognized => defmt::write!(fmt, "Unrecognized"),
        }
    }
}

/// One entry of the command table
struct CommandSpec {
    prefix: &'static [u8],
    /// Maximum number of argument bytes read after the prefix
    width: usize,
    build: fn(u32) -> Command,
}

/// Recognized commands, checked independently and in this order
const COMMANDS: [CommandSpec; 2] = [
    CommandSpec {
        prefix: b"PWM=",
        width: 3,
        build: Command::SetDuty,
    },
    CommandSpec {
        prefix: b"FREQ=",
        width: 5,
        build: Command::SetFrequency,
    },
];

impl CommandSpec {
    fn matches(&self, text: &[u8]) -> Option<Command> {
        let rest = text.strip_prefix(self.prefix)?;
        let window = &rest[..rest.len().min(self.width)];
        Some((self.build)(parse_number(window)))
    }
}

/// Text of a sanitized line: every byte before the first NUL terminator
pub fn line_text(line: &[u8]) -> &[u8] {
    match line.iter().position(|&b| b == 0) {
        Some(end) => &line[..end],
        None => line,
    }
}

/// Parse an unsigned integer with `atoi` rules
///
/// A leading `-` yields zero; the commands only take unsigned values.
pub fn parse_number(window: &[u8]) -> u32 {
    let mut bytes = window
        .iter()
        .copied()
        .skip_while(|b| matches!(*b, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r'))
        .peekable();

    match bytes.peek().copied() {
        Some(b'-') => return 0,
        Some(b'+') => {
            bytes.next();
        }
        _ => {}
    }

    bytes
        .take_while(u8::is_ascii_digit)
        .fold(0u32, |acc, digit| {
            acc.saturating_mul(10).saturating_add(u32::from(digit - b'0'))
        })
}

/// Every command the line matches, in table order
///
/// Prefix checks are independent of each other; a line matching several
/// entries yields each of them.
pub fn parse_all(line: &[u8]) -> impl Iterator<Item = Command> + '_ {
    let text = line_text(line);
    COMMANDS.iter().filter_map(move |spec| spec.matches(text))
}

/// Classify a line; the first matching command wins
pub fn parse(line: &[u8]) -> Command {
    parse_all(line).next().unwrap_or(Command::Unrecognized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_atoi_rules() {
        assert_eq!(parse_number(b"128"), 128);
        assert_eq!(parse_number(b"12x"), 12);
        assert_eq!(parse_number(b"x12"), 0);
        assert_eq!(parse_number(b""), 0);
        assert_eq!(parse_number(b"  7"), 7);
        assert_eq!(parse_number(b"+42"), 42);
        assert_eq!(parse_number(b"-5"), 0);
    }

    #[test]
    fn test_line_text_stops_at_terminator() {
        assert_eq!(line_text(b"PWM=12\0\0"), b"PWM=12");
        assert_eq!(line_text(b"FREQ=5"), b"FREQ=5");
        assert_eq!(line_text(b"\0PWM=1"), b"");
    }

    #[test]
    fn test_duty_window_is_three_bytes() {
        assert_eq!(parse(b"PWM=1234"), Command::SetDuty(123));
        assert_eq!(parse(b"PWM=999"), Command::SetDuty(999));
    }

    #[test]
    fn test_frequency_window_is_five_bytes() {
        assert_eq!(parse(b"FREQ=123456"), Command::SetFrequency(12345));
        assert_eq!(parse(b"FREQ=55"), Command::SetFrequency(55));
    }

    #[test]
    fn test_window_stops_at_nul() {
        assert_eq!(parse(b"PWM=1\09"), Command::SetDuty(1));
    }

    #[test]
    fn test_prefix_is_case_sensitive() {
        assert_eq!(parse(b"pwm=10"), Command::Unrecognized);
        assert_eq!(parse(b"Freq=10"), Command::Unrecognized);
    }

    #[test]
    fn test_prefix_must_be_complete() {
        assert_eq!(parse(b"PWM"), Command::Unrecognized);
        assert_eq!(parse(b"FR"), Command::Unrecognized);
        assert_eq!(parse(b""), Command::Unrecognized);
    }

    #[test]
    fn test_missing_digits_parse_as_zero() {
        assert_eq!(parse(b"PWM="), Command::SetDuty(0));
        assert_eq!(parse(b"FREQ=abc"), Command::SetFrequency(0));
    }

    #[test]
    fn test_parse_all_checks_every_prefix() {
        let mut found = parse_all(b"FREQ=2000");
        assert_eq!(found.next(), Some(Command::SetFrequency(2000)));
        assert_eq!(found.next(), None);

        assert_eq!(parse_all(b"hello").count(), 0);
    }
}
