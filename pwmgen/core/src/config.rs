//! Compile-time configuration
//!
//! The device has no runtime configuration; these values fix the serial
//! framing, buffer sizes and timer arithmetic.

/// CPU clock of the reference board
pub const CPU_CLOCK_HZ: u32 = 16_000_000;

/// Timer prescaler applied to the CPU clock
pub const TIMER_PRESCALER: u32 = 8;

/// Timer counting rate after the prescaler
pub const TIMER_CLOCK_HZ: u32 = CPU_CLOCK_HZ / TIMER_PRESCALER;

/// Serial session baud rate
pub const BAUD_RATE: u32 = hal::UartConfig::DEFAULT_BAUD;

/// Receive line buffer capacity, terminator included
pub const RX_BUFFER_LEN: usize = 50;

/// Transmit buffer capacity for one formatted message
pub const TX_BUFFER_LEN: usize = 50;

/// Consecutive idle poll iterations before a line is force-completed
pub const IDLE_TIMEOUT_POLLS: u16 = 2000;

/// Lowest accepted frequency; lower requests are raised to it
pub const MIN_FREQUENCY_HZ: u32 = 40;

/// Highest accepted frequency; higher requests are lowered to it
pub const MAX_FREQUENCY_HZ: u32 = 65_000;

/// Largest accepted duty value
pub const MAX_DUTY: u8 = 254;

/// Duty value that represents 100%
pub const DUTY_SCALE: u32 = 255;

/// Duty cycle at power-on (50%)
pub const DEFAULT_DUTY: u8 = 127;

/// Frequency at power-on
pub const DEFAULT_FREQUENCY_HZ: u32 = 1000;

/// Period register at power-on (1 kHz)
pub const RESET_PERIOD: u16 = 1999;

/// Compare register at power-on
pub const RESET_COMPARE: u16 = 1000;

/// Start-up banner
pub const BANNER: &str = "Init done.\n";
