#![no_std]
#![forbid(unsafe_code)]

//! # PWM Generator engine
//!
//! - [`engine`]  – turns duty and frequency requests into timer register writes.
//! - [`report`]  – formats acknowledgements onto the serial transport.
//! - [`session`] – the main command loop tying receive, parse, apply and
//!   report together.
//!
//! The engine owns the PWM setting and the timer; nothing else writes either.

pub mod engine;
pub mod report;
pub mod session;

pub use engine::{Applied, DutyReport, EngineConfig, FrequencyReport, TimerEngine, UpdatePolicy};
pub use report::Reporter;
pub use session::{LineOutcome, Session};
