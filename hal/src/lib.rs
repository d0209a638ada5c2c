//! Hardware Abstraction Layer (HAL) for the PWM generator
//!
//! This crate provides the vendor-agnostic collaborators the command engine is
//! written against: a byte-oriented serial transport and a two-register
//! compare timer. Board crates implement these traits on top of their
//! peripheral access crates; the host port implements them in software.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

pub mod error;
pub mod interrupt;
pub mod timer;
pub mod uart;

#[cfg(feature = "mock")]
pub mod mock;

// Re-export commonly used types
pub use error::{HalError, HalResult};
pub use interrupt::TimerEvents;
pub use timer::{OutputStage, PwmTimer, TimerEdge};
pub use uart::{ByteSource, UartConfig, UartPort};
