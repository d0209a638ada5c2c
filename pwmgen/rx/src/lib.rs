#![no_std]
#![forbid(unsafe_code)]

//! # PWM Generator receive path
//!
//! Bytes arrive one at a time from the UART receive interrupt. The interrupt
//! handler posts each byte into an [`RxMailbox`]; the main loop drains the
//! mailbox through a [`LineCollector`], which assembles bounded,
//! terminator-delimited lines for the command parser.
//!
//! ## Timing precondition
//!
//! The mailbox holds a single byte and the newest byte wins. Correct
//! reception therefore requires that bytes arrive more slowly than the main
//! loop polls the mailbox. At 250 kbaud a byte takes 40 µs on the wire, so
//! one poll iteration must complete in less than that. The precondition is
//! not enforced; violations are visible as [`RxMailbox::overruns`].

pub mod line;
pub mod mailbox;

pub use line::{Line, LineCollector, LineResult};
pub use mailbox::RxMailbox;
