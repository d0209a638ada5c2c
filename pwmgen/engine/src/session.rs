//! Serial command session
//!
//! After the start-up banner the device runs one loop forever: wait for a
//! received byte, collect a line, apply every command it contains, report,
//! discard anything that arrived meanwhile, and echo the line when it was
//! ended by a received byte. Nothing in this loop halts it; collaborator
//! failures are logged and the next line is processed as usual.

use hal::{PwmTimer, TimerEvents, UartPort};
use heapless::Vec;
use pwmgen_core::command::{parse_all, Command};
use pwmgen_rx::{LineCollector, LineResult, RxMailbox};

use crate::engine::TimerEngine;
use crate::report::Reporter;

/// What one pass of the loop did with a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineOutcome {
    /// Commands recognized in the line, in the order they were applied
    pub commands: Vec<Command, 2>,
    /// Whether the line ended on the idle timeout
    pub timed_out: bool,
    /// Whether the line was echoed back
    pub echoed: bool,
}

impl LineOutcome {
    /// Whether the line carried no recognized command
    pub fn is_ignored(&self) -> bool {
        self.commands.is_empty()
    }
}

/// The device's command loop
pub struct Session<T, P> {
    engine: TimerEngine<T>,
    reporter: Reporter<P>,
    collector: LineCollector,
}

impl<T, P> Session<T, P>
where
    T: PwmTimer + TimerEvents,
    P: UartPort,
{
    pub fn new(engine: TimerEngine<T>, reporter: Reporter<P>) -> Self {
        Self::with_collector(engine, reporter, LineCollector::new())
    }

    /// Session with a custom line collector (e.g. a different idle timeout)
    pub fn with_collector(
        engine: TimerEngine<T>,
        reporter: Reporter<P>,
        collector: LineCollector,
    ) -> Self {
        Self {
            engine,
            reporter,
            collector,
        }
    }

    /// Announce readiness; call once before polling
    pub fn start(&mut self) {
        if let Err(err) = self.reporter.banner() {
            log::warn!("session: banner not sent: {}", err);
        }
        log::info!(
            "session: ready, {} ({})",
            self.engine.setting(),
            self.engine.registers()
        );
    }

    /// One pass of the command loop
    ///
    /// Returns `None` without blocking when no byte is pending. Otherwise
    /// collects a full line from `rx`, calling `idle` on every empty poll.
    pub fn poll<F: FnMut()>(&mut self, rx: &RxMailbox, idle: F) -> Option<LineOutcome> {
        if !rx.is_pending() {
            return None;
        }

        let mut source = rx;
        let result = self.collector.collect(&mut source, idle);
        let line = result.line();

        let mut commands = Vec::new();
        for command in parse_all(line.raw()) {
            log::debug!("session: {}", command);
            let _ = commands.push(command);
            match self.engine.apply(command) {
                Ok(applied) => {
                    if let Err(err) = self.reporter.applied(&applied) {
                        log::warn!("session: report failed: {}", err);
                    }
                }
                Err(err) => log::warn!("session: {} not applied: {}", command, err),
            }
        }

        rx.discard();

        let timed_out = matches!(result, LineResult::TimedOut(_));
        let echoed = result.should_echo();
        if echoed {
            if let Err(err) = self.reporter.echo(line.text()) {
                log::warn!("session: echo failed: {}", err);
            }
        }

        Some(LineOutcome {
            commands,
            timed_out,
            echoed,
        })
    }

    /// Run the command loop while `keep_running` returns true
    pub fn run<F, K>(&mut self, rx: &RxMailbox, mut idle: F, mut keep_running: K)
    where
        F: FnMut(),
        K: FnMut() -> bool,
    {
        while keep_running() {
            if self.poll(rx, &mut idle).is_none() {
                idle();
            }
        }
    }

    /// The timer engine
    pub fn engine(&self) -> &TimerEngine<T> {
        &self.engine
    }

    /// The status reporter
    pub fn reporter(&self) -> &Reporter<P> {
        &self.reporter
    }

    /// Mutably borrow the status reporter
    pub fn reporter_mut(&mut self) -> &mut Reporter<P> {
        &mut self.reporter
    }

    /// Split the session back into its engine and reporter
    pub fn into_parts(self) -> (TimerEngine<T>, Reporter<P>) {
        (self.engine, self.reporter)
    }
}
