//! Terminal front-end for the PWM generator.
//!
//! Type commands on stdin (`FREQ=2000`, `PWM=128`); acknowledgements appear on
//! stdout exactly as the device sends them over its serial link. The
//! simulated waveform is reported on stderr after every applied command.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use pwmgen_core::config::BAUD_RATE;
use pwmgen_engine::UpdatePolicy;
use pwmgen_posix::{logger, session, spawn_reader, PosixConfig};
use pwmgen_rx::RxMailbox;
use tracing_subscriber::filter::LevelFilter;

static RX: RxMailbox = RxMailbox::new();

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
    Masked,
    Torn,
}

impl From<Policy> for UpdatePolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Masked => UpdatePolicy::Masked,
            Policy::Torn => UpdatePolicy::Torn,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Serial-controlled PWM generator, simulated on the host")]
struct Opts {
    /// Duration of one main-loop poll iteration
    #[arg(long = "poll-us", default_value_t = 50, value_name = "MICROS")]
    poll_us: u64,

    /// Idle poll iterations before a partial line is completed
    #[arg(long = "timeout-polls", default_value_t = pwmgen_core::config::IDLE_TIMEOUT_POLLS)]
    timeout_polls: u16,

    /// How timer registers are protected during an update
    #[arg(long, value_enum, default_value_t = Policy::Masked)]
    policy: Policy,

    /// Simulated serial baud rate, paces received bytes
    #[arg(long, default_value_t = BAUD_RATE)]
    baud: u32,

    /// Diagnostics level on stderr (off, error, warn, info, debug, trace)
    #[arg(long = "log-level", default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    logger::init(opts.log_level)?;

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        ctrlc::set_handler(move || running.store(false, Ordering::SeqCst))
            .context("installing Ctrl-C handler")?;
    }

    let config = PosixConfig {
        policy: opts.policy.into(),
        timeout_polls: opts.timeout_polls,
        baud_rate: opts.baud,
    };
    let mut session = session(std::io::stdout(), config).context("configuring serial port")?;

    let line = session.reporter().port().config().clone();
    let char_time = Duration::from_nanos(line.char_time_ns());
    let poll = Duration::from_micros(opts.poll_us);
    let reader = spawn_reader(std::io::stdin(), &RX, char_time);

    tracing::info!(
        "{} baud, {:?} updates, line timeout {} polls of {:?}",
        line.baud_rate,
        config.policy,
        config.timeout_polls,
        poll
    );
    session.start();

    while running.load(Ordering::SeqCst) {
        match session.poll(&RX, || thread::sleep(poll)) {
            Some(outcome) if !outcome.is_ignored() => {
                let wave = session.engine().timer().waveform();
                tracing::info!(
                    "output {} Hz, high {}/{} counts ({}.{}%)",
                    wave.frequency_hz,
                    wave.high_counts,
                    wave.cycle_counts,
                    wave.duty_permille() / 10,
                    wave.duty_permille() % 10
                );
            }
            Some(_) => {}
            None if reader.is_finished() && !RX.is_pending() => break,
            None => thread::sleep(poll),
        }
    }

    if RX.overruns() > 0 {
        tracing::warn!("{} received bytes were overwritten", RX.overruns());
    }
    if reader.is_finished() {
        let delivered = reader.join().context("reading stdin")?;
        tracing::info!("input closed after {} bytes", delivered);
    }
    Ok(())
}
