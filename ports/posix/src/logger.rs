//! Diagnostics backend
//!
//! The firmware crates log through the `log` facade. Those records are
//! forwarded into a `tracing` fmt subscriber writing to stderr; stdout
//! carries the serial session.

use tracing_subscriber::filter::LevelFilter;

/// Install the stderr subscriber at `level`
pub fn init(level: LevelFilter) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(true)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn installs_once() {
        let _ = init(LevelFilter::WARN);
        assert!(init(LevelFilter::WARN).is_err());
    }
}
