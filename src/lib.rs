pub mod capture;
pub mod config;
pub mod error;
pub mod report;
pub mod store;
pub mod tcp;

#[cfg(test)]
mod test;

pub use capture::{PacketSource, PcapSource};
pub use config::Config;
pub use error::{Error, Result};
pub use store::ByteStore;
pub use tcp::{Registry, RunStats};

use std::io::Write;

/// Analyse the capture named in `config` and write the diff report to `out`.
///
/// Nothing is written unless the whole capture was processed.
pub fn run(config: &Config, out: &mut dyn Write) -> Result<RunStats> {
    let mut source = PcapSource::open(&config.file)?;
    let mut registry = Registry::new(config.store);
    let stats = registry.run(&mut source)?;
    report::write_report(&registry, config.format, out)?;
    Ok(stats)
}
