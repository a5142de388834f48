use crate::report::Format;
use crate::store::StoreKind;
use clap::Parser;
use std::path::PathBuf;

/// Flag TCP retransmissions whose bytes disagree with what was already sent.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Capture file to analyse (pcap or pcapng)
    #[arg(short, long, value_name = "FILE")]
    pub file: PathBuf,

    /// Where reassembled stream bytes are kept
    #[arg(long, value_enum, default_value_t = StoreKind::Memory)]
    pub store: StoreKind,

    /// Report format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Default log filter; RUST_LOG takes precedence
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,
}

/// Settings for one analysis run
#[derive(Debug, Clone)]
pub struct Config {
    pub file: PathBuf,
    pub store: StoreKind,
    pub format: Format,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            file: cli.file,
            store: cli.store,
            format: cli.format,
        }
    }
}
