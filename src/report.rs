//! End-of-run rendering of recorded diffs
use crate::error::Result;
use crate::tcp::{Registry, Stream};
use serde::Serialize;
use std::io::{self, Write};

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Format {
    /// Raw conflicting payloads separated by `vs` lines
    #[default]
    Text,
    /// One JSON document with hex-encoded payloads
    Json,
}

#[derive(Debug, Serialize)]
struct Report {
    streams: Vec<StreamReport>,
}

#[derive(Debug, Serialize)]
struct StreamReport {
    stream: String,
    diffs: Vec<DiffReport>,
}

#[derive(Debug, Serialize)]
struct DiffReport {
    offset: i64,
    previous: String,
    current: String,
}

/// Write every stream that recorded at least one diff, in first-seen order.
pub fn write_report(registry: &Registry, format: Format, out: &mut dyn Write) -> Result<()> {
    let streams: Vec<&Stream> = registry
        .streams()
        .into_iter()
        .filter(|s| !s.diffs().is_empty())
        .collect();

    match format {
        Format::Text => write_text(&streams, out)?,
        Format::Json => write_json(&streams, out)?,
    }
    out.flush()?;
    Ok(())
}

fn write_text(streams: &[&Stream], out: &mut dyn Write) -> io::Result<()> {
    for stream in streams {
        writeln!(out, "Stream {} has diffs:", stream.key())?;
        for diff in stream.diffs() {
            out.write_all(&diff.previous)?;
            out.write_all(b"\nvs\n")?;
            out.write_all(&diff.current)?;
            out.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn write_json(streams: &[&Stream], out: &mut dyn Write) -> io::Result<()> {
    let report = Report {
        streams: streams
            .iter()
            .map(|stream| StreamReport {
                stream: stream.key().to_string(),
                diffs: stream
                    .diffs()
                    .iter()
                    .map(|d| DiffReport {
                        offset: d.offset,
                        previous: hex::encode(&d.previous),
                        current: hex::encode(&d.current),
                    })
                    .collect(),
            })
            .collect(),
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    out.write_all(b"\n")
}
