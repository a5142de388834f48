use std::io;

/// Errors that abort an analysis run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Backing store or capture file I/O failed
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// The capture container could not be parsed
    #[error("capture error: {0}")]
    Capture(String),

    /// A frame claiming to carry IP/TCP could not be sliced
    #[error("decode error: {0}")]
    Decode(#[from] etherparse::err::packet::SliceError),

    #[error("unsupported link type {0}")]
    UnsupportedLinkType(i32),
}

pub type Result<T> = std::result::Result<T, Error>;
