mod decode;
mod pcap;

#[cfg(test)]
pub use self::mock::MockSource;

pub use self::decode::{decode, LinkType};
pub use self::pcap::PcapSource;

use crate::error::Result;
use crate::tcp::{Key, Segment};

/// A trait for anything yielding decoded TCP segments in capture order
pub trait PacketSource {
    /// Next TCP segment, or `None` once the input is exhausted.
    ///
    /// Frames that carry no TCP are skipped internally.
    fn next_segment(&mut self) -> Result<Option<(Key, Segment)>>;

    /// Frames read from the underlying input so far, TCP or not
    fn frames_read(&self) -> u64;
}
