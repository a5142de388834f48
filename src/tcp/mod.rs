mod flags;
mod key;
mod ranges;
mod registry;
mod segment;
mod stream;

pub use self::key::Key;
pub use self::ranges::WrittenRanges;
pub use self::registry::{Registry, RunStats};
pub use self::segment::{is_seq_lt, is_seq_lte, Segment};
pub use self::stream::{Diff, Snapshot, Stream};

pub use self::flags::{flags_to_string, tcp_slice_to_flags};
pub use self::flags::{ACK, FIN, PSH, RST, SYN, URG};
