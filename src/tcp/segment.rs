//! Decoded TCP segments as handed to the reassembler
use crate::tcp::flags;

/// One captured TCP segment, reduced to what reassembly needs.
///
/// The sequence number is the raw 32-bit value from the wire; the
/// reassembler is responsible for turning it into a stream offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Raw sequence number
    pub seq: u32,
    /// TCP flags (SYN, ACK, FIN, etc.)
    pub flags: u8,
    /// Payload data, possibly empty
    pub payload: Vec<u8>,
}

impl Segment {
    pub fn new(seq: u32, flags: u8, payload: Vec<u8>) -> Self {
        Segment {
            seq,
            flags,
            payload,
        }
    }

    /// A bare SYN carrying no data
    pub fn syn(seq: u32) -> Self {
        Segment::new(seq, flags::SYN, Vec::new())
    }

    /// A PSH+ACK data segment
    pub fn data(seq: u32, payload: &[u8]) -> Self {
        Segment::new(seq, flags::PSH | flags::ACK, payload.to_vec())
    }

    pub fn is_syn(&self) -> bool {
        self.flags & flags::SYN != 0
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Determines if sequence number `a` is strictly less than sequence number `b`,
/// accounting for TCP sequence number wrapping.
///
/// Follows RFC 1323: `a < b` if `b - a` is positive when evaluated in 32-bit
/// signed arithmetic.
///
/// # Examples
///
/// ```
/// use retrosniff::tcp::is_seq_lt;
/// assert!(is_seq_lt(100, 200));
/// // 10 comes after 4_294_967_290 in sequence space
/// assert!(is_seq_lt(4_294_967_290, 10));
/// assert!(!is_seq_lt(200, 100));
/// ```
pub fn is_seq_lt(a: u32, b: u32) -> bool {
    (b.wrapping_sub(a) as i32) > 0
}

/// Less-than-or-equal counterpart of [`is_seq_lt`]
pub fn is_seq_lte(a: u32, b: u32) -> bool {
    a == b || is_seq_lt(a, b)
}
