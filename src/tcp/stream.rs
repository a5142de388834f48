use crate::error::Result;
use crate::store::ByteStore;
use crate::tcp::{flags, is_seq_lte, Key, Segment, WrittenRanges};
use std::fmt;

/// Size of the 32-bit sequence space
const SEQ_SPACE: i64 = 1 << 32;
/// A reference above this followed by a sequence number below `WRAP_LOW` is a wrap
const WRAP_HIGH: u32 = 0xC000_0000; // 3 * 2^32 / 4
const WRAP_LOW: u32 = 0x4000_0000; // 2^32 / 4

/// Bytes already stored at an offset range disagreeing with a later write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff {
    /// Absolute offset of the first byte of the window
    pub offset: i64,
    /// What the store held before the write
    pub previous: Vec<u8>,
    /// The payload that replaced it
    pub current: Vec<u8>,
}

/// One direction of a TCP connection, reassembled into absolute offsets
pub struct Stream {
    pub(crate) id: u64,
    pub(crate) key: Key,
    // added to a raw sequence number to get the absolute offset
    pub(crate) base_offset: i64,
    // furthest-ahead raw sequence number seen, for wrap detection
    last_seq: u32,
    written: WrittenRanges,
    diffs: Vec<Diff>,
    store: Box<dyn ByteStore>,
    // debugging
    pub(crate) segments: usize,
    pub(crate) bytes_written: usize,
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("base_offset", &self.base_offset)
            .field("last_seq", &self.last_seq)
            .field("written.len()", &self.written.len())
            .field("diffs.len()", &self.diffs.len())
            .field("segments", &self.segments)
            .field("bytes_written", &self.bytes_written)
            .finish()
    }
}

impl Stream {
    /// Create a stream whose offset 0 is the sequence number `isn`.
    ///
    /// A SYN on the first segment is not accounted for here; [`write`](Self::write)
    /// applies the SYN correction for every segment, the first one included.
    pub fn new(id: u64, key: Key, isn: u32, store: Box<dyn ByteStore>) -> Self {
        Stream {
            id,
            key,
            base_offset: -(isn as i64),
            last_seq: isn,
            written: WrittenRanges::new(),
            diffs: Vec::new(),
            store,
            segments: 0,
            bytes_written: 0,
        }
    }

    /// Absolute offset a sequence number maps to under the current base.
    ///
    /// A top-quarter `seq` seen while the reference sits in the bottom quarter
    /// was sent before the last wrap and maps into the previous lap.
    pub fn offset_of(&self, seq: u32) -> i64 {
        if self.last_seq < WRAP_LOW && seq > WRAP_HIGH {
            self.base_offset - SEQ_SPACE + seq as i64
        } else {
            self.base_offset + seq as i64
        }
    }

    /// Process one segment: fix up the base, diff any overlap, then store it.
    pub fn write(&mut self, segment: &Segment) -> Result<()> {
        self.segments += 1;

        if segment.is_syn() {
            // the SYN occupies one sequence number ahead of the first data byte
            self.base_offset -= 1;
        }

        if self.last_seq > WRAP_HIGH && segment.seq < WRAP_LOW {
            self.base_offset += SEQ_SPACE;
            log::debug!(
                "[#{}] {} sequence wrapped {} -> {}, base now {}",
                self.id,
                self.key,
                self.last_seq,
                segment.seq,
                self.base_offset
            );
        }

        let a = self.offset_of(segment.seq);
        // retransmissions from behind the reference must not drag it back
        if is_seq_lte(self.last_seq, segment.seq) {
            self.last_seq = segment.seq;
        }
        let b = a + segment.len() as i64;

        log::trace!(
            "[#{}] {} RX: flags={} seq={} range=[{}, {})",
            self.id,
            self.key,
            flags::flags_to_string(segment.flags),
            segment.seq,
            a,
            b
        );

        if b <= a {
            return Ok(());
        }

        if self.written.overlaps(a, b) {
            let mut previous = vec![0u8; segment.len()];
            self.store.read_at(a, &mut previous)?;
            if previous != segment.payload {
                log::info!(
                    "[#{}] {} diff at [{}, {}): {} bytes disagree",
                    self.id,
                    self.key,
                    a,
                    b,
                    previous
                        .iter()
                        .zip(&segment.payload)
                        .filter(|(x, y)| x != y)
                        .count()
                );
                self.diffs.push(Diff {
                    offset: a,
                    previous,
                    current: segment.payload.clone(),
                });
            } else {
                log::debug!(
                    "[#{}] {} identical retransmission at [{}, {})",
                    self.id,
                    self.key,
                    a,
                    b
                );
            }
        }

        self.store.write_at(a, &segment.payload)?;
        self.written.add(a, b);
        self.bytes_written += segment.len();
        Ok(())
    }

    /// Read back stored bytes; unwritten positions come back as zero.
    pub fn read(&mut self, offset: i64, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.store.read_at(offset, &mut buf)?;
        Ok(buf)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn diffs(&self) -> &[Diff] {
        &self.diffs
    }

    pub fn written(&self) -> &WrittenRanges {
        &self.written
    }
}

/// Stream snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub id: u64,
    pub segments: usize,
    pub bytes_written: usize,
    pub ranges: usize,
    pub covered: u64,
    pub diffs: usize,
    pub base_offset: i64,
}

impl Stream {
    pub fn peek(&self) -> Snapshot {
        Snapshot {
            id: self.id,
            segments: self.segments,
            bytes_written: self.bytes_written,
            ranges: self.written.len(),
            covered: self.written.covered(),
            diffs: self.diffs.len(),
            base_offset: self.base_offset,
        }
    }
}
