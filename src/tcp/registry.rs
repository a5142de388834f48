use crate::capture::PacketSource;
use crate::error::Result;
use crate::store::StoreKind;
use crate::tcp::{Key, Segment, Snapshot, Stream};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Owns one [`Stream`] per directional connection key
pub struct Registry {
    store: StoreKind,
    streams: HashMap<Key, Stream>,
    stream_counter: u64,
    segments: u64,
}

/// Totals for one ingestion run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStats {
    pub frames: u64,
    pub segments: u64,
    pub streams: usize,
    pub streams_with_diffs: usize,
}

impl Registry {
    pub fn new(store: StoreKind) -> Self {
        Self {
            store,
            streams: HashMap::new(),
            stream_counter: 0,
            segments: 0,
        }
    }

    /// Drain `source`, dispatching every segment in capture order.
    pub fn run(&mut self, source: &mut dyn PacketSource) -> Result<RunStats> {
        while let Some((key, segment)) = source.next_segment()? {
            self.dispatch(key, &segment)?;
        }

        let stats = RunStats {
            frames: source.frames_read(),
            segments: self.segments,
            streams: self.streams.len(),
            streams_with_diffs: self.streams.values().filter(|s| !s.diffs().is_empty()).count(),
        };
        log::info!(
            "📊 {} frames, {} TCP segments, {} streams, {} with diffs",
            stats.frames,
            stats.segments,
            stats.streams,
            stats.streams_with_diffs
        );
        Ok(stats)
    }

    /// Hand `segment` to the stream for `key`, creating it on first sight.
    pub fn dispatch(&mut self, key: Key, segment: &Segment) -> Result<()> {
        self.segments += 1;

        let stream = match self.streams.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                self.stream_counter += 1;
                log::debug!(
                    "🎯 New stream #{} {} isn={} syn={}",
                    self.stream_counter,
                    key,
                    segment.seq,
                    segment.is_syn()
                );
                entry.insert(Stream::new(
                    self.stream_counter,
                    key,
                    segment.seq,
                    self.store.create()?,
                ))
            }
        };
        stream.write(segment)
    }

    pub fn get(&self, key: &Key) -> Option<&Stream> {
        self.streams.get(key)
    }

    pub fn get_mut(&mut self, key: &Key) -> Option<&mut Stream> {
        self.streams.get_mut(key)
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Streams in the order they were first seen
    pub fn streams(&self) -> Vec<&Stream> {
        let mut streams: Vec<&Stream> = self.streams.values().collect();
        streams.sort_by_key(|s| s.id());
        streams
    }

    pub fn peek_stream(&self, key: &Key) -> Option<Snapshot> {
        self.streams.get(key).map(|s| s.peek())
    }
}
