use crate::store::ByteStore;
use std::collections::BTreeMap;
use std::io;

const PAGE_SIZE: usize = 4096;

/// Sparse in-memory store made of fixed-size pages
#[derive(Debug, Default)]
pub struct MemoryStore {
    pages: BTreeMap<i64, Box<[u8; PAGE_SIZE]>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pages allocated so far
    pub fn pages(&self) -> usize {
        self.pages.len()
    }
}

// Splits `[offset, offset + len)` into (page index, offset in page, chunk length)
fn chunks(offset: i64, len: usize) -> impl Iterator<Item = (i64, usize, usize)> {
    let mut pos = offset;
    let end = offset + len as i64;
    std::iter::from_fn(move || {
        if pos >= end {
            return None;
        }
        let page = pos.div_euclid(PAGE_SIZE as i64);
        let within = pos.rem_euclid(PAGE_SIZE as i64) as usize;
        let n = (PAGE_SIZE - within).min((end - pos) as usize);
        pos += n as i64;
        Some((page, within, n))
    })
}

impl ByteStore for MemoryStore {
    fn read_at(&mut self, offset: i64, buf: &mut [u8]) -> io::Result<()> {
        let mut done = 0;
        for (page, within, n) in chunks(offset, buf.len()) {
            let dst = &mut buf[done..done + n];
            match self.pages.get(&page) {
                Some(p) => dst.copy_from_slice(&p[within..within + n]),
                None => dst.fill(0),
            }
            done += n;
        }
        Ok(())
    }

    fn write_at(&mut self, offset: i64, data: &[u8]) -> io::Result<()> {
        let mut done = 0;
        for (page, within, n) in chunks(offset, data.len()) {
            let p = self
                .pages
                .entry(page)
                .or_insert_with(|| Box::new([0u8; PAGE_SIZE]));
            p[within..within + n].copy_from_slice(&data[done..done + n]);
            done += n;
        }
        Ok(())
    }
}
