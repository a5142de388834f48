mod file;
mod memory;

pub use self::file::FileStore;
pub use self::memory::MemoryStore;

use std::io;

/// Random-access byte storage addressed by absolute stream offset.
///
/// Offsets may be negative. Positions never written read back as zero.
pub trait ByteStore: Send {
    /// Fill `buf` with the bytes stored at `[offset, offset + buf.len())`
    fn read_at(&mut self, offset: i64, buf: &mut [u8]) -> io::Result<()>;

    /// Store `data` at `offset`, replacing whatever was there
    fn write_at(&mut self, offset: i64, data: &[u8]) -> io::Result<()>;
}

/// Which backend new streams get
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StoreKind {
    /// Sparse pages in memory
    #[default]
    Memory,
    /// Anonymous temporary file per stream
    File,
}

impl StoreKind {
    pub fn create(self) -> io::Result<Box<dyn ByteStore>> {
        match self {
            StoreKind::Memory => Ok(Box::new(MemoryStore::new())),
            StoreKind::File => Ok(Box::new(FileStore::new()?)),
        }
    }
}
