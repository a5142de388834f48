use crate::store::ByteStore;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};

// Stream offset 0 lives this far into the file so that offsets down to
// -2^33 still land on a valid file position. The file stays sparse.
const ORIGIN: i64 = 1 << 33;

/// Store backed by an anonymous temporary file, removed by the OS on drop
pub struct FileStore {
    file: File,
}

impl FileStore {
    pub fn new() -> io::Result<Self> {
        let file = tempfile::tempfile()?;
        Ok(Self { file })
    }

    fn seek(&mut self, offset: i64) -> io::Result<()> {
        let pos = offset
            .checked_add(ORIGIN)
            .filter(|p| *p >= 0)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("offset {} outside file store range", offset),
                )
            })?;
        self.file.seek(SeekFrom::Start(pos as u64))?;
        Ok(())
    }
}

impl ByteStore for FileStore {
    fn read_at(&mut self, offset: i64, buf: &mut [u8]) -> io::Result<()> {
        self.seek(offset)?;
        let mut filled = 0;
        while filled < buf.len() {
            match self.file.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        // past end of file
        buf[filled..].fill(0);
        Ok(())
    }

    fn write_at(&mut self, offset: i64, data: &[u8]) -> io::Result<()> {
        self.seek(offset)?;
        self.file.write_all(data)
    }
}
