use crate::capture::{decode, LinkType, PacketSource};
use crate::error::{Error, Result};
use crate::tcp::{Key, Segment};
use pcap_parser::traits::PcapReaderIterator;
use pcap_parser::{create_reader, Block, PcapBlockOwned, PcapError};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const READ_BUFFER: usize = 65536;

/// Reads legacy pcap and pcapng capture files
pub struct PcapSource {
    reader: Box<dyn PcapReaderIterator>,
    // legacy files have one entry; pcapng has one per interface in the section
    link_types: Vec<LinkType>,
    frames: u64,
    // frames cut short by the capture snaplen, never decoded
    truncated: u64,
}

impl PcapSource {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read + 'static>(reader: R) -> Result<Self> {
        let reader = create_reader(READ_BUFFER, reader)
            .map_err(|e| Error::Capture(format!("not a pcap or pcapng file: {:?}", e)))?;
        Ok(Self {
            reader,
            link_types: Vec::new(),
            frames: 0,
            truncated: 0,
        })
    }

    /// Number of frames skipped because the capture holds only part of them
    pub fn truncated(&self) -> u64 {
        self.truncated
    }

    fn skip_truncated(&mut self, caplen: usize, origlen: u32) {
        self.truncated += 1;
        if self.truncated == 1 {
            log::warn!(
                "frame {} truncated by snaplen ({} of {} bytes), skipping it and any later truncated frames",
                self.frames,
                caplen,
                origlen
            );
        } else {
            log::trace!(
                "frame {} truncated ({} of {} bytes), skipped",
                self.frames,
                caplen,
                origlen
            );
        }
    }
}

fn link_type_of(link_types: &[LinkType], if_id: u32) -> Result<LinkType> {
    link_types
        .get(if_id as usize)
        .copied()
        .ok_or_else(|| Error::Capture(format!("packet for unknown interface {}", if_id)))
}

impl PacketSource for PcapSource {
    fn next_segment(&mut self) -> Result<Option<(Key, Segment)>> {
        loop {
            match self.reader.next() {
                Ok((offset, block)) => {
                    let frame = match block {
                        PcapBlockOwned::LegacyHeader(ref hdr) => {
                            self.link_types = vec![LinkType::from_raw(hdr.network.0)];
                            None
                        }
                        PcapBlockOwned::Legacy(ref b) => {
                            Some((
                                link_type_of(&self.link_types, 0)?,
                                b.data.to_vec(),
                                b.origlen,
                            ))
                        }
                        PcapBlockOwned::NG(Block::SectionHeader(_)) => {
                            self.link_types.clear();
                            None
                        }
                        PcapBlockOwned::NG(Block::InterfaceDescription(ref idb)) => {
                            self.link_types.push(LinkType::from_raw(idb.linktype.0));
                            None
                        }
                        PcapBlockOwned::NG(Block::EnhancedPacket(ref epb)) => {
                            let len = (epb.caplen as usize).min(epb.data.len());
                            Some((
                                link_type_of(&self.link_types, epb.if_id)?,
                                epb.data[..len].to_vec(),
                                epb.origlen,
                            ))
                        }
                        PcapBlockOwned::NG(Block::SimplePacket(ref spb)) => {
                            let len = (spb.origlen as usize).min(spb.data.len());
                            Some((
                                link_type_of(&self.link_types, 0)?,
                                spb.data[..len].to_vec(),
                                spb.origlen,
                            ))
                        }
                        PcapBlockOwned::NG(_) => None,
                    };
                    drop(block);
                    self.reader.consume(offset);

                    if let Some((link_type, data, origlen)) = frame {
                        self.frames += 1;
                        if data.len() < origlen as usize {
                            // a partial payload would be stored as if it were the whole segment
                            self.skip_truncated(data.len(), origlen);
                            continue;
                        }
                        match decode(link_type, &data)? {
                            Some(decoded) => return Ok(Some(decoded)),
                            None => log::trace!("frame {} carries no TCP, skipped", self.frames),
                        }
                    }
                }
                Err(PcapError::Eof) => return Ok(None),
                Err(PcapError::Incomplete) => {
                    self.reader
                        .refill()
                        .map_err(|e| Error::Capture(format!("refill error: {:?}", e)))?;
                }
                Err(e) => return Err(Error::Capture(format!("pcap parse error: {:?}", e))),
            }
        }
    }

    fn frames_read(&self) -> u64 {
        self.frames
    }
}
