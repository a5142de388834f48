//! Link, IP and TCP layer decoding on top of etherparse
use crate::error::{Error, Result};
use crate::tcp::{tcp_slice_to_flags, Key, Segment};
use etherparse::{NetSlice, SlicedPacket, TransportSlice};
use std::net::IpAddr;

const ETHERTYPE_IPV4: u16 = 0x0800;
const ETHERTYPE_IPV6: u16 = 0x86dd;
// BSD loopback carries a 4 byte address family ahead of the IP header
const NULL_HEADER_LEN: usize = 4;
// Linux cooked capture v1 header, protocol in the last two bytes
const SLL_HEADER_LEN: usize = 16;

/// Link layer framing of captured packets, from the capture file header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkType {
    Ethernet,
    /// Bare IPv4 or IPv6 packets
    RawIp,
    Null,
    LinuxSll,
    Other(i32),
}

impl LinkType {
    /// Map a LINKTYPE_* value from a pcap or pcapng header
    pub fn from_raw(value: i32) -> Self {
        match value {
            0 => LinkType::Null,
            1 => LinkType::Ethernet,
            101 | 228 | 229 => LinkType::RawIp,
            113 => LinkType::LinuxSll,
            other => LinkType::Other(other),
        }
    }
}

/// Decode one captured frame.
///
/// Returns `Ok(None)` for frames that are not IP/TCP (ARP, UDP, non-first
/// fragments, ...). Frames that are IP but cannot be sliced are errors.
pub fn decode(link_type: LinkType, frame: &[u8]) -> Result<Option<(Key, Segment)>> {
    let packet = match link_type {
        LinkType::Ethernet => SlicedPacket::from_ethernet(frame)?,
        LinkType::RawIp => SlicedPacket::from_ip(frame)?,
        LinkType::Null => match frame.get(NULL_HEADER_LEN..) {
            Some(ip) => SlicedPacket::from_ip(ip)?,
            None => return Ok(None),
        },
        LinkType::LinuxSll => {
            if frame.len() < SLL_HEADER_LEN {
                return Ok(None);
            }
            match u16::from_be_bytes([frame[14], frame[15]]) {
                ETHERTYPE_IPV4 | ETHERTYPE_IPV6 => {
                    SlicedPacket::from_ip(&frame[SLL_HEADER_LEN..])?
                }
                _ => return Ok(None),
            }
        }
        LinkType::Other(raw) => return Err(Error::UnsupportedLinkType(raw)),
    };
    Ok(tcp_segment(&packet))
}

fn tcp_segment(packet: &SlicedPacket) -> Option<(Key, Segment)> {
    let (src_ip, dst_ip, protocol) = match &packet.net {
        Some(NetSlice::Ipv4(ip)) => (
            IpAddr::V4(ip.header().source_addr()),
            IpAddr::V4(ip.header().destination_addr()),
            ip.payload().ip_number,
        ),
        Some(NetSlice::Ipv6(ip)) => (
            IpAddr::V6(ip.header().source_addr()),
            IpAddr::V6(ip.header().destination_addr()),
            ip.payload().ip_number,
        ),
        _ => return None,
    };
    let tcp = match &packet.transport {
        Some(TransportSlice::Tcp(tcp)) => tcp,
        _ => return None,
    };

    let key = Key::new(
        src_ip,
        tcp.source_port(),
        dst_ip,
        tcp.destination_port(),
        protocol.0,
    );
    let segment = Segment::new(
        tcp.sequence_number(),
        tcp_slice_to_flags(tcp),
        tcp.payload().to_vec(),
    );
    Some((key, segment))
}
