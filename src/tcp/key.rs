use std::fmt;
use std::net::IpAddr;

/// Directional connection identifier.
///
/// The two halves of one TCP connection get two distinct keys since each
/// direction has its own sequence space. `reverse` gives the other half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key {
    pub(crate) src_ip: IpAddr,
    pub(crate) src_port: u16,
    pub(crate) dst_ip: IpAddr,
    pub(crate) dst_port: u16,
    pub(crate) protocol: u8,
}

/// Renders as `<hex src octets>:<src port>-><hex dst octets>:<dst port>`
impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}->{}:{}",
            hex::encode(octets(&self.src_ip)),
            self.src_port,
            hex::encode(octets(&self.dst_ip)),
            self.dst_port
        )
    }
}

impl Key {
    pub fn new(src_ip: IpAddr, src_port: u16, dst_ip: IpAddr, dst_port: u16, protocol: u8) -> Self {
        Key {
            src_ip,
            src_port,
            dst_ip,
            dst_port,
            protocol,
        }
    }

    pub fn reverse(&self) -> Self {
        Key {
            src_ip: self.dst_ip,
            src_port: self.dst_port,
            dst_ip: self.src_ip,
            dst_port: self.src_port,
            protocol: self.protocol,
        }
    }

    pub fn src_ip(&self) -> IpAddr {
        self.src_ip
    }

    pub fn dst_ip(&self) -> IpAddr {
        self.dst_ip
    }

    pub fn src_port(&self) -> u16 {
        self.src_port
    }

    pub fn dst_port(&self) -> u16 {
        self.dst_port
    }

    pub fn protocol(&self) -> u8 {
        self.protocol
    }
}

fn octets(ip: &IpAddr) -> Vec<u8> {
    match ip {
        IpAddr::V4(v4) => v4.octets().to_vec(),
        IpAddr::V6(v6) => v6.octets().to_vec(),
    }
}

#[cfg(test)]
impl Key {
    // Test-specific constructor that doesn't require decoded headers
    pub fn new_for_test(src_ip: &str, src_port: u16, dst_ip: &str, dst_port: u16) -> Self {
        Key {
            src_ip: src_ip.parse().unwrap(),
            src_port,
            dst_ip: dst_ip.parse().unwrap(),
            dst_port,
            protocol: etherparse::IpNumber::TCP.0,
        }
    }
}
