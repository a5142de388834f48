//! TCP control bits (RFC 793), packed the way they sit in the header's low byte
use etherparse::TcpSlice;

pub const FIN: u8 = 1 << 0;
/// Consumes one sequence number ahead of the first data byte
pub const SYN: u8 = 1 << 1;
pub const RST: u8 = 1 << 2;
pub const PSH: u8 = 1 << 3;
pub const ACK: u8 = 1 << 4;
pub const URG: u8 = 1 << 5;

const LETTERS: [(u8, char); 6] = [
    (SYN, 'S'),
    (ACK, 'A'),
    (FIN, 'F'),
    (RST, 'R'),
    (PSH, 'P'),
    (URG, 'U'),
];

/// Renders flags as a fixed-width `SAFRPU` string with `-` for unset bits
pub fn flags_to_string(flags: u8) -> String {
    LETTERS
        .iter()
        .map(|&(bit, c)| if flags & bit != 0 { c } else { '-' })
        .collect()
}

/// Pack the control bits of a sliced TCP segment into one byte
pub fn tcp_slice_to_flags(tcp: &TcpSlice) -> u8 {
    [
        (tcp.fin(), FIN),
        (tcp.syn(), SYN),
        (tcp.rst(), RST),
        (tcp.psh(), PSH),
        (tcp.ack(), ACK),
        (tcp.urg(), URG),
    ]
    .iter()
    .filter(|(set, _)| *set)
    .fold(0, |acc, (_, bit)| acc | bit)
}
