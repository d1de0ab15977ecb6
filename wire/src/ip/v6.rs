use core::net::Ipv6Addr;

use byteorder::{ByteOrder, NetworkEndian};

use super::Protocol;
use crate::{context::Ends, ParseError, ParseErrorKind};

/// Minimum MTU required of all links supporting IPv6. See [RFC 8200 § 5].
///
/// [RFC 8200 § 5]: https://tools.ietf.org/html/rfc8200#section-5
pub const MIN_MTU: usize = 1280;

struct RawPacket<T: ?Sized>(T);

mod field {
    use crate::field::*;

    // 4-bit version number, 8-bit traffic class, and the
    // 20-bit flow label.
    pub const VER_TC_FLOW: Field = 0..4;
    // 16-bit value representing the length of the payload.
    // Note: Options are included in this length.
    pub const LENGTH: Field = 4..6;
    // 8-bit value identifying the type of header following this
    // one. Note: The same numbers are used in IPv4.
    pub const NXT_HDR: usize = 6;
    // 8-bit value decremented by each node that forwards this
    // packet. The packet is discarded when the value is 0.
    pub const HOP_LIMIT: usize = 7;
    // IPv6 address of the source node.
    pub const SRC_ADDR: Field = 8..24;
    // IPv6 address of the destination node.
    pub const DST_ADDR: Field = 24..40;
}
pub const HEADER_LEN: usize = field::DST_ADDR.end;

fn addr_from(bytes: &[u8]) -> Ipv6Addr {
    let mut octets = [0; 16];
    octets.copy_from_slice(bytes);
    Ipv6Addr::from(octets)
}

wire!(impl RawPacket {
    version/set_version: u8 =>
        |data| data[field::VER_TC_FLOW.start] >> 4;
        |data, value| {
            // Make sure to retain the lower order bits which contain
            // the higher order bits of the traffic class
            data[0] = (data[0] & 0x0f) | ((value & 0x0f) << 4);
        };

    traffic_class/set_traffic_class: u8 =>
        |data| ((NetworkEndian::read_u16(&data[0..2]) & 0x0ff0) >> 4) as u8;
        |data, value| {
            // Put the higher order 4-bits of value in the lower order
            // 4-bits of the first byte
            data[0] = (data[0] & 0xf0) | ((value & 0xf0) >> 4);
            // Put the lower order 4-bits of value in the higher order
            // 4-bits of the second byte
            data[1] = (data[1] & 0x0f) | ((value & 0x0f) << 4);
        };

    flow_label/set_flow_label: u32 =>
        |data| NetworkEndian::read_u24(&data[1..4]) & 0x000fffff;
        |data, value| {
            // Retain the lower order 4-bits of the traffic class
            let raw = (u32::from(data[1] & 0xf0) << 16) | (value & 0x0fffff);
            NetworkEndian::write_u24(&mut data[1..4], raw);
        };

    payload_len/set_payload_len: u16 =>
        |data| NetworkEndian::read_u16(&data[field::LENGTH]);
        |data, value| NetworkEndian::write_u16(&mut data[field::LENGTH], value);

    next_header/set_next_header: Protocol =>
        |data| Protocol::from(data[field::NXT_HDR]);
        |data, value| data[field::NXT_HDR] = value.into();

    hop_limit/set_hop_limit: u8 =>
        |data| data[field::HOP_LIMIT];
        |data, value| data[field::HOP_LIMIT] = value;

    src_addr/set_src_addr: Ipv6Addr =>
        |data| addr_from(&data[field::SRC_ADDR]);
        |data, value| data[field::SRC_ADDR].copy_from_slice(&value.octets());

    dst_addr/set_dst_addr: Ipv6Addr =>
        |data| addr_from(&data[field::DST_ADDR]);
        |data, value| data[field::DST_ADDR].copy_from_slice(&value.octets());
});

/// The fixed IPv6 header, as quoted by ICMPv6 error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub addr: Ends<Ipv6Addr>,
    pub traffic_class: u8,
    pub flow_label: u32,
    pub payload_len: u16,
    pub next_header: Protocol,
    pub hop_limit: u8,
}

impl Header {
    /// Decode the header at the start of `data`; trailing bytes are ignored.
    pub fn parse(data: &[u8]) -> Result<Self, ParseError<&[u8]>> {
        if data.len() < HEADER_LEN {
            return Err(ParseErrorKind::PacketTooShort.with(data));
        }
        let packet = RawPacket(data);
        if packet.version() != 6 {
            return Err(ParseErrorKind::VersionInvalid.with(data));
        }

        Ok(Header {
            addr: Ends {
                src: packet.src_addr(),
                dst: packet.dst_addr(),
            },
            traffic_class: packet.traffic_class(),
            flow_label: packet.flow_label(),
            payload_len: packet.payload_len(),
            next_header: packet.next_header(),
            hop_limit: packet.hop_limit(),
        })
    }

    /// Encode the header into the first [`HEADER_LEN`] bytes of `data`.
    ///
    /// # Panics
    ///
    /// This function panics if `data` is shorter than [`HEADER_LEN`].
    pub fn emit(&self, data: &mut [u8]) {
        let mut packet = RawPacket(&mut data[..HEADER_LEN]);
        packet.set_version(6);
        packet.set_traffic_class(self.traffic_class);
        packet.set_flow_label(self.flow_label);
        packet.set_payload_len(self.payload_len);
        packet.set_next_header(self.next_header);
        packet.set_hop_limit(self.hop_limit);
        packet.set_src_addr(self.addr.src);
        packet.set_dst_addr(self.addr.dst);
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0; HEADER_LEN];
        self.emit(&mut bytes);
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static HEADER_BYTES: [u8; 40] = [
        0x60, 0x00, 0x00, 0x00, 0x00, 0x0c, 0x11, 0x40, 0xfe, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0xff, 0x02, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
    ];

    fn header() -> Header {
        Header {
            addr: Ends {
                src: Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 1),
                dst: Ipv6Addr::new(0xff02, 0, 0, 0, 0, 0, 0, 1),
            },
            traffic_class: 0,
            flow_label: 0,
            payload_len: 0xc,
            next_header: Protocol::Udp,
            hop_limit: 0x40,
        }
    }

    #[test]
    fn test_deconstruct() {
        assert_eq!(Header::parse(&HEADER_BYTES[..]), Ok(header()));
    }

    #[test]
    fn test_construct() {
        assert_eq!(header().to_bytes(), HEADER_BYTES);
    }

    #[test]
    fn test_traffic_class_and_flow_label() {
        let mut repr = header();
        repr.traffic_class = 0xab;
        repr.flow_label = 0xcdef1;
        let bytes = repr.to_bytes();
        assert_eq!(&bytes[..4], &[0x6a, 0xbc, 0xde, 0xf1]);
        assert_eq!(Header::parse(&bytes[..]), Ok(repr));
    }

    #[test]
    fn test_too_short() {
        let err = Header::parse(&HEADER_BYTES[..39]).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::PacketTooShort);
    }

    #[test]
    fn test_wrong_version() {
        let mut bytes = HEADER_BYTES;
        bytes[0] = 0x40;
        let err = Header::parse(&bytes[..]).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::VersionInvalid);
    }
}
