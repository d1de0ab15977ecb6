use core::{fmt, net::Ipv6Addr};

use byteorder::{ByteOrder, NetworkEndian};

use crate::{
    context::Ends,
    ip::{checksum, Protocol},
};

enum_with_unknown! {
    /// Internet protocol control message type.
    pub enum Message(u8) {
        /// Destination Unreachable.
        DstUnreachable  = 0x01,
        /// Packet Too Big.
        PktTooBig       = 0x02,
        /// Time Exceeded.
        TimeExceeded    = 0x03,
        /// Parameter Problem.
        ParamProblem    = 0x04,
        /// Echo Request
        EchoRequest     = 0x80,
        /// Echo Reply
        EchoReply       = 0x81,
    }
}

impl Message {
    /// Per [RFC 4443 § 2.1] ICMPv6 message types with the highest order
    /// bit set are informational messages while message types without
    /// the highest order bit set are error messages.
    ///
    /// [RFC 4443 § 2.1]: https://tools.ietf.org/html/rfc4443#section-2.1
    pub fn is_error(&self) -> bool {
        (u8::from(*self) & 0x80) != 0x80
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Message::DstUnreachable => write!(f, "destination unreachable"),
            Message::PktTooBig => write!(f, "packet too big"),
            Message::TimeExceeded => write!(f, "time exceeded"),
            Message::ParamProblem => write!(f, "parameter problem"),
            Message::EchoReply => write!(f, "echo reply"),
            Message::EchoRequest => write!(f, "echo request"),
            Message::Unknown(id) => write!(f, "{id}"),
        }
    }
}

enum_with_unknown! {
    /// Internet protocol control message subtype for type "Destination Unreachable".
    pub enum DstUnreachable(u8) {
        /// No Route to destination.
        NoRoute         = 0,
        /// Communication with destination administratively prohibited.
        AdminProhibit   = 1,
        /// Beyond scope of source address.
        BeyondScope     = 2,
        /// Address unreachable.
        AddrUnreachable = 3,
        /// Port unreachable.
        PortUnreachable = 4,
        /// Source address failed ingress/egress policy.
        FailedPolicy    = 5,
        /// Reject route to destination.
        RejectRoute     = 6
    }
}

impl fmt::Display for DstUnreachable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DstUnreachable::NoRoute => write!(f, "no route to destination"),
            DstUnreachable::AdminProhibit => write!(
                f,
                "communication with destination administratively prohibited"
            ),
            DstUnreachable::BeyondScope => write!(f, "beyond scope of source address"),
            DstUnreachable::AddrUnreachable => write!(f, "address unreachable"),
            DstUnreachable::PortUnreachable => write!(f, "port unreachable"),
            DstUnreachable::FailedPolicy => {
                write!(f, "source address failed ingress/egress policy")
            }
            DstUnreachable::RejectRoute => write!(f, "reject route to destination"),
            DstUnreachable::Unknown(id) => write!(f, "{id}"),
        }
    }
}

// Ranges and constants describing key boundaries in the ICMPv6 header.
mod field {
    use crate::field::*;

    // ICMPv6: See https://tools.ietf.org/html/rfc4443
    pub const TYPE: usize = 0;
    pub const CODE: usize = 1;
    pub const CHECKSUM: Field = 2..4;

    pub const ECHO_IDENT: Field = 4..6;
    pub const ECHO_SEQNO: Field = 6..8;

    pub const HEADER_END: usize = 8;
}

/// Length of the common header plus the 4-byte type-specific field.
pub const HEADER_LEN: usize = field::HEADER_END;
pub const CHECKSUM_OFFSET: usize = field::CHECKSUM.start;

/// The 8 leading bytes of every ICMPv6 message.
///
/// The last 4 bytes are the echo identifier and sequence number for echo
/// messages, and unused or type-specific for everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Header<T: ?Sized = [u8; HEADER_LEN]>(T);

wire!(impl Header {
    pub msg_type/set_msg_type: Message =>
        |data| Message::from(data[field::TYPE]);
        |data, value| data[field::TYPE] = value.into();

    pub msg_code/set_msg_code: u8 =>
        |data| data[field::CODE];
        |data, value| data[field::CODE] = value;

    pub checksum/set_checksum: u16 =>
        |data| NetworkEndian::read_u16(&data[field::CHECKSUM]);
        |data, value| NetworkEndian::write_u16(&mut data[field::CHECKSUM], value);

    /// Return the identifier field (for echo request and reply packets).
    pub echo_ident/set_echo_ident: u16 =>
        |data| NetworkEndian::read_u16(&data[field::ECHO_IDENT]);
        |data, value| NetworkEndian::write_u16(&mut data[field::ECHO_IDENT], value);

    /// Return the sequence number field (for echo request and reply packets).
    pub echo_seq_no/set_echo_seq_no: u16 =>
        |data| NetworkEndian::read_u16(&data[field::ECHO_SEQNO]);
        |data, value| NetworkEndian::write_u16(&mut data[field::ECHO_SEQNO], value);
});

impl Header {
    /// An all-zero header.
    pub const fn new() -> Self {
        Header([0; HEADER_LEN])
    }

    pub fn with_type(msg_type: Message, code: u8) -> Self {
        let mut header = Header::new();
        header.set_msg_type(msg_type);
        header.set_msg_code(code);
        header
    }

    /// Decode the header at the start of `data`, if `data` is long enough.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        let bytes = data.get(..HEADER_LEN)?;
        let mut header = Header::new();
        header.0.copy_from_slice(bytes);
        Some(header)
    }

    pub const fn as_bytes(&self) -> &[u8; HEADER_LEN] {
        &self.0
    }

    /// Offset of the type-specific payload following the header.
    pub const fn data_offset() -> usize {
        HEADER_LEN
    }

    pub const fn checksum_offset() -> usize {
        CHECKSUM_OFFSET
    }
}

fn seed(addr: Ends<Ipv6Addr>, len: usize) -> u16 {
    checksum::pseudo_header_v6(&addr.src, &addr.dst, Protocol::Icmpv6, len as u32)
}

/// Validate the checksum of a whole ICMPv6 message.
pub fn verify_checksum(addr: Ends<Ipv6Addr>, message: &[u8]) -> bool {
    checksum::fold(seed(addr, message.len()), message) == checksum::VALID
}

/// Compute and store the checksum of a whole ICMPv6 message.
///
/// # Panics
///
/// This function panics if `message` is shorter than the checksum field.
pub fn fill_checksum(addr: Ends<Ipv6Addr>, message: &mut [u8]) {
    NetworkEndian::write_u16(&mut message[field::CHECKSUM], 0);
    let fold = checksum::fold(seed(addr, message.len()), message);
    NetworkEndian::write_u16(&mut message[field::CHECKSUM], checksum::finalize(fold));
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOCK_IP_ADDRS: Ends<Ipv6Addr> = Ends {
        src: Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 1),
        dst: Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 2),
    };

    static ECHO_PACKET_BYTES: [u8; 12] = [
        0x80, 0x00, 0x19, 0xb3, 0x12, 0x34, 0xab, 0xcd, 0xaa, 0x00, 0x00, 0xff,
    ];

    #[test]
    fn test_echo_deconstruct() {
        let header = Header::from_bytes(&ECHO_PACKET_BYTES).unwrap();
        assert_eq!(header.msg_type(), Message::EchoRequest);
        assert_eq!(header.msg_code(), 0);
        assert_eq!(header.checksum(), 0x19b3);
        assert_eq!(header.echo_ident(), 0x1234);
        assert_eq!(header.echo_seq_no(), 0xabcd);
    }

    #[test]
    fn test_echo_construct() {
        let mut header = Header::with_type(Message::EchoRequest, 0);
        header.set_echo_ident(0x1234);
        header.set_echo_seq_no(0xabcd);
        assert_eq!(header.as_bytes(), &[0x80, 0x00, 0x00, 0x00, 0x12, 0x34, 0xab, 0xcd]);
    }

    #[test]
    fn test_short_header() {
        assert!(Header::from_bytes(&ECHO_PACKET_BYTES[..7]).is_none());
    }

    #[test]
    fn test_offsets() {
        assert_eq!(Header::data_offset(), 8);
        assert_eq!(Header::checksum_offset(), 2);
    }

    #[test]
    fn test_echo_checksum() {
        assert!(verify_checksum(MOCK_IP_ADDRS, &ECHO_PACKET_BYTES));

        let mut bytes = ECHO_PACKET_BYTES;
        bytes[2..4].copy_from_slice(&[0, 0]);
        fill_checksum(MOCK_IP_ADDRS, &mut bytes);
        assert_eq!(bytes, ECHO_PACKET_BYTES);
    }

    #[test]
    fn test_single_bit_flip_fails() {
        for bit in 0..ECHO_PACKET_BYTES.len() * 8 {
            let mut bytes = ECHO_PACKET_BYTES;
            bytes[bit / 8] ^= 1 << (bit % 8);
            assert!(!verify_checksum(MOCK_IP_ADDRS, &bytes), "bit {bit}");
        }
    }

    #[test]
    fn test_message_kinds() {
        assert!(Message::DstUnreachable.is_error());
        assert!(!Message::EchoReply.is_error());
        assert_eq!(Message::from(0x87), Message::Unknown(0x87));
        assert_eq!(u8::from(Message::EchoReply), 0x81);
    }
}
