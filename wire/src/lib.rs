#![no_std]
#![deny(future_incompatible)]
#![deny(rust_2018_idioms)]
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod context;
pub use self::context::Ends;

mod error;
pub use self::error::{ParseError, ParseErrorKind};

mod icmp;
pub use self::icmp::v6::{
    fill_checksum as icmpv6_fill_checksum, verify_checksum as icmpv6_verify_checksum,
    DstUnreachable as Icmpv6DstUnreachable, Header as Icmpv6Header, Message as Icmpv6Message,
    CHECKSUM_OFFSET as ICMPV6_CHECKSUM_OFFSET, HEADER_LEN as ICMPV6_HEADER_LEN,
};

mod ip;
pub use self::ip::{
    checksum,
    v6::{Header as Ipv6Header, HEADER_LEN as IPV6_HEADER_LEN, MIN_MTU as IPV6_MIN_MTU},
    Protocol as IpProtocol,
};

mod field {
    use core::ops::Range;

    pub type Field = Range<usize>;
}
