#![no_std]
#![deny(future_incompatible)]
#![deny(rust_2018_idioms)]
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod error;
pub use self::error::{Error, ErrorKind};

mod ip6;
pub use self::ip6::{Ip6, MessageInfo, TxDropReason, TxResult};

mod icmp;
pub use self::icmp::{EchoReplyHandler, Icmp, IcmpHandler, ECHO_IDENT};

pub use meshnet_storage as storage;
pub use meshnet_wire as wire;
