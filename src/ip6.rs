use core::{fmt, net::Ipv6Addr};

use meshnet_storage::{Buf, Storage};
use meshnet_wire::{Ends, IpProtocol};

use crate::ErrorKind;

/// Addressing of a datagram, as seen from this node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageInfo {
    /// The remote end.
    pub peer: Ipv6Addr,
    /// The local end; unspecified lets the datagram layer pick a source.
    pub sock: Ipv6Addr,
    pub iface: u8,
}

impl MessageInfo {
    pub const fn new(peer: Ipv6Addr, sock: Ipv6Addr, iface: u8) -> Self {
        MessageInfo { peer, sock, iface }
    }

    /// Addressing for a message towards `peer` from whatever source the
    /// datagram layer selects.
    pub const fn to(peer: Ipv6Addr) -> Self {
        MessageInfo::new(peer, Ipv6Addr::UNSPECIFIED, 0)
    }

    /// Addressing for an answer to a message received with `self`.
    ///
    /// A multicast local address is never used as a source; it is left
    /// unspecified instead.
    pub fn reply(&self) -> Self {
        let sock = if self.sock.is_multicast() {
            Ipv6Addr::UNSPECIFIED
        } else {
            self.sock
        };
        MessageInfo::new(self.peer, sock, self.iface)
    }

    /// Pseudo-header addresses of a message received with `self`.
    pub const fn rx_addr(&self) -> Ends<Ipv6Addr> {
        Ends { src: self.peer, dst: self.sock }
    }

    /// Pseudo-header addresses of a message sent with `self`.
    pub const fn tx_addr(&self) -> Ends<Ipv6Addr> {
        Ends { src: self.sock, dst: self.peer }
    }
}

impl Default for MessageInfo {
    fn default() -> Self {
        MessageInfo::to(Ipv6Addr::UNSPECIFIED)
    }
}

#[must_use]
#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Hash)]
pub enum TxResult {
    /// Transmission successful.
    Success,
    /// Also success, but with a warning.
    CongestionAlert,
    /// Transmission failed & packet dropped.
    Dropped(TxDropReason),
}

impl TxResult {
    pub fn into_result(self) -> Result<(), ErrorKind> {
        match self {
            TxResult::Success | TxResult::CongestionAlert => Ok(()),
            TxResult::Dropped(reason) => Err(reason.into()),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Hash)]
pub enum TxDropReason {
    QueueFull,
    NoRoute,
    NeighborPending,
}

impl fmt::Display for TxDropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxDropReason::QueueFull => write!(f, "queue full"),
            TxDropReason::NoRoute => write!(f, "no route"),
            TxDropReason::NeighborPending => write!(f, "neighbor pending"),
        }
    }
}

/// The IPv6 datagram layer beneath the ICMP engine.
pub trait Ip6<S: Storage> {
    /// Allocate an empty message with at least `reserved` bytes of headroom
    /// on top of what the datagram layer needs for its own headers.
    fn new_message(&mut self, reserved: usize) -> Option<Buf<S>>;

    /// Hand `buf` over for transmission. The buffer is consumed whatever the
    /// outcome.
    fn send_datagram(&mut self, buf: Buf<S>, info: &MessageInfo, next_header: IpProtocol)
        -> TxResult;
}

impl<S: Storage, T: Ip6<S>> Ip6<S> for &mut T {
    fn new_message(&mut self, reserved: usize) -> Option<Buf<S>> {
        T::new_message(self, reserved)
    }

    fn send_datagram(
        &mut self,
        buf: Buf<S>,
        info: &MessageInfo,
        next_header: IpProtocol,
    ) -> TxResult {
        T::send_datagram(self, buf, info, next_header)
    }
}
