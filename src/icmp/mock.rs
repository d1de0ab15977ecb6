//! An in-memory datagram layer backed by a counting buffer pool.

use core::{
    cell::Cell,
    net::Ipv6Addr,
    ops::{Deref, DerefMut},
};
use std::{boxed::Box, rc::Rc, vec, vec::Vec};

use meshnet_storage::Buf;
use meshnet_wire::{icmpv6_fill_checksum, Ends, IpProtocol, IPV6_HEADER_LEN, IPV6_MIN_MTU};
use stable_deref_trait::StableDeref;

use super::Icmp;
use crate::{Ip6, MessageInfo, TxResult};

pub const PEER: Ipv6Addr = Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 1);
pub const LOCAL: Ipv6Addr = Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 2);
pub const ALL_NODES: Ipv6Addr = Ipv6Addr::new(0xff02, 0, 0, 0, 0, 0, 0, 1);

/// A message received from [`PEER`] on [`LOCAL`].
pub fn info() -> MessageInfo {
    MessageInfo::new(PEER, LOCAL, 1)
}

#[derive(Debug)]
pub struct Pooled {
    bytes: Box<[u8]>,
    live: Rc<Cell<usize>>,
}

impl Deref for Pooled {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl DerefMut for Pooled {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

impl Drop for Pooled {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

// SAFETY: the bytes are heap-allocated and do not move with `Pooled`.
unsafe impl StableDeref for Pooled {}

#[derive(Debug)]
pub struct Sent {
    pub bytes: Vec<u8>,
    pub info: MessageInfo,
    pub next_header: IpProtocol,
}

#[derive(Debug)]
pub struct MockIp6 {
    live: Rc<Cell<usize>>,
    /// Size of every pooled buffer.
    pub buf_size: usize,
    /// Buffers that may be live at the same time.
    pub pool_size: usize,
    pub allocated: usize,
    pub tx_result: TxResult,
    pub sent: Vec<Sent>,
}

impl MockIp6 {
    pub fn new() -> Self {
        MockIp6 {
            live: Rc::new(Cell::new(0)),
            buf_size: IPV6_MIN_MTU,
            pool_size: 4,
            allocated: 0,
            tx_result: TxResult::Success,
            sent: Vec::new(),
        }
    }

    /// Buffers currently out of the pool.
    pub fn live(&self) -> usize {
        self.live.get()
    }

    fn alloc(&mut self, reserved: usize) -> Option<Buf<Pooled>> {
        if self.live() >= self.pool_size {
            return None;
        }
        self.live.set(self.live() + 1);
        self.allocated += 1;
        let storage = Pooled {
            bytes: vec![0; self.buf_size].into_boxed_slice(),
            live: self.live.clone(),
        };
        Buf::builder(storage).try_add_reservation(reserved).ok().map(|b| b.build())
    }

    pub fn alloc_without_headroom(&mut self, data: &[u8]) -> Buf<Pooled> {
        let mut buf = self.alloc(0).unwrap();
        buf.append_slice(data);
        buf
    }

    /// An inbound message as delivered by the datagram layer: the cursor
    /// sits on the ICMPv6 header, with the IPv6 header before it.
    pub fn receive(&mut self, message: &[u8]) -> Buf<Pooled> {
        let mut buf = self.alloc(IPV6_HEADER_LEN).unwrap();
        buf.append_slice(message);
        buf
    }

    /// Like [`MockIp6::receive`], with a checksum valid for `info`.
    pub fn receive_valid(&mut self, message: &[u8], info: &MessageInfo) -> Buf<Pooled> {
        let mut buf = self.receive(message);
        icmpv6_fill_checksum(info.rx_addr(), buf.data_mut());
        buf
    }
}

impl Ip6<Pooled> for MockIp6 {
    fn new_message(&mut self, reserved: usize) -> Option<Buf<Pooled>> {
        self.alloc(IPV6_HEADER_LEN + reserved)
    }

    fn send_datagram(
        &mut self,
        mut buf: Buf<Pooled>,
        info: &MessageInfo,
        next_header: IpProtocol,
    ) -> TxResult {
        if let TxResult::Dropped(_) = self.tx_result {
            return self.tx_result;
        }
        // Source selection.
        let src = if info.sock.is_unspecified() {
            LOCAL
        } else {
            info.sock
        };
        Icmp::update_checksum(&mut buf, Ends { src, dst: info.peer });
        self.sent.push(Sent {
            bytes: buf.data().to_vec(),
            info: *info,
            next_header,
        });
        self.tx_result
    }
}
