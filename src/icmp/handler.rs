use core::ptr;

use meshnet_config::STATIC_ICMP_HANDLER_CAPACITY;
use meshnet_storage::{Buf, Storage};
use meshnet_wire::Icmpv6Header;

use crate::{Error, ErrorKind, MessageInfo};

/// An observer of Destination Unreachable messages.
///
/// Handlers are identified by address: the same object cannot be registered
/// twice, while two distinct objects with equal contents can.
pub trait IcmpHandler<S: Storage> {
    /// `buf` starts right after the ICMPv6 header, at the excerpt of the
    /// datagram that could not be delivered.
    fn handle_dst_unreach(&self, buf: &Buf<S>, info: &MessageInfo, header: &Icmpv6Header);
}

pub(super) struct Handlers<'a, S: Storage> {
    chain: heapless::Vec<&'a dyn IcmpHandler<S>, STATIC_ICMP_HANDLER_CAPACITY>,
}

impl<'a, S: Storage> Handlers<'a, S> {
    pub const fn new() -> Self {
        Handlers { chain: heapless::Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn contains(&self, handler: &dyn IcmpHandler<S>) -> bool {
        self.chain.iter().any(|&h| ptr::addr_eq(h, handler))
    }

    pub fn register(
        &mut self,
        handler: &'a dyn IcmpHandler<S>,
    ) -> Result<(), Error<&'a dyn IcmpHandler<S>>> {
        if self.contains(handler) {
            return Err(ErrorKind::AlreadyRegistered.with(handler));
        }
        self.chain
            .push(handler)
            .map_err(|handler| ErrorKind::NoBufs.with(handler))
    }

    // Most recently registered first. Callers must not rely on the order.
    pub fn notify_dst_unreach(&self, buf: &Buf<S>, info: &MessageInfo, header: &Icmpv6Header) {
        for handler in self.chain.iter().rev() {
            handler.handle_dst_unreach(buf, info, header);
        }
    }
}
