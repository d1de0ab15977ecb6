use core::{fmt, net::Ipv6Addr};

use meshnet_storage::{Buf, Storage};
use meshnet_wire::{
    icmpv6_fill_checksum, icmpv6_verify_checksum, Ends, Icmpv6Header, Icmpv6Message, IpProtocol,
    Ipv6Header, ICMPV6_HEADER_LEN, IPV6_HEADER_LEN,
};

use self::{echo::Echo, handler::Handlers};
use crate::{Error, ErrorKind, Ip6, MessageInfo};

mod echo;
pub use self::echo::{EchoReplyHandler, ECHO_IDENT};

mod handler;
pub use self::handler::IcmpHandler;

#[cfg(test)]
mod mock;

/// The ICMPv6 engine of a stack instance.
///
/// The engine holds no buffers between calls. Entry points that emit
/// messages borrow the datagram layer for the duration of the call.
pub struct Icmp<'a, S: Storage> {
    handlers: Handlers<'a, S>,
    echo: Echo<'a, S>,
}

impl<'a, S: Storage> Icmp<'a, S> {
    pub const fn new() -> Self {
        Icmp {
            handlers: Handlers::new(),
            echo: Echo::new(),
        }
    }

    /// Allocate a message with room for the ICMPv6 header in front of
    /// `reserved` bytes of headroom.
    pub fn new_message<D: Ip6<S>>(ip6: &mut D, reserved: usize) -> Option<Buf<S>> {
        ip6.new_message(ICMPV6_HEADER_LEN + reserved)
    }

    /// Subscribe `handler` to destination-unreachable messages.
    ///
    /// On failure the handler is handed back inside the error.
    pub fn register_handler(
        &mut self,
        handler: &'a dyn IcmpHandler<S>,
    ) -> Result<(), Error<&'a dyn IcmpHandler<S>>> {
        self.handlers.register(handler)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Replace the sink of received echo replies. `None` discards them.
    pub fn set_echo_reply_handler(&mut self, handler: Option<&'a mut dyn EchoReplyHandler<S>>) {
        self.echo.set_reply_handler(handler)
    }

    pub fn has_echo_reply_handler(&self) -> bool {
        self.echo.has_reply_handler()
    }

    /// Answering echo requests and forwarding echo replies is enabled by
    /// default.
    pub fn set_echo_enabled(&mut self, enabled: bool) {
        self.echo.set_enabled(enabled)
    }

    pub fn is_echo_enabled(&self) -> bool {
        self.echo.is_enabled()
    }

    /// The sequence number the next echo request will carry.
    pub fn echo_seq_no(&self) -> u16 {
        self.echo.seq_no()
    }

    /// Send `buf` as the payload of an echo request.
    ///
    /// `buf` needs [`ICMPV6_HEADER_LEN`] bytes of headroom, as provided by
    /// [`Icmp::new_message`].
    pub fn send_echo_request<D: Ip6<S>>(
        &mut self,
        ip6: &mut D,
        buf: Buf<S>,
        info: &MessageInfo,
    ) -> Result<(), ErrorKind> {
        self.echo.send_request(ip6, buf, info)
    }

    /// Report an error condition to `dst`, quoting the IPv6 header of the
    /// offending datagram.
    pub fn send_error<D: Ip6<S>>(
        &mut self,
        ip6: &mut D,
        dst: Ipv6Addr,
        msg_type: Icmpv6Message,
        code: u8,
        offending: &Ipv6Header,
    ) -> Result<(), ErrorKind> {
        let Some(mut buf) = ip6.new_message(0) else {
            log_tx!("no buffer for {msg_type} message");
            return Err(ErrorKind::NoBufs);
        };
        if !buf.try_set_len(ICMPV6_HEADER_LEN + IPV6_HEADER_LEN) {
            log_tx!("{msg_type} message does not fit a buffer");
            return Err(ErrorKind::NoBufs);
        }

        buf.write(ICMPV6_HEADER_LEN, &offending.to_bytes());
        buf.write(0, Icmpv6Header::with_type(msg_type, code).as_bytes());

        check_tx!(
            ip6.send_datagram(buf, &MessageInfo::to(dst), IpProtocol::Icmpv6),
            "error message"
        )
    }

    /// Process an inbound ICMPv6 message whose cursor sits on the ICMPv6
    /// header.
    ///
    /// Short and corrupted messages are rejected with [`ErrorKind::Drop`].
    /// Unknown message types are accepted and ignored.
    pub fn handle_message<D: Ip6<S>>(
        &mut self,
        ip6: &mut D,
        buf: &mut Buf<S>,
        info: &MessageInfo,
    ) -> Result<(), ErrorKind> {
        let Some(header) = Icmpv6Header::from_bytes(buf.data()) else {
            log_rx!("message too short: {} bytes", buf.len());
            return Err(ErrorKind::Drop);
        };
        if !icmpv6_verify_checksum(info.rx_addr(), buf.data()) {
            log_rx!("bad checksum from {}", info.peer);
            return Err(ErrorKind::Drop);
        }

        match header.msg_type() {
            Icmpv6Message::EchoRequest => self.echo.handle_request(ip6, buf, info),
            Icmpv6Message::EchoReply => {
                self.echo.handle_reply(buf, info);
                Ok(())
            }
            Icmpv6Message::DstUnreachable => {
                buf.slice_into(ICMPV6_HEADER_LEN..);
                self.handlers.notify_dst_unreach(buf, info, &header);
                Ok(())
            }
            _msg_type => {
                log_rx!("ignored {} message from {}", _msg_type, info.peer);
                Ok(())
            }
        }
    }

    /// Fill in the checksum of an outbound message whose cursor sits on the
    /// ICMPv6 header.
    ///
    /// Messages shorter than the header are left untouched.
    pub fn update_checksum(buf: &mut Buf<S>, addr: Ends<Ipv6Addr>) {
        if buf.len() >= ICMPV6_HEADER_LEN {
            icmpv6_fill_checksum(addr, buf.data_mut());
        }
    }
}

impl<'a, S: Storage> Default for Icmp<'a, S> {
    fn default() -> Self {
        Icmp::new()
    }
}

impl<'a, S: Storage> fmt::Debug for Icmp<'a, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Icmp")
            .field("handlers", &self.handlers.len())
            .field("echo_enabled", &self.echo.is_enabled())
            .field("echo_seq_no", &self.echo.seq_no())
            .finish_non_exhaustive()
    }
}
