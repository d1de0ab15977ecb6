use meshnet_storage::{Buf, Storage};
use meshnet_wire::{IpProtocol, Icmpv6Header, Icmpv6Message, ICMPV6_HEADER_LEN};

use crate::{ErrorKind, Ip6, MessageInfo};

/// Echo requests carry a single fixed identifier; callers correlate replies
/// by sequence number.
pub const ECHO_IDENT: u16 = 1;
const ECHO_INITIAL_SEQ_NO: u16 = 1;

/// The sink of received echo replies.
pub trait EchoReplyHandler<S: Storage> {
    /// `buf` starts at the ICMPv6 header of the reply.
    fn handle_echo_reply(&mut self, buf: &Buf<S>, info: &MessageInfo);
}

impl<S: Storage, F: FnMut(&Buf<S>, &MessageInfo)> EchoReplyHandler<S> for F {
    fn handle_echo_reply(&mut self, buf: &Buf<S>, info: &MessageInfo) {
        self(buf, info)
    }
}

pub(super) struct Echo<'a, S: Storage> {
    seq_no: u16,
    enabled: bool,
    reply_handler: Option<&'a mut dyn EchoReplyHandler<S>>,
}

impl<'a, S: Storage> Echo<'a, S> {
    pub const fn new() -> Self {
        Echo {
            seq_no: ECHO_INITIAL_SEQ_NO,
            enabled: true,
            reply_handler: None,
        }
    }

    pub fn seq_no(&self) -> u16 {
        self.seq_no
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn has_reply_handler(&self) -> bool {
        self.reply_handler.is_some()
    }

    pub fn set_reply_handler(&mut self, handler: Option<&'a mut dyn EchoReplyHandler<S>>) {
        self.reply_handler = handler;
    }

    fn next_seq_no(&mut self) -> u16 {
        let seq_no = self.seq_no;
        self.seq_no = seq_no.wrapping_add(1);
        seq_no
    }

    pub fn send_request<D: Ip6<S>>(
        &mut self,
        ip6: &mut D,
        mut buf: Buf<S>,
        info: &MessageInfo,
    ) -> Result<(), ErrorKind> {
        let mut header = Icmpv6Header::with_type(Icmpv6Message::EchoRequest, 0);
        header.set_echo_ident(ECHO_IDENT);
        header.set_echo_seq_no(self.next_seq_no());

        match buf.try_prepend(ICMPV6_HEADER_LEN) {
            Some(slice) => slice.copy_from_slice(header.as_bytes()),
            None => {
                log_tx!("no headroom for echo request header");
                return Err(ErrorKind::NoBufs);
            }
        }

        check_tx!(
            ip6.send_datagram(buf, info, IpProtocol::Icmpv6),
            "echo request"
        )
    }

    /// Answer `request`, which starts at its ICMPv6 header.
    ///
    /// Running out of buffers is not an error: the request goes unanswered.
    pub fn handle_request<D: Ip6<S>>(
        &mut self,
        ip6: &mut D,
        request: &Buf<S>,
        info: &MessageInfo,
    ) -> Result<(), ErrorKind> {
        if !self.enabled {
            return Ok(());
        }
        let Some(mut header) = Icmpv6Header::from_bytes(request.data()) else {
            return Err(ErrorKind::Drop);
        };
        log_rx!("received echo request seq_no={}", header.echo_seq_no());

        let Some(mut reply) = ip6.new_message(0) else {
            log_tx!("no buffer for echo reply");
            return Ok(());
        };
        let payload_len = request.len() - ICMPV6_HEADER_LEN;
        if !reply.try_set_len(ICMPV6_HEADER_LEN + payload_len) {
            log_tx!("echo reply of {payload_len} bytes does not fit a buffer");
            return Ok(());
        }

        // Identifier and sequence number are mirrored along with the payload.
        header.set_msg_type(Icmpv6Message::EchoReply);
        header.set_msg_code(0);
        header.set_checksum(0);
        reply.write(0, header.as_bytes());
        request.copy_to(ICMPV6_HEADER_LEN, ICMPV6_HEADER_LEN, payload_len, &mut reply);

        check_tx!(
            ip6.send_datagram(reply, &info.reply(), IpProtocol::Icmpv6),
            "echo reply"
        )
    }

    pub fn handle_reply(&mut self, buf: &Buf<S>, info: &MessageInfo) {
        if !self.enabled {
            return;
        }
        match self.reply_handler.as_deref_mut() {
            Some(handler) => handler.handle_echo_reply(buf, info),
            None => {
                log_rx!("no handler for echo reply");
            }
        }
    }
}
