use core::fmt;

use crate::TxDropReason;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorKind {
    /// A malformed or corrupted inbound message was discarded.
    Drop,
    /// No buffer could be allocated, or a buffer was too small.
    NoBufs,
    /// The handler is already registered.
    AlreadyRegistered,
    /// The datagram layer refused the message.
    Tx(TxDropReason),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Drop => write!(f, "message dropped"),
            ErrorKind::NoBufs => write!(f, "no buffers"),
            ErrorKind::AlreadyRegistered => write!(f, "already registered"),
            ErrorKind::Tx(reason) => write!(f, "transmission failed: {reason}"),
        }
    }
}

impl core::error::Error for ErrorKind {}

impl From<TxDropReason> for ErrorKind {
    fn from(reason: TxDropReason) -> Self {
        match reason {
            TxDropReason::QueueFull => ErrorKind::NoBufs,
            reason => ErrorKind::Tx(reason),
        }
    }
}

meshnet_error::make_error!(ErrorKind => pub Error);
