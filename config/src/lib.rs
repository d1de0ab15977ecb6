#![no_std]

/// Maximum number of destination-unreachable observers an ICMP engine keeps.
pub const STATIC_ICMP_HANDLER_CAPACITY: usize = 8;
