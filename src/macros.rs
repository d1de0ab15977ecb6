/// A protocol-hygiene event: malformed or ignored inbound traffic.
macro_rules! log_rx {
    ($($arg:tt)*) => {
        #[cfg(feature = "log")]
        tracing::debug!(target: "net::icmp", $($arg)*)
    };
}

/// Outbound traffic, including allocation and transmission failures.
macro_rules! log_tx {
    ($($arg:tt)*) => {
        #[cfg(feature = "log")]
        tracing::info!(target: "net::icmp", $($arg)*)
    };
}

/// Turn a [`TxResult`](crate::TxResult) into a `Result`, logging the outcome.
macro_rules! check_tx {
    ($res:expr, $what:literal) => {{
        let res = $res.into_result();
        match res {
            Ok(()) => {
                log_tx!("sent {}", $what);
            }
            Err(_err) => {
                log_tx!("failed to send {}: {}", $what, _err);
            }
        }
        res
    }};
}
