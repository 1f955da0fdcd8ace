// Queue constants (no magic values)

/// Default cap on payload size accepted by `put` (1 MiB)
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 1024 * 1024;

/// Longest wait a remote caller may request for a blocking get (seconds)
///
/// Transports whose clients carry their own request timeout (JSON-RPC) clamp
/// to this so the client does not give up before the broker does.
pub const MAX_RPC_WAIT_SECS: u64 = 30;
