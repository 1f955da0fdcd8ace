// Application Layer - Use Cases

pub mod constants;
pub mod queue;
pub mod shutdown;

// Re-exports
pub use queue::{BrokerStats, QueueLimits, QueueService};
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
