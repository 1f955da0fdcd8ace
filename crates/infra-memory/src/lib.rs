// Lineup Infrastructure - In-Memory Adapter
// Implements: QueueStore (process-lifetime registry, no persistence)

mod queue_state;
mod registry;

pub use registry::InMemoryQueueStore;
