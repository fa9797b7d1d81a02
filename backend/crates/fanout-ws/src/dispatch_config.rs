/// Configuration for the dispatch loop's event queues
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Broadcast requests buffered ahead of the loop. Sessions wait (and stop
    /// reading their socket) while the queue is full.
    pub broadcast_queue_capacity: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            broadcast_queue_capacity: 1024,
        }
    }
}
