use crate::RegistryStats;

use metrics::{counter, gauge};

/// Metrics collector for sessions and the dispatch loop
#[derive(Clone)]
pub struct Metrics {
    prefix: &'static str,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            prefix: "fanout_ws",
        }
    }

    /// Record new connection established
    pub fn connection_established(&self) {
        counter!(format!("{}.connections.established", self.prefix)).increment(1);
        gauge!(format!("{}.connections.active", self.prefix)).increment(1.0);
    }

    /// Record connection closed
    pub fn connection_closed(&self, reason: &str) {
        counter!(format!("{}.connections.closed", self.prefix)).increment(1);
        counter!(format!("{}.connections.closed.{}", self.prefix, reason)).increment(1);
        gauge!(format!("{}.connections.active", self.prefix)).decrement(1.0);
    }

    /// Record a frame received from a client
    pub fn frame_received(&self, kind: &str) {
        counter!(format!("{}.frames.received", self.prefix)).increment(1);
        counter!(format!("{}.frames.received.{}", self.prefix, kind)).increment(1);
    }

    /// Record one fan-out and how many members it reached
    pub fn broadcast_dispatched(&self, delivered: usize) {
        counter!(format!("{}.broadcast.dispatched", self.prefix)).increment(1);
        counter!(format!("{}.broadcast.delivered", self.prefix)).increment(delivered as u64);
    }

    /// Record a member dropped because a push to it failed
    pub fn delivery_failed(&self, error_kind: &str) {
        counter!(format!("{}.broadcast.failed", self.prefix)).increment(1);
        counter!(format!("{}.broadcast.failed.{}", self.prefix, error_kind)).increment(1);
    }

    /// Record a registration replacing a live one for the same identity
    pub fn registration_superseded(&self) {
        counter!(format!("{}.registrations.superseded", self.prefix)).increment(1);
    }

    pub fn registry_size(&self, stats: RegistryStats) {
        gauge!(format!("{}.registry.groups", self.prefix)).set(stats.groups as f64);
        gauge!(format!("{}.registry.members", self.prefix)).set(stats.members as f64);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
