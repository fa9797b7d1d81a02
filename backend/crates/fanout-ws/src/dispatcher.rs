use crate::{
    BroadcastRequest, ConnectionHandle, ConnectionRegistry, DispatchConfig, DispatchHandle, Event,
    Metrics, Registration, RegistryStats, ShutdownGuard, Unregistration,
};

use log::{debug, info, warn};
use tokio::sync::{mpsc, watch};

/// The single task that owns the registry.
///
/// Register, unregister and broadcast requests arrive on three queues and are
/// applied one at a time, so registry mutation and fan-out never interleave.
pub struct Dispatcher<H: ConnectionHandle> {
    registry: ConnectionRegistry<H>,
    register_rx: mpsc::UnboundedReceiver<Registration<H>>,
    unregister_rx: mpsc::UnboundedReceiver<Unregistration>,
    broadcast_rx: mpsc::Receiver<BroadcastRequest>,
    stats_tx: watch::Sender<RegistryStats>,
    metrics: Metrics,
}

impl<H: ConnectionHandle> Dispatcher<H> {
    /// Create the dispatch loop and the handle sessions use to reach it.
    pub fn new(config: DispatchConfig, metrics: Metrics) -> (Self, DispatchHandle<H>) {
        let (register_tx, register_rx) = mpsc::unbounded_channel();
        let (unregister_tx, unregister_rx) = mpsc::unbounded_channel();
        let (broadcast_tx, broadcast_rx) = mpsc::channel(config.broadcast_queue_capacity.max(1));
        let (stats_tx, stats_rx) = watch::channel(RegistryStats::default());

        let dispatcher = Self {
            registry: ConnectionRegistry::new(),
            register_rx,
            unregister_rx,
            broadcast_rx,
            stats_tx,
            metrics,
        };
        let handle = DispatchHandle {
            register_tx,
            unregister_tx,
            broadcast_tx,
            stats_rx,
        };

        (dispatcher, handle)
    }

    /// Process events until shutdown or until every dispatch handle is gone,
    /// then close all remaining connections.
    ///
    /// Queues are polled in a fixed order: register, unregister, broadcast.
    /// Order within each queue is preserved. A sustained stream of
    /// registrations or unregistrations delays broadcasts until it drains.
    pub async fn run(mut self, mut shutdown: ShutdownGuard) {
        info!("Dispatch loop started");

        loop {
            // Registrations first: a session's own register is always applied
            // before any broadcast it sends.
            let event = tokio::select! {
                biased;

                _ = shutdown.wait() => {
                    info!("Dispatch loop received shutdown signal");
                    break;
                }
                registration = self.register_rx.recv() => match registration {
                    Some(registration) => Event::Register(registration),
                    None => {
                        info!("All dispatch handles dropped, stopping dispatch loop");
                        break;
                    }
                },
                Some(unregistration) = self.unregister_rx.recv() => Event::Unregister(unregistration),
                Some(request) = self.broadcast_rx.recv() => Event::Broadcast(request),
            };

            self.apply(event);
        }

        let closed = self.registry.close_all();
        self.publish_stats();
        info!("Dispatch loop stopped, closed {} connection(s)", closed);
    }

    /// Apply one event to the registry.
    pub fn apply(&mut self, event: Event<H>) {
        match event {
            Event::Register(registration) => self.register(registration),
            Event::Unregister(unregistration) => self.unregister(unregistration),
            Event::Broadcast(request) => {
                self.broadcast(request);
            }
        }

        self.publish_stats();
    }

    pub fn registry(&self) -> &ConnectionRegistry<H> {
        &self.registry
    }

    #[cfg(test)]
    pub(crate) fn register_rx_for_test(&mut self) -> &mut mpsc::UnboundedReceiver<Registration<H>> {
        &mut self.register_rx
    }

    #[cfg(test)]
    pub(crate) fn unregister_rx_for_test(&mut self) -> &mut mpsc::UnboundedReceiver<Unregistration> {
        &mut self.unregister_rx
    }

    fn register(&mut self, registration: Registration<H>) {
        let Registration { identity, handle } = registration;
        let connection_id = handle.connection_id();
        let label = identity.to_string();

        if let Some(superseded) = self.registry.put(identity, handle) {
            warn!(
                "Client {} re-registered, closing superseded connection {}",
                label,
                superseded.connection_id()
            );
            superseded.close();
            self.metrics.registration_superseded();
        }

        info!("Client registered: {} ({})", label, connection_id);
    }

    fn unregister(&mut self, unregistration: Unregistration) {
        let Unregistration {
            identity,
            connection_id,
        } = unregistration;

        if self.registry.remove_connection(&identity, connection_id) {
            info!("Client unregistered: {} ({})", identity, connection_id);
        } else {
            debug!(
                "Ignoring unregister for {} ({}): not the registered connection",
                identity, connection_id
            );
        }
    }

    /// Push the payload to every other member of the origin's group.
    /// Members whose push fails are removed. Returns the delivery count.
    fn broadcast(&mut self, request: BroadcastRequest) -> usize {
        let BroadcastRequest { payload, origin } = request;

        let mut delivered = 0;
        let mut failed = Vec::new();

        for (user, handle) in self.registry.members_of(&origin.group) {
            if user == origin.user {
                continue;
            }

            match handle.push(&payload) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    warn!("Write error to {}/{}: {}", origin.group, user, e);
                    failed.push((user.to_string(), e.kind()));
                }
            }
        }

        for (user, kind) in failed {
            self.registry.remove(&origin.group, &user);
            self.metrics.delivery_failed(kind);
        }

        self.metrics.broadcast_dispatched(delivered);
        debug!(
            "Broadcast from {} delivered to {} member(s)",
            origin, delivered
        );

        delivered
    }

    fn publish_stats(&self) {
        let stats = self.registry.stats();

        let changed = self.stats_tx.send_if_modified(|current| {
            if *current == stats {
                false
            } else {
                *current = stats;
                true
            }
        });

        if changed {
            self.metrics.registry_size(stats);
        }
    }
}
