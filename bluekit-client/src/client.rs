//! The BlueZ client facade
//!
//! Owns the transport handle, the object registry, the watch table, and the
//! dispatch task. `connect` performs the bootstrap sequence (introspect the
//! service root, pull the bulk snapshot, start dispatching) and everything
//! after that is lookups, subscriptions, and remote calls against the cached
//! typed objects.

use std::collections::HashMap;
use std::sync::Arc;

use bluekit_api::{Adapter, BluezInterface, BluezObject, BLUEZ_DEST, BLUEZ_ROOT_PATH};
use bluekit_bus::introspect::Node;
use bluekit_bus::{BusTransport, InterfaceMap, ObjectPath, SignalKind, ROOT_PATH};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::dispatch::DispatchLoop;
use crate::error::{ClientError, Result};
use crate::event::WatchStream;
use crate::registry::ObjectRegistry;
use crate::watch::{WatchKey, WatchTable};

/// Capacity of the queue the transport feeds raw signals into
const SIGNAL_QUEUE_CAPACITY: usize = 16;
/// Capacity of each per-subscription delivery queue
const WATCH_QUEUE_CAPACITY: usize = 8;

/// The signal kinds a discovery watch cares about: objects appearing and
/// disappearing under the adapter
fn discovery_kinds() -> Vec<SignalKind> {
    vec![
        SignalKind::interfaces_added(),
        SignalKind::interfaces_removed(),
    ]
}

/// Client-side mirror of the BlueZ object space
pub struct BluezClient {
    bus: Arc<dyn BusTransport>,
    registry: Arc<ObjectRegistry>,
    watches: Arc<WatchTable>,
    root: Node,
    shutdown_tx: Option<oneshot::Sender<()>>,
    dispatch: Option<JoinHandle<()>>,
}

impl BluezClient {
    /// Bootstrap against the service and start the dispatch loop.
    ///
    /// Introspects the service root, mirrors the full managed-object
    /// snapshot into the registry, wires the transport's signal queue to the
    /// dispatch task, and returns a ready client. Any bus failure during the
    /// sequence aborts the whole connect.
    pub async fn connect(bus: Arc<dyn BusTransport>) -> Result<Self> {
        let root_path = ObjectPath::from(BLUEZ_ROOT_PATH);
        let root = bus.introspect(BLUEZ_DEST, &root_path).await?;
        tracing::debug!(interfaces = root.interfaces.len(), children = root.nodes.len(), "service root introspected");

        let snapshot = bus
            .managed_objects(BLUEZ_DEST, &ObjectPath::from(ROOT_PATH))
            .await?;

        let registry = Arc::new(ObjectRegistry::new());
        registry.bootstrap(bus.clone(), snapshot);

        let watches = Arc::new(WatchTable::new());

        let (signal_tx, signal_rx) = mpsc::channel(SIGNAL_QUEUE_CAPACITY);
        bus.register_signal_queue(signal_tx);

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let dispatch = DispatchLoop::new(
            Arc::clone(&registry),
            Arc::clone(&watches),
            bus.clone(),
            signal_rx,
            shutdown_rx,
        );
        let handle = tokio::spawn(dispatch.run());

        tracing::info!(objects = registry.len(), "connected");
        Ok(Self {
            bus,
            registry,
            watches,
            root,
            shutdown_tx: Some(shutdown_tx),
            dispatch: Some(handle),
        })
    }

    /// Introspection document of the service root, captured at connect time
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Snapshot of the cached object at `path`
    pub fn get(&self, path: &ObjectPath) -> Option<BluezObject> {
        self.registry.get(path)
    }

    /// All cached adapters.
    ///
    /// A registry entry whose primary interface says adapter but whose
    /// variant disagrees would be an internal consistency bug; such an entry
    /// is logged and skipped rather than surfaced.
    pub fn adapters(&self) -> Vec<Adapter> {
        self.registry
            .find_by_type(BluezInterface::Adapter)
            .into_iter()
            .filter_map(|object| {
                let path = object.path().clone();
                match object.into_adapter() {
                    Some(adapter) => Some(adapter),
                    None => {
                        tracing::error!(path = %path, "registry entry typed as adapter is not an adapter");
                        None
                    }
                }
            })
            .collect()
    }

    /// All cached objects of one primary type
    pub fn objects_by_type(&self, interface: BluezInterface) -> Vec<BluezObject> {
        self.registry.find_by_type(interface)
    }

    /// All cached objects declaring a remote interface name
    pub fn objects_by_interface(&self, interface: &str) -> Vec<BluezObject> {
        self.registry.find_by_interface(interface)
    }

    /// Cached objects matching a path pattern; a trailing `*` makes the
    /// pattern a prefix scan
    pub fn find_objects(&self, pattern: &str) -> Result<Vec<BluezObject>> {
        self.registry.find_by_path(pattern)
    }

    /// Fetch a live introspection document for one object
    pub async fn introspect(&self, path: &ObjectPath) -> Result<Node> {
        Ok(self.bus.introspect(BLUEZ_DEST, path).await?)
    }

    /// Fetch a live managed-object snapshot, bypassing the registry
    pub async fn managed_objects(&self) -> Result<HashMap<ObjectPath, InterfaceMap>> {
        Ok(self
            .bus
            .managed_objects(BLUEZ_DEST, &ObjectPath::from(ROOT_PATH))
            .await?)
    }

    /// Subscribe to change events for a path or `prefix*` pattern.
    ///
    /// At most one subscription per key; a second subscribe on the same key
    /// fails with [`ClientError::AlreadyWatched`] and leaves the existing
    /// stream untouched. Transport-level matches are shared across
    /// subscriptions and only added for kinds nobody was watching yet.
    pub async fn subscribe(&self, key: &str, kinds: &[SignalKind]) -> Result<WatchStream> {
        let key = WatchKey::parse(key);
        if self.watches.contains(&key) {
            return Err(ClientError::AlreadyWatched(key.to_string()));
        }

        let newly_active = self.watches.acquire_matches(kinds);
        for kind in &newly_active {
            if let Err(error) = self.bus.add_match(&kind.interface, &kind.signal).await {
                // Roll the reference counts back; matches already added at
                // the transport stay active until their kinds are next
                // released.
                self.watches.release_matches(kinds);
                return Err(error.into());
            }
        }

        let (tx, rx) = mpsc::channel(WATCH_QUEUE_CAPACITY);
        if self.watches.insert(key.clone(), tx, kinds.to_vec()).is_err() {
            // Lost a race with a concurrent subscribe on the same key
            for kind in self.watches.release_matches(kinds) {
                if let Err(error) = self.bus.remove_match(&kind.interface, &kind.signal).await {
                    tracing::warn!(%error, "failed to remove match while rolling back subscribe");
                }
            }
            return Err(ClientError::AlreadyWatched(key.to_string()));
        }

        tracing::debug!(key = %key, kinds = kinds.len(), "watch registered");
        Ok(WatchStream::new(rx))
    }

    /// Tear down the subscription for `key`, closing its stream.
    ///
    /// Matches whose last reference this subscription held are removed at
    /// the transport.
    pub async fn unsubscribe(&self, key: &str) -> Result<()> {
        let key = WatchKey::parse(key);
        let kinds = self
            .watches
            .remove(&key)
            .ok_or_else(|| ClientError::WatchNotFound(key.to_string()))?;

        for kind in self.watches.release_matches(&kinds) {
            self.bus.remove_match(&kind.interface, &kind.signal).await?;
        }

        tracing::debug!(key = %key, "watch removed");
        Ok(())
    }

    /// Start discovery on an adapter: watch its path for objects appearing
    /// and disappearing, then issue the remote StartDiscovery.
    ///
    /// If the remote call fails the watch is rolled back so a retry is not
    /// rejected as a duplicate.
    pub async fn start_discovery(&self, adapter: &Adapter) -> Result<WatchStream> {
        let key = adapter.path().as_str().to_string();
        let stream = self.subscribe(&key, &discovery_kinds()).await?;

        if let Err(error) = adapter.start_discovery().await {
            if let Err(cleanup) = self.unsubscribe(&key).await {
                tracing::warn!(%cleanup, "failed to roll back discovery watch");
            }
            return Err(error.into());
        }
        Ok(stream)
    }

    /// Stop discovery on an adapter and drop its watch
    pub async fn stop_discovery(&self, adapter: &Adapter) -> Result<()> {
        adapter.stop_discovery().await?;
        self.unsubscribe(adapter.path().as_str()).await
    }

    /// Stop the dispatch loop. Idempotent; also runs on drop.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        // The loop exits on the shutdown signal; detaching is enough.
        self.dispatch.take();
    }
}

impl Drop for BluezClient {
    fn drop(&mut self) {
        self.shutdown();
    }
}
