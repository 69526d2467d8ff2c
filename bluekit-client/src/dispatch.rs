//! The signal dispatch loop
//!
//! One task owns the raw-signal queue the transport feeds. Each signal is
//! decoded into a (path, interface map) pair, applied to the object registry
//! as a replacement snapshot, and fanned out to the matching subscription
//! queues. An undecodable body is logged and dropped; the loop itself only
//! stops on shutdown or when the transport closes the queue.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bluekit_bus::{
    BusTransport, BusValue, InterfaceMap, ObjectPath, RawSignal, INTERFACES_ADDED,
    INTERFACES_REMOVED,
};
use tokio::sync::{mpsc, oneshot};

use crate::error::{ClientError, Result};
use crate::event::ChangeEvent;
use crate::registry::ObjectRegistry;
use crate::watch::WatchTable;

/// How long a slow subscriber may block one delivery before the event is
/// dropped for that subscriber only
const DELIVERY_TIMEOUT: Duration = Duration::from_millis(100);

/// Pull the (path, interface map) pair out of a loosely typed signal body.
///
/// The body must contain exactly one object path and exactly one map whose
/// values are themselves maps; anything else is undecodable. Bodies that
/// carry a path plus an array of interface names (removal notifications)
/// fail here by design of the shape check.
pub(crate) fn decode_signal_body(body: &[BusValue]) -> Result<(ObjectPath, InterfaceMap)> {
    let mut path: Option<ObjectPath> = None;
    let mut interfaces: Option<InterfaceMap> = None;

    for element in body {
        match element {
            BusValue::Path(p) => {
                if path.replace(p.clone()).is_some() {
                    return Err(ClientError::SignalDecode(
                        "more than one object path in body".to_string(),
                    ));
                }
            }
            BusValue::Dict(entries) => {
                let mut map = HashMap::with_capacity(entries.len());
                for (name, value) in entries {
                    match value {
                        BusValue::Dict(props) => {
                            map.insert(name.clone(), props.clone());
                        }
                        other => {
                            return Err(ClientError::SignalDecode(format!(
                                "interface entry {name} holds a {} instead of a map",
                                other.type_name()
                            )));
                        }
                    }
                }
                if interfaces.replace(map).is_some() {
                    return Err(ClientError::SignalDecode(
                        "more than one interface map in body".to_string(),
                    ));
                }
            }
            other => {
                return Err(ClientError::SignalDecode(format!(
                    "unexpected {} element in body",
                    other.type_name()
                )));
            }
        }
    }

    match (path, interfaces) {
        (Some(path), Some(interfaces)) => Ok((path, interfaces)),
        (None, _) => Err(ClientError::SignalDecode(
            "body carries no object path".to_string(),
        )),
        (_, None) => Err(ClientError::SignalDecode(
            "body carries no interface map".to_string(),
        )),
    }
}

/// The long-running task that turns raw signals into registry updates and
/// subscriber deliveries
pub(crate) struct DispatchLoop {
    registry: Arc<ObjectRegistry>,
    watches: Arc<WatchTable>,
    bus: Arc<dyn BusTransport>,
    signal_rx: mpsc::Receiver<RawSignal>,
    shutdown_rx: oneshot::Receiver<()>,
}

impl DispatchLoop {
    pub(crate) fn new(
        registry: Arc<ObjectRegistry>,
        watches: Arc<WatchTable>,
        bus: Arc<dyn BusTransport>,
        signal_rx: mpsc::Receiver<RawSignal>,
        shutdown_rx: oneshot::Receiver<()>,
    ) -> Self {
        Self {
            registry,
            watches,
            bus,
            signal_rx,
            shutdown_rx,
        }
    }

    pub(crate) async fn run(mut self) {
        tracing::debug!("signal dispatch loop started");
        loop {
            tokio::select! {
                _ = &mut self.shutdown_rx => {
                    tracing::debug!("signal dispatch loop shutting down");
                    break;
                }
                signal = self.signal_rx.recv() => {
                    match signal {
                        Some(signal) => self.handle_signal(signal).await,
                        None => {
                            tracing::warn!("transport closed the signal queue");
                            break;
                        }
                    }
                }
            }
        }
    }

    async fn handle_signal(&self, signal: RawSignal) {
        let (path, interfaces) = match decode_signal_body(&signal.body) {
            Ok(decoded) => decoded,
            Err(error) => {
                tracing::debug!(signal = %signal.name, %error, "dropping signal");
                return;
            }
        };

        let object = match self.registry.upsert(self.bus.clone(), path.clone(), &interfaces) {
            Some(object) => object,
            None => return,
        };

        let member = signal.member();
        let broadened = member == INTERFACES_ADDED || member == INTERFACES_REMOVED;
        let targets = self.watches.deliveries_for(&path, member, broadened);
        if targets.is_empty() {
            return;
        }

        let event = ChangeEvent {
            path: path.clone(),
            object,
            signal: signal.name.clone(),
        };

        for tx in targets {
            match tx.send_timeout(event.clone(), DELIVERY_TIMEOUT).await {
                Ok(()) => {}
                Err(mpsc::error::SendTimeoutError::Timeout(_)) => {
                    tracing::warn!(path = %path, signal = %signal.name, "subscriber queue full, dropping event");
                }
                Err(mpsc::error::SendTimeoutError::Closed(_)) => {
                    tracing::debug!(path = %path, "subscriber queue closed");
                }
            }
        }
    }
}
