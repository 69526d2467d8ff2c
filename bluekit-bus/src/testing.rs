//! Scriptable transport double for tests
//!
//! [`MockBus`] implements [`BusTransport`] against an in-memory object
//! snapshot. Tests script the snapshot, property values, and method replies
//! up front, then drive the system by injecting raw signals into whatever
//! queue got registered. Match registrations are counted so tests can assert
//! the net number of transport-level matches.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::error::{BusError, Result};
use crate::introspect::{Interface, Node};
use crate::path::ObjectPath;
use crate::transport::BusTransport;
use crate::types::{InterfaceMap, PropertyMap, RawSignal};
use crate::value::BusValue;

#[derive(Default)]
struct MockState {
    snapshot: HashMap<ObjectPath, InterfaceMap>,
    properties: HashMap<(ObjectPath, String), BusValue>,
    method_replies: HashMap<String, BusValue>,
    method_calls: Vec<(ObjectPath, String)>,
    add_match_calls: usize,
    remove_match_calls: usize,
    failing_matches: Vec<(String, String)>,
    signal_tx: Option<mpsc::Sender<RawSignal>>,
}

/// In-memory [`BusTransport`] implementation for tests
#[derive(Default)]
pub struct MockBus {
    state: Mutex<MockState>,
}

impl MockBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mock pre-populated with a managed-object snapshot
    pub fn with_snapshot(snapshot: HashMap<ObjectPath, InterfaceMap>) -> Self {
        let bus = Self::new();
        bus.state.lock().snapshot = snapshot;
        bus
    }

    /// Add one interface snapshot to an object in the scripted state
    pub fn insert_object(&self, path: ObjectPath, interface: &str, properties: PropertyMap) {
        let mut state = self.state.lock();
        state
            .snapshot
            .entry(path)
            .or_default()
            .insert(interface.to_string(), properties);
    }

    /// Script the value returned for a qualified property name
    pub fn set_property(&self, path: ObjectPath, qualified_name: &str, value: BusValue) {
        self.state
            .lock()
            .properties
            .insert((path, qualified_name.to_string()), value);
    }

    /// Script the reply for a qualified method name
    pub fn set_method_reply(&self, method: &str, reply: BusValue) {
        self.state
            .lock()
            .method_replies
            .insert(method.to_string(), reply);
    }

    /// Make `add_match` fail for one signal kind
    pub fn fail_add_match(&self, interface: &str, signal: &str) {
        self.state
            .lock()
            .failing_matches
            .push((interface.to_string(), signal.to_string()));
    }

    /// Inject a raw signal into the registered queue.
    ///
    /// Returns false when no queue is registered or the queue is gone.
    pub async fn emit_signal(&self, signal: RawSignal) -> bool {
        let tx = self.state.lock().signal_tx.clone();
        match tx {
            Some(tx) => tx.send(signal).await.is_ok(),
            None => false,
        }
    }

    /// All `(path, method)` pairs invoked through the mock, in order
    pub fn method_calls(&self) -> Vec<(ObjectPath, String)> {
        self.state.lock().method_calls.clone()
    }

    pub fn add_match_count(&self) -> usize {
        self.state.lock().add_match_calls
    }

    pub fn remove_match_count(&self) -> usize {
        self.state.lock().remove_match_calls
    }

    /// Adds minus removes; zero means no dangling transport-level matches
    pub fn net_match_count(&self) -> isize {
        let state = self.state.lock();
        state.add_match_calls as isize - state.remove_match_calls as isize
    }
}

#[async_trait]
impl BusTransport for MockBus {
    async fn introspect(&self, _destination: &str, path: &ObjectPath) -> Result<Node> {
        let state = self.state.lock();
        let interfaces = state
            .snapshot
            .get(path)
            .map(|data| {
                data.keys()
                    .map(|name| Interface {
                        name: name.clone(),
                        methods: vec![],
                    })
                    .collect()
            })
            .unwrap_or_default();
        let nodes = state
            .snapshot
            .keys()
            .filter(|p| *p != path && p.has_prefix(path.as_str()))
            .map(|p| Node {
                name: p.as_str().to_string(),
                ..Node::default()
            })
            .collect();
        Ok(Node {
            name: path.as_str().to_string(),
            interfaces,
            nodes,
        })
    }

    async fn managed_objects(
        &self,
        _destination: &str,
        _path: &ObjectPath,
    ) -> Result<HashMap<ObjectPath, InterfaceMap>> {
        Ok(self.state.lock().snapshot.clone())
    }

    async fn get_property(
        &self,
        _destination: &str,
        path: &ObjectPath,
        qualified_name: &str,
    ) -> Result<BusValue> {
        self.state
            .lock()
            .properties
            .get(&(path.clone(), qualified_name.to_string()))
            .cloned()
            .ok_or_else(|| BusError::PropertyFetch {
                property: qualified_name.to_string(),
                message: "not scripted".to_string(),
            })
    }

    async fn call_method(
        &self,
        _destination: &str,
        path: &ObjectPath,
        method: &str,
        _args: Vec<BusValue>,
    ) -> Result<BusValue> {
        let mut state = self.state.lock();
        state.method_calls.push((path.clone(), method.to_string()));
        state
            .method_replies
            .get(method)
            .cloned()
            .ok_or_else(|| BusError::MethodCall {
                method: method.to_string(),
                message: "not scripted".to_string(),
            })
    }

    async fn call_method_no_reply(
        &self,
        _destination: &str,
        path: &ObjectPath,
        method: &str,
        _args: Vec<BusValue>,
    ) -> Result<()> {
        self.state
            .lock()
            .method_calls
            .push((path.clone(), method.to_string()));
        Ok(())
    }

    fn register_signal_queue(&self, queue: mpsc::Sender<RawSignal>) {
        self.state.lock().signal_tx = Some(queue);
    }

    async fn add_match(&self, interface: &str, signal: &str) -> Result<()> {
        let mut state = self.state.lock();
        let failing = state
            .failing_matches
            .iter()
            .any(|(i, s)| i == interface && s == signal);
        if failing {
            return Err(BusError::MatchRule {
                interface: interface.to_string(),
                signal: signal.to_string(),
                message: "scripted failure".to_string(),
            });
        }
        state.add_match_calls += 1;
        Ok(())
    }

    async fn remove_match(&self, _interface: &str, _signal: &str) -> Result<()> {
        self.state.lock().remove_match_calls += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter_snapshot() -> HashMap<ObjectPath, InterfaceMap> {
        let mut props = PropertyMap::new();
        props.insert("Address".to_string(), BusValue::from("AA:BB:CC:DD:EE:FF"));
        let mut interfaces = InterfaceMap::new();
        interfaces.insert("org.bluez.Adapter1".to_string(), props);
        let mut snapshot = HashMap::new();
        snapshot.insert(ObjectPath::from("/org/bluez/hci0"), interfaces);
        snapshot
    }

    #[tokio::test]
    async fn test_snapshot_roundtrip() {
        let bus = MockBus::with_snapshot(adapter_snapshot());
        let objects = bus
            .managed_objects("org.bluez", &ObjectPath::from("/"))
            .await
            .unwrap();
        assert_eq!(objects.len(), 1);
        assert!(objects.contains_key(&ObjectPath::from("/org/bluez/hci0")));
    }

    #[tokio::test]
    async fn test_match_counting() {
        let bus = MockBus::new();
        bus.add_match("org.freedesktop.DBus.ObjectManager", "InterfacesAdded")
            .await
            .unwrap();
        assert_eq!(bus.add_match_count(), 1);
        bus.remove_match("org.freedesktop.DBus.ObjectManager", "InterfacesAdded")
            .await
            .unwrap();
        assert_eq!(bus.net_match_count(), 0);
    }

    #[tokio::test]
    async fn test_scripted_match_failure() {
        let bus = MockBus::new();
        bus.fail_add_match("org.freedesktop.DBus.Properties", "PropertiesChanged");
        let err = bus
            .add_match("org.freedesktop.DBus.Properties", "PropertiesChanged")
            .await
            .unwrap_err();
        assert!(matches!(err, BusError::MatchRule { .. }));
        assert_eq!(bus.add_match_count(), 0);
    }

    #[tokio::test]
    async fn test_signal_injection() {
        let bus = MockBus::new();
        let (tx, mut rx) = mpsc::channel(4);
        bus.register_signal_queue(tx);

        let delivered = bus
            .emit_signal(RawSignal {
                sender: ":1.9".to_string(),
                path: ObjectPath::from("/org/bluez/hci0"),
                name: "InterfacesAdded".to_string(),
                body: vec![],
            })
            .await;
        assert!(delivered);
        assert_eq!(rx.recv().await.unwrap().member(), "InterfacesAdded");
    }

    #[tokio::test]
    async fn test_unregistered_queue() {
        let bus = MockBus::new();
        let delivered = bus
            .emit_signal(RawSignal {
                sender: ":1.9".to_string(),
                path: ObjectPath::from("/org/bluez/hci0"),
                name: "InterfacesAdded".to_string(),
                body: vec![],
            })
            .await;
        assert!(!delivered);
    }
}
