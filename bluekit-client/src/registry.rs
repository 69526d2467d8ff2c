//! The local object registry
//!
//! A path-keyed mirror of the remote object space. Objects enter through the
//! bootstrap snapshot or through signal-driven upserts, and every update
//! installs a complete replacement snapshot: readers never observe a
//! half-applied object.

use std::collections::HashMap;
use std::sync::Arc;

use bluekit_api::{registry as type_registry, BluezInterface, BluezObject};
use bluekit_bus::{BusTransport, InterfaceMap, ObjectPath};
use parking_lot::RwLock;

use crate::error::{ClientError, Result};

/// Path-keyed cache of typed object snapshots
pub struct ObjectRegistry {
    objects: RwLock<HashMap<ObjectPath, BluezObject>>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Populate the registry from a bulk snapshot.
    ///
    /// Runs under a single write lock so readers see either the pre-bootstrap
    /// or the post-bootstrap registry, never a partial fill. Payloads with no
    /// registered interface are skipped.
    pub fn bootstrap(
        &self,
        bus: Arc<dyn BusTransport>,
        snapshot: HashMap<ObjectPath, InterfaceMap>,
    ) {
        let mut objects = self.objects.write();
        for (path, data) in snapshot {
            match type_registry::construct(bus.clone(), path.clone(), &data) {
                Some(object) => {
                    objects.insert(path, object);
                }
                None => {
                    tracing::debug!(path = %path, "skipping object with no registered interface");
                }
            }
        }
        tracing::info!(count = objects.len(), "object registry populated");
    }

    /// Snapshot of the object at `path`, if cached
    pub fn get(&self, path: &ObjectPath) -> Option<BluezObject> {
        self.objects.read().get(path).cloned()
    }

    /// Build a fresh snapshot from a signal payload and install it,
    /// replacing whatever was cached at that path.
    ///
    /// Returns the installed snapshot, or `None` when the payload matches no
    /// registered interface (the stale entry, if any, is left in place).
    pub fn upsert(
        &self,
        bus: Arc<dyn BusTransport>,
        path: ObjectPath,
        data: &InterfaceMap,
    ) -> Option<BluezObject> {
        match type_registry::construct(bus, path.clone(), data) {
            Some(object) => {
                self.objects.write().insert(path, object.clone());
                Some(object)
            }
            None => {
                tracing::warn!(path = %path, "dropping update with no registered interface");
                None
            }
        }
    }

    /// Remove the cached object at `path`
    pub fn remove(&self, path: &ObjectPath) -> Option<BluezObject> {
        self.objects.write().remove(path)
    }

    /// All cached objects whose primary interface is `interface`
    pub fn find_by_type(&self, interface: BluezInterface) -> Vec<BluezObject> {
        self.objects
            .read()
            .values()
            .filter(|object| object.primary_interface() == interface)
            .cloned()
            .collect()
    }

    /// All cached objects that declare `interface`, primary or not
    pub fn find_by_interface(&self, interface: &str) -> Vec<BluezObject> {
        self.objects
            .read()
            .values()
            .filter(|object| object.declares_interface(interface))
            .cloned()
            .collect()
    }

    /// Look up objects by path pattern.
    ///
    /// A trailing `*` turns the pattern into a prefix scan; otherwise the
    /// lookup is exact and yields at most one object.
    pub fn find_by_path(&self, pattern: &str) -> Result<Vec<BluezObject>> {
        if pattern.is_empty() {
            return Err(ClientError::EmptyPattern);
        }

        let objects = self.objects.read();
        match pattern.strip_suffix('*') {
            Some(prefix) => Ok(objects
                .iter()
                .filter(|(path, _)| path.has_prefix(prefix))
                .map(|(_, object)| object.clone())
                .collect()),
            None => {
                let path = ObjectPath::from(pattern);
                Ok(objects.get(&path).cloned().into_iter().collect())
            }
        }
    }

    /// Paths of every cached object
    pub fn paths(&self) -> Vec<ObjectPath> {
        self.objects.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }
}

impl Default for ObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bluekit_api::consts::device;
    use bluekit_bus::testing::MockBus;
    use bluekit_bus::{BusValue, PropertyMap};

    fn mock() -> Arc<dyn BusTransport> {
        Arc::new(MockBus::new())
    }

    fn adapter_payload(address: &str) -> InterfaceMap {
        let mut props = PropertyMap::new();
        props.insert("Address".to_string(), BusValue::from(address));
        let mut data = InterfaceMap::new();
        data.insert("org.bluez.Adapter1".to_string(), props);
        data
    }

    fn device_payload(address: &str, connected: bool) -> InterfaceMap {
        let mut props = PropertyMap::new();
        props.insert(device::ADDRESS.to_string(), BusValue::from(address));
        props.insert(device::CONNECTED.to_string(), BusValue::Bool(connected));
        let mut data = InterfaceMap::new();
        data.insert("org.bluez.Device1".to_string(), props);
        data
    }

    fn snapshot() -> HashMap<ObjectPath, InterfaceMap> {
        let mut snapshot = HashMap::new();
        snapshot.insert(
            ObjectPath::from("/org/bluez/hci0"),
            adapter_payload("AA:BB:CC:DD:EE:FF"),
        );
        snapshot.insert(
            ObjectPath::from("/org/bluez/hci0/dev_11_22_33_44_55_66"),
            device_payload("11:22:33:44:55:66", false),
        );
        // No registered interface; must be skipped, not cached
        let mut bare = InterfaceMap::new();
        bare.insert(
            "org.freedesktop.DBus.Introspectable".to_string(),
            PropertyMap::new(),
        );
        snapshot.insert(ObjectPath::from("/org/bluez"), bare);
        snapshot
    }

    #[test]
    fn test_bootstrap_populates_and_skips() {
        let registry = ObjectRegistry::new();
        registry.bootstrap(mock(), snapshot());

        assert_eq!(registry.len(), 2);
        assert!(registry.get(&ObjectPath::from("/org/bluez/hci0")).is_some());
        assert!(registry.get(&ObjectPath::from("/org/bluez")).is_none());
    }

    #[test]
    fn test_upsert_replaces_whole_snapshot() {
        let registry = ObjectRegistry::new();
        let path = ObjectPath::from("/org/bluez/hci0/dev_11_22_33_44_55_66");

        registry.upsert(mock(), path.clone(), &device_payload("11:22:33:44:55:66", false));

        // Second payload has Connected only; Address must not survive the
        // replacement.
        let mut props = PropertyMap::new();
        props.insert(device::CONNECTED.to_string(), BusValue::Bool(true));
        let mut data = InterfaceMap::new();
        data.insert("org.bluez.Device1".to_string(), props);
        registry.upsert(mock(), path.clone(), &data);

        let cached = registry.get(&path).unwrap();
        assert_eq!(cached.property(device::CONNECTED), Some(&BusValue::Bool(true)));
        assert!(cached.property(device::ADDRESS).is_none());
    }

    #[test]
    fn test_upsert_unmatched_payload_keeps_old_entry() {
        let registry = ObjectRegistry::new();
        let path = ObjectPath::from("/org/bluez/hci0");
        registry.upsert(mock(), path.clone(), &adapter_payload("AA:BB:CC:DD:EE:FF"));

        let mut bare = InterfaceMap::new();
        bare.insert("org.bluez.Battery1".to_string(), PropertyMap::new());
        assert!(registry.upsert(mock(), path.clone(), &bare).is_none());

        // The old snapshot is still there
        assert!(registry.get(&path).unwrap().as_adapter().is_some());
    }

    #[test]
    fn test_find_by_type_and_interface() {
        let registry = ObjectRegistry::new();
        registry.bootstrap(mock(), snapshot());

        assert_eq!(registry.find_by_type(BluezInterface::Adapter).len(), 1);
        assert_eq!(registry.find_by_type(BluezInterface::Device).len(), 1);
        assert_eq!(registry.find_by_type(BluezInterface::GattService).len(), 0);
        assert_eq!(registry.find_by_interface("org.bluez.Device1").len(), 1);
    }

    #[test]
    fn test_find_by_path_patterns() {
        let registry = ObjectRegistry::new();
        registry.bootstrap(mock(), snapshot());

        assert!(matches!(
            registry.find_by_path(""),
            Err(ClientError::EmptyPattern)
        ));
        assert_eq!(registry.find_by_path("/org/bluez/hci0").unwrap().len(), 1);
        assert_eq!(registry.find_by_path("/org/bluez/hci0*").unwrap().len(), 2);
        assert_eq!(registry.find_by_path("/org/bluez/hci1*").unwrap().len(), 0);
        assert!(registry.find_by_path("/nope").unwrap().is_empty());
    }

    #[test]
    fn test_remove() {
        let registry = ObjectRegistry::new();
        let path = ObjectPath::from("/org/bluez/hci0");
        registry.upsert(mock(), path.clone(), &adapter_payload("AA:BB:CC:DD:EE:FF"));

        assert!(registry.remove(&path).is_some());
        assert!(registry.get(&path).is_none());
        assert!(registry.remove(&path).is_none());
    }

    #[test]
    fn test_concurrent_readers_see_whole_snapshots() {
        let registry = Arc::new(ObjectRegistry::new());
        let path = ObjectPath::from("/org/bluez/hci0/dev_11_22_33_44_55_66");
        registry.upsert(mock(), path.clone(), &device_payload("11:22:33:44:55:66", false));

        let writer = {
            let registry = Arc::clone(&registry);
            let path = path.clone();
            std::thread::spawn(move || {
                for i in 0..200 {
                    let payload = device_payload("11:22:33:44:55:66", i % 2 == 0);
                    registry.upsert(mock(), path.clone(), &payload);
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let path = path.clone();
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        let object = registry.get(&path).unwrap();
                        // Every snapshot carries both properties or the test
                        // has observed a torn write.
                        assert!(object.property(device::ADDRESS).is_some());
                        assert!(object.property(device::CONNECTED).is_some());
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
