//! The common entity model every typed variant embeds
//!
//! A [`BaseObject`] is an immutable snapshot of one remote object: its path,
//! the interface that determined its type, the full interface set seen at
//! construction time, and the cached property snapshot for the primary
//! interface. Snapshots are never patched in place - the registry replaces
//! the whole object when a signal updates it, so holders of a clone observe
//! a consistent state and re-query for anything newer.

use std::fmt;
use std::sync::Arc;

use bluekit_bus::{BusTransport, BusValue, InterfaceMap, ObjectPath, PropertyMap};

use crate::consts::BLUEZ_DEST;
use crate::error::{ApiError, Result};
use crate::interface::BluezInterface;

/// Identity and cached state shared by all typed variants
#[derive(Clone)]
pub struct BaseObject {
    bus: Arc<dyn BusTransport>,
    path: ObjectPath,
    primary: BluezInterface,
    interfaces: Vec<String>,
    properties: PropertyMap,
}

impl BaseObject {
    /// Build a snapshot from a per-object payload.
    ///
    /// Fails when the payload carries no data for the primary interface;
    /// partial payloads never produce partially updated objects.
    pub(crate) fn new(
        bus: Arc<dyn BusTransport>,
        path: ObjectPath,
        primary: BluezInterface,
        data: &InterfaceMap,
    ) -> Result<Self> {
        let properties = data
            .get(primary.name())
            .cloned()
            .ok_or_else(|| ApiError::MissingInterface {
                path: path.clone(),
                interface: primary.name().to_string(),
            })?;
        let mut interfaces: Vec<String> = data.keys().cloned().collect();
        interfaces.sort();
        Ok(Self {
            bus,
            path,
            primary,
            interfaces,
            properties,
        })
    }

    /// The unique path of the remote object
    pub fn path(&self) -> &ObjectPath {
        &self.path
    }

    /// The interface whose constructor built this object
    pub fn primary_interface(&self) -> BluezInterface {
        self.primary
    }

    /// All interfaces the object declared when the snapshot was taken
    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    /// Cached property value, `None` when the snapshot lacks it
    pub fn property(&self, name: &str) -> Option<&BusValue> {
        self.properties.get(name)
    }

    /// The whole cached snapshot for the primary interface
    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    /// Fetch a property from the remote object, bypassing the cache
    pub async fn fetch_property(&self, name: &str) -> Result<BusValue> {
        let qualified = format!("{}.{}", self.primary.name(), name);
        Ok(self
            .bus
            .get_property(BLUEZ_DEST, &self.path, &qualified)
            .await?)
    }

    pub(crate) async fn call(&self, method: &str) -> Result<()> {
        Ok(self
            .bus
            .call_method_no_reply(BLUEZ_DEST, &self.path, method, vec![])
            .await?)
    }

    pub(crate) async fn call_no_reply(&self, method: &str, args: Vec<BusValue>) -> Result<()> {
        Ok(self
            .bus
            .call_method_no_reply(BLUEZ_DEST, &self.path, method, args)
            .await?)
    }

    pub(crate) async fn call_with_args(
        &self,
        method: &str,
        args: Vec<BusValue>,
    ) -> Result<BusValue> {
        Ok(self
            .bus
            .call_method(BLUEZ_DEST, &self.path, method, args)
            .await?)
    }
}

impl fmt::Debug for BaseObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseObject")
            .field("path", &self.path)
            .field("primary", &self.primary)
            .field("interfaces", &self.interfaces)
            .field("properties", &self.properties)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bluekit_bus::testing::MockBus;
    use std::collections::HashMap;

    fn payload(interface: &str, props: &[(&str, BusValue)]) -> InterfaceMap {
        let mut properties = PropertyMap::new();
        for (name, value) in props {
            properties.insert(name.to_string(), value.clone());
        }
        let mut data = InterfaceMap::new();
        data.insert(interface.to_string(), properties);
        data.insert(
            "org.freedesktop.DBus.Introspectable".to_string(),
            HashMap::new(),
        );
        data
    }

    fn mock() -> Arc<dyn BusTransport> {
        Arc::new(MockBus::new())
    }

    #[test]
    fn test_new_captures_snapshot() {
        let data = payload(
            "org.bluez.Adapter1",
            &[("Address", BusValue::from("AA:BB:CC:DD:EE:FF"))],
        );
        let base = BaseObject::new(
            mock(),
            ObjectPath::from("/org/bluez/hci0"),
            BluezInterface::Adapter,
            &data,
        )
        .unwrap();

        assert_eq!(base.path().as_str(), "/org/bluez/hci0");
        assert_eq!(base.primary_interface(), BluezInterface::Adapter);
        assert_eq!(base.interfaces().len(), 2);
        assert_eq!(
            base.property("Address").and_then(BusValue::as_str),
            Some("AA:BB:CC:DD:EE:FF")
        );
        assert!(base.property("Alias").is_none());
    }

    #[test]
    fn test_new_rejects_missing_primary() {
        let data = payload("org.bluez.Device1", &[]);
        let err = BaseObject::new(
            mock(),
            ObjectPath::from("/org/bluez/hci0"),
            BluezInterface::Adapter,
            &data,
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::MissingInterface { .. }));
    }

    #[tokio::test]
    async fn test_fetch_property_goes_remote() {
        let bus = Arc::new(MockBus::new());
        let path = ObjectPath::from("/org/bluez/hci0");
        bus.set_property(
            path.clone(),
            "org.bluez.Adapter1.Alias",
            BusValue::from("office"),
        );

        let data = payload("org.bluez.Adapter1", &[]);
        let base = BaseObject::new(
            bus.clone() as Arc<dyn BusTransport>,
            path,
            BluezInterface::Adapter,
            &data,
        )
        .unwrap();

        let value = base.fetch_property("Alias").await.unwrap();
        assert_eq!(value.as_str(), Some("office"));
    }
}
