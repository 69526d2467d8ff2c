//! The local bluetooth controller

use std::ops::Deref;
use std::sync::Arc;

use bluekit_bus::{BusTransport, BusValue, InterfaceMap, ObjectPath};

use crate::base::BaseObject;
use crate::consts::adapter;
use crate::error::Result;
use crate::interface::BluezInterface;

/// A bluetooth adapter (org.bluez.Adapter1)
///
/// Discovery is a composition of two things: watching the adapter path for
/// object-manager signals, and calling the remote StartDiscovery method.
/// The methods here only issue the remote calls; the watch half lives on the
/// client, which owns the subscription table.
#[derive(Clone, Debug)]
pub struct Adapter {
    base: BaseObject,
}

impl Adapter {
    pub(crate) fn new(
        bus: Arc<dyn BusTransport>,
        path: ObjectPath,
        data: &InterfaceMap,
    ) -> Result<Self> {
        Ok(Self {
            base: BaseObject::new(bus, path, BluezInterface::Adapter, data)?,
        })
    }

    /// Start device discovery on this adapter
    pub async fn start_discovery(&self) -> Result<()> {
        self.base.call(adapter::START_DISCOVERY).await
    }

    /// Stop device discovery on this adapter
    pub async fn stop_discovery(&self) -> Result<()> {
        self.base.call(adapter::STOP_DISCOVERY).await
    }

    /// Connect to the device at a "HH:HH:HH:HH:HH:HH" address
    pub async fn connect(&self, address: &str) -> Result<()> {
        self.base
            .call_no_reply(adapter::CONNECT, vec![BusValue::from(address)])
            .await
    }

    /// Cached controller address
    pub fn address(&self) -> Option<&str> {
        self.base.property(adapter::ADDRESS)?.as_str()
    }

    /// Cached controller alias
    pub fn alias(&self) -> Option<&str> {
        self.base.property(adapter::ALIAS)?.as_str()
    }
}

impl Deref for Adapter {
    type Target = BaseObject;

    fn deref(&self) -> &BaseObject {
        &self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bluekit_bus::testing::MockBus;
    use bluekit_bus::PropertyMap;

    fn adapter_with(bus: Arc<MockBus>) -> Adapter {
        let mut props = PropertyMap::new();
        props.insert(
            adapter::ADDRESS.to_string(),
            BusValue::from("AA:BB:CC:DD:EE:FF"),
        );
        props.insert(adapter::ALIAS.to_string(), BusValue::from("hci0"));
        let mut data = InterfaceMap::new();
        data.insert(BluezInterface::Adapter.name().to_string(), props);
        Adapter::new(bus, ObjectPath::from("/org/bluez/hci0"), &data).unwrap()
    }

    #[test]
    fn test_typed_accessors() {
        let adapter = adapter_with(Arc::new(MockBus::new()));
        assert_eq!(adapter.address(), Some("AA:BB:CC:DD:EE:FF"));
        assert_eq!(adapter.alias(), Some("hci0"));
        assert_eq!(adapter.path().as_str(), "/org/bluez/hci0");
    }

    #[tokio::test]
    async fn test_discovery_calls() {
        let bus = Arc::new(MockBus::new());
        let adapter = adapter_with(bus.clone());

        adapter.start_discovery().await.unwrap();
        adapter.stop_discovery().await.unwrap();

        let calls = bus.method_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].1, adapter::START_DISCOVERY);
        assert_eq!(calls[1].1, adapter::STOP_DISCOVERY);
    }
}
