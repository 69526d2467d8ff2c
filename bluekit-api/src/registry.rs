//! The type registry: remote interface name to variant constructor
//!
//! Each variant contributes one entry to a process-wide table built behind an
//! initialization barrier on first use and never mutated afterwards. A
//! duplicate registration is a programming error caught while the table is
//! built, not a silent last-writer-wins.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use bluekit_bus::{BusTransport, InterfaceMap, ObjectPath};

use crate::adapter::Adapter;
use crate::agent_manager::AgentManager;
use crate::device::Device;
use crate::error::Result;
use crate::gatt::{GattCharacteristic, GattDescriptor, GattService};
use crate::interface::BluezInterface;
use crate::media_transport::MediaTransport;
use crate::object::BluezObject;

/// Builds one typed variant from a per-object payload
pub type Constructor =
    fn(Arc<dyn BusTransport>, ObjectPath, &InterfaceMap) -> Result<BluezObject>;

static TYPE_REGISTRY: OnceLock<HashMap<&'static str, Constructor>> = OnceLock::new();

fn build_table() -> HashMap<&'static str, Constructor> {
    let entries: [(&'static str, Constructor); 7] = [
        (BluezInterface::Adapter.name(), |bus, path, data| {
            Adapter::new(bus, path, data).map(BluezObject::Adapter)
        }),
        (BluezInterface::Device.name(), |bus, path, data| {
            Device::new(bus, path, data).map(BluezObject::Device)
        }),
        (BluezInterface::AgentManager.name(), |bus, path, data| {
            AgentManager::new(bus, path, data).map(BluezObject::AgentManager)
        }),
        (BluezInterface::MediaTransport.name(), |bus, path, data| {
            MediaTransport::new(bus, path, data).map(BluezObject::MediaTransport)
        }),
        (BluezInterface::GattService.name(), |bus, path, data| {
            GattService::new(bus, path, data).map(BluezObject::GattService)
        }),
        (
            BluezInterface::GattCharacteristic.name(),
            |bus, path, data| {
                GattCharacteristic::new(bus, path, data).map(BluezObject::GattCharacteristic)
            },
        ),
        (BluezInterface::GattDescriptor.name(), |bus, path, data| {
            GattDescriptor::new(bus, path, data).map(BluezObject::GattDescriptor)
        }),
    ];

    let mut table = HashMap::with_capacity(entries.len());
    for (name, constructor) in entries {
        if table.insert(name, constructor).is_some() {
            panic!("duplicate type registration for {name}");
        }
    }
    table
}

fn table() -> &'static HashMap<&'static str, Constructor> {
    TYPE_REGISTRY.get_or_init(build_table)
}

/// Look up the constructor registered for a remote interface name
pub fn lookup(interface: &str) -> Option<Constructor> {
    table().get(interface).copied()
}

/// All interface names with a registered constructor
pub fn registered_interfaces() -> Vec<&'static str> {
    table().keys().copied().collect()
}

/// Materialize a typed object from a per-object payload.
///
/// Picks the first payload interface with a registered constructor; the
/// iteration order over candidates is arbitrary on purpose. BlueZ payloads
/// carry exactly one meaningful interface per object, so a tie means the
/// remote is doing something this model does not expect - worth a log line,
/// not an error. Returns `None` when nothing matches or construction fails.
pub fn construct(
    bus: Arc<dyn BusTransport>,
    path: ObjectPath,
    data: &InterfaceMap,
) -> Option<BluezObject> {
    let mut candidates = data.keys().filter(|name| lookup(name).is_some());
    let interface = candidates.next()?;
    if candidates.next().is_some() {
        tracing::debug!(path = %path, "payload matches more than one registered interface");
    }

    let constructor = lookup(interface)?;
    match constructor(bus, path.clone(), data) {
        Ok(object) => Some(object),
        Err(error) => {
            tracing::warn!(path = %path, interface, %error, "constructor rejected payload");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bluekit_bus::testing::MockBus;
    use bluekit_bus::{BusValue, PropertyMap};

    fn mock() -> Arc<dyn BusTransport> {
        Arc::new(MockBus::new())
    }

    fn payload_for(interface: BluezInterface) -> InterfaceMap {
        let mut data = InterfaceMap::new();
        data.insert(interface.name().to_string(), PropertyMap::new());
        data.insert(
            "org.freedesktop.DBus.Properties".to_string(),
            PropertyMap::new(),
        );
        data
    }

    #[test]
    fn test_every_variant_registered() {
        let names = registered_interfaces();
        assert_eq!(names.len(), BluezInterface::ALL.len());
        for iface in BluezInterface::ALL {
            assert!(lookup(iface.name()).is_some());
        }
    }

    #[test]
    fn test_lookup_miss() {
        assert!(lookup("org.freedesktop.DBus.Properties").is_none());
        assert!(lookup("org.bluez.Battery1").is_none());
    }

    #[test]
    fn test_construct_each_variant() {
        for iface in BluezInterface::ALL {
            let object = construct(
                mock(),
                ObjectPath::from("/org/bluez/hci0"),
                &payload_for(iface),
            )
            .expect("constructor registered for every variant");
            assert_eq!(object.primary_interface(), iface);
        }
    }

    #[test]
    fn test_construct_unmatched_payload() {
        let mut data = InterfaceMap::new();
        data.insert(
            "org.freedesktop.DBus.Introspectable".to_string(),
            PropertyMap::new(),
        );
        assert!(construct(mock(), ObjectPath::from("/org/bluez"), &data).is_none());
    }

    #[test]
    fn test_construct_keeps_payload_properties() {
        let mut props = PropertyMap::new();
        props.insert("Address".to_string(), BusValue::from("AA:BB:CC:DD:EE:FF"));
        let mut data = InterfaceMap::new();
        data.insert(BluezInterface::Adapter.name().to_string(), props);

        let object = construct(mock(), ObjectPath::from("/org/bluez/hci0"), &data).unwrap();
        assert!(object.as_adapter().is_some());
        assert_eq!(
            object.property("Address").and_then(BusValue::as_str),
            Some("AA:BB:CC:DD:EE:FF")
        );
    }
}
