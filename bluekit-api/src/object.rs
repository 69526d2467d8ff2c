//! The closed sum of all typed variants

use bluekit_bus::{BusValue, ObjectPath, PropertyMap};

use crate::adapter::Adapter;
use crate::agent_manager::AgentManager;
use crate::base::BaseObject;
use crate::device::Device;
use crate::gatt::{GattCharacteristic, GattDescriptor, GattService};
use crate::interface::BluezInterface;
use crate::media_transport::MediaTransport;

/// One typed remote object, tagged by its primary interface
///
/// Values of this type are immutable snapshots: the registry replaces the
/// whole object on every update, so a held clone never changes underneath
/// its owner.
#[derive(Clone, Debug)]
pub enum BluezObject {
    Adapter(Adapter),
    Device(Device),
    AgentManager(AgentManager),
    MediaTransport(MediaTransport),
    GattService(GattService),
    GattCharacteristic(GattCharacteristic),
    GattDescriptor(GattDescriptor),
}

impl BluezObject {
    /// The common entity model every variant embeds
    pub fn base(&self) -> &BaseObject {
        match self {
            BluezObject::Adapter(o) => o,
            BluezObject::Device(o) => o,
            BluezObject::AgentManager(o) => o,
            BluezObject::MediaTransport(o) => o,
            BluezObject::GattService(o) => o,
            BluezObject::GattCharacteristic(o) => o,
            BluezObject::GattDescriptor(o) => o,
        }
    }

    pub fn path(&self) -> &ObjectPath {
        self.base().path()
    }

    /// The interface whose constructor built this object
    pub fn primary_interface(&self) -> BluezInterface {
        self.base().primary_interface()
    }

    /// Whether the object declared `interface` when the snapshot was taken
    pub fn declares_interface(&self, interface: &str) -> bool {
        self.base().interfaces().iter().any(|i| i == interface)
    }

    pub fn property(&self, name: &str) -> Option<&BusValue> {
        self.base().property(name)
    }

    pub fn properties(&self) -> &PropertyMap {
        self.base().properties()
    }

    pub fn as_adapter(&self) -> Option<&Adapter> {
        match self {
            BluezObject::Adapter(o) => Some(o),
            _ => None,
        }
    }

    pub fn into_adapter(self) -> Option<Adapter> {
        match self {
            BluezObject::Adapter(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_device(&self) -> Option<&Device> {
        match self {
            BluezObject::Device(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_agent_manager(&self) -> Option<&AgentManager> {
        match self {
            BluezObject::AgentManager(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_media_transport(&self) -> Option<&MediaTransport> {
        match self {
            BluezObject::MediaTransport(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_gatt_service(&self) -> Option<&GattService> {
        match self {
            BluezObject::GattService(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_gatt_characteristic(&self) -> Option<&GattCharacteristic> {
        match self {
            BluezObject::GattCharacteristic(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_gatt_descriptor(&self) -> Option<&GattDescriptor> {
        match self {
            BluezObject::GattDescriptor(o) => Some(o),
            _ => None,
        }
    }
}
