//! Remote devices seen by an adapter

use std::ops::Deref;
use std::sync::Arc;

use bluekit_bus::{BusTransport, BusValue, InterfaceMap, ObjectPath, PropertyMap};

use crate::base::BaseObject;
use crate::consts::device;
use crate::error::{ApiError, Result};
use crate::interface::BluezInterface;

/// A bluetooth device (org.bluez.Device1), child of an adapter in the path
/// hierarchy
#[derive(Clone, Debug)]
pub struct Device {
    base: BaseObject,
}

impl Device {
    pub(crate) fn new(
        bus: Arc<dyn BusTransport>,
        path: ObjectPath,
        data: &InterfaceMap,
    ) -> Result<Self> {
        Ok(Self {
            base: BaseObject::new(bus, path, BluezInterface::Device, data)?,
        })
    }

    /// Derive the device path from a Device1 property snapshot.
    ///
    /// Discovery payloads carry the owning adapter path and the device
    /// address; together they determine where the device will appear.
    pub fn path_from_properties(properties: &PropertyMap) -> Result<ObjectPath> {
        let adapter = properties
            .get(device::ADAPTER)
            .and_then(BusValue::as_path)
            .ok_or_else(|| ApiError::PropertyNotFound(device::ADAPTER.to_string()))?;
        let address = properties
            .get(device::ADDRESS)
            .and_then(BusValue::as_str)
            .ok_or_else(|| ApiError::PropertyNotFound(device::ADDRESS.to_string()))?;
        Ok(ObjectPath::child_for_address(adapter, address))
    }

    /// Connect to the device
    pub async fn connect(&self) -> Result<()> {
        self.base.call(device::CONNECT).await
    }

    /// Disconnect from the device
    pub async fn disconnect(&self) -> Result<()> {
        self.base.call(device::DISCONNECT).await
    }

    /// Connect only the profile identified by `uuid`
    pub async fn connect_profile(&self, uuid: &str) -> Result<()> {
        self.base
            .call_no_reply(device::CONNECT_PROFILE, vec![BusValue::from(uuid)])
            .await
    }

    /// Disconnect the profile identified by `uuid`
    pub async fn disconnect_profile(&self, uuid: &str) -> Result<()> {
        self.base
            .call_no_reply(device::DISCONNECT_PROFILE, vec![BusValue::from(uuid)])
            .await
    }

    /// Initiate pairing with the device
    pub async fn pair(&self) -> Result<()> {
        self.base.call(device::PAIR).await
    }

    pub fn address(&self) -> Option<&str> {
        self.base.property(device::ADDRESS)?.as_str()
    }

    pub fn alias(&self) -> Option<&str> {
        self.base.property(device::ALIAS)?.as_str()
    }

    pub fn connected(&self) -> Option<bool> {
        self.base.property(device::CONNECTED)?.as_bool()
    }

    pub fn paired(&self) -> Option<bool> {
        self.base.property(device::PAIRED)?.as_bool()
    }

    pub fn trusted(&self) -> Option<bool> {
        self.base.property(device::TRUSTED)?.as_bool()
    }

    pub fn services_resolved(&self) -> Option<bool> {
        self.base.property(device::SERVICES_RESOLVED)?.as_bool()
    }

    pub fn rssi(&self) -> Option<i16> {
        self.base.property(device::RSSI)?.as_i16()
    }

    /// Path of the adapter this device belongs to
    pub fn adapter(&self) -> Option<&ObjectPath> {
        self.base.property(device::ADAPTER)?.as_path()
    }

    /// Service UUIDs advertised by the device
    pub fn uuids(&self) -> Vec<String> {
        self.base
            .property(device::UUIDS)
            .and_then(BusValue::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(BusValue::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Deref for Device {
    type Target = BaseObject;

    fn deref(&self) -> &BaseObject {
        &self.base
    }
}
