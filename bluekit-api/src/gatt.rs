//! GATT attribute hierarchy: services, characteristics, descriptors
//!
//! Services hang under devices, characteristics under services, descriptors
//! under characteristics; each level is one path component deeper.

use std::collections::HashMap;
use std::ops::Deref;
use std::sync::Arc;

use bluekit_bus::{BusTransport, BusValue, InterfaceMap, ObjectPath};

use crate::base::BaseObject;
use crate::consts::{gatt_characteristic, gatt_descriptor, gatt_service};
use crate::error::{ApiError, Result};
use crate::interface::BluezInterface;

fn offset_dict(offset: u16) -> BusValue {
    let mut options = HashMap::new();
    options.insert("offset".to_string(), BusValue::U16(offset));
    BusValue::Dict(options)
}

/// A GATT service (org.bluez.GattService1)
#[derive(Clone, Debug)]
pub struct GattService {
    base: BaseObject,
}

impl GattService {
    pub(crate) fn new(
        bus: Arc<dyn BusTransport>,
        path: ObjectPath,
        data: &InterfaceMap,
    ) -> Result<Self> {
        Ok(Self {
            base: BaseObject::new(bus, path, BluezInterface::GattService, data)?,
        })
    }

    pub fn uuid(&self) -> Option<&str> {
        self.base.property(gatt_service::UUID)?.as_str()
    }

    /// Whether this is a primary service
    pub fn primary(&self) -> Option<bool> {
        self.base.property(gatt_service::PRIMARY)?.as_bool()
    }
}

impl Deref for GattService {
    type Target = BaseObject;

    fn deref(&self) -> &BaseObject {
        &self.base
    }
}

/// A GATT characteristic (org.bluez.GattCharacteristic1)
#[derive(Clone, Debug)]
pub struct GattCharacteristic {
    base: BaseObject,
}

impl GattCharacteristic {
    pub(crate) fn new(
        bus: Arc<dyn BusTransport>,
        path: ObjectPath,
        data: &InterfaceMap,
    ) -> Result<Self> {
        Ok(Self {
            base: BaseObject::new(bus, path, BluezInterface::GattCharacteristic, data)?,
        })
    }

    pub fn uuid(&self) -> Option<&str> {
        self.base.property(gatt_characteristic::UUID)?.as_str()
    }

    /// Read the characteristic value starting at `offset`
    pub async fn read_value(&self, offset: u16) -> Result<Vec<u8>> {
        let reply = self
            .base
            .call_with_args(gatt_characteristic::READ_VALUE, vec![offset_dict(offset)])
            .await?;
        reply
            .as_bytes()
            .map(<[u8]>::to_vec)
            .ok_or(ApiError::UnexpectedReply {
                method: gatt_characteristic::READ_VALUE.to_string(),
            })
    }

    /// Write `value` to the characteristic starting at `offset`
    pub async fn write_value(&self, value: Vec<u8>, offset: u16) -> Result<()> {
        self.base
            .call_no_reply(
                gatt_characteristic::WRITE_VALUE,
                vec![BusValue::Bytes(value), offset_dict(offset)],
            )
            .await
    }

    /// Ask the remote to start emitting value notifications.
    ///
    /// Notifications arrive as PropertiesChanged signals on this path;
    /// subscribe through the client to receive them.
    pub async fn start_notify(&self) -> Result<()> {
        self.base.call(gatt_characteristic::START_NOTIFY).await
    }

    /// Stop value notifications
    pub async fn stop_notify(&self) -> Result<()> {
        self.base.call(gatt_characteristic::STOP_NOTIFY).await
    }
}

impl Deref for GattCharacteristic {
    type Target = BaseObject;

    fn deref(&self) -> &BaseObject {
        &self.base
    }
}

/// A GATT descriptor (org.bluez.GattDescriptor1)
#[derive(Clone, Debug)]
pub struct GattDescriptor {
    base: BaseObject,
}

impl GattDescriptor {
    pub(crate) fn new(
        bus: Arc<dyn BusTransport>,
        path: ObjectPath,
        data: &InterfaceMap,
    ) -> Result<Self> {
        Ok(Self {
            base: BaseObject::new(bus, path, BluezInterface::GattDescriptor, data)?,
        })
    }

    pub fn uuid(&self) -> Option<&str> {
        self.base.property(gatt_descriptor::UUID)?.as_str()
    }

    /// Read the descriptor value starting at `offset`
    pub async fn read_value(&self, offset: u16) -> Result<Vec<u8>> {
        let reply = self
            .base
            .call_with_args(gatt_descriptor::READ_VALUE, vec![offset_dict(offset)])
            .await?;
        reply
            .as_bytes()
            .map(<[u8]>::to_vec)
            .ok_or(ApiError::UnexpectedReply {
                method: gatt_descriptor::READ_VALUE.to_string(),
            })
    }
}

impl Deref for GattDescriptor {
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

    const CHAR_PATH: &str = "/org/bluez/hci0/dev_11_22_33_44_55_66/service0026/char0031";

    fn characteristic_with(bus: Arc<MockBus>) -> GattCharacteristic {
        let mut props = PropertyMap::new();
        props.insert(
            gatt_characteristic::UUID.to_string(),
            BusValue::from("00002a19-0000-1000-8000-00805f9b34fb"),
        );
        let mut data = InterfaceMap::new();
        data.insert(BluezInterface::GattCharacteristic.name().to_string(), props);
        GattCharacteristic::new(bus, ObjectPath::from(CHAR_PATH), &data).unwrap()
    }

    #[tokio::test]
    async fn test_read_value() {
        let bus = Arc::new(MockBus::new());
        bus.set_method_reply(
            gatt_characteristic::READ_VALUE,
            BusValue::Bytes(vec![0x64, 0x00, 0x00, 0x00]),
        );
        let characteristic = characteristic_with(bus);

        let value = characteristic.read_value(0).await.unwrap();
        assert_eq!(value, vec![0x64, 0x00, 0x00, 0x00]);
    }

    #[tokio::test]
    async fn test_read_value_rejects_wrong_shape() {
        let bus = Arc::new(MockBus::new());
        bus.set_method_reply(gatt_characteristic::READ_VALUE, BusValue::Bool(true));
        let characteristic = characteristic_with(bus);

        let err = characteristic.read_value(0).await.unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedReply { .. }));
    }

    #[tokio::test]
    async fn test_notify_calls() {
        let bus = Arc::new(MockBus::new());
        let characteristic = characteristic_with(bus.clone());

        characteristic.start_notify().await.unwrap();
        characteristic.stop_notify().await.unwrap();

        let calls = bus.method_calls();
        assert_eq!(calls[0].1, gatt_characteristic::START_NOTIFY);
        assert_eq!(calls[1].1, gatt_characteristic::STOP_NOTIFY);
    }

    #[test]
    fn test_service_accessors() {
        let mut props = PropertyMap::new();
        props.insert(
            gatt_service::UUID.to_string(),
            BusValue::from("0000180f-0000-1000-8000-00805f9b34fb"),
        );
        props.insert(gatt_service::PRIMARY.to_string(), BusValue::Bool(true));
        let mut data = InterfaceMap::new();
        data.insert(BluezInterface::GattService.name().to_string(), props);

        let service = GattService::new(
            Arc::new(MockBus::new()),
            ObjectPath::from("/org/bluez/hci0/dev_11_22_33_44_55_66/service0026"),
            &data,
        )
        .unwrap();
        assert_eq!(service.uuid(), Some("0000180f-0000-1000-8000-00805f9b34fb"));
        assert_eq!(service.primary(), Some(true));
    }
}
