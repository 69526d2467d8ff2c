//! Destination, method, and property name constants for the BlueZ surface

/// Destination for all BlueZ calls
pub const BLUEZ_DEST: &str = "org.bluez";
/// Root of the BlueZ object hierarchy
pub const BLUEZ_ROOT_PATH: &str = "/org/bluez";

/// org.bluez.Adapter1 methods and properties
pub mod adapter {
    pub const START_DISCOVERY: &str = "org.bluez.Adapter1.StartDiscovery";
    pub const STOP_DISCOVERY: &str = "org.bluez.Adapter1.StopDiscovery";
    pub const CONNECT: &str = "org.bluez.Adapter1.Connect";

    pub const ADDRESS: &str = "Address";
    pub const ALIAS: &str = "Alias";
}

/// org.bluez.Device1 methods and properties
pub mod device {
    pub const CONNECT: &str = "org.bluez.Device1.Connect";
    pub const DISCONNECT: &str = "org.bluez.Device1.Disconnect";
    pub const CONNECT_PROFILE: &str = "org.bluez.Device1.ConnectProfile";
    pub const DISCONNECT_PROFILE: &str = "org.bluez.Device1.DisconnectProfile";
    pub const PAIR: &str = "org.bluez.Device1.Pair";

    pub const ADDRESS: &str = "Address";
    pub const ADDRESS_TYPE: &str = "AddressType";
    pub const ADAPTER: &str = "Adapter";
    pub const ALIAS: &str = "Alias";
    pub const BLOCKED: &str = "Blocked";
    pub const CONNECTED: &str = "Connected";
    pub const LEGACY_PAIRING: &str = "LegacyPairing";
    pub const PAIRED: &str = "Paired";
    pub const RSSI: &str = "RSSI";
    pub const SERVICE_DATA: &str = "ServiceData";
    pub const SERVICES_RESOLVED: &str = "ServicesResolved";
    pub const TRUSTED: &str = "Trusted";
    pub const UUIDS: &str = "UUIDs";
}

/// org.bluez.GattService1 properties
pub mod gatt_service {
    pub const UUID: &str = "UUID";
    pub const PRIMARY: &str = "Primary";
    pub const INCLUDES: &str = "Includes";
    pub const HANDLE: &str = "Handle";
}

/// org.bluez.GattCharacteristic1 methods and properties
pub mod gatt_characteristic {
    pub const READ_VALUE: &str = "org.bluez.GattCharacteristic1.ReadValue";
    pub const WRITE_VALUE: &str = "org.bluez.GattCharacteristic1.WriteValue";
    pub const START_NOTIFY: &str = "org.bluez.GattCharacteristic1.StartNotify";
    pub const STOP_NOTIFY: &str = "org.bluez.GattCharacteristic1.StopNotify";

    pub const UUID: &str = "UUID";
    pub const SERVICE: &str = "Service";
    pub const VALUE: &str = "Value";
}

/// org.bluez.GattDescriptor1 methods and properties
pub mod gatt_descriptor {
    pub const READ_VALUE: &str = "org.bluez.GattDescriptor1.ReadValue";
    pub const WRITE_VALUE: &str = "org.bluez.GattDescriptor1.WriteValue";

    pub const UUID: &str = "UUID";
}
